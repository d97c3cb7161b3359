//! JSON output formatter for machine-readable results.

use super::formatter::IgnoreVerdict;
use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use sdist_core::SdistReport;
use sdist_core::inspection::ListedKind;
use sdist_core::inspection::SdistEntry;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct BuildOutput {
    file_name: String,
    path: String,
    files_added: usize,
    symlinks_added: usize,
    files_excluded: usize,
    total_entries: usize,
    bytes_written: u64,
    bytes_compressed: u64,
    compression_ratio: f64,
    duration_ms: u128,
}

impl From<&SdistReport> for BuildOutput {
    fn from(report: &SdistReport) -> Self {
        Self {
            file_name: report.file_name.clone(),
            path: report.path.display().to_string(),
            files_added: report.files_added,
            symlinks_added: report.symlinks_added,
            files_excluded: report.files_excluded,
            total_entries: report.total_entries(),
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
        }
    }
}

#[derive(Serialize)]
struct EntryOutput {
    path: String,
    kind: &'static str,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mtime: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
}

impl From<&SdistEntry> for EntryOutput {
    fn from(entry: &SdistEntry) -> Self {
        let (kind, target) = match &entry.kind {
            ListedKind::File => ("file", None),
            ListedKind::Directory => ("directory", None),
            ListedKind::Symlink { target } => ("symlink", Some(target.display().to_string())),
            ListedKind::Other => ("other", None),
        };
        Self {
            path: entry.path.display().to_string(),
            kind,
            size: entry.size,
            mode: entry.mode,
            mtime: entry.mtime,
            target,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_build_result(&self, report: &SdistReport) -> Result<()> {
        Self::output(&JsonOutput::success("build", BuildOutput::from(report)))
    }

    fn format_listing(&self, entries: &[SdistEntry], _long: bool) -> Result<()> {
        let data: Vec<EntryOutput> = entries.iter().map(EntryOutput::from).collect();
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_ignore_verdicts(&self, verdicts: &[IgnoreVerdict]) -> Result<()> {
        Self::output(&JsonOutput::success("check-ignore", verdicts))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("error", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
