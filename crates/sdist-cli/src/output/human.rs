//! Human-readable output formatter with colors and styling.

use super::formatter::IgnoreVerdict;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use sdist_core::SdistReport;
use sdist_core::inspection::ListedKind;
use sdist_core::inspection::SdistEntry;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn type_char(kind: &ListedKind) -> &'static str {
        match kind {
            ListedKind::File => "-",
            ListedKind::Directory => "d",
            ListedKind::Symlink { .. } => "l",
            ListedKind::Other => "?",
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_build_result(&self, report: &SdistReport) -> Result<()> {
        if self.quiet {
            // Frontends capture the file name even in quiet mode.
            let _ = self.term.write_line(&report.file_name);
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Built {}",
                style("✓").green().bold(),
                report.path.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Built {}", report.path.display()));
        }

        let _ = self
            .term
            .write_line(&format!("  Files added:      {}", report.files_added));
        if report.symlinks_added > 0 {
            let _ = self
                .term
                .write_line(&format!("  Symlinks:         {}", report.symlinks_added));
        }
        let _ = self
            .term
            .write_line(&format!("  Files excluded:   {}", report.files_excluded));
        let _ = self.term.write_line(&format!(
            "  Archive size:     {}",
            Self::format_size(report.bytes_compressed)
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Total size:       {}",
                Self::format_size(report.bytes_written)
            ));
            let _ = self.term.write_line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        Ok(())
    }

    fn format_listing(&self, entries: &[SdistEntry], long: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            if !long {
                let _ = self.term.write_line(&format!("{}", entry.path.display()));
                continue;
            }

            let mode_str = entry
                .mode
                .map_or_else(|| "-".to_string(), |m| format!("{m:o}"));
            let mtime_str = entry
                .mtime
                .map_or_else(|| "-".to_string(), |t| t.to_string());
            let mut line = format!(
                "{}{:<6} {:>10} {:>11}  {}",
                Self::type_char(&entry.kind),
                mode_str,
                entry.size,
                mtime_str,
                entry.path.display()
            );
            if let ListedKind::Symlink { target } = &entry.kind {
                line.push_str(&format!(" -> {}", target.display()));
            }
            let _ = self.term.write_line(&line);
        }

        if long {
            let total: u64 = entries.iter().map(|e| e.size).sum();
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "Total: {} entries, {}",
                entries.len(),
                Self::format_size(total)
            ));
        }

        Ok(())
    }

    fn format_ignore_verdicts(&self, verdicts: &[IgnoreVerdict]) -> Result<()> {
        for verdict in verdicts {
            let label = match (verdict.excluded, self.use_colors) {
                (true, true) => style("excluded").red().to_string(),
                (false, true) => style("included").green().to_string(),
                (true, false) => "excluded".to_string(),
                (false, false) => "included".to_string(),
            };
            let _ = self
                .term
                .write_line(&format!("{label}  {}", verdict.path.display()));
        }
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = term.write_line(&format!("WARNING: {message}"));
        }
    }
}
