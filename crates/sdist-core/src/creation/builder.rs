//! Sdist assembly: walk, archive, embed metadata.

use crate::MetadataDocument;
use crate::ProjectIdentity;
use crate::Result;
use crate::creation::config::SdistConfig;
use crate::creation::report::SdistReport;
use crate::creation::tar::SdistTarWriter;
use crate::creation::walker::EntryKind;
use crate::creation::walker::SourceWalker;
use crate::creation::walker::WalkItem;
use crate::exclusion::ExclusionMatcher;
use crate::types::OutputDir;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

/// Name of the metadata entry appended after the project tree.
pub const PKG_INFO: &str = "PKG-INFO";

/// Builds one `.tar.gz` source distribution.
///
/// # Examples
///
/// ```no_run
/// use sdist_core::MetadataDocument;
/// use sdist_core::ProjectIdentity;
/// use sdist_core::SdistBuilder;
/// use sdist_core::SdistConfig;
/// use sdist_core::exclusion::ExclusionSpec;
///
/// let identity = ProjectIdentity::new("demo", "0.1.0")?;
/// let metadata = MetadataDocument::new("demo", "0.1.0");
/// let matcher = ExclusionSpec::for_project("project".as_ref())?.compile()?;
///
/// let report = SdistBuilder::new("project", "dist", identity, metadata, matcher)
///     .config(SdistConfig::default().with_atomic_write(true))
///     .build()?;
/// println!("{}: {} files", report.file_name, report.files_added);
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SdistBuilder {
    project_root: PathBuf,
    output_directory: PathBuf,
    identity: ProjectIdentity,
    metadata: MetadataDocument,
    matcher: ExclusionMatcher,
    config: SdistConfig,
}

impl SdistBuilder {
    /// Creates a builder with default [`SdistConfig`].
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        project_root: P,
        output_directory: Q,
        identity: ProjectIdentity,
        metadata: MetadataDocument,
        matcher: ExclusionMatcher,
    ) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            output_directory: output_directory.as_ref().to_path_buf(),
            identity,
            metadata,
            matcher,
            config: SdistConfig::default(),
        }
    }

    /// Sets the full configuration.
    #[must_use]
    pub fn config(mut self, config: SdistConfig) -> Self {
        self.config = config;
        self
    }

    /// Writes `<output_directory>/<name>-<version>.tar.gz`.
    ///
    /// The output directory is created first. Every file under the project
    /// root that the matcher includes is stored under `<name>-<version>/`,
    /// followed by a single `PKG-INFO` entry. An existing archive of the
    /// same name is replaced.
    ///
    /// # Errors
    ///
    /// - `SdistError::InvalidCompressionLevel` for a bad configuration
    /// - `SdistError::OutputDirectory` if the output directory cannot be created
    /// - `SdistError::FileAccess` if a selected file disappears or cannot be read
    /// - `SdistError::Walk` if a directory cannot be listed
    /// - `SdistError::Io` if the archive cannot be written
    pub fn build(&self) -> Result<SdistReport> {
        self.config.validate()?;
        let start = Instant::now();

        let out = OutputDir::create(&self.output_directory)?;
        let file_name = self.identity.archive_name();
        let target = out.join(&file_name);

        tracing::info!(
            project = %self.identity,
            archive = %target.display(),
            "building sdist"
        );

        let mut report = if self.config.atomic_write {
            self.write_atomic(&out, &target)?
        } else {
            let file = File::create(&target)?;
            let (writer, report) = self.write_archive(BufWriter::new(file), &[target.as_path()])?;
            writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;
            report
        };

        report.file_name = file_name;
        report.path = target;
        report.duration = start.elapsed();

        tracing::info!(
            archive = %report.file_name,
            entries = report.total_entries(),
            excluded = report.files_excluded,
            bytes = report.bytes_compressed,
            "built sdist"
        );
        Ok(report)
    }

    /// Writes into a temporary file next to `target` and renames it into
    /// place. The temporary file is removed if anything fails.
    ///
    /// Both the temporary file and an archive left by a previous build are
    /// kept out of the walk.
    fn write_atomic(&self, out: &OutputDir, target: &Path) -> Result<SdistReport> {
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", self.identity.archive_name()))
            .suffix(".tmp")
            .tempfile_in(out.as_path())?;

        let temp_path = temp.path().to_path_buf();
        let (writer, report) =
            self.write_archive(BufWriter::new(temp), &[temp_path.as_path(), target])?;
        let temp = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;

        temp.persist(target).map_err(|e| e.error)?;
        Ok(report)
    }

    /// Streams the project into `writer`, leaving out `skip` (paths that
    /// do not exist are ignored).
    fn write_archive<W: Write>(&self, writer: W, skip: &[&Path]) -> Result<(W, SdistReport)> {
        let mut report = SdistReport::new();
        let mut tar = SdistTarWriter::new(writer, &self.identity.root_dir(), &self.config);

        let walker = skip
            .iter()
            .fold(SourceWalker::new(&self.project_root, &self.matcher), |walker, path| {
                walker.skip_file(path)
            })
            .sorted(self.config.is_reproducible());

        for item in walker.walk() {
            match item? {
                WalkItem::Selected(entry) => match &entry.kind {
                    EntryKind::File => {
                        report.bytes_written += tar.append_file(&entry.path, &entry.relative)?;
                        report.files_added += 1;
                    }
                    EntryKind::Symlink { target } => {
                        tar.append_symlink(&entry.path, &entry.relative, target)?;
                        report.symlinks_added += 1;
                    }
                },
                WalkItem::Excluded(_) => report.files_excluded += 1,
            }
        }

        let pkg_info = self.metadata.to_rfc822();
        tar.append_bytes(PKG_INFO, &pkg_info)?;
        report.bytes_written += pkg_info.len() as u64;

        let (writer, compressed) = tar.finish()?;
        report.bytes_compressed = compressed;
        Ok((writer, report))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::SdistError;
    use crate::exclusion::ExclusionSpec;
    use flate2::read::GzDecoder;
    use std::fs;
    use tempfile::TempDir;

    fn builder(root: &Path, out: &Path) -> SdistBuilder {
        SdistBuilder::new(
            root,
            out,
            ProjectIdentity::new("demo", "0.1.0").unwrap(),
            MetadataDocument::new("demo", "0.1.0"),
            ExclusionSpec::for_project(root).unwrap().compile().unwrap(),
        )
    }

    fn entry_names(archive: &Path) -> Vec<String> {
        let file = File::open(archive).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_build_basic() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.py"), "print(1)\n").unwrap();

        let out = temp.path().join("dist/nested");
        let report = builder(&root, &out).build().unwrap();

        assert_eq!(report.file_name, "demo-0.1.0.tar.gz");
        assert_eq!(report.path, out.join("demo-0.1.0.tar.gz"));
        assert_eq!(report.files_added, 1);
        assert!(report.bytes_compressed > 0);

        let names = entry_names(&report.path);
        assert_eq!(names, vec!["demo-0.1.0/src/a.py", "demo-0.1.0/PKG-INFO"]);
    }

    #[test]
    fn test_output_inside_project_is_not_archived() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.py"), "").unwrap();
        let out = root.join("dist");

        // Build twice: the second walk sees the first archive in place.
        builder(root, &out).build().unwrap();
        let report = builder(root, &out).build().unwrap();

        let names = entry_names(&report.path);
        assert!(!names.iter().any(|n| n.ends_with(".tar.gz")));
        assert_eq!(report.files_added, 1);
    }

    #[test]
    fn test_atomic_rebuild_skips_previous_archive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("a.py"), "").unwrap();
        let out = root.join("dist");
        let config = SdistConfig::default().with_atomic_write(true);

        builder(root, &out).config(config.clone()).build().unwrap();
        let report = builder(root, &out).config(config).build().unwrap();

        let names = entry_names(&report.path);
        assert_eq!(names, vec!["demo-0.1.0/a.py", "demo-0.1.0/PKG-INFO"]);
        assert_eq!(report.files_added, 1);
        assert_eq!(report.files_excluded, 0);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("proj");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.py"), "").unwrap();
        let out = temp.path().join("dist");

        let report = builder(&root, &out)
            .config(SdistConfig::default().with_atomic_write(true))
            .build()
            .unwrap();

        let listing: Vec<_> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(listing, vec![report.file_name.clone()]);
    }

    #[test]
    fn test_invalid_config_fails_before_io() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("dist");
        let err = builder(temp.path(), &out)
            .config(SdistConfig::default().with_compression_level(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SdistError::InvalidCompressionLevel { level: 0 }));
        assert!(!out.exists());
    }

    #[test]
    fn test_output_directory_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "").unwrap();
        let err = builder(temp.path(), &blocker.join("dist"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SdistError::OutputDirectory { .. }));
    }
}
