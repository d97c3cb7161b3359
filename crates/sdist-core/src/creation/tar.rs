//! Gzip-compressed PAX tar writer.
//!
//! Entries get ustar headers. Paths and link targets that do not fit the
//! ustar fields, or are not plain ASCII, are carried in a PAX extended
//! header (`path`, `linkpath`) written just before the entry.

use crate::Result;
use crate::SdistError;
use crate::creation::compression::compression_level_to_flate2;
use crate::creation::config::SdistConfig;
use crate::io::CountingWriter;
use crate::io::SizedReader;
use flate2::write::GzEncoder;
use std::fs::File;
use std::fs::Metadata;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use tar::Builder;
use tar::EntryType;
use tar::Header;

/// Longest name a ustar header holds without the prefix field.
const USTAR_NAME_LEN: usize = 100;

/// Mode of synthesized entries such as `PKG-INFO`.
pub const GENERATED_FILE_MODE: u32 = 0o644;

/// Writes entries under a single root directory into a `.tar.gz` stream.
///
/// # Examples
///
/// ```
/// use sdist_core::SdistConfig;
/// use sdist_core::creation::tar::SdistTarWriter;
///
/// let mut writer = SdistTarWriter::new(Vec::new(), "demo-0.1.0", &SdistConfig::default());
/// writer.append_bytes("PKG-INFO", b"Metadata-Version: 2.1\n")?;
/// let (bytes, compressed) = writer.finish()?;
/// assert_eq!(bytes.len() as u64, compressed);
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
pub struct SdistTarWriter<W: Write> {
    builder: Builder<GzEncoder<CountingWriter<W>>>,
    root: String,
    epoch: Option<u64>,
}

impl<W: Write> SdistTarWriter<W> {
    /// Starts an archive whose entries all live under `root/`.
    pub fn new(writer: W, root: &str, config: &SdistConfig) -> Self {
        let level = compression_level_to_flate2(config.compression_level);
        let encoder = GzEncoder::new(CountingWriter::new(writer), level);
        Self {
            builder: Builder::new(encoder),
            root: root.to_string(),
            epoch: config.source_date_epoch,
        }
    }

    /// Archive path for a project-relative path.
    #[must_use]
    pub fn archive_path(&self, relative: &Path) -> String {
        let mut path = self.root.clone();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                path.push('/');
                path.push_str(&part.to_string_lossy());
            }
        }
        path
    }

    /// Streams a regular file into the archive and returns its size.
    ///
    /// The size is taken from the open file; contents are copied straight
    /// from disk.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::FileAccess` if the file cannot be opened or
    /// read to the size recorded in its header, and `SdistError::Io` if
    /// the archive cannot be written.
    pub fn append_file(&mut self, source: &Path, relative: &Path) -> Result<u64> {
        let access = |source_err| SdistError::FileAccess {
            path: source.to_path_buf(),
            source: source_err,
        };

        let file = File::open(source).map_err(access)?;
        let metadata = file.metadata().map_err(access)?;
        let size = metadata.len();

        let mut header = Header::new_ustar();
        header.set_entry_type(EntryType::Regular);
        header.set_size(size);
        self.apply_metadata(&mut header, &metadata);

        let name = self.archive_path(relative);
        self.set_path(&mut header, &name)?;
        header.set_cksum();

        let mut reader = SizedReader::new(file, size);
        if let Err(e) = self.builder.append(&header, &mut reader) {
            return Err(if reader.failed() { access(e) } else { e.into() });
        }

        tracing::debug!(path = %name, size, "added file");
        Ok(size)
    }

    /// Stores a symbolic link without following it.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::FileAccess` if the link's own metadata cannot
    /// be read, and `SdistError::Io` if the archive cannot be written.
    pub fn append_symlink(&mut self, source: &Path, relative: &Path, target: &Path) -> Result<()> {
        let metadata = std::fs::symlink_metadata(source).map_err(|e| SdistError::FileAccess {
            path: source.to_path_buf(),
            source: e,
        })?;

        let mut header = Header::new_ustar();
        header.set_entry_type(EntryType::Symlink);
        header.set_size(0);
        self.apply_metadata(&mut header, &metadata);

        let name = self.archive_path(relative);
        let target = target.to_string_lossy();
        self.set_path_and_link(&mut header, &name, &target)?;
        header.set_cksum();

        self.builder.append(&header, std::io::empty())?;

        tracing::debug!(path = %name, target = %target, "added symlink");
        Ok(())
    }

    /// Adds an in-memory file at `root/name`.
    ///
    /// The entry has mode `0o644`, no owner, and an mtime of zero (or the
    /// reproducible timestamp when one is configured).
    ///
    /// # Errors
    ///
    /// Returns `SdistError::Io` if the archive cannot be written.
    pub fn append_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let mut header = Header::new_ustar();
        header.set_entry_type(EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(GENERATED_FILE_MODE);
        header.set_mtime(self.epoch.unwrap_or(0));
        header.set_uid(0);
        header.set_gid(0);

        let path = format!("{}/{name}", self.root);
        self.set_path(&mut header, &path)?;
        header.set_cksum();

        self.builder.append(&header, data)?;

        tracing::debug!(path = %path, size = data.len(), "added generated file");
        Ok(())
    }

    /// Writes the tar trailer and gzip footer.
    ///
    /// Returns the inner writer and the number of compressed bytes written.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::Io` if flushing fails.
    pub fn finish(self) -> Result<(W, u64)> {
        let encoder = self.builder.into_inner()?;
        let mut counting = encoder.finish()?;
        counting.flush()?;
        let compressed = counting.total_bytes();
        Ok((counting.into_inner(), compressed))
    }

    fn apply_metadata(&self, header: &mut Header, metadata: &Metadata) {
        set_permissions(header, metadata);
        if let Some(epoch) = self.epoch {
            let mtime = header.mtime().unwrap_or(0);
            header.set_mtime(mtime.min(epoch));
            header.set_uid(0);
            header.set_gid(0);
        }
    }

    /// Stores `path` in the header, falling back to a PAX `path` record.
    fn set_path(&mut self, header: &mut Header, path: &str) -> Result<()> {
        if path.is_ascii() && header.set_path(path).is_ok() {
            return Ok(());
        }
        self.builder
            .append_pax_extensions([("path", path.as_bytes())])?;
        set_fallback_path(header, path)
    }

    fn set_path_and_link(&mut self, header: &mut Header, path: &str, target: &str) -> Result<()> {
        let path_fits = path.is_ascii() && header.set_path(path).is_ok();
        let link_fits = target.is_ascii() && header.set_link_name(target).is_ok();
        if path_fits && link_fits {
            return Ok(());
        }

        let mut records: Vec<(&str, &[u8])> = Vec::with_capacity(2);
        if !path_fits {
            records.push(("path", path.as_bytes()));
        }
        if !link_fits {
            records.push(("linkpath", target.as_bytes()));
        }
        self.builder.append_pax_extensions(records)?;

        if !path_fits {
            set_fallback_path(header, path)?;
        }
        if !link_fits {
            header.set_link_name(ustar_fallback(target))?;
        }
        Ok(())
    }
}

fn set_fallback_path(header: &mut Header, path: &str) -> Result<()> {
    // A failed split may have left part of the path in the prefix field.
    if let Some(ustar) = header.as_ustar_mut() {
        ustar.prefix = [0; 155];
    }
    header.set_path(ustar_fallback(path))?;
    Ok(())
}

/// Name written into the ustar field when the real one lives in a PAX
/// record: non-ASCII bytes replaced and cut to fit.
fn ustar_fallback(path: &str) -> String {
    let ascii: String = path
        .chars()
        .map(|c| if c.is_ascii() && c != '\0' { c } else { '_' })
        .collect();
    let start = ascii.len().saturating_sub(USTAR_NAME_LEN);
    ascii[start..].trim_start_matches('/').to_string()
}

#[cfg(unix)]
fn set_permissions(header: &mut Header, metadata: &Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_mode(metadata.mode() & 0o7777);
    header.set_uid(u64::from(metadata.uid()));
    header.set_gid(u64::from(metadata.gid()));
    // mtime can be negative for dates before epoch, clamp to 0
    #[allow(clippy::cast_sign_loss)]
    let mtime = metadata.mtime().max(0) as u64;
    header.set_mtime(mtime);
}

#[cfg(not(unix))]
fn set_permissions(header: &mut Header, metadata: &Metadata) {
    let mode = if metadata.permissions().readonly() {
        0o444
    } else {
        GENERATED_FILE_MODE
    };
    header.set_mode(mode);
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map_or(0, |d| d.as_secs());
    header.set_mtime(mtime);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    struct ReadEntry {
        path: String,
        kind: EntryType,
        link: Option<String>,
        data: Vec<u8>,
        mode: u32,
        mtime: u64,
    }

    fn read_back(bytes: &[u8]) -> Vec<ReadEntry> {
        let mut archive = tar::Archive::new(GzDecoder::new(bytes));
        archive
            .entries()
            .unwrap()
            .map(|entry| {
                let mut entry = entry.unwrap();
                let path = entry.path().unwrap().to_string_lossy().into_owned();
                let link = entry
                    .link_name()
                    .unwrap()
                    .map(|l| l.to_string_lossy().into_owned());
                let kind = entry.header().entry_type();
                let mode = entry.header().mode().unwrap();
                let mtime = entry.header().mtime().unwrap();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                ReadEntry {
                    path,
                    kind,
                    link,
                    data,
                    mode,
                    mtime,
                }
            })
            .collect()
    }

    #[test]
    fn test_archive_path() {
        let writer = SdistTarWriter::new(Vec::new(), "demo-1.0", &SdistConfig::default());
        assert_eq!(
            writer.archive_path(Path::new("src/demo/__init__.py")),
            "demo-1.0/src/demo/__init__.py"
        );
        assert_eq!(writer.archive_path(Path::new("./a")), "demo-1.0/a");
    }

    #[test]
    fn test_files_and_generated_entry() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("hello.txt");
        std::fs::write(&file, "hello").unwrap();

        let mut writer = SdistTarWriter::new(Vec::new(), "demo-1.0", &SdistConfig::default());
        assert_eq!(writer.append_file(&file, Path::new("hello.txt")).unwrap(), 5);
        writer.append_bytes("PKG-INFO", b"Name: demo\n").unwrap();
        let (bytes, compressed) = writer.finish().unwrap();
        assert_eq!(bytes.len() as u64, compressed);

        let entries = read_back(&bytes);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "demo-1.0/hello.txt");
        assert_eq!(entries[0].data, b"hello");
        assert_eq!(entries[1].path, "demo-1.0/PKG-INFO");
        assert_eq!(entries[1].data, b"Name: demo\n");
        assert_eq!(entries[1].mode, 0o644);
        assert_eq!(entries[1].mtime, 0);
    }

    #[test]
    fn test_long_and_unicode_paths_use_pax() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("f");
        std::fs::write(&file, "x").unwrap();

        let long = format!("{}/file.txt", "d".repeat(120));
        let mut writer = SdistTarWriter::new(Vec::new(), "demo-1.0", &SdistConfig::default());
        writer.append_file(&file, Path::new(&long)).unwrap();
        writer.append_file(&file, Path::new("données.txt")).unwrap();
        let (bytes, _) = writer.finish().unwrap();

        let entries = read_back(&bytes);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, format!("demo-1.0/{long}"));
        assert_eq!(entries[1].path, "demo-1.0/données.txt");
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let temp = TempDir::new().unwrap();
        let mut writer = SdistTarWriter::new(Vec::new(), "demo-1.0", &SdistConfig::default());
        let err = writer
            .append_file(&temp.path().join("gone.py"), Path::new("gone.py"))
            .unwrap_err();
        assert!(matches!(err, SdistError::FileAccess { .. }));
    }

    #[test]
    fn test_epoch_clamps_mtime() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "a").unwrap();

        let config = SdistConfig::default().with_source_date_epoch(Some(1_000));
        let mut writer = SdistTarWriter::new(Vec::new(), "demo-1.0", &config);
        writer.append_file(&file, Path::new("a.txt")).unwrap();
        writer.append_bytes("PKG-INFO", b"").unwrap();
        let (bytes, _) = writer.finish().unwrap();

        let entries = read_back(&bytes);
        assert_eq!(entries[0].mtime, 1_000);
        assert_eq!(entries[1].mtime, 1_000);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_entry() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("link");
        let target = "t".repeat(150);
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let mut writer = SdistTarWriter::new(Vec::new(), "demo-1.0", &SdistConfig::default());
        writer
            .append_symlink(&link, Path::new("link"), Path::new(&target))
            .unwrap();
        let (bytes, _) = writer.finish().unwrap();

        let entries = read_back(&bytes);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryType::Symlink);
        assert_eq!(entries[0].link.as_deref(), Some(target.as_str()));
    }

    #[test]
    fn test_ustar_fallback() {
        assert_eq!(ustar_fallback("a/é.txt"), "a/_.txt");
        let long = format!("root/{}", "x".repeat(200));
        assert_eq!(ustar_fallback(&long).len(), USTAR_NAME_LEN);
    }
}
