//! Reading built sdists back.

use crate::Result;
use crate::SdistError;
use crate::creation::PKG_INFO;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

/// Kind of an archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListedKind {
    /// Regular file.
    File,
    /// Directory entry.
    Directory,
    /// Symbolic link.
    Symlink {
        /// Link target.
        target: PathBuf,
    },
    /// Anything else (hard links, devices).
    Other,
}

/// One member of an sdist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdistEntry {
    /// Path inside the archive, PAX overrides applied.
    pub path: PathBuf,
    /// Stored size in bytes.
    pub size: u64,
    /// Permission bits.
    pub mode: Option<u32>,
    /// Modification time in seconds since the epoch.
    pub mtime: Option<u64>,
    /// Member kind.
    pub kind: ListedKind,
}

/// Lists the members of a `.tar.gz` sdist in archive order.
///
/// # Errors
///
/// Returns `SdistError::Io` if the file cannot be opened and
/// `SdistError::InvalidArchive` if it is not a readable gzip tar.
///
/// # Examples
///
/// ```no_run
/// use sdist_core::inspection::list_sdist;
///
/// for entry in list_sdist("dist/demo-0.1.0.tar.gz")? {
///     println!("{} {}", entry.size, entry.path.display());
/// }
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
pub fn list_sdist<P: AsRef<Path>>(archive_path: P) -> Result<Vec<SdistEntry>> {
    let mut archive = open(archive_path.as_ref())?;
    let entries = archive
        .entries()
        .map_err(|e| SdistError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

    let mut listed = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| SdistError::InvalidArchive(format!("failed to read TAR entry: {e}")))?;

        let path = entry
            .path()
            .map_err(|e| SdistError::InvalidArchive(format!("invalid path: {e}")))?
            .into_owned();

        let kind = match entry.header().entry_type() {
            tar::EntryType::Regular | tar::EntryType::Continuous => ListedKind::File,
            tar::EntryType::Directory => ListedKind::Directory,
            tar::EntryType::Symlink => {
                let target = entry
                    .link_name()
                    .map_err(|e| SdistError::InvalidArchive(format!("invalid link target: {e}")))?
                    .map(std::borrow::Cow::into_owned)
                    .unwrap_or_default();
                ListedKind::Symlink { target }
            }
            _ => ListedKind::Other,
        };

        listed.push(SdistEntry {
            path,
            size: entry.size(),
            mode: entry.header().mode().ok(),
            mtime: entry.header().mtime().ok(),
            kind,
        });
    }

    Ok(listed)
}

/// Returns the contents of the top-level `<root>/PKG-INFO` member.
///
/// # Errors
///
/// Returns `SdistError::InvalidArchive` if the archive is unreadable or has
/// no such member.
pub fn read_pkg_info<P: AsRef<Path>>(archive_path: P) -> Result<Vec<u8>> {
    let mut archive = open(archive_path.as_ref())?;
    let entries = archive
        .entries()
        .map_err(|e| SdistError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

    for entry in entries {
        let mut entry = entry
            .map_err(|e| SdistError::InvalidArchive(format!("failed to read TAR entry: {e}")))?;
        let is_pkg_info = entry.path().is_ok_and(|path| {
            let mut components = path.components();
            components.next().is_some()
                && components.next().is_some_and(|c| c.as_os_str() == PKG_INFO)
                && components.next().is_none()
        });
        if is_pkg_info {
            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| SdistError::InvalidArchive(format!("truncated PKG-INFO: {e}")))?;
            return Ok(data);
        }
    }

    Err(SdistError::InvalidArchive(format!("no {PKG_INFO} member")))
}

fn open(path: &Path) -> Result<tar::Archive<GzDecoder<BufReader<File>>>> {
    let file = File::open(path)?;
    Ok(tar::Archive::new(GzDecoder::new(BufReader::new(file))))
}
