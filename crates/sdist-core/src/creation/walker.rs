//! Project tree walking with gitignore-style selection.

use crate::Result;
use crate::SdistError;
use crate::exclusion::ExclusionMatcher;
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use walkdir::DirEntry;
use walkdir::WalkDir;

/// Walks a project tree and decides, per entry, whether it goes into the
/// archive.
///
/// Symlinks are never followed. Directories produce no entries of their
/// own; a directory is skipped wholesale only when the matcher guarantees
/// nothing beneath it could be included.
///
/// # Examples
///
/// ```no_run
/// use sdist_core::creation::walker::SourceWalker;
/// use sdist_core::creation::walker::WalkItem;
/// use sdist_core::exclusion::ExclusionSpec;
/// use std::path::Path;
///
/// let root = Path::new("./project");
/// let matcher = ExclusionSpec::for_project(root)?.compile()?;
///
/// for item in SourceWalker::new(root, &matcher).walk() {
///     if let WalkItem::Selected(entry) = item? {
///         println!("{}", entry.relative.display());
///     }
/// }
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
#[derive(Debug)]
pub struct SourceWalker<'a> {
    root: &'a Path,
    matcher: &'a ExclusionMatcher,
    skip: Vec<SkipTarget>,
    sorted: bool,
}

/// A file to leave out regardless of the matcher, identified by name and
/// canonical location.
#[derive(Debug)]
struct SkipTarget {
    file_name: OsString,
    canonical: PathBuf,
}

impl<'a> SourceWalker<'a> {
    /// Creates a walker over `root` using `matcher`.
    #[must_use]
    pub fn new(root: &'a Path, matcher: &'a ExclusionMatcher) -> Self {
        Self {
            root,
            matcher,
            skip: Vec::new(),
            sorted: false,
        }
    }

    /// Never yields `path`, even if the matcher would include it.
    ///
    /// Used for the archive being written when the output directory lies
    /// inside the project. The path must exist when this is called; paths
    /// that cannot be resolved are ignored.
    #[must_use]
    pub fn skip_file(mut self, path: &Path) -> Self {
        if let (Some(file_name), Ok(canonical)) = (path.file_name(), path.canonicalize()) {
            self.skip.push(SkipTarget {
                file_name: file_name.to_os_string(),
                canonical,
            });
        }
        self
    }

    /// Visits directory entries sorted by file name instead of in native
    /// enumeration order.
    #[must_use]
    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }

    /// Returns an iterator over the walk outcome for every file and symlink.
    ///
    /// # Errors
    ///
    /// Items are errors when a directory cannot be read
    /// (`SdistError::Walk`) or a symlink target cannot be read
    /// (`SdistError::FileAccess`).
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkItem>> + '_ {
        let mut walker = WalkDir::new(self.root).follow_links(false).min_depth(1);
        if self.sorted {
            walker = walker.sort_by_file_name();
        }

        walker
            .into_iter()
            .filter_entry(move |entry| !self.is_pruned(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.classify(&entry).transpose(),
                Err(e) => Some(Err(SdistError::Walk(e.to_string()))),
            })
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let relative = relative_to(entry.path(), self.root);
        let pruned = self.matcher.prunes(relative);
        if pruned {
            tracing::debug!(path = %relative.display(), "excluded directory");
        }
        pruned
    }

    /// Returns `Ok(None)` for entries that produce nothing at all
    /// (directories, directory symlinks, the skipped archive).
    fn classify(&self, entry: &DirEntry) -> Result<Option<WalkItem>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return Ok(None);
        }

        let path = entry.path();
        let relative = relative_to(path, self.root).to_path_buf();

        if self.is_skipped(path) {
            tracing::debug!(path = %relative.display(), "skipping archive being written");
            return Ok(None);
        }

        let kind = if file_type.is_symlink() {
            // Host directory-walk semantics: links to directories are
            // neither descended into nor stored.
            if std::fs::metadata(path).is_ok_and(|m| m.is_dir()) {
                tracing::warn!(path = %relative.display(), "skipping symlink to directory");
                return Ok(None);
            }
            let target = std::fs::read_link(path).map_err(|source| SdistError::FileAccess {
                path: path.to_path_buf(),
                source,
            })?;
            EntryKind::Symlink { target }
        } else {
            EntryKind::File
        };

        if self.matcher.matches(&relative) {
            tracing::debug!(path = %relative.display(), "excluded");
            return Ok(Some(WalkItem::Excluded(relative)));
        }

        Ok(Some(WalkItem::Selected(SourceEntry {
            path: path.to_path_buf(),
            relative,
            kind,
        })))
    }

    fn is_skipped(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name() else {
            return false;
        };
        self.skip.iter().any(|target| {
            target.file_name == file_name
                && path
                    .canonicalize()
                    .is_ok_and(|canonical| canonical == target.canonical)
        })
    }
}

fn relative_to<'p>(path: &'p Path, root: &Path) -> &'p Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Outcome of visiting one file or symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    /// Goes into the archive.
    Selected(SourceEntry),
    /// Left out by the matcher; carries the root-relative path.
    Excluded(PathBuf),
}

/// A file or symlink selected for the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Full filesystem path.
    pub path: PathBuf,
    /// Path relative to the project root.
    pub relative: PathBuf,
    /// What to store.
    pub kind: EntryKind,
}

/// Type of a selected entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file; contents are streamed from disk.
    File,
    /// Symbolic link, stored as a link.
    Symlink {
        /// Target of the symlink, as stored on disk.
        target: PathBuf,
    },
}
