//! Check-ignore command implementation

use crate::cli::CheckIgnoreArgs;
use crate::error::add_project_context;
use crate::output::IgnoreVerdict;
use crate::output::OutputFormatter;
use anyhow::Result;
use sdist_core::ExclusionSpec;
use std::path::Path;
use std::path::PathBuf;

pub fn execute(args: &CheckIgnoreArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let root = &args.project_dir;
    let matcher = add_project_context(
        ExclusionSpec::for_project(root).and_then(|spec| spec.compile()),
        root,
    )?;

    let verdicts: Vec<IgnoreVerdict> = args
        .paths
        .iter()
        .map(|path| {
            let relative = relative_to(root, path);
            let is_dir = root.join(&relative).is_dir();
            IgnoreVerdict {
                excluded: matcher.is_excluded(&relative, is_dir),
                path: path.clone(),
            }
        })
        .collect();

    formatter.format_ignore_verdicts(&verdicts)
}

/// Paths may be given relative to the project or with the project directory
/// as a prefix.
fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to_strips_project_prefix() {
        assert_eq!(
            relative_to(Path::new("proj"), Path::new("proj/src/a.py")),
            PathBuf::from("src/a.py")
        );
        assert_eq!(
            relative_to(Path::new("proj"), Path::new("src/a.py")),
            PathBuf::from("src/a.py")
        );
    }

    #[test]
    fn test_relative_to_current_dir() {
        assert_eq!(
            relative_to(Path::new("."), Path::new("build/x.o")),
            PathBuf::from("build/x.o")
        );
    }
}
