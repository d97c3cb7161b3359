//! Parsing of individual gitignore lines.

/// One parsed gitignore rule, ready to be compiled into a glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePattern {
    /// Glob expression matched against `/`-separated relative paths.
    pub glob: String,
    /// `!pattern`: re-include instead of exclude.
    pub negated: bool,
    /// `pattern/`: only matches directories.
    pub dir_only: bool,
}

impl IgnorePattern {
    /// Parses a single gitignore line.
    ///
    /// Returns `None` for blank lines, comments, and lines that reduce to
    /// nothing (a lone `!` or `/`).
    ///
    /// - Patterns without a `/` (other than a trailing one) match at any
    ///   depth and are compiled with a `**/` prefix.
    /// - A leading or inner `/` anchors the pattern to the project root.
    /// - A trailing `/` marks a directory-only rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use sdist_core::exclusion::IgnorePattern;
    ///
    /// let p = IgnorePattern::parse("*.log").unwrap();
    /// assert_eq!(p.glob, "**/*.log");
    ///
    /// let p = IgnorePattern::parse("!/build/").unwrap();
    /// assert_eq!(p.glob, "build");
    /// assert!(p.negated && p.dir_only);
    ///
    /// assert!(IgnorePattern::parse("# comment").is_none());
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let line = trim_unescaped_trailing_spaces(line);

        // `\!` and `\#` stay escaped; the glob compiler reads them as literals.
        let (negated, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let dir_only = body.ends_with('/');
        let body = body.trim_end_matches('/');
        if body.is_empty() {
            return None;
        }

        let (anchored, body) = match body.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (body.contains('/'), body),
        };
        if body.is_empty() {
            return None;
        }

        let glob = if anchored || body.starts_with("**/") {
            body.to_string()
        } else {
            format!("**/{body}")
        };

        Some(Self {
            glob,
            negated,
            dir_only,
        })
    }
}

/// Strips trailing spaces that are not escaped with a backslash.
fn trim_unescaped_trailing_spaces(line: &str) -> &str {
    let mut end = line.len();
    while line[..end].ends_with(' ') && !line[..end].ends_with("\\ ") {
        end -= 1;
    }
    &line[..end]
}
