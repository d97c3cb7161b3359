//! Compiled gitignore matcher.

use crate::Result;
use crate::SdistError;
use crate::exclusion::pattern::IgnorePattern;
use globset::GlobBuilder;
use globset::GlobSet;
use globset::GlobSetBuilder;
use std::path::Component;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
struct Rule {
    negated: bool,
    dir_only: bool,
    /// Baseline rule: its exclusions cannot be undone by later negations.
    protected: bool,
}

/// Tests relative paths against an ordered list of gitignore patterns.
///
/// Matching is a pure function of the compiled patterns and the path string;
/// the filesystem is never consulted.
///
/// Rules are evaluated in definition order and the last matching rule wins.
/// A rule matches a path when it matches the path itself or any of its
/// ancestor directories, so a directory rule covers everything beneath it
/// and a later `!` rule can still re-include a single file inside it.
///
/// Rules compiled as a protected layer (see [`from_layers`](Self::from_layers))
/// are the exception: a path they exclude stays excluded whatever follows.
///
/// # Examples
///
/// ```
/// use sdist_core::exclusion::ExclusionMatcher;
/// use std::path::Path;
///
/// let matcher = ExclusionMatcher::from_lines(["build/", "!build/keep.txt"])?;
/// assert!(matcher.matches(Path::new("build/tmp.o")));
/// assert!(!matcher.matches(Path::new("build/keep.txt")));
/// assert!(!matcher.matches(Path::new("src/main.py")));
/// # Ok::<(), sdist_core::SdistError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    set: GlobSet,
    /// Indexed in parallel with the globs in `set`.
    rules: Vec<Rule>,
    has_negations: bool,
}

impl ExclusionMatcher {
    /// Compiles pattern lines into a matcher.
    ///
    /// Blank and comment lines are skipped but still count towards the line
    /// numbers reported in errors.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::InvalidPattern` for the first line whose glob
    /// does not compile.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_layers(std::iter::empty::<&str>(), lines)
    }

    /// Compiles a protected layer followed by an ordinary layer.
    ///
    /// Exclusions from `protected` cannot be re-included by negations in
    /// either layer. Line numbers in errors run across both layers.
    ///
    /// # Errors
    ///
    /// Returns `SdistError::InvalidPattern` for the first line whose glob
    /// does not compile.
    pub fn from_layers<P, PS, I, S>(protected: P, lines: I) -> Result<Self>
    where
        P: IntoIterator<Item = PS>,
        PS: AsRef<str>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut rules = Vec::new();

        let protected = protected.into_iter().map(|line| (true, line.as_ref().to_owned()));
        let ordinary = lines.into_iter().map(|line| (false, line.as_ref().to_owned()));

        for (index, (is_protected, line)) in protected.chain(ordinary).enumerate() {
            let Some(pattern) = IgnorePattern::parse(&line) else {
                continue;
            };

            let glob = GlobBuilder::new(&pattern.glob)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|source| SdistError::InvalidPattern {
                    line: index + 1,
                    pattern: line.trim_end().to_string(),
                    source,
                })?;

            builder.add(glob);
            rules.push(Rule {
                negated: pattern.negated,
                dir_only: pattern.dir_only,
                protected: is_protected,
            });
        }

        let set = builder.build().map_err(|source| SdistError::InvalidPattern {
            line: 0,
            pattern: String::new(),
            source,
        })?;

        let has_negations = rules.iter().any(|rule| rule.negated);
        Ok(Self {
            set,
            rules,
            has_negations,
        })
    }

    /// Returns `true` if the file at `relative_path` is excluded.
    ///
    /// The path is interpreted relative to the project root; a leading `./`
    /// is ignored.
    #[must_use]
    pub fn matches(&self, relative_path: &Path) -> bool {
        self.is_excluded(relative_path, false)
    }

    /// Like [`matches`](Self::matches), but lets the caller say whether the
    /// path itself is a directory, which enables directory-only rules on
    /// the final component.
    #[must_use]
    pub fn is_excluded(&self, relative_path: &Path, is_dir: bool) -> bool {
        let outcome = self.evaluate(relative_path, is_dir);
        outcome.protected_hit || outcome.last.is_some_and(|rule| !rule.negated)
    }

    /// Returns `true` if nothing beneath the directory `relative_dir` can be
    /// included, so a walk may skip it entirely.
    ///
    /// That holds when a protected rule excludes the directory, or when it
    /// is excluded and no negation rule exists that could re-include a
    /// descendant.
    #[must_use]
    pub fn prunes(&self, relative_dir: &Path) -> bool {
        let outcome = self.evaluate(relative_dir, true);
        outcome.protected_hit
            || (!self.has_negations && outcome.last.is_some_and(|rule| !rule.negated))
    }

    /// Number of effective (non-blank, non-comment) rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules were compiled; such a matcher includes
    /// every path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn evaluate(&self, relative_path: &Path, is_dir: bool) -> Outcome {
        let mut outcome = Outcome::default();
        if self.rules.is_empty() {
            return outcome;
        }

        let components = normal_components(relative_path);
        let mut best: Option<usize> = None;
        let mut prefix = String::new();

        for (depth, component) in components.iter().enumerate() {
            if depth > 0 {
                prefix.push('/');
            }
            prefix.push_str(component);

            let is_last = depth + 1 == components.len();
            let candidate_is_dir = !is_last || is_dir;

            for index in self.set.matches(prefix.as_str()) {
                let rule = self.rules[index];
                if rule.dir_only && !candidate_is_dir {
                    continue;
                }
                if rule.protected && !rule.negated {
                    outcome.protected_hit = true;
                }
                best = best.max(Some(index));
            }
        }

        outcome.last = best.map(|index| self.rules[index]);
        outcome
    }
}

#[derive(Debug, Default)]
struct Outcome {
    last: Option<Rule>,
    protected_hit: bool,
}

/// Splits a relative path into its normal components, dropping `.` and any
/// root or prefix.
fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect()
}
