//! Source file discovery for the build graph.
//!
//! Resolves the include patterns of a [`GlobRule`] against the filesystem and
//! drops everything matched by one of its exclude patterns. Patterns are
//! written relative to the family root and anchored to it before matching.

use crate::build::GraphError;
use glob::{glob_with, MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Include and exclude patterns for one asset family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobRule {
    /// Patterns selecting candidate files, in declaration order
    pub include: Vec<String>,
    /// Patterns removing files from the candidates (partials, private files)
    #[serde(default)]
    pub exclude: BTreeSet<String>,
}

impl GlobRule {
    /// Create a rule from include patterns only.
    pub fn new<I, S>(include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { include: include.into_iter().map(Into::into).collect(), exclude: BTreeSet::new() }
    }

    /// Add an exclude pattern.
    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.insert(pattern.into());
        self
    }
}

/// `*` and `?` never cross a path separator; `**` still spans directories.
fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Anchor a root-relative pattern to `root`.
///
/// The root itself is escaped so directories with glob metacharacters in
/// their names are matched literally.
fn anchor(root: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    let escaped = Pattern::escape(&root.to_string_lossy());
    let escaped = escaped.trim_end_matches(['/', '\\']);
    format!("{}/{}", escaped, pattern.trim_start_matches("./"))
}

fn compile(root: &Path, pattern: &str) -> Result<Pattern, GraphError> {
    Pattern::new(&anchor(root, pattern))
        .map_err(|source| GraphError::InvalidPattern { pattern: pattern.to_string(), source })
}

/// Discover files matching a glob rule.
///
/// # Arguments
/// - `root` - Directory the rule's patterns are relative to
/// - `rule` - Include and exclude patterns
///
/// # Returns
/// Sorted, deduplicated list of matching regular files. An empty list is not
/// an error.
pub fn match_paths(root: &Path, rule: &GlobRule) -> Result<Vec<PathBuf>, GraphError> {
    let options = match_options();

    // Compile every pattern up front so a malformed exclude fails even when
    // nothing is matched.
    let excludes =
        rule.exclude.iter().map(|p| compile(root, p)).collect::<Result<Vec<_>, _>>()?;

    let mut matched = BTreeSet::new();
    for pattern in &rule.include {
        let anchored = anchor(root, pattern);
        let paths = glob_with(&anchored, options).map_err(|source| {
            GraphError::InvalidPattern { pattern: pattern.clone(), source }
        })?;

        for entry in paths {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        matched.insert(path);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "skipping unreadable path during discovery");
                }
            }
        }
    }

    let before = matched.len();
    matched.retain(|path| !excludes.iter().any(|ex| ex.matches_path_with(path, options)));

    debug!(
        root = %root.display(),
        matched = before,
        excluded = before - matched.len(),
        "resolved glob rule"
    );

    Ok(matched.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(&path).unwrap().write_all(b"// source").unwrap();
        path
    }

    #[test]
    fn test_match_paths_simple() {
        let temp = TempDir::new().unwrap();
        create_test_file(temp.path(), "index.ts");
        create_test_file(temp.path(), "notes.txt");

        let files = match_paths(temp.path(), &GlobRule::new(["*.ts"])).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("index.ts"));
        assert!(files[0].is_absolute());
    }

    #[test]
    fn test_match_paths_recursive() {
        let temp = TempDir::new().unwrap();
        create_test_file(temp.path(), "index.pug");
        create_test_file(temp.path(), "about/index.pug");
        create_test_file(temp.path(), "about/team/members.pug");

        let files = match_paths(temp.path(), &GlobRule::new(["**/*.pug"])).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_single_star_does_not_cross_directories() {
        let temp = TempDir::new().unwrap();
        create_test_file(temp.path(), "index.ts");
        create_test_file(temp.path(), "lib/util.ts");

        let files = match_paths(temp.path(), &GlobRule::new(["*.ts"])).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("index.ts"));
    }

    #[test]
    fn test_match_paths_excludes_partials() {
        let temp = TempDir::new().unwrap();
        create_test_file(temp.path(), "index.scss");
        create_test_file(temp.path(), "_variables.scss");
        create_test_file(temp.path(), "pages/_mixins.scss");
        create_test_file(temp.path(), "pages/about.scss");

        let rule = GlobRule::new(["**/*.scss"]).excluding("**/_*.scss");
        let files = match_paths(temp.path(), &rule).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| {
            !p.file_name().unwrap().to_string_lossy().starts_with('_')
        }));
    }

    #[test]
    fn test_exclude_without_overlap_leaves_set_unchanged() {
        let temp = TempDir::new().unwrap();
        create_test_file(temp.path(), "index.scss");
        create_test_file(temp.path(), "blog/post.scss");

        let base = GlobRule::new(["**/*.scss"]);
        let with_exclude = base.clone().excluding("**/*.less");

        assert_eq!(
            match_paths(temp.path(), &base).unwrap(),
            match_paths(temp.path(), &with_exclude).unwrap()
        );
    }

    #[test]
    fn test_match_paths_sorted_and_deduplicated() {
        let temp = TempDir::new().unwrap();
        create_test_file(temp.path(), "b.ts");
        create_test_file(temp.path(), "a.ts");

        let rule = GlobRule::new(["*.ts", "a.*"]);
        let files = match_paths(temp.path(), &rule).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.ts"));
        assert!(files[1].ends_with("b.ts"));
    }

    #[test]
    fn test_match_paths_skips_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("vendor.ts")).unwrap();
        create_test_file(temp.path(), "index.ts");

        let files = match_paths(temp.path(), &GlobRule::new(["*.ts"])).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_match_paths_no_match_is_empty() {
        let temp = TempDir::new().unwrap();
        create_test_file(temp.path(), "logo.png");

        let files = match_paths(temp.path(), &GlobRule::new(["**/*.scss"])).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("does-not-exist");

        let files = match_paths(&root, &GlobRule::new(["**/*.pug"])).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_invalid_include_pattern() {
        let temp = TempDir::new().unwrap();
        let result = match_paths(temp.path(), &GlobRule::new(["[*.ts"]));
        assert!(matches!(
            result,
            Err(GraphError::InvalidPattern { ref pattern, .. }) if pattern == "[*.ts"
        ));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let temp = TempDir::new().unwrap();
        let rule = GlobRule::new(["*.ts"]).excluding("***");
        let result = match_paths(temp.path(), &rule);
        assert!(matches!(result, Err(GraphError::InvalidPattern { .. })));
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("site[1]");
        create_test_file(&root, "index.pug");

        let files = match_paths(&root, &GlobRule::new(["*.pug"])).unwrap();
        assert_eq!(files.len(), 1);
    }
}
