//! Logical key derivation.
//!
//! A logical key is the root-relative path of a source file with its last
//! extension removed and separators normalized to `/`. It is the join key
//! between a page's template, stylesheet, and script.

use crate::build::GraphError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::path::{Component, Path};

/// Stable, path-derived identifier of a build entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalKey(String);

impl LogicalKey {
    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the key (the file stem).
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for LogicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LogicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LogicalKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LogicalKey {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LogicalKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Strip the last extension of a file name.
///
/// Dotfiles such as `.config` have no extension and are returned unchanged.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Derive the logical key of `path` relative to `root`.
///
/// # Errors
/// Returns [`GraphError::OutsideRoot`] if `path` is not contained in `root`,
/// or if it names the root itself.
///
/// # Example
/// ```
/// use sitegraph::build::derive_key;
/// use std::path::Path;
///
/// let key = derive_key(Path::new("/site/src/pug/about/team.pug"), Path::new("/site/src/pug"))?;
/// assert_eq!(key.as_str(), "about/team");
/// # Ok::<(), sitegraph::build::GraphError>(())
/// ```
pub fn derive_key(path: &Path, root: &Path) -> Result<LogicalKey, GraphError> {
    let outside =
        || GraphError::OutsideRoot { path: path.to_path_buf(), root: root.to_path_buf() };

    let relative = path.strip_prefix(root).map_err(|_| outside())?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            // `..` would climb back out of the root
            _ => return Err(outside()),
        }
    }

    let Some(file_name) = segments.pop() else {
        return Err(outside());
    };
    segments.push(strip_extension(&file_name).to_string());

    Ok(LogicalKey(segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_derive_key_top_level() {
        let key = derive_key(Path::new("/site/src/pug/index.pug"), Path::new("/site/src/pug"))
            .unwrap();
        assert_eq!(key.as_str(), "index");
        assert_eq!(key.name(), "index");
    }

    #[test]
    fn test_derive_key_nested() {
        let key =
            derive_key(Path::new("/site/src/scss/blog/post.scss"), Path::new("/site/src/scss"))
                .unwrap();
        assert_eq!(key, "blog/post");
        assert_eq!(key.name(), "post");
    }

    #[test]
    fn test_derive_key_strips_one_extension() {
        let key = derive_key(Path::new("/site/js/page.min.ts"), Path::new("/site/js")).unwrap();
        assert_eq!(key, "page.min");
    }

    #[test]
    fn test_derive_key_without_extension() {
        let key = derive_key(Path::new("/site/js/LICENSE"), Path::new("/site/js")).unwrap();
        assert_eq!(key, "LICENSE");
    }

    #[test]
    fn test_derive_key_dotfile() {
        let key = derive_key(Path::new("/site/js/.eslintrc"), Path::new("/site/js")).unwrap();
        assert_eq!(key, ".eslintrc");
    }

    #[test]
    fn test_derive_key_root_with_trailing_separator() {
        let key = derive_key(Path::new("/site/js/app.ts"), Path::new("/site/js/")).unwrap();
        assert_eq!(key, "app");
    }

    #[test]
    fn test_derive_key_outside_root() {
        let result = derive_key(Path::new("/other/index.pug"), Path::new("/site/src/pug"));
        assert!(matches!(result, Err(GraphError::OutsideRoot { .. })));
    }

    #[test]
    fn test_derive_key_sibling_prefix_is_outside() {
        // "/site/src/pug-old" shares a string prefix with the root but is not inside it
        let result =
            derive_key(Path::new("/site/src/pug-old/index.pug"), Path::new("/site/src/pug"));
        assert!(matches!(result, Err(GraphError::OutsideRoot { .. })));
    }

    #[test]
    fn test_derive_key_root_itself_is_outside() {
        let result = derive_key(Path::new("/site/src/pug"), Path::new("/site/src/pug"));
        assert!(matches!(result, Err(GraphError::OutsideRoot { .. })));
    }

    #[test]
    fn test_derive_key_parent_component_is_outside() {
        let result =
            derive_key(Path::new("/site/src/pug/../secret.pug"), Path::new("/site/src/pug"));
        assert!(matches!(result, Err(GraphError::OutsideRoot { .. })));
    }

    #[test]
    fn test_derive_key_deterministic() {
        let path = PathBuf::from("/site/src/pug/docs/guide/intro.pug");
        let root = PathBuf::from("/site/src/pug");

        let first = derive_key(&path, &root).unwrap();
        let second = derive_key(&path, &root).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "docs/guide/intro");
    }
}
