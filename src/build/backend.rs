//! Transformation backend contracts.
//!
//! The core never renders, compiles, or bundles anything itself. A host
//! supplies a [`Backend`] whose parts realize the artifacts of a
//! [`crate::build::BuildGraph`]; the core only tells them what to produce and
//! where it goes.

use crate::build::{Directive, LogicalKey};
use std::io;
use std::path::Path;

/// Renders a page template into markup.
pub trait TemplateRenderer {
    /// Render `template` for the page that will be written to `output`.
    fn render(&self, template: &Path, output: &str, directive: &Directive) -> io::Result<Vec<u8>>;
}

/// Output of a style transformation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleOutput {
    pub css: Vec<u8>,
    pub source_map: Option<Vec<u8>>,
}

/// Transforms a stylesheet into CSS.
pub trait StyleTransformer {
    fn transform(
        &self,
        stylesheet: &Path,
        directive: &Directive,
        source_map: bool,
        minify: bool,
    ) -> io::Result<StyleOutput>;
}

/// Output of bundling one entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleOutput {
    pub code: Vec<u8>,
    pub source_map: Option<Vec<u8>>,
}

/// Bundles a script entry point.
pub trait ScriptBundler {
    fn bundle(
        &self,
        entry: &Path,
        key: &LogicalKey,
        directive: &Directive,
        source_map: bool,
        minify: bool,
    ) -> io::Result<BundleOutput>;
}

/// Copies a directory into the output tree, returning the bytes copied.
pub trait AssetCopier {
    fn copy_dir(&self, from: &Path, to: &Path) -> io::Result<u64>;
}

/// A complete set of collaborators for one build.
pub trait Backend {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;
    fn templates(&self) -> &dyn TemplateRenderer;
    fn styles(&self) -> &dyn StyleTransformer;
    fn scripts(&self) -> &dyn ScriptBundler;
    fn copier(&self) -> &dyn AssetCopier;
}

/// Copier that mirrors a directory tree with `std::fs`.
///
/// A missing source directory copies nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCopier;

impl FsCopier {
    fn copy_tree(from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::create_dir_all(to)?;
        let mut total = 0;
        for entry in std::fs::read_dir(from)? {
            let entry = entry?;
            let target = to.join(entry.file_name());
            let path = entry.path();
            if path.is_dir() {
                total += Self::copy_tree(&path, &target)?;
            } else {
                total += std::fs::copy(&path, &target)?;
            }
        }
        Ok(total)
    }
}

impl AssetCopier for FsCopier {
    fn copy_dir(&self, from: &Path, to: &Path) -> io::Result<u64> {
        if !from.is_dir() {
            return Ok(0);
        }
        Self::copy_tree(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fs_copier_copies_tree() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("src/images");
        fs::create_dir_all(from.join("icons")).unwrap();
        fs::write(from.join("logo.png"), b"png!").unwrap();
        fs::write(from.join("icons/menu.svg"), b"<svg/>").unwrap();

        let to = temp.path().join("dist/images");
        let copied = FsCopier.copy_dir(&from, &to).unwrap();

        assert_eq!(copied, 10);
        assert_eq!(fs::read(to.join("logo.png")).unwrap(), b"png!");
        assert!(to.join("icons/menu.svg").is_file());
    }

    #[test]
    fn test_fs_copier_missing_source() {
        let temp = TempDir::new().unwrap();
        let copied =
            FsCopier.copy_dir(&temp.path().join("nope"), &temp.path().join("dist")).unwrap();

        assert_eq!(copied, 0);
        assert!(!temp.path().join("dist").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_copier_follows_symlinked_dirs() {
        let temp = TempDir::new().unwrap();
        let shared = temp.path().join("shared/icons");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("menu.svg"), b"<svg/>").unwrap();

        let from = temp.path().join("src/images");
        fs::create_dir_all(&from).unwrap();
        std::os::unix::fs::symlink(&shared, from.join("icons")).unwrap();

        let to = temp.path().join("dist/images");
        let copied = FsCopier.copy_dir(&from, &to).unwrap();

        assert_eq!(copied, 6);
        assert!(to.join("icons").is_dir());
        assert_eq!(fs::read(to.join("icons/menu.svg")).unwrap(), b"<svg/>");
    }
}
