//! Errors raised while constructing a build graph.
//!
//! Every variant is fatal to the current build invocation. They all stem from
//! static configuration or filesystem state, so nothing here is retried.

use std::path::PathBuf;

use crate::build::AssetFamily;

/// Error during entry discovery, key derivation, or graph assembly.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// A glob pattern could not be parsed
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    /// A matched path is not contained in the family root
    #[error("Path '{}' is outside of root '{}'", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
    /// Two source files of one family derived the same logical key
    #[error(
        "Duplicate {family} key '{key}': '{}' and '{}' would write the same output",
        first.display(),
        second.display()
    )]
    DuplicateKey { family: AssetFamily, key: String, first: PathBuf, second: PathBuf },
    /// A registry was passed in another family's slot
    #[error("Expected a {expected} registry for the {expected} slot, got a {found} registry")]
    FamilyMismatch { expected: AssetFamily, found: AssetFamily },
    /// No script entry points were discovered
    #[error("No script entry points found under '{}'", root.display())]
    EmptyScriptRegistry { root: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_message_names_both_paths() {
        let err = GraphError::DuplicateKey {
            family: AssetFamily::Stylesheet,
            key: "index".to_string(),
            first: PathBuf::from("/site/src/scss/index.scss"),
            second: PathBuf::from("/site/src/scss/index.sass"),
        };

        let msg = err.to_string();
        assert!(msg.contains("stylesheet"));
        assert!(msg.contains("/site/src/scss/index.scss"));
        assert!(msg.contains("/site/src/scss/index.sass"));
    }

    #[test]
    fn test_invalid_pattern_message() {
        let source = glob::Pattern::new("[").unwrap_err();
        let err = GraphError::InvalidPattern { pattern: "[".to_string(), source };
        assert!(err.to_string().starts_with("Invalid glob pattern '['"));
    }

    #[test]
    fn test_empty_script_registry_message() {
        let err = GraphError::EmptyScriptRegistry { root: PathBuf::from("/site/src/js") };
        assert_eq!(err.to_string(), "No script entry points found under '/site/src/js'");
    }
}
