//! Per-family entry registries.
//!
//! An [`EntryRegistry`] maps each logical key of one asset family to the
//! source file it was derived from. Collisions are rejected: two source files
//! sharing a key would write the same output file.

use crate::build::{derive_key, AssetFamily, GraphError, LogicalKey};
use std::collections::btree_map::{self, BTreeMap, Entry};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Mapping from logical key to source path for one asset family.
///
/// Built once per invocation and immutable afterwards. Iteration is ordered
/// by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRegistry {
    family: AssetFamily,
    root: PathBuf,
    entries: BTreeMap<LogicalKey, PathBuf>,
}

impl EntryRegistry {
    /// Build a registry from discovered source paths.
    ///
    /// # Arguments
    /// - `family` - Family the paths belong to
    /// - `paths` - Absolute source paths, usually from [`crate::build::match_paths`]
    /// - `root` - Family root used for key derivation
    ///
    /// # Errors
    /// - [`GraphError::OutsideRoot`] if a path is not under `root`
    /// - [`GraphError::DuplicateKey`] if two different paths derive the same key
    pub fn build<I, P>(family: AssetFamily, paths: I, root: &Path) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut entries = BTreeMap::new();

        for path in paths {
            let path = path.as_ref();
            let key = derive_key(path, root)?;

            match entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(path.to_path_buf());
                }
                Entry::Occupied(slot) => {
                    if slot.get() != path {
                        return Err(GraphError::DuplicateKey {
                            family,
                            key: slot.key().to_string(),
                            first: slot.get().clone(),
                            second: path.to_path_buf(),
                        });
                    }
                }
            }
        }

        debug!(%family, root = %root.display(), entries = entries.len(), "built entry registry");

        Ok(Self { family, root: root.to_path_buf(), entries })
    }

    /// Create an empty registry.
    pub fn empty(family: AssetFamily, root: &Path) -> Self {
        Self { family, root: root.to_path_buf(), entries: BTreeMap::new() }
    }

    /// Family of every entry in this registry.
    pub fn family(&self) -> AssetFamily {
        self.family
    }

    /// Root directory keys were derived against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Source path registered for a key.
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.entries.get(key).map(PathBuf::as_path)
    }

    /// Check whether a key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, LogicalKey, PathBuf> {
        self.entries.iter()
    }

    /// Registered keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &LogicalKey> {
        self.entries.keys()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the registry into its key/path mapping.
    pub fn into_entries(self) -> BTreeMap<LogicalKey, PathBuf> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a EntryRegistry {
    type Item = (&'a LogicalKey, &'a PathBuf);
    type IntoIter = btree_map::Iter<'a, LogicalKey, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
