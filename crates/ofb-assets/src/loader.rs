//! Traversal-guarded fragment loader with an explicit cache lifecycle.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use walkdir::WalkDir;

use crate::error::AssetError;

/// Loads script fragments from a fixed root directory.
///
/// The cache is keyed by relative path, populated on first successful
/// read, and read-only afterwards; [`AssetLoader::clear_cache`] exists so
/// tests can reset it deterministically. Most commands reuse the same one
/// or two serializer fragments, so the cache removes nearly all repeat
/// disk reads.
#[derive(Debug)]
pub struct AssetLoader {
    root: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl AssetLoader {
    /// Create a loader rooted at `root`. The root is fixed for the
    /// loader's lifetime.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The configured asset root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative fragment path, refusing anything that escapes
    /// the root.
    ///
    /// Both sides are canonicalized so `..` segments and symlinks cannot
    /// smuggle a read outside the root: if the resolved path does not
    /// start with the resolved root, the call fails closed.
    fn resolve(&self, relative: &str) -> Result<PathBuf, AssetError> {
        let root = self
            .root
            .canonicalize()
            .map_err(|_| AssetError::NotFound(format!("asset root {}", self.root.display())))?;
        let candidate = root.join(relative);
        let resolved = candidate
            .canonicalize()
            .map_err(|_| AssetError::NotFound(relative.to_string()))?;
        if !resolved.starts_with(&root) {
            return Err(AssetError::OutsideRoot(relative.to_string()));
        }
        Ok(resolved)
    }

    /// Read a fragment from disk, bypassing the cache.
    ///
    /// # Errors
    /// [`AssetError::NotFound`] when the fragment (or the root) does not
    /// exist, [`AssetError::OutsideRoot`] when the path escapes the root,
    /// [`AssetError::System`] on read failure.
    pub fn load(&self, relative: &str) -> Result<String, AssetError> {
        let path = self.resolve(relative)?;
        tracing::debug!(fragment = relative, "loading script fragment");
        Ok(fs::read_to_string(path)?)
    }

    /// Read a fragment through the cache, populating it on first use.
    ///
    /// # Errors
    /// Same failure modes as [`AssetLoader::load`]; failures are not cached.
    pub fn load_cached(&self, relative: &str) -> Result<String, AssetError> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(content) = cache.get(relative) {
                return Ok(content.clone());
            }
        }
        let content = self.load(relative)?;
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.insert(relative.to_string(), content.clone());
        Ok(content)
    }

    /// Drop every cached fragment. Primarily for tests.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.clear();
    }

    /// Number of cached fragments.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Enumerate fragment paths (relative to the root), sorted.
    ///
    /// # Errors
    /// [`AssetError::NotFound`] when the root does not exist.
    pub fn list(&self) -> Result<Vec<String>, AssetError> {
        let root = self
            .root
            .canonicalize()
            .map_err(|_| AssetError::NotFound(format!("asset root {}", self.root.display())))?;
        let mut fragments = Vec::new();
        for entry in WalkDir::new(&root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&root) {
                fragments.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
        fragments.sort();
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, AssetLoader) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("helpers")).unwrap();
        fs::write(
            dir.path().join("helpers/json.applescript"),
            "on jsonEscape(s)\nend jsonEscape\n",
        )
        .unwrap();
        let loader = AssetLoader::new(dir.path());
        (dir, loader)
    }

    #[test]
    fn loads_fragment_by_relative_path() {
        let (_dir, loader) = fixture();
        let content = loader.load("helpers/json.applescript").unwrap();
        assert!(content.starts_with("on jsonEscape"));
    }

    #[test]
    fn missing_fragment_is_not_found() {
        let (_dir, loader) = fixture();
        assert!(matches!(
            loader.load("helpers/nope.applescript"),
            Err(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn traversal_fails_closed() {
        let (dir, loader) = fixture();
        // A real file outside the root must not be readable through the loader.
        fs::write(dir.path().parent().unwrap().join("secret.txt"), "secret").ok();
        let result = loader.load("../secret.txt");
        assert!(matches!(
            result,
            Err(AssetError::OutsideRoot(_) | AssetError::NotFound(_))
        ));
        assert!(matches!(
            loader.load("../../etc/passwd"),
            Err(AssetError::OutsideRoot(_) | AssetError::NotFound(_))
        ));
    }

    #[test]
    fn cache_serves_after_source_removal() {
        let (dir, loader) = fixture();
        let first = loader.load_cached("helpers/json.applescript").unwrap();
        fs::remove_file(dir.path().join("helpers/json.applescript")).unwrap();
        // Still served from cache.
        let second = loader.load_cached("helpers/json.applescript").unwrap();
        assert_eq!(first, second);
        // Cleared cache falls through to disk and fails.
        loader.clear_cache();
        assert!(loader.load_cached("helpers/json.applescript").is_err());
    }

    #[test]
    fn cache_lifecycle_is_observable() {
        let (_dir, loader) = fixture();
        assert_eq!(loader.cached_len(), 0);
        loader.load_cached("helpers/json.applescript").unwrap();
        assert_eq!(loader.cached_len(), 1);
        loader.clear_cache();
        assert_eq!(loader.cached_len(), 0);
    }

    #[test]
    fn list_enumerates_relative_paths() {
        let (dir, loader) = fixture();
        fs::create_dir_all(dir.path().join("serializers")).unwrap();
        fs::write(dir.path().join("serializers/task.applescript"), "x").unwrap();
        let listed = loader.list().unwrap();
        assert_eq!(
            listed,
            vec![
                "helpers/json.applescript".to_string(),
                "serializers/task.applescript".to_string()
            ]
        );
    }
}
