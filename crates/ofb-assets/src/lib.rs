//! ofb-assets - On-disk script fragment loading for the OmniFocus bridge
//!
//! Fragments (JSON helpers, entity serializers) live under one fixed asset
//! root and are referenced by relative path. This crate provides:
//! - Traversal-guarded resolution (paths escaping the root fail closed)
//! - A process-lifetime cache with an explicit, test-friendly lifecycle
//! - Fragment enumeration for diagnostics

mod error;
mod loader;

pub use error::AssetError;
pub use loader::AssetLoader;
