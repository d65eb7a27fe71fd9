//! Configuration for the osascript bridge.

use std::path::PathBuf;

/// Ids per batch chunk. The interpreter becomes unreliable past a few
/// dozen mutations per invocation; 50 is the empirically safe ceiling.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Configuration for the bridge.
#[derive(Debug, Clone)]
pub struct OsaConfig {
    /// Path to the osascript binary.
    pub osascript_path: String,
    /// Root directory holding reusable script fragments.
    pub asset_root: PathBuf,
    /// Maximum ids per batch chunk.
    pub chunk_size: usize,
}

impl Default for OsaConfig {
    fn default() -> Self {
        Self {
            osascript_path: "osascript".to_string(),
            asset_root: PathBuf::from("assets/scripts"),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
