/// Configuration shared by storage backends
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Absolute max size allowed for a single file (safety guard)
    pub max_file_bytes: u64,

    /// Lifetime stamped onto minted download URLs
    pub download_url_ttl_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 5 * 1024 * 1024 * 1024, // 5GB
            download_url_ttl_secs: 3600,            // 1 hour
        }
    }
}

impl StorageConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max file size
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    /// Set download URL lifetime
    pub fn with_download_url_ttl(mut self, secs: u64) -> Self {
        self.download_url_ttl_secs = secs;
        self
    }
}
