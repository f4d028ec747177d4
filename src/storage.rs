use async_trait::async_trait;

use crate::{ByteStream, DownloadUrl, FileDescription, StorageResult, UploadResult};

/// Core file storage operations - must be implemented by all storage backends
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store a file from a stream, replacing any previous content at `path`
    async fn upload(
        &self,
        path: &str,
        content_type: Option<&str>,
        content: ByteStream,
    ) -> StorageResult<UploadResult>;

    /// Get a file as a stream together with its stored content type
    async fn download(&self, path: &str) -> StorageResult<FileDescription>;

    /// Mint a time-limited download link for `path`
    async fn download_url(&self, path: &str) -> StorageResult<DownloadUrl>;

    /// Delete a file
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// Get backend capabilities
    fn capabilities(&self) -> StorageCapabilities;
}

/// Backend capabilities
#[derive(Debug, Clone, Default)]
pub struct StorageCapabilities {
    /// Whether the backend can mint download URLs
    pub supports_download_urls: bool,

    /// Whether stored files survive a process restart
    pub persistent: bool,
}

impl StorageCapabilities {
    pub fn basic() -> Self {
        Self {
            supports_download_urls: false,
            persistent: false,
        }
    }

    pub fn with_download_urls(mut self) -> Self {
        self.supports_download_urls = true;
        self
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }
}
