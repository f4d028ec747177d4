use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    bytes_stream, ByteStream, DownloadUrl, FileDescription, FileStorage, StorageCapabilities,
    StorageConfig, StorageError, StorageResult, UploadResult,
};

/// A stored file and its metadata
#[derive(Debug, Clone)]
struct StoredFile {
    data: Bytes,
    content_type: Option<String>,
}

/// In-memory backend for testing and development
pub struct MemoryFileStorage {
    files: Arc<RwLock<HashMap<String, StoredFile>>>,
    config: StorageConfig,
}

impl MemoryFileStorage {
    pub fn new() -> Self {
        Self::with_config(StorageConfig::default())
    }

    pub fn with_config(config: StorageConfig) -> Self {
        Self {
            files: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Number of files currently stored
    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }
}

impl Default for MemoryFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileStorage for MemoryFileStorage {
    async fn upload(
        &self,
        path: &str,
        content_type: Option<&str>,
        mut content: ByteStream,
    ) -> StorageResult<UploadResult> {
        if path.is_empty() {
            return Err(StorageError::invalid("file path must not be empty"));
        }

        let mut data = BytesMut::new();
        while let Some(chunk) = content.next().await {
            let chunk = chunk?;
            if (data.len() + chunk.len()) as u64 > self.config.max_file_bytes {
                return Err(StorageError::invalid(format!(
                    "file {} exceeds the maximum size of {} bytes",
                    path, self.config.max_file_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }

        let size_bytes = data.len() as u64;
        self.files.write().insert(
            path.to_string(),
            StoredFile {
                data: data.freeze(),
                content_type: content_type.map(str::to_string),
            },
        );
        debug!(path = %path, size_bytes, "stored file in memory");

        Ok(UploadResult {
            path: path.to_string(),
            size_bytes,
        })
    }

    async fn download(&self, path: &str) -> StorageResult<FileDescription> {
        let stored = self
            .files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path))?;

        Ok(FileDescription {
            path: path.to_string(),
            content_type: stored.content_type,
            content: bytes_stream(stored.data),
        })
    }

    async fn download_url(&self, _path: &str) -> StorageResult<DownloadUrl> {
        Err(StorageError::Unsupported)
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        match self.files.write().remove(path) {
            Some(_) => {
                debug!(path = %path, "deleted file from memory");
                Ok(())
            }
            None => Err(StorageError::not_found(path)),
        }
    }

    fn capabilities(&self) -> StorageCapabilities {
        StorageCapabilities::basic()
    }
}
