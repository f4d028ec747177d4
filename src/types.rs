use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

/// Stream of content bytes moving into or out of a storage backend
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Wrap an in-memory payload as a single-chunk [`ByteStream`]
pub fn bytes_stream(data: Bytes) -> ByteStream {
    Box::pin(futures_util::stream::once(async move { Ok(data) }))
}

/// A downloaded file: its path, stored content type and streaming body
pub struct FileDescription {
    pub path: String,
    pub content_type: Option<String>,
    pub content: ByteStream,
}

impl FileDescription {
    /// Collect the remaining content into memory
    pub async fn into_bytes(mut self) -> Result<Bytes, std::io::Error> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.content.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }
}

impl std::fmt::Debug for FileDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDescription")
            .field("path", &self.path)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Result of a completed upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub path: String,
    pub size_bytes: u64,
}

/// Time-limited link to a stored file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadUrl {
    pub url: String,
    /// Unix timestamp after which the link should no longer be handed out
    pub expires_at: i64,
}
