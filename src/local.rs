use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    ByteStream, DownloadUrl, FileDescription, FileStorage, StorageCapabilities, StorageConfig,
    StorageError, StorageResult, UploadResult,
};

/// Sidecar suffix holding per-file metadata
const META_SUFFIX: &str = ".meta.json";

/// Metadata persisted next to each stored file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileMetadata {
    content_type: Option<String>,
    size_bytes: u64,
    created_at: i64,
}

/// Filesystem backend rooted at a single directory
///
/// Stores one file per path plus a JSON sidecar carrying the content type,
/// so a download returns the same type the upload declared. Uploads land
/// in a staging file first and are renamed into place once complete.
pub struct LocalFileStorage {
    root: PathBuf,
    config: StorageConfig,
}

impl LocalFileStorage {
    /// Create a backend rooted at `root`; directories are created on demand
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_config(root, StorageConfig::default())
    }

    pub fn with_config<P: Into<PathBuf>>(root: P, config: StorageConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        validate_path(path)?;
        Ok(self.root.join(path))
    }

    fn meta_path(target: &Path) -> PathBuf {
        let mut name = target
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(META_SUFFIX);
        target.with_file_name(name)
    }

    async fn write_staging(&self, content: &mut ByteStream, staging: &Path) -> StorageResult<u64> {
        let mut file = fs::File::create(staging).await?;
        let mut size_bytes: u64 = 0;
        while let Some(chunk) = content.next().await {
            let chunk = chunk?;
            size_bytes += chunk.len() as u64;
            if size_bytes > self.config.max_file_bytes {
                return Err(StorageError::invalid(format!(
                    "file exceeds the maximum size of {} bytes",
                    self.config.max_file_bytes
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        Ok(size_bytes)
    }

    async fn read_metadata(target: &Path) -> Option<FileMetadata> {
        let raw = fs::read(Self::meta_path(target)).await.ok()?;
        match serde_json::from_slice(&raw) {
            Ok(meta) => Some(meta),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable metadata sidecar");
                None
            }
        }
    }
}

/// Rejects paths that could escape the storage root
fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty() {
        return Err(StorageError::invalid("file path must not be empty"));
    }
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return Err(StorageError::invalid(format!(
            "file path {} must be relative",
            path
        )));
    }
    if candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(StorageError::invalid(format!(
            "file path {} must not traverse outside the storage root",
            path
        )));
    }
    Ok(())
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn upload(
        &self,
        path: &str,
        content_type: Option<&str>,
        mut content: ByteStream,
    ) -> StorageResult<UploadResult> {
        let target = self.resolve(path)?;
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).await?;
        }

        let staging = target.with_file_name(format!(".staging-{}", Uuid::new_v4().simple()));
        let size_bytes = match self.write_staging(&mut content, &staging).await {
            Ok(size_bytes) => size_bytes,
            Err(err) => {
                if let Err(remove_err) = fs::remove_file(&staging).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!(error = %remove_err, "failed to remove staging file after aborted upload");
                    }
                }
                return Err(err);
            }
        };
        fs::rename(&staging, &target).await?;

        let meta = FileMetadata {
            content_type: content_type.map(str::to_string),
            size_bytes,
            created_at: Utc::now().timestamp(),
        };
        fs::write(Self::meta_path(&target), serde_json::to_vec(&meta)?).await?;
        debug!(path = %path, size_bytes, "stored file on disk");

        Ok(UploadResult {
            path: path.to_string(),
            size_bytes,
        })
    }

    async fn download(&self, path: &str) -> StorageResult<FileDescription> {
        let target = self.resolve(path)?;
        let file = match fs::File::open(&target).await {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::not_found(path))
            }
            Err(err) => return Err(err.into()),
        };
        let meta = Self::read_metadata(&target).await;

        Ok(FileDescription {
            path: path.to_string(),
            content_type: meta.and_then(|m| m.content_type),
            content: Box::pin(ReaderStream::new(file)),
        })
    }

    async fn download_url(&self, path: &str) -> StorageResult<DownloadUrl> {
        let target = self.resolve(path)?;
        if !fs::try_exists(&target).await? {
            return Err(StorageError::not_found(path));
        }
        let absolute = fs::canonicalize(&target).await?;
        Ok(DownloadUrl {
            url: format!("file://{}", absolute.display()),
            expires_at: Utc::now().timestamp() + self.config.download_url_ttl_secs as i64,
        })
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::not_found(path))
            }
            Err(err) => return Err(err.into()),
        }
        if let Err(err) = fs::remove_file(Self::meta_path(&target)).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %err, "failed to remove metadata sidecar");
            }
        }
        debug!(path = %path, "deleted file from disk");
        Ok(())
    }

    fn capabilities(&self) -> StorageCapabilities {
        StorageCapabilities::basic().with_download_urls().persistent()
    }
}
