use bytes::Bytes;
use chrono::Utc;
use tempfile::TempDir;

use den_files::{
    bytes_stream, FileStorage, LocalFileStorage, MemoryFileStorage, StorageConfig, StorageError,
};

async fn store(storage: &dyn FileStorage, path: &str, data: &'static [u8]) {
    storage
        .upload(path, Some("application/octet-stream"), bytes_stream(Bytes::from_static(data)))
        .await
        .unwrap();
}

/// S1. Uploaded content and content type round-trip through download
async fn assert_round_trip(storage: &dyn FileStorage) {
    let result = storage
        .upload(
            "saves/slot-1.bin",
            Some("application/octet-stream"),
            bytes_stream(Bytes::from_static(b"checkpoint-data")),
        )
        .await
        .unwrap();
    assert_eq!(result.path, "saves/slot-1.bin");
    assert_eq!(result.size_bytes, 15);

    let file = storage.download("saves/slot-1.bin").await.unwrap();
    assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(file.into_bytes().await.unwrap(), &b"checkpoint-data"[..]);
}

/// S2. Uploading to an existing path replaces the previous content
async fn assert_overwrite(storage: &dyn FileStorage) {
    store(storage, "config.json", b"old").await;
    store(storage, "config.json", b"newer-content").await;

    let file = storage.download("config.json").await.unwrap();
    assert_eq!(file.into_bytes().await.unwrap(), &b"newer-content"[..]);
}

/// S3. Downloading a missing path is NotFound
async fn assert_download_missing(storage: &dyn FileStorage) {
    let err = storage.download("ghost.bin").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

/// S4. Delete removes the file; deleting again is NotFound
async fn assert_delete(storage: &dyn FileStorage) {
    store(storage, "tmp/scratch.bin", b"scratch").await;
    storage.delete("tmp/scratch.bin").await.unwrap();

    let err = storage.download("tmp/scratch.bin").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
    let err = storage.delete("tmp/scratch.bin").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn memory_round_trip() {
    assert_round_trip(&MemoryFileStorage::new()).await;
}

#[tokio::test]
async fn local_round_trip() {
    let root = TempDir::new().unwrap();
    assert_round_trip(&LocalFileStorage::new(root.path())).await;
}

#[tokio::test]
async fn memory_overwrite() {
    assert_overwrite(&MemoryFileStorage::new()).await;
}

#[tokio::test]
async fn local_overwrite() {
    let root = TempDir::new().unwrap();
    assert_overwrite(&LocalFileStorage::new(root.path())).await;
}

#[tokio::test]
async fn memory_download_missing() {
    assert_download_missing(&MemoryFileStorage::new()).await;
}

#[tokio::test]
async fn local_download_missing() {
    let root = TempDir::new().unwrap();
    assert_download_missing(&LocalFileStorage::new(root.path())).await;
}

#[tokio::test]
async fn memory_delete() {
    assert_delete(&MemoryFileStorage::new()).await;
}

#[tokio::test]
async fn local_delete() {
    let root = TempDir::new().unwrap();
    assert_delete(&LocalFileStorage::new(root.path())).await;
}

/// S5. The size guard rejects uploads past max_file_bytes
#[tokio::test]
async fn size_guard_applies_to_both_backends() {
    let config = StorageConfig::default().with_max_file_bytes(8);
    let root = TempDir::new().unwrap();
    let backends: Vec<Box<dyn FileStorage>> = vec![
        Box::new(MemoryFileStorage::with_config(config.clone())),
        Box::new(LocalFileStorage::with_config(root.path(), config)),
    ];

    for storage in &backends {
        let err = storage
            .upload("big.bin", None, bytes_stream(Bytes::from_static(&[0u8; 16])))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Invalid { .. }));
        let err = storage.download("big.bin").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}

/// S6. Download URLs: the local backend mints file:// links with a future
/// expiry, the memory backend reports the capability as absent
#[tokio::test]
async fn download_urls_follow_capabilities() {
    let memory = MemoryFileStorage::new();
    assert!(!memory.capabilities().supports_download_urls);
    store(&memory, "a.bin", b"a").await;
    let err = memory.download_url("a.bin").await.unwrap_err();
    assert!(matches!(err, StorageError::Unsupported));

    let root = TempDir::new().unwrap();
    let local = LocalFileStorage::with_config(
        root.path(),
        StorageConfig::default().with_download_url_ttl(60),
    );
    assert!(local.capabilities().supports_download_urls);
    store(&local, "b.bin", b"b").await;

    let link = local.download_url("b.bin").await.unwrap();
    assert!(link.url.starts_with("file://"));
    assert!(link.url.ends_with("b.bin"));
    assert!(link.expires_at > Utc::now().timestamp());
    assert!(link.expires_at <= Utc::now().timestamp() + 60);

    let err = local.download_url("ghost.bin").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

/// S7. The local backend refuses paths that escape its root
#[tokio::test]
async fn local_rejects_traversal_paths() {
    let root = TempDir::new().unwrap();
    let local = LocalFileStorage::new(root.path());

    for path in ["../escape.bin", "saves/../../escape.bin", "/etc/passwd", ""] {
        let err = local
            .upload(path, None, bytes_stream(Bytes::from_static(b"x")))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Invalid { .. }), "path: {:?}", path);
    }
}

/// S8. Local storage survives a fresh backend instance over the same root
#[tokio::test]
async fn local_files_persist_across_instances() {
    let root = TempDir::new().unwrap();
    {
        let local = LocalFileStorage::new(root.path());
        assert!(local.capabilities().persistent);
        store(&local, "world/map.dat", b"terrain").await;
    }

    let reopened = LocalFileStorage::new(root.path());
    let file = reopened.download("world/map.dat").await.unwrap();
    assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(file.into_bytes().await.unwrap(), &b"terrain"[..]);
}
