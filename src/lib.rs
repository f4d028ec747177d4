//! # den-files: pluggable file storage with bounded window substreams
//!
//! `den-files` gives game services one interface for file storage - upload,
//! download, time-limited download links, delete - with swappable backends,
//! plus the windowed-stream machinery needed to carry file payloads inside
//! length-prefixed wire messages.
//!
//! ## Key Features
//!
//! - **One storage surface**: services code against [`FileStorage`] and pick
//!   a backend at wiring time (in-memory, local filesystem, or a custom
//!   implementation)
//! - **Streaming-first**: content moves as a [`ByteStream`] of [`bytes::Bytes`]
//!   chunks, never buffered whole unless the backend needs it
//! - **Bounded windows**: [`SubStream`] exposes a fixed-length slice of any
//!   stream and realigns the parent on close, so consecutive payloads chain
//!   over one connection without offset bookkeeping
//! - **Record framing**: [`framing`] reads and writes length-prefixed records
//!   on top of those windows
//!
//! ## Quick Start
//!
//! ```rust
//! use den_files::prelude::*;
//! use den_files::{bytes_stream, MemoryFileStorage};
//! use bytes::Bytes;
//!
//! # #[tokio::main]
//! # async fn main() -> StorageResult<()> {
//! let storage = MemoryFileStorage::new();
//!
//! let payload = Bytes::from_static(b"level-1 savegame");
//! storage
//!     .upload("saves/player-1.bin", Some("application/octet-stream"), bytes_stream(payload))
//!     .await?;
//!
//! let file = storage.download("saves/player-1.bin").await?;
//! assert_eq!(file.content_type.as_deref(), Some("application/octet-stream"));
//! assert_eq!(file.into_bytes().await?, &b"level-1 savegame"[..]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Bounded windows
//!
//! ```rust
//! use std::io::Cursor;
//! use den_files::{RawStream, SubStream};
//!
//! let mut parent = Cursor::new(b"headerpayload".to_vec());
//! let mut window = SubStream::new(&mut parent, 6, false);
//!
//! let mut buf = [0u8; 16];
//! let n = window.read(&mut buf).unwrap();
//! assert_eq!(&buf[..n], b"header");
//!
//! // Dropping the window leaves the parent right after it.
//! drop(window);
//! assert_eq!(RawStream::position(&mut parent).unwrap(), 6);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   Your Service   │  ← business logic only
//! ├──────────────────┤
//! │   FileStorage    │  ← upload / download / url / delete
//! ├──────────────────┤
//! │ Memory | Local   │  ← storage backends
//! └──────────────────┘
//!        framing ── SubStream ── RawStream   (wire payload plumbing)
//! ```

mod config;
mod error;
pub mod framing;
mod local;
mod memory;
pub mod raw;
mod storage;
mod substream;
mod types;

// Re-export main types for clean API
pub use config::StorageConfig;
pub use error::{StorageError, StorageResult, SubstreamError};
pub use framing::{RecordReader, RecordWriter};
pub use local::LocalFileStorage;
pub use memory::MemoryFileStorage;
pub use raw::{RawStream, ReadOnly, WriteOnly};
pub use storage::{FileStorage, StorageCapabilities};
pub use substream::SubStream;
pub use types::{bytes_stream, ByteStream, DownloadUrl, FileDescription, UploadResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ByteStream, FileStorage, RawStream, StorageConfig, StorageError, StorageResult, SubStream,
    };
}
