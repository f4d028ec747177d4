//! End-to-end: asset payloads arrive as length-prefixed wire records and
//! land in a storage backend, the way a game server ingests client uploads.

use std::io::Cursor;

use bytes::Bytes;

use den_files::framing::{RecordReader, RecordWriter};
use den_files::{bytes_stream, FileStorage, MemoryFileStorage, ReadOnly};

const ASSETS: &[(&str, &[u8])] = &[
    ("textures/grass.png", b"grass-pixels"),
    ("textures/dirt.png", b"dirt-pixels"),
    ("audio/theme.ogg", b"theme-samples"),
];

fn wire_of(assets: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = RecordWriter::new(Cursor::new(Vec::new()));
    for (_, payload) in assets {
        writer.write_record(payload).unwrap();
    }
    writer.into_inner().into_inner()
}

#[tokio::test]
async fn wire_records_land_in_storage() {
    let wire = wire_of(ASSETS);

    // Receiver side reads a forward-only stream, as off a socket.
    let storage = MemoryFileStorage::new();
    let mut reader = RecordReader::new(ReadOnly::new(&wire[..]));
    for (path, _) in ASSETS {
        let payload = reader.read_record().unwrap().unwrap();
        storage
            .upload(
                path,
                Some("application/octet-stream"),
                bytes_stream(Bytes::from(payload)),
            )
            .await
            .unwrap();
    }
    assert!(reader.read_record().unwrap().is_none());

    for (path, expected) in ASSETS {
        let file = storage.download(path).await.unwrap();
        assert_eq!(file.into_bytes().await.unwrap(), *expected);
    }
}

#[tokio::test]
async fn skipping_a_record_does_not_misalign_the_rest() {
    let wire = wire_of(ASSETS);

    let storage = MemoryFileStorage::new();
    let mut reader = RecordReader::new(ReadOnly::new(&wire[..]));

    // First asset is rejected by the receiver; its window is dropped
    // half-read and the stream realigns itself.
    {
        let mut skipped = reader.next_record().unwrap().unwrap();
        let mut probe = [0u8; 4];
        skipped.read(&mut probe).unwrap();
        assert_eq!(&probe, b"gras");
    }

    for (path, _) in &ASSETS[1..] {
        let payload = reader.read_record().unwrap().unwrap();
        storage
            .upload(path, None, bytes_stream(Bytes::from(payload)))
            .await
            .unwrap();
    }

    assert_eq!(storage.file_count(), 2);
    let file = storage.download("audio/theme.ogg").await.unwrap();
    assert_eq!(file.into_bytes().await.unwrap(), &b"theme-samples"[..]);
}
