//! Length-prefixed records over a raw stream.
//!
//! Each record is a `u32` little-endian payload length followed by the
//! payload bytes. Both sides hand the payload out as a bounded
//! [`SubStream`] window, so dropping a half-consumed record still leaves
//! the stream aligned on the next record: the reader drains the unread
//! tail, the writer zero-pads the unwritten tail. Callers never track
//! offsets themselves.

use std::io;

use crate::raw::RawStream;
use crate::substream::SubStream;

/// Size of the record length prefix in bytes.
const PREFIX_LEN: usize = 4;

/// Writes length-prefixed records to an underlying stream
pub struct RecordWriter<S: RawStream> {
    stream: S,
}

impl<S: RawStream> RecordWriter<S> {
    /// Start writing records to `stream` at its current position
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Reserve the next record and return a window of exactly `len` bytes
    /// for its payload.
    ///
    /// The window must be dropped (or closed) before the next record can
    /// begin; any unwritten tail is padded with zeros so the following
    /// record lands at the correct offset.
    pub fn begin_record(&mut self, len: u32) -> io::Result<SubStream<&mut S>> {
        write_all(&mut self.stream, &len.to_le_bytes())?;
        Ok(SubStream::new(&mut self.stream, len as u64, false))
    }

    /// Write a whole payload as one record
    pub fn write_record(&mut self, payload: &[u8]) -> io::Result<()> {
        let len = u32::try_from(payload.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "record payload exceeds the u32 length prefix",
            )
        })?;
        let mut record = self.begin_record(len)?;
        write_all(&mut record, payload)?;
        record.close()?;
        Ok(())
    }

    /// Flush the underlying stream
    pub fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }

    /// Get a reference to the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}

/// Reads length-prefixed records from an underlying stream
pub struct RecordReader<S: RawStream> {
    stream: S,
}

impl<S: RawStream> RecordReader<S> {
    /// Start reading records from `stream` at its current position
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Read the next length prefix and return a window over the payload.
    ///
    /// Returns `None` on a clean end-of-stream at a record boundary. A
    /// prefix cut short mid-way fails with
    /// [`io::ErrorKind::UnexpectedEof`]. Dropping the window advances the
    /// stream to the next record, read or not.
    pub fn next_record(&mut self) -> io::Result<Option<SubStream<&mut S>>> {
        let mut prefix = [0u8; PREFIX_LEN];
        let mut filled = 0;
        while filled < PREFIX_LEN {
            let count = self.stream.read(&mut prefix[filled..])?;
            if count == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "record length prefix was cut short",
                ));
            }
            filled += count;
        }
        let len = u32::from_le_bytes(prefix);
        Ok(Some(SubStream::new(&mut self.stream, len as u64, false)))
    }

    /// Collect the next record's payload into memory
    pub fn read_record(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut record = match self.next_record()? {
            Some(record) => record,
            None => return Ok(None),
        };
        let expected = record.len();
        let mut payload = Vec::with_capacity(expected as usize);
        let mut chunk = [0u8; 4096];
        loop {
            let count = record.read(&mut chunk)?;
            if count == 0 {
                break;
            }
            payload.extend_from_slice(&chunk[..count]);
        }
        record.close()?;
        if (payload.len() as u64) < expected {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "record payload was cut short",
            ));
        }
        Ok(Some(payload))
    }

    /// Unwrap the underlying stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}

fn write_all<S: RawStream>(stream: &mut S, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        let count = stream.write(buf)?;
        if count == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                "failed to write whole record",
            ));
        }
        buf = &buf[count..];
    }
    Ok(())
}
