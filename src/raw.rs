//! The capability seam between storage code and concrete byte streams.
//!
//! [`RawStream`] describes a synchronous byte stream by what it can do at
//! runtime rather than by a type hierarchy: readers report `can_read`,
//! writers `can_write`, random-access media `can_seek`. Everything a
//! stream does not support fails with [`std::io::ErrorKind::Unsupported`].
//!
//! [`SubStream`](crate::SubStream) consumes this trait for its parent, so
//! any reader, writer or file can sit under a bounded window. The
//! [`ReadOnly`] and [`WriteOnly`] adapters lift plain [`Read`]/[`Write`]
//! values (sockets, pipes, compressors) into the trait with only the
//! capability they actually have.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

pub(crate) fn unsupported(op: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("stream does not support {}", op),
    )
}

/// A synchronous byte stream with runtime-queryable capabilities.
///
/// Every operation has a default that reports the matching capability as
/// absent, so implementations only write out the surface they support.
pub trait RawStream {
    /// Whether the stream can serve reads
    fn can_read(&self) -> bool {
        false
    }

    /// Whether the stream accepts writes
    fn can_write(&self) -> bool {
        false
    }

    /// Whether the stream supports seeking and position queries
    fn can_seek(&self) -> bool {
        false
    }

    /// Read up to `buf.len()` bytes, returning the number read
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(unsupported("read"))
    }

    /// Write up to `buf.len()` bytes, returning the number written
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(unsupported("write"))
    }

    /// Move the cursor and return the new absolute position
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(unsupported("seek"))
    }

    /// Flush buffered writes through to the underlying medium
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Total length of the stream in bytes
    fn byte_len(&mut self) -> io::Result<u64> {
        Err(unsupported("length queries"))
    }

    /// Current absolute cursor position
    fn position(&mut self) -> io::Result<u64> {
        Err(unsupported("position queries"))
    }

    /// Grow or truncate the stream to `len` bytes
    fn set_byte_len(&mut self, _len: u64) -> io::Result<()> {
        Err(unsupported("resizing"))
    }
}

impl<S: RawStream + ?Sized> RawStream for &mut S {
    fn can_read(&self) -> bool {
        (**self).can_read()
    }

    fn can_write(&self) -> bool {
        (**self).can_write()
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        (**self).seek(pos)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn byte_len(&mut self) -> io::Result<u64> {
        (**self).byte_len()
    }

    fn position(&mut self) -> io::Result<u64> {
        (**self).position()
    }

    fn set_byte_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_byte_len(len)
    }
}

impl<S: RawStream + ?Sized> RawStream for Box<S> {
    fn can_read(&self) -> bool {
        (**self).can_read()
    }

    fn can_write(&self) -> bool {
        (**self).can_write()
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        (**self).seek(pos)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn byte_len(&mut self) -> io::Result<u64> {
        (**self).byte_len()
    }

    fn position(&mut self) -> io::Result<u64> {
        (**self).position()
    }

    fn set_byte_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_byte_len(len)
    }
}

impl RawStream for File {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(self, buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(self, pos)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }

    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn position(&mut self) -> io::Result<u64> {
        self.stream_position()
    }

    fn set_byte_len(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

impl RawStream for Cursor<Vec<u8>> {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(self, buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(self, pos)
    }

    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }

    fn position(&mut self) -> io::Result<u64> {
        Ok(Cursor::position(self))
    }

    fn set_byte_len(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().resize(len as usize, 0);
        Ok(())
    }
}

/// Adapter exposing only the read capability of an inner reader
pub struct ReadOnly<R> {
    inner: R,
}

impl<R: Read> ReadOnly<R> {
    /// Wrap a reader as a read-only stream
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner reader
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Get a mutable reference to the inner reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the inner reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> RawStream for ReadOnly<R> {
    fn can_read(&self) -> bool {
        true
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Adapter exposing only the write capability of an inner writer
pub struct WriteOnly<W> {
    inner: W,
}

impl<W: Write> WriteOnly<W> {
    /// Wrap a writer as a write-only stream
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Get a mutable reference to the inner writer
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Unwrap the inner writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> RawStream for WriteOnly<W> {
    fn can_write(&self) -> bool {
        true
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
