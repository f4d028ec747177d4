//! A bounded window over a parent stream.
//!
//! [`SubStream`] wraps an existing [`RawStream`] and restricts every
//! operation to a fixed-length range starting at the parent's position at
//! construction time. Closing the window leaves the parent's cursor
//! exactly past the window's end (seeking, draining or zero-padding the
//! unconsumed tail), which lets consecutive windows be chained
//! back-to-back over one shared stream. That is what makes it suitable
//! for processing length-prefixed payloads without any offset bookkeeping
//! in the caller; see [`framing`](crate::framing).

use std::io::{self, Read, Seek, SeekFrom, Write};

use tracing::warn;

use crate::error::SubstreamError;
use crate::raw::{unsupported, RawStream};

/// Chunk size used when draining or padding the window tail on close.
const TAIL_CHUNK: usize = 4096;

/// A fixed-length window onto a parent stream.
///
/// The window exposes its own address space `0..len`: reads clamp at the
/// window end, writes beyond it are rejected (or clamped, see
/// [`set_strict_writes`](SubStream::set_strict_writes)) and seeks resolve
/// relative to the window. The parent must not be touched directly while
/// a window over it is live, since both sides track the shared cursor.
///
/// `closes_parent` picks the disposal policy: `true` drops the parent on
/// close, `false` advances the parent past the window's remaining bytes
/// so the next consumer resumes right after it. Pass `&mut parent` to get
/// the parent back after the window is gone, or an owned parent together
/// with [`into_parent`](SubStream::into_parent).
pub struct SubStream<S: RawStream> {
    parent: Option<S>,
    len: u64,
    pos: u64,
    closes_parent: bool,
    strict_writes: bool,
}

impl<S: RawStream> SubStream<S> {
    /// Open a window of exactly `len` bytes at the parent's current position.
    pub fn new(parent: S, len: u64, closes_parent: bool) -> Self {
        Self {
            parent: Some(parent),
            len,
            pos: 0,
            closes_parent,
            strict_writes: true,
        }
    }

    /// Open a window spanning everything left in the parent.
    ///
    /// Requires a parent that reports length and position; forward-only
    /// streams fail with [`io::ErrorKind::Unsupported`].
    pub fn from_remaining(mut parent: S, closes_parent: bool) -> io::Result<Self> {
        let len = parent.byte_len()?;
        let pos = parent.position()?;
        Ok(Self::new(parent, len.saturating_sub(pos), closes_parent))
    }

    /// Window length in bytes, fixed at construction
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the window is zero bytes long
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor position within the window
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Bytes left between the cursor and the window end
    pub fn remaining(&self) -> u64 {
        self.len - self.pos
    }

    /// Whether the close policy drops the parent
    pub fn closes_parent(&self) -> bool {
        self.closes_parent
    }

    /// Whether writes crossing the window end are rejected
    pub fn strict_writes(&self) -> bool {
        self.strict_writes
    }

    /// Switch between rejecting (`true`, the default) and clamping
    /// (`false`) writes that would cross the window end.
    pub fn set_strict_writes(&mut self, strict: bool) {
        self.strict_writes = strict;
    }

    /// Whether the window can serve reads; `false` once closed
    pub fn can_read(&self) -> bool {
        self.parent.as_ref().map_or(false, |p| p.can_read())
    }

    /// Whether the window accepts writes; `false` once closed
    pub fn can_write(&self) -> bool {
        self.parent.as_ref().map_or(false, |p| p.can_write())
    }

    /// Whether the window supports seeking; `false` once closed
    pub fn can_seek(&self) -> bool {
        self.parent.as_ref().map_or(false, |p| p.can_seek())
    }

    fn parent_mut(&mut self) -> io::Result<&mut S> {
        match self.parent.as_mut() {
            Some(parent) => Ok(parent),
            None => Err(SubstreamError::Disposed.into()),
        }
    }

    /// Read up to `buf.len()` bytes, never crossing the window end.
    ///
    /// Returns `Ok(0)` once the cursor sits at the window end, without
    /// touching the parent.
    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        let parent = self.parent_mut()?;
        if remaining == 0 {
            return Ok(0);
        }
        let want = remaining.min(buf.len() as u64) as usize;
        let count = parent.read(&mut buf[..want])?;
        self.pos += count as u64;
        Ok(count)
    }

    /// Read a single byte; `None` at the window end or parent end-of-data.
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let remaining = self.remaining();
        let parent = self.parent_mut()?;
        if remaining == 0 {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        if parent.read(&mut byte)? == 0 {
            return Ok(None);
        }
        self.pos += 1;
        Ok(Some(byte[0]))
    }

    /// Write up to `buf.len()` bytes inside the window.
    ///
    /// A write that would cross the window end fails with
    /// [`SubstreamError::WriteBeyondWindow`] while `strict_writes` is set,
    /// and is clamped to the remaining space otherwise.
    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let remaining = self.remaining();
        let strict = self.strict_writes;
        let parent = self.parent_mut()?;
        if !parent.can_write() {
            return Err(unsupported("write"));
        }
        let want = if buf.len() as u64 > remaining {
            if strict {
                return Err(SubstreamError::WriteBeyondWindow {
                    count: buf.len(),
                    remaining,
                }
                .into());
            }
            remaining as usize
        } else {
            buf.len()
        };
        let count = parent.write(&buf[..want])?;
        self.pos += count as u64;
        Ok(count)
    }

    /// Seek within the window; `origin` resolves against the window, not
    /// the parent.
    ///
    /// The window end itself is not a reachable position, so
    /// `SeekFrom::End(0)` fails with an out-of-bounds error. This mirrors
    /// the position contract and is pinned by tests rather than relaxed.
    pub fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if self.parent.is_none() {
            return Err(SubstreamError::Disposed.into());
        }
        if !self.can_seek() {
            return Err(unsupported("seek"));
        }
        let target = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(offset) => self.resolve_offset(self.pos, offset)?,
            SeekFrom::End(offset) => self.resolve_offset(self.len, offset)?,
        };
        self.set_position(target)?;
        Ok(self.pos)
    }

    fn resolve_offset(&self, base: u64, offset: i64) -> io::Result<u64> {
        let target = (base as i64).checked_add(offset);
        match target {
            Some(target) if target >= 0 => Ok(target as u64),
            _ => Err(SubstreamError::OutOfBounds { len: self.len }.into()),
        }
    }

    /// Move the cursor to an absolute window position in `0..len`,
    /// dragging the parent's cursor along by the same delta.
    pub fn set_position(&mut self, value: u64) -> io::Result<()> {
        let len = self.len;
        let pos = self.pos;
        let parent = self.parent_mut()?;
        if value >= len {
            return Err(SubstreamError::OutOfBounds { len }.into());
        }
        parent.seek(SeekFrom::Current(value as i64 - pos as i64))?;
        self.pos = value;
        Ok(())
    }

    /// Flush buffered writes through the parent.
    pub fn flush(&mut self) -> io::Result<()> {
        self.parent_mut()?.flush()
    }

    /// Close the window and apply the parent policy.
    ///
    /// With `closes_parent` the parent is dropped. Otherwise the parent is
    /// advanced past the window's unconsumed tail: by a relative seek when
    /// it can seek, by reading and discarding when it can only read, or by
    /// writing zeros when it can only write (reserving the unwritten space
    /// so later data lands at the right offset). Closing twice is a no-op.
    pub fn close(&mut self) -> io::Result<()> {
        let mut parent = match self.parent.take() {
            Some(parent) => parent,
            None => return Ok(()),
        };
        if self.closes_parent {
            return Ok(());
        }
        let remaining = self.len - self.pos;
        if remaining == 0 {
            return Ok(());
        }
        advance_past(&mut parent, remaining)
    }

    /// Close the window and hand the parent back, advanced past the
    /// window's end regardless of the `closes_parent` policy.
    pub fn into_parent(mut self) -> io::Result<S> {
        let mut parent = match self.parent.take() {
            Some(parent) => parent,
            None => return Err(SubstreamError::Disposed.into()),
        };
        let remaining = self.len - self.pos;
        if remaining > 0 {
            advance_past(&mut parent, remaining)?;
        }
        Ok(parent)
    }
}

/// Moves the parent cursor `remaining` bytes forward without crossing the
/// window boundary, picking the cheapest capability available.
fn advance_past<S: RawStream>(parent: &mut S, mut remaining: u64) -> io::Result<()> {
    if parent.can_seek() {
        parent.seek(SeekFrom::Current(remaining as i64))?;
    } else if parent.can_read() {
        let mut chunk = [0u8; TAIL_CHUNK];
        while remaining > 0 {
            let want = remaining.min(TAIL_CHUNK as u64) as usize;
            let count = parent.read(&mut chunk[..want])?;
            if count == 0 {
                break; // parent ended before the window did
            }
            remaining -= count as u64;
        }
    } else if parent.can_write() {
        let chunk = [0u8; TAIL_CHUNK];
        while remaining > 0 {
            let want = remaining.min(TAIL_CHUNK as u64) as usize;
            let count = parent.write(&chunk[..want])?;
            if count == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to pad out the window tail",
                ));
            }
            remaining -= count as u64;
        }
    }
    Ok(())
}

impl<S: RawStream> std::fmt::Debug for SubStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubStream")
            .field("len", &self.len)
            .field("pos", &self.pos)
            .field("closes_parent", &self.closes_parent)
            .field("strict_writes", &self.strict_writes)
            .finish_non_exhaustive()
    }
}

impl<S: RawStream> Drop for SubStream<S> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "failed to close substream window");
        }
    }
}

impl<S: RawStream> RawStream for SubStream<S> {
    fn can_read(&self) -> bool {
        SubStream::can_read(self)
    }

    fn can_write(&self) -> bool {
        SubStream::can_write(self)
    }

    fn can_seek(&self) -> bool {
        SubStream::can_seek(self)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        SubStream::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SubStream::write(self, buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        SubStream::seek(self, pos)
    }

    fn flush(&mut self) -> io::Result<()> {
        SubStream::flush(self)
    }

    fn byte_len(&mut self) -> io::Result<u64> {
        Ok(self.len)
    }

    fn position(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }
}

impl<S: RawStream> Read for SubStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        SubStream::read(self, buf)
    }
}

impl<S: RawStream> Write for SubStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        SubStream::write(self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        SubStream::flush(self)
    }
}

impl<S: RawStream> Seek for SubStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        SubStream::seek(self, pos)
    }
}
