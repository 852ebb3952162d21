// SPDX-License-Identifier: MIT
//
// OutputBuffer — one frame, one write() syscall.
//
// Serializing a view produces many small pieces: escape fragments,
// UTF-8 characters, newlines. Writing each piece straight to the
// terminal costs a syscall per piece and lets half-drawn frames
// appear. Everything goes into this buffer first; a single flush at
// the end hands the terminal a complete frame.

use std::io::{self, Write};

/// Accumulates a frame's ANSI bytes for a single terminal write.
///
/// Starts with 8 KB of capacity — a full diff-compressed frame on a
/// typical terminal fits without reallocation. `clear` keeps the
/// allocation for the next frame.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 8192;

impl OutputBuffer {
    /// Create an empty buffer with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer holds no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Drop the contents, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write the accumulated frame to `w`, flush it, and clear.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op: real flushing happens through flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buf = OutputBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn write_trait_accumulates() {
        let mut buf = OutputBuffer::new();
        write!(buf, "frame {}", 7).unwrap();
        assert_eq!(buf.as_bytes(), b"frame 7");
        assert_eq!(buf.len(), 7);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = OutputBuffer::new();
        write!(buf, "content").unwrap();
        let cap = buf.buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.buf.capacity(), cap);
    }

    #[test]
    fn flush_to_drains_into_writer() {
        let mut buf = OutputBuffer::new();
        write!(buf, "payload").unwrap();

        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();

        assert_eq!(dest, b"payload");
        assert!(buf.is_empty());
    }

    #[test]
    fn flush_to_empty_writes_nothing() {
        let mut buf = OutputBuffer::new();
        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();
        assert!(dest.is_empty());
    }
}
