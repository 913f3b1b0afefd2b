//! Streaming HTTP/1.1 response head writer.
//!
//! [`ResponseWriter`] appends a status line, header fields, and the block
//! terminator into an inline buffer of `N` bytes, then hands the buffer
//! out in chunks for transmission. Nothing is allocated and no I/O is
//! performed.
//!
//! ```
//! use milli_h1::{ResponseWriter, StatusCode, WriteState};
//!
//! let mut writer: ResponseWriter<256> = ResponseWriter::new();
//! writer.add_status_code(StatusCode::OK).unwrap();
//! writer.add_header(b"content-length", b"0").unwrap();
//! writer.end_headers().unwrap();
//!
//! let mut sent = 0;
//! loop {
//!     let chunk = writer.send_window(8);
//!     if chunk.is_empty() {
//!         break;
//!     }
//!     let n = chunk.len(); // a real caller writes `chunk` to its socket
//!     sent += n;
//!     writer.mark_read(n);
//! }
//! assert_eq!(writer.state(), WriteState::Done);
//! assert_eq!(sent, "HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n".len());
//! ```
//!
//! The message body is the caller's concern; the writer stops at the
//! terminating CRLF CRLF.

use crate::error::ComposeError;
use crate::status::StatusCode;
use crate::{CRLF, RESPONSE_BUF_DEFAULT, RESPONSE_BUF_MIN, SP};

/// Writer phase. Progression is strictly forward between resets:
/// `Ready → WritingHeaders → Composed → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    /// Nothing written yet; awaiting the status line.
    Ready,
    /// Status line written; header fields may be appended.
    WritingHeaders,
    /// Header block terminated; buffer ready for transmission.
    Composed,
    /// Every composed byte has been handed out.
    Done,
}

/// Streaming response head writer with `N` bytes of inline storage.
///
/// `N` must be at least [`RESPONSE_BUF_MIN`] so every standard status line
/// fits, and must fit a 16-bit cursor; both are checked at compile time.
pub struct ResponseWriter<const N: usize = { RESPONSE_BUF_DEFAULT }> {
    state: WriteState,
    buf: [u8; N],
    /// Bytes appended so far.
    len: u16,
    /// Bytes already handed out for transmission.
    read: u16,
}

impl<const N: usize> ResponseWriter<N> {
    pub fn new() -> Self {
        const {
            assert!(
                N >= RESPONSE_BUF_MIN,
                "response buffer must hold the longest standard status line"
            );
            assert!(N <= u16::MAX as usize, "capacity must fit a 16-bit cursor");
        }
        Self {
            state: WriteState::Ready,
            buf: [0; N],
            len: 0,
            read: 0,
        }
    }

    /// Total buffer capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes appended so far.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn state(&self) -> WriteState {
        self.state
    }

    /// Composed bytes not yet handed out for transmission.
    pub fn remaining(&self) -> usize {
        (self.len - self.read) as usize
    }

    /// Return to [`WriteState::Ready`]. With `zero_buffer`, every buffer
    /// byte is cleared so no response data survives the reuse.
    pub fn reset(&mut self, zero_buffer: bool) {
        if zero_buffer {
            self.buf.fill(0);
        }
        self.state = WriteState::Ready;
        self.len = 0;
        self.read = 0;
    }

    // ------------------------------------------------------------------
    // Composition
    // ------------------------------------------------------------------

    /// Write the status line `HTTP/1.1 <code> <reason>\r\n`.
    ///
    /// Valid only in `Ready`. The code is rendered as exactly three decimal
    /// digits; callers pass a value in `100..=599`. There is no capacity
    /// check: the [`RESPONSE_BUF_MIN`] floor guarantees room for every
    /// standard reason phrase, and an oversized custom phrase is clamped at
    /// the buffer end.
    pub fn add_status(&mut self, code: u16, reason: &[u8]) -> Result<(), ComposeError> {
        if self.state != WriteState::Ready {
            return Err(ComposeError::BadState);
        }
        self.append(b"HTTP/1.1 ");
        self.append(&StatusCode(code).as_digits());
        self.append(&[SP]);
        self.append(reason);
        self.append(CRLF);
        self.state = WriteState::WritingHeaders;
        Ok(())
    }

    /// Write the status line with the canonical reason phrase for `code`.
    pub fn add_status_code(&mut self, code: StatusCode) -> Result<(), ComposeError> {
        self.add_status(code.0, code.reason())
    }

    /// Append `name: value\r\n`.
    ///
    /// Valid only in `WritingHeaders`. The capacity check reserves the
    /// `": "` separator, this field's CRLF, and the final terminator CRLF,
    /// so [`end_headers`](Self::end_headers) can never run out of room.
    /// Names and values are not validated and duplicates are not detected;
    /// callers may pre-validate with
    /// [`is_header_name_valid`](crate::is_header_name_valid) and
    /// [`is_header_value_valid`](crate::is_header_value_valid).
    pub fn add_header(&mut self, name: &[u8], value: &[u8]) -> Result<(), ComposeError> {
        if self.state != WriteState::WritingHeaders {
            return Err(ComposeError::BadState);
        }
        let field = name.len() + 2 + value.len() + 2;
        if self.len as usize + field + CRLF.len() > N {
            return Err(ComposeError::InsufficientCapacity);
        }
        self.append(name);
        self.append(b": ");
        self.append(value);
        self.append(CRLF);
        Ok(())
    }

    /// Terminate the header block. The head is now complete and the buffer
    /// becomes readable through [`send_window`](Self::send_window).
    pub fn end_headers(&mut self) -> Result<(), ComposeError> {
        if self.state != WriteState::WritingHeaders {
            return Err(ComposeError::BadState);
        }
        self.append(CRLF);
        self.state = WriteState::Composed;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Chunk handoff
    // ------------------------------------------------------------------

    /// Borrow the next unread chunk of the composed head, at most `desired`
    /// bytes. Empty outside `Composed`. After transmitting `n` bytes of
    /// it, commit them with [`mark_read`](Self::mark_read).
    pub fn send_window(&self, desired: usize) -> &[u8] {
        if self.state != WriteState::Composed {
            return &[];
        }
        let start = self.read as usize;
        let end = start + desired.min(self.len as usize - start);
        &self.buf[start..end]
    }

    /// Commit `n` transmitted bytes. Once everything composed has been
    /// handed out the writer becomes `Done`. Committing more than the
    /// window handed out is a caller bug; the count is clamped.
    pub fn mark_read(&mut self, n: usize) {
        if self.state != WriteState::Composed {
            return;
        }
        self.read = (self.read as usize + n).min(self.len as usize) as u16;
        if self.read == self.len {
            self.state = WriteState::Done;
        }
    }

    /// Append with clamping; only `add_status` can hit the clamp, and only
    /// with an oversized custom reason phrase.
    fn append(&mut self, bytes: &[u8]) {
        let start = self.len as usize;
        let n = bytes.len().min(N - start);
        self.buf[start..start + n].copy_from_slice(&bytes[..n]);
        self.len = (start + n) as u16;
    }
}

impl<const N: usize> Default for ResponseWriter<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
