//! Streaming HTTP/1.1 request head parser.
//!
//! [`RequestParser`] consumes bytes into an inline buffer of `N` bytes,
//! advancing a byte-at-a-time state machine, and exposes the parsed method,
//! request-target, and header fields as borrowed slices of that same
//! buffer. No byte is ever copied out and nothing is allocated.
//!
//! I/O happens outside the engine. The caller borrows the writable tail of
//! the buffer with [`RequestParser::recv_window`], fills it from its
//! transport, then commits the transferred count with
//! [`RequestParser::ingest`]:
//!
//! ```
//! use milli_h1::{ParseState, RequestParser};
//!
//! let mut parser: RequestParser<256> = RequestParser::new();
//! let request = b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n";
//!
//! let window = parser.recv_window(request.len());
//! window[..request.len()].copy_from_slice(request);
//! parser.ingest(request.len());
//!
//! assert_eq!(parser.state(), ParseState::Done);
//! assert_eq!(parser.method(), b"GET");
//! assert_eq!(parser.uri(), b"/index.html");
//! assert_eq!(parser.get_header(b"host"), Some(&b"example.com"[..]));
//! ```
//!
//! Bodies are not parsed: bytes past the terminating CRLF CRLF stay in the
//! buffer and are handed back via [`RequestParser::buffer_fragment`].

use heapless::Vec;

use crate::chars::{eq_ignore_case, is_header_name_char, is_header_value_char};
use crate::{COLON, CR, HTTP_VERSION_11, LF, MAX_HEADER_COUNT, REQUEST_BUF_DEFAULT, SP};

/// Parser phase.
///
/// The declaration order is meaningful: every state before
/// [`ParseState::Invalid`] is active (the machine still accepts bytes);
/// `Invalid` and `Done` are terminal until [`RequestParser::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParseState {
    /// No bytes ingested yet.
    Ready,
    /// Reading the request method.
    Method,
    /// Reading the request-target.
    Uri,
    /// Reading the protocol literal and its CRLF.
    Protocol,
    /// Reading a header field name, or the CRLF that ends the block.
    HeaderName,
    /// Reading a header field value.
    HeaderValue,
    /// The request was malformed. Terminal.
    Invalid,
    /// Request head fully parsed. Terminal.
    Done,
}

impl ParseState {
    /// True while the machine can still accept bytes.
    pub const fn is_active(self) -> bool {
        (self as u8) < (ParseState::Invalid as u8)
    }
}

/// A sub-range of the parser buffer.
#[derive(Debug, Clone, Copy, Default)]
struct Span {
    idx: u16,
    len: u16,
}

impl Span {
    /// Resolve against the buffer. A zero-length span resolves to the empty
    /// slice without touching `idx`.
    fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        if self.len == 0 {
            return &[];
        }
        let start = self.idx as usize;
        &buf[start..start + self.len as usize]
    }
}

/// Name and value spans for one header field.
#[derive(Debug, Clone, Copy, Default)]
struct FieldSpans {
    name: Span,
    value: Span,
}

/// Streaming request head parser with `N` bytes of inline storage.
///
/// `N` must fit a 16-bit cursor (checked at compile time). Requests whose
/// head exceeds `N` bytes cannot complete; the caller detects this as
/// `len() == capacity()` without reaching [`ParseState::Done`].
pub struct RequestParser<const N: usize = { REQUEST_BUF_DEFAULT }> {
    state: ParseState,
    buf: [u8; N],
    /// Bytes committed so far.
    len: u16,
    /// One past the terminating CRLF CRLF; zero until `Done`.
    headers_end: u16,
    method: Span,
    uri: Span,
    /// Field under construction, committed on its terminating LF.
    pending: FieldSpans,
    headers: Vec<FieldSpans, MAX_HEADER_COUNT>,
}

impl<const N: usize> RequestParser<N> {
    pub fn new() -> Self {
        const { assert!(N <= u16::MAX as usize, "capacity must fit a 16-bit cursor") }
        Self {
            state: ParseState::Ready,
            buf: [0; N],
            len: 0,
            headers_end: 0,
            method: Span::default(),
            uri: Span::default(),
            pending: FieldSpans::default(),
            headers: Vec::new(),
        }
    }

    /// Total buffer capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes committed into the buffer so far.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Whether the machine still accepts bytes.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Number of header fields parsed so far.
    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    /// Return to [`ParseState::Ready`]. With `zero_buffer`, every buffer
    /// byte is cleared so no request data survives the reuse.
    pub fn reset(&mut self, zero_buffer: bool) {
        if zero_buffer {
            self.buf.fill(0);
        }
        self.state = ParseState::Ready;
        self.len = 0;
        self.headers_end = 0;
        self.method = Span::default();
        self.uri = Span::default();
        self.pending = FieldSpans::default();
        self.headers.clear();
    }

    // ------------------------------------------------------------------
    // Chunk handoff
    // ------------------------------------------------------------------

    /// Borrow the writable tail of the buffer for the caller to fill.
    ///
    /// The window is at most `desired` bytes and aliases
    /// `buffer[len()..]`; it is empty once the parser is terminal or the
    /// buffer is full. After copying `n <= window.len()` bytes in, commit
    /// them with [`ingest`](Self::ingest). The borrow ends before `ingest`
    /// can run, so a stale window can never observe parsed state.
    pub fn recv_window(&mut self, desired: usize) -> &mut [u8] {
        if !self.state.is_active() {
            return &mut [];
        }
        let start = self.len as usize;
        let end = start + desired.min(N - start);
        &mut self.buf[start..end]
    }

    /// Commit `n` freshly written bytes and advance the state machine over
    /// them.
    ///
    /// `ingest(0)` signals end of input: a head that has not reached
    /// [`ParseState::Done`] is truncated and becomes
    /// [`ParseState::Invalid`]. Committing more than the window handed out
    /// by [`recv_window`](Self::recv_window) is a caller bug; the count is
    /// clamped to the buffer capacity.
    ///
    /// Once the machine goes terminal mid-window, the remaining bytes are
    /// kept but not interpreted; after `Done` they form the
    /// [`buffer_fragment`](Self::buffer_fragment).
    pub fn ingest(&mut self, n: usize) {
        if !self.state.is_active() {
            return;
        }
        if n == 0 {
            self.state = ParseState::Invalid;
            return;
        }
        if self.state == ParseState::Ready {
            self.state = ParseState::Method;
            self.method.idx = self.len;
        }
        let start = self.len as usize;
        let end = (start + n).min(N);
        for i in start..end {
            if !self.state.is_active() {
                break;
            }
            self.step(i);
        }
        self.len = end as u16;
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// The request method. Meaningful once the state is `Done`.
    pub fn method(&self) -> &[u8] {
        self.method.slice(&self.buf)
    }

    /// The request-target. Meaningful once the state is `Done`.
    pub fn uri(&self) -> &[u8] {
        self.uri.slice(&self.buf)
    }

    /// Look up a header value by name, ASCII case-insensitive. The first
    /// match in arrival order wins.
    pub fn get_header(&self, name: &[u8]) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|f| eq_ignore_case(f.name.slice(&self.buf), name))
            .map(|f| f.value.slice(&self.buf))
    }

    /// Iterate `(name, value)` pairs in arrival order, original name case
    /// preserved.
    pub fn headers(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.headers
            .iter()
            .map(|f| (f.name.slice(&self.buf), f.value.slice(&self.buf)))
    }

    /// Bytes past the header terminator: the start of the body, or the next
    /// pipelined request. Before `Done` this is everything buffered so far.
    pub fn buffer_fragment(&self) -> &[u8] {
        &self.buf[self.headers_end as usize..self.len as usize]
    }

    // ------------------------------------------------------------------
    // State machine
    // ------------------------------------------------------------------

    fn step(&mut self, i: usize) {
        let b = self.buf[i];
        // NUL is forbidden everywhere in the head.
        if b == 0 {
            self.state = ParseState::Invalid;
            return;
        }
        match self.state {
            ParseState::Method => {
                if b == SP {
                    self.state = ParseState::Uri;
                    self.uri.idx = (i + 1) as u16;
                } else {
                    self.method.len += 1;
                }
            }
            ParseState::Uri => {
                if b == SP {
                    self.state = ParseState::Protocol;
                } else {
                    self.uri.len += 1;
                }
            }
            ParseState::Protocol => self.step_protocol(i),
            ParseState::HeaderName => self.step_header_name(i, b),
            ParseState::HeaderValue => self.step_header_value(i, b),
            ParseState::Ready | ParseState::Invalid | ParseState::Done => {}
        }
    }

    /// The literal `HTTP/1.1\r\n` occupies the ten bytes after the SP that
    /// ended the URI; nothing is interpreted until its LF position.
    fn step_protocol(&mut self, i: usize) {
        let lf_at = self.uri.idx as usize + self.uri.len as usize + 10;
        if i < lf_at {
            return;
        }
        let line = &self.buf[lf_at - 9..=lf_at];
        if &line[..8] == HTTP_VERSION_11 && line[8] == CR && line[9] == LF {
            self.state = ParseState::HeaderName;
        } else {
            self.state = ParseState::Invalid;
        }
    }

    fn step_header_name(&mut self, i: usize, b: u8) {
        // A CR as the first byte of a field line starts the block
        // terminator; only its LF may follow.
        if self.prev(i) == CR {
            if b == LF {
                self.headers_end = (i + 1) as u16;
                self.state = ParseState::Done;
            } else {
                self.state = ParseState::Invalid;
            }
            return;
        }
        if b == CR && self.pending.name.len == 0 {
            return;
        }
        if b == COLON && self.pending.name.len > 0 {
            self.state = ParseState::HeaderValue;
            return;
        }
        if is_header_name_char(b) {
            if self.pending.name.len == 0 {
                if self.headers.is_full() {
                    self.state = ParseState::Invalid;
                    return;
                }
                self.pending.name.idx = i as u16;
            }
            self.pending.name.len += 1;
            return;
        }
        self.state = ParseState::Invalid;
    }

    fn step_header_value(&mut self, i: usize, b: u8) {
        // Once a CR is seen, only the LF that completes the field is legal.
        if self.prev(i) == CR {
            if b == LF {
                let _ = self.headers.push(self.pending);
                self.pending = FieldSpans::default();
                self.state = ParseState::HeaderName;
            } else {
                self.state = ParseState::Invalid;
            }
            return;
        }
        if b == CR {
            // Empty value keeps len == 0; idx is never read in that case.
            if self.pending.value.len == 0 {
                self.pending.value.idx = i as u16;
            }
            return;
        }
        if b == SP && self.pending.value.len == 0 {
            // Leading OWS, skipped.
            return;
        }
        if is_header_value_char(b) {
            if self.pending.value.len == 0 {
                self.pending.value.idx = i as u16;
            }
            self.pending.value.len += 1;
            return;
        }
        self.state = ParseState::Invalid;
    }

    fn prev(&self, i: usize) -> u8 {
        if i == 0 {
            0
        } else {
            self.buf[i - 1]
        }
    }
}

impl<const N: usize> Default for RequestParser<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<const N: usize>(p: &mut RequestParser<N>, bytes: &[u8]) {
        let window = p.recv_window(bytes.len());
        assert_eq!(window.len(), bytes.len(), "window too small for test input");
        window.copy_from_slice(bytes);
        p.ingest(bytes.len());
    }

    #[test]
    fn minimal_get() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\n\r\n");
        assert_eq!(p.state(), ParseState::Done);
        assert_eq!(p.method(), b"GET");
        assert_eq!(p.uri(), b"/");
        assert_eq!(p.header_count(), 0);
        assert!(p.buffer_fragment().is_empty());
    }

    #[test]
    fn first_ingest_leaves_ready() {
        let mut p: RequestParser<64> = RequestParser::new();
        assert_eq!(p.state(), ParseState::Ready);
        feed(&mut p, b"G");
        assert_eq!(p.state(), ParseState::Method);
    }

    #[test]
    fn wrong_protocol_rejected() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.0\r\n\r\n");
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn protocol_missing_crlf_rejected() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1XY");
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn nul_rejected_everywhere() {
        for request in [
            &b"G\0T / HTTP/1.1\r\n\r\n"[..],
            &b"GET /\0 HTTP/1.1\r\n\r\n"[..],
            &b"GET / HTTP\01.1\r\n\r\n"[..],
            &b"GET / HTTP/1.1\r\nHo\0t: a\r\n\r\n"[..],
            &b"GET / HTTP/1.1\r\nHost: \0\r\n\r\n"[..],
        ] {
            let mut p: RequestParser<64> = RequestParser::new();
            feed(&mut p, request);
            assert_eq!(p.state(), ParseState::Invalid, "accepted {request:?}");
        }
    }

    #[test]
    fn colon_before_name_rejected() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\n: v\r\n\r\n");
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn bad_name_char_rejected() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\nX-Foo!: v\r\n\r\n");
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn bad_value_char_rejected() {
        let mut p: RequestParser<128> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\nHost: a\x01b\r\n\r\n");
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn cr_without_lf_in_value_rejected() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\nHost: a\rb\r\n\r\n");
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn cr_without_lf_in_terminator_rejected() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\n\rX");
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn leading_spaces_stripped_from_value() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\nHost:    a b\r\n\r\n");
        assert_eq!(p.state(), ParseState::Done);
        assert_eq!(p.get_header(b"Host"), Some(&b"a b"[..]));
    }

    #[test]
    fn empty_value_accepted() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\nX-Empty:\r\n\r\n");
        assert_eq!(p.state(), ParseState::Done);
        assert_eq!(p.get_header(b"x-empty"), Some(&b""[..]));
    }

    #[test]
    fn empty_value_after_spaces_accepted() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\nX-Empty:   \r\n\r\n");
        assert_eq!(p.state(), ParseState::Done);
        assert_eq!(p.get_header(b"X-Empty"), Some(&b""[..]));
    }

    #[test]
    fn underscore_and_digits_in_name() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\nx_trace_9: ok\r\n\r\n");
        assert_eq!(p.state(), ParseState::Done);
        assert_eq!(p.get_header(b"X_TRACE_9"), Some(&b"ok"[..]));
    }

    #[test]
    fn header_ceiling_enforced() {
        let mut p: RequestParser<2048> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\n");
        for i in 0..MAX_HEADER_COUNT as u8 {
            let mut line = *b"h00: v\r\n";
            line[1] = b'0' + i / 10;
            line[2] = b'0' + i % 10;
            feed(&mut p, &line);
        }
        assert_eq!(p.state(), ParseState::HeaderName);
        assert_eq!(p.header_count(), MAX_HEADER_COUNT);
        // One more name byte tips it over.
        feed(&mut p, b"x");
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn truncation_is_invalid() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HT");
        assert!(p.is_active());
        p.ingest(0);
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn eof_after_done_is_ignored() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\n\r\n");
        p.ingest(0);
        assert_eq!(p.state(), ParseState::Done);
    }

    #[test]
    fn invalid_is_terminal() {
        let mut p: RequestParser<64> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.0\r\n");
        assert_eq!(p.state(), ParseState::Invalid);
        assert!(p.recv_window(16).is_empty());
        p.ingest(4);
        assert_eq!(p.state(), ParseState::Invalid);
    }

    #[test]
    fn window_shrinks_to_capacity() {
        let mut p: RequestParser<16> = RequestParser::new();
        assert_eq!(p.recv_window(64).len(), 16);
        feed(&mut p, b"GET /aaaaaa");
        assert_eq!(p.recv_window(64).len(), 5);
        feed(&mut p, b"bbbbb");
        assert_eq!(p.len(), 16);
        assert!(p.recv_window(64).is_empty());
        // Buffer full without Done: the head simply cannot fit.
        assert!(p.is_active());
        assert_ne!(p.state(), ParseState::Done);
    }

    #[test]
    fn reset_zeroes_on_request() {
        let mut p: RequestParser<32> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\n\r\n");
        p.reset(true);
        assert_eq!(p.state(), ParseState::Ready);
        assert_eq!(p.len(), 0);
        assert_eq!(p.header_count(), 0);
        assert!(p.recv_window(32).iter().all(|&b| b == 0));
    }

    #[test]
    fn reset_can_keep_bytes() {
        let mut p: RequestParser<32> = RequestParser::new();
        feed(&mut p, b"GET / HTTP/1.1\r\n\r\n");
        p.reset(false);
        assert_eq!(p.state(), ParseState::Ready);
        assert_eq!(p.len(), 0);
        assert_eq!(&p.recv_window(3)[..3], b"GET");
    }

    #[test]
    fn state_ordering_matches_activity() {
        assert!(ParseState::Ready.is_active());
        assert!(ParseState::HeaderValue.is_active());
        assert!(!ParseState::Invalid.is_active());
        assert!(!ParseState::Done.is_active());
        assert!(ParseState::Ready < ParseState::Invalid);
        assert!(ParseState::HeaderValue < ParseState::Invalid);
        assert!(ParseState::Invalid < ParseState::Done);
    }
}
