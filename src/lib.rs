//! Zero-allocation HTTP/1.1 head codec.
//!
//! Two independent sans-io engines, each a plain value with embedded
//! fixed-capacity storage:
//!
//! - [`RequestParser`] incrementally parses a request line and header block
//!   into an inline buffer and exposes the method, request-target, and
//!   header fields as borrowed slices of that same buffer.
//! - [`ResponseWriter`] sequentially appends a status line and header block
//!   into an inline buffer, then hands the buffer out in chunks for
//!   transmission.
//!
//! Neither engine performs I/O, allocates, or blocks. All transfer goes
//! through the chunk-handoff contract: borrow a window into the engine's
//! buffer ([`RequestParser::recv_window`] / [`ResponseWriter::send_window`]),
//! move bytes between it and the transport, then commit the transferred
//! count ([`RequestParser::ingest`] / [`ResponseWriter::mark_read`]).
//! Message bodies are not parsed; the bytes trailing the header block are
//! handed back verbatim via [`RequestParser::buffer_fragment`].

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod chars;
pub mod error;
pub mod method;
pub mod request;
pub mod response;
pub mod status;

pub use chars::{is_header_name_valid, is_header_value_valid};
pub use error::ComposeError;
pub use method::Method;
pub use request::{ParseState, RequestParser};
pub use response::{ResponseWriter, WriteState};
pub use status::StatusCode;

//
//
//
pub const SP: u8 = b' ';
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';
pub const COLON: u8 = b':';
pub const CRLF: &[u8] = b"\r\n";
pub const HTTP_VERSION_11: &[u8] = b"HTTP/1.1";

/// Upper bound on header fields per request; one more is a parse failure.
pub const MAX_HEADER_COUNT: usize = 32;

/// Default request head buffer capacity in bytes.
pub const REQUEST_BUF_DEFAULT: usize = 2048;

/// Default response head buffer capacity in bytes.
pub const RESPONSE_BUF_DEFAULT: usize = 2048;

/// Smallest usable response buffer: `"HTTP/1.1 "` plus the longest standard
/// status line plus its CRLF. Enforced at compile time by
/// [`ResponseWriter::new`].
pub const RESPONSE_BUF_MIN: usize = 52;
