//! HTTP request methods (RFC 9110 §9).
//!
//! The parser itself treats the method as opaque bytes; this type is the
//! typed layer callers apply on top, e.g.
//! `Method::from_bytes(parser.method())`.

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
}

impl Method {
    /// Parse a method from its ASCII bytes. Case-sensitive, per RFC.
    pub fn from_bytes(b: &[u8]) -> Option<Self> {
        match b {
            b"GET" => Some(Self::GET),
            b"HEAD" => Some(Self::HEAD),
            b"POST" => Some(Self::POST),
            b"PUT" => Some(Self::PUT),
            b"DELETE" => Some(Self::DELETE),
            b"CONNECT" => Some(Self::CONNECT),
            b"OPTIONS" => Some(Self::OPTIONS),
            b"TRACE" => Some(Self::TRACE),
            b"PATCH" => Some(Self::PATCH),
            _ => None,
        }
    }

    /// The canonical spelling as ASCII bytes.
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::GET => b"GET",
            Self::HEAD => b"HEAD",
            Self::POST => b"POST",
            Self::PUT => b"PUT",
            Self::DELETE => b"DELETE",
            Self::CONNECT => b"CONNECT",
            Self::OPTIONS => b"OPTIONS",
            Self::TRACE => b"TRACE",
            Self::PATCH => b"PATCH",
        }
    }

    /// The canonical spelling as a string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::HEAD => "HEAD",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::CONNECT => "CONNECT",
            Self::OPTIONS => "OPTIONS",
            Self::TRACE => "TRACE",
            Self::PATCH => "PATCH",
        }
    }

    /// True for methods defined as read-only (RFC 9110 §9.2.1).
    pub const fn is_safe(&self) -> bool {
        matches!(self, Self::GET | Self::HEAD | Self::OPTIONS | Self::TRACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spellings_agree_across_representations() {
        let table: [(&[u8], Method); 5] = [
            (b"GET", Method::GET),
            (b"HEAD", Method::HEAD),
            (b"DELETE", Method::DELETE),
            (b"CONNECT", Method::CONNECT),
            (b"PATCH", Method::PATCH),
        ];
        for (bytes, want) in table {
            assert_eq!(Method::from_bytes(bytes), Some(want));
            assert_eq!(want.as_bytes(), bytes);
            assert_eq!(want.as_str().as_bytes(), bytes);
        }
    }

    #[test]
    fn near_misses_are_rejected() {
        for bytes in [&b"BREW"[..], b"get", b"GE", b"GETX", b" GET", b""] {
            assert_eq!(Method::from_bytes(bytes), None, "accepted {bytes:?}");
        }
    }

    #[test]
    fn exactly_the_four_safe_methods() {
        let safe = [Method::GET, Method::HEAD, Method::OPTIONS, Method::TRACE];
        let unsafe_ = [
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::CONNECT,
            Method::PATCH,
        ];
        for m in safe {
            assert!(m.is_safe(), "{} should be safe", m.as_str());
        }
        for m in unsafe_ {
            assert!(!m.is_safe(), "{} should not be safe", m.as_str());
        }
    }
}
