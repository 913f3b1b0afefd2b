/// Errors returned by [`ResponseWriter`](crate::ResponseWriter) operations.
///
/// Both are recoverable: the writer stays in its current phase and the
/// caller may retry with a different header, a larger buffer, or an
/// alternative response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeError {
    /// Operation attempted outside the phase it belongs to.
    BadState,
    /// Appending the header would not leave room for the terminating
    /// CRLF CRLF.
    InsufficientCapacity,
}

impl core::fmt::Display for ComposeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ComposeError::BadState => write!(f, "operation invalid in current state"),
            ComposeError::InsufficientCapacity => {
                write!(f, "header does not fit in remaining capacity")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ComposeError {}
