//! Error types for the shrink library.

use std::fmt;
use std::io;

/// Result type alias for shrink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding or decoding a stream.
#[derive(Debug)]
pub enum Error {
    /// The compressed input ended before decoding reached a token boundary.
    Truncated,
    /// The encoder could not reach its terminal state when finishing.
    ///
    /// This indicates an earlier sink failure left the state machine
    /// unable to make progress; the instance should be dropped.
    BadStateOnClose,
    /// Input was written to an encoder that has already been finished.
    WriteAfterFinish,
    /// The underlying source or sink reported an I/O error.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Truncated => {
                write!(f, "compressed stream ended before a token boundary")
            }
            Error::BadStateOnClose => {
                write!(f, "encoder state machine could not finish")
            }
            Error::WriteAfterFinish => {
                write!(f, "write into an encoder that was already finished")
            }
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Truncated => io::Error::new(io::ErrorKind::UnexpectedEof, err.to_string()),
            Error::BadStateOnClose | Error::WriteAfterFinish => {
                io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
            }
            Error::Io(inner) => inner,
        }
    }
}
