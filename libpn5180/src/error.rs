// libpn5180-rs/libpn5180/src/error.rs

use thiserror::Error;

/// Common error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A transport primitive reported a negative status.
    #[error("{operation} failed with error code {code}")]
    Transport { operation: &'static str, code: i32 },

    #[error("frame format error: {0}")]
    FrameFormat(String),

    /// No tag answered within the protocol window.
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("BCC mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("wrong cascade tag at level {level}: expected {expected:#04x}, got {actual:#04x}")]
    CascadeTagMismatch { level: usize, expected: u8, actual: u8 },

    #[error("{what} {value} is not a multiple of the {block_size}-byte block size")]
    Misaligned {
        what: &'static str,
        value: usize,
        block_size: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The tag set the error flag in its response.
    #[error("ISO 15693 command {command:#04x} failed with error code {error_code:#04x}")]
    TagStatus {
        command: u8,
        error_code: u8,
        response: Vec<u8>,
    },

    #[error("memory write failed at offset {offset} with error code {error_code:#04x}")]
    MemoryWrite {
        offset: usize,
        error_code: u8,
        response: Vec<u8>,
    },

    #[error("communication session is no longer active")]
    SessionInactive,
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Timeout,
    Malformed,
    TagReported,
    MemoryWrite,
    Session,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } | Error::FrameFormat(_) => ErrorKind::Transport,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::InvalidLength { .. }
            | Error::ChecksumMismatch { .. }
            | Error::CascadeTagMismatch { .. }
            | Error::Misaligned { .. }
            | Error::InvalidArgument(_) => ErrorKind::Malformed,
            Error::TagStatus { .. } => ErrorKind::TagReported,
            Error::MemoryWrite { .. } => ErrorKind::MemoryWrite,
            Error::SessionInactive => ErrorKind::Session,
        }
    }

    /// Only timeouts are worth re-polling for.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

pub type Result<T> = std::result::Result<T, Error>;
