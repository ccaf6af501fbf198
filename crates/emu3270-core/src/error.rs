//! Error taxonomy with actionable suggestions.
//!
//! Validation errors (`InvalidArgument`, `ArgumentOutOfRange`,
//! `InvalidCharacter`) are raised before anything is written to the emulator.
//! `CommandFailed` means the emulator ran the command and reported failure.
//! Transport errors mean the channel itself is unusable.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes, suitable for machine consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    ArgumentOutOfRange,
    InvalidCharacter,
    CommandFailed,
    TransportError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            ErrorCode::ArgumentOutOfRange => write!(f, "ARGUMENT_OUT_OF_RANGE"),
            ErrorCode::InvalidCharacter => write!(f, "INVALID_CHARACTER"),
            ErrorCode::CommandFailed => write!(f, "COMMAND_FAILED"),
            ErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
        }
    }
}

/// Errors raised by the protocol layer and the session.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied value violates the protocol grammar.
    #[error("invalid {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A numeric or positional argument is outside its legal range.
    #[error("{name} {value} is out of range ({min}..={max})")]
    ArgumentOutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Text contains a control character that has no protocol escape.
    #[error("text contains control character(s): {text:?}")]
    InvalidCharacter { text: String },

    /// The emulator executed the command and reported failure.
    #[error("command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Reading from or writing to the emulator failed.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The emulator closed the channel, or an earlier transport error
    /// left it unusable.
    #[error("transport closed")]
    TransportClosed,
}

impl Error {
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    pub fn out_of_range(name: &'static str, value: impl Into<i64>, min: i64, max: i64) -> Self {
        Self::ArgumentOutOfRange {
            name,
            value: value.into(),
            min,
            max,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Error::ArgumentOutOfRange { .. } => ErrorCode::ArgumentOutOfRange,
            Error::InvalidCharacter { .. } => ErrorCode::InvalidCharacter,
            Error::CommandFailed { .. } => ErrorCode::CommandFailed,
            Error::Transport(_) | Error::TransportClosed => ErrorCode::TransportError,
        }
    }

    /// A hint describing how to recover from this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Error::InvalidArgument { .. } => {
                "Check the value against the protocol grammar (no '/', '@' or ',' in host names)"
            }
            Error::ArgumentOutOfRange { .. } => {
                "PF keys are 1-24, PA keys are 1-3; rows and columns start at the session origin"
            }
            Error::InvalidCharacter { .. } => {
                "Only CR, LF, BS, FF and TAB can be sent; strip other control characters"
            }
            Error::CommandFailed { .. } => {
                "The session is still usable; inspect the message and retry"
            }
            Error::Transport(_) | Error::TransportClosed => {
                "The emulator channel is gone; open a new session"
            }
        }
    }

    /// True when the session can no longer be used.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::TransportClosed)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
