//! Core types and logic for emu3270.
//!
//! This crate holds everything about the 3270 emulator scripting interface
//! that does not need I/O: turning caller input into command lines and
//! turning response lines into results. The session and transports live in
//! `emu3270-client`.
//!
//! # Modules
//!
//! - [`quote`]: quoting of free text as an action argument
//! - [`host`]: connection flags and `Connect` host strings
//! - [`command`]: typed command lines
//! - [`action`]: validated builders for each supported action
//! - [`protocol`]: response parsing (`IoResult`, status line)
//! - [`config`]: per-session configuration
//! - [`error`]: error taxonomy
//!
//! # Wire format
//!
//! | Direction | Form |
//! |-----------|------|
//! | command | `MoveCursor(0,4) String("hello world")` |
//! | response | `data: ...` lines, status line, `ok` or `error` |
//! | host spec | `"L:N:lu1,lu2@[1::2]:port"` (quoted as a whole when it contains a comma) |

pub mod action;
pub mod command;
pub mod config;
pub mod error;
pub mod host;
pub mod protocol;
pub mod quote;

pub use command::{Action, Command};
pub use config::{Origin, SessionConfig};
pub use error::{Error, ErrorCode, Result};
pub use host::ConnectFlags;
pub use protocol::{IoResult, StatusLine};
