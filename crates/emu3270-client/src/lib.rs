//! Sessions with a 3270 emulator over its scripting interface.
//!
//! [`Session`] is the async surface and [`BlockingSession`] the synchronous
//! one. Both talk to the emulator through a [`Transport`]: the emulator's
//! script port over TCP, or the stdin/stdout of a child process.
//!
//! ```no_run
//! use emu3270_client::{BlockingSession, SessionConfig, DEFAULT_EMULATOR};
//!
//! # fn main() -> emu3270_client::Result<()> {
//! let config = SessionConfig::new().with_exception_mode(true);
//! let mut session = BlockingSession::start_process(DEFAULT_EMULATOR, ["-utf8"], config)?;
//! session.connect("mainframe.example.com", None, &["LU1"], None)?;
//! session.wait_for_field()?;
//! session.string_at(10, 20, "userid", true, true)?;
//! session.enter()?;
//! for line in session.ascii()?.result {
//!     println!("{line}");
//! }
//! session.close()
//! # }
//! ```

pub mod session;

pub use emu3270_core::action::StringAtBlock;
pub use emu3270_core::{
    Action, Command, ConnectFlags, Error, ErrorCode, IoResult, Origin, Result, SessionConfig,
    StatusLine,
};
pub use session::blocking::BlockingSession;
pub use session::transport::{LineTransport, ProcessTransport, TcpTransport, Transport};
pub use session::{Session, DEFAULT_EMULATOR};
