//! Emulator sessions.
//!
//! A [`Session`] owns one transport and one [`SessionConfig`]. Commands run
//! one at a time; each returns an [`IoResult`]. When exception mode is on, a
//! command the emulator rejects is turned into [`Error::CommandFailed`]
//! instead.

mod actions;
pub mod blocking;
pub mod dispatcher;
#[cfg(test)]
pub(crate) mod mock;
pub mod transport;

use std::ffi::OsStr;

use emu3270_core::command::Command;
use emu3270_core::config::SessionConfig;
use emu3270_core::error::{Error, Result};
use emu3270_core::host::{expand_host_name, ConnectFlags};
use emu3270_core::protocol::IoResult;
use tokio::net::ToSocketAddrs;

use crate::session::dispatcher::Dispatcher;
use crate::session::transport::{connect_tcp, ProcessTransport, Transport};

/// Default emulator program for [`Session::start_process`] callers.
pub const DEFAULT_EMULATOR: &str = "s3270";

/// An async session with an emulator.
pub struct Session {
    dispatcher: Dispatcher,
    config: SessionConfig,
}

impl Session {
    /// Wrap an already established transport.
    pub fn new(transport: impl Transport + 'static, config: SessionConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport),
            config,
        }
    }

    /// Connect to an emulator listening on a script port.
    pub async fn connect_port(addr: impl ToSocketAddrs, config: SessionConfig) -> Result<Self> {
        let transport = connect_tcp(addr).await?;
        Ok(Self::new(transport, config))
    }

    /// Start an emulator child process and talk to it over its stdin/stdout.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_process<I, S>(program: &str, args: I, config: SessionConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let transport = ProcessTransport::spawn(program, args)?;
        Ok(Self::new(transport, config))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn exception_mode(&self) -> bool {
        self.config.exception_mode
    }

    pub fn set_exception_mode(&mut self, exception_mode: bool) {
        self.config.exception_mode = exception_mode;
    }

    /// Run a command built with [`emu3270_core::action`] or by hand.
    pub async fn io(&mut self, command: &Command) -> Result<IoResult> {
        self.io_raw(&command.to_string()).await
    }

    /// Run a command line as-is. The caller is responsible for quoting.
    pub async fn io_raw(&mut self, command: &str) -> Result<IoResult> {
        let result = self.dispatcher.dispatch(command).await?;
        self.apply_exception_mode(result)
    }

    fn apply_exception_mode(&self, result: IoResult) -> Result<IoResult> {
        if result.success || !self.config.exception_mode {
            return Ok(result);
        }
        let message = result.error_message().unwrap_or_default();
        Err(Error::CommandFailed {
            command: result.command,
            message,
        })
    }

    /// Encode a `Connect` target, applying this session's default flags when
    /// `flags` is `None`.
    pub fn expand_host_name<S: AsRef<str>>(
        &self,
        host: &str,
        port: Option<&str>,
        lus: &[S],
        flags: Option<ConnectFlags>,
    ) -> Result<String> {
        expand_host_name(host, port, lus, flags, self.config.default_connect_flags)
    }

    /// Close the transport. For a child process this waits for it to exit.
    pub async fn close(mut self) -> Result<()> {
        self.dispatcher.close().await
    }
}
