//! Blocking sessions.
//!
//! [`BlockingSession`] drives a [`Session`] on its own current-thread
//! runtime. Each call runs the same code as its async counterpart and
//! returns the same error, so callers match on [`Error`] variants directly.
//!
//! Do not use a `BlockingSession` from inside an async runtime; nested
//! `block_on` panics.

use std::ffi::OsStr;
use std::net::ToSocketAddrs;

use emu3270_core::action::StringAtBlock;
use emu3270_core::command::Command;
use emu3270_core::config::SessionConfig;
use emu3270_core::error::{Error, Result};
use emu3270_core::host::ConnectFlags;
use emu3270_core::protocol::IoResult;
use tokio::runtime::{Builder, Runtime};

use crate::session::transport::Transport;
use crate::session::Session;

/// A synchronous session with an emulator.
pub struct BlockingSession {
    // Dropped before the runtime.
    session: Session,
    runtime: Runtime,
}

fn runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Transport)
}

impl BlockingSession {
    pub fn new(transport: impl Transport + 'static, config: SessionConfig) -> Result<Self> {
        Ok(Self {
            runtime: runtime()?,
            session: Session::new(transport, config),
        })
    }

    /// Connect to an emulator listening on a script port.
    pub fn connect_port(addr: impl ToSocketAddrs, config: SessionConfig) -> Result<Self> {
        let addrs: Vec<_> = addr.to_socket_addrs()?.collect();
        let runtime = runtime()?;
        let session = runtime.block_on(Session::connect_port(&addrs[..], config))?;
        Ok(Self { runtime, session })
    }

    /// Start an emulator child process.
    pub fn start_process<I, S>(program: &str, args: I, config: SessionConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let runtime = runtime()?;
        let session = {
            let _guard = runtime.enter();
            Session::start_process(program, args, config)?
        };
        Ok(Self { runtime, session })
    }

    pub fn config(&self) -> &SessionConfig {
        self.session.config()
    }

    pub fn exception_mode(&self) -> bool {
        self.session.exception_mode()
    }

    pub fn set_exception_mode(&mut self, exception_mode: bool) {
        self.session.set_exception_mode(exception_mode);
    }

    pub fn io(&mut self, command: &Command) -> Result<IoResult> {
        self.runtime.block_on(self.session.io(command))
    }

    pub fn io_raw(&mut self, command: &str) -> Result<IoResult> {
        self.runtime.block_on(self.session.io_raw(command))
    }

    pub fn expand_host_name<S: AsRef<str>>(
        &self,
        host: &str,
        port: Option<&str>,
        lus: &[S],
        flags: Option<ConnectFlags>,
    ) -> Result<String> {
        self.session.expand_host_name(host, port, lus, flags)
    }

    pub fn enter(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.enter())
    }

    pub fn clear(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.clear())
    }

    pub fn pf(&mut self, n: u8) -> Result<IoResult> {
        self.runtime.block_on(self.session.pf(n))
    }

    pub fn pa(&mut self, n: u8) -> Result<IoResult> {
        self.runtime.block_on(self.session.pa(n))
    }

    pub fn string(&mut self, text: &str, quote_backslashes: bool) -> Result<IoResult> {
        self.runtime
            .block_on(self.session.string(text, quote_backslashes))
    }

    pub fn string_at(
        &mut self,
        row: u16,
        column: u16,
        text: &str,
        quote_backslashes: bool,
        erase_eof: bool,
    ) -> Result<IoResult> {
        self.runtime.block_on(
            self.session
                .string_at(row, column, text, quote_backslashes, erase_eof),
        )
    }

    pub fn string_at_blocks(
        &mut self,
        blocks: &[StringAtBlock],
        quote_backslashes: bool,
        erase_eof: bool,
    ) -> Result<IoResult> {
        self.runtime.block_on(
            self.session
                .string_at_blocks(blocks, quote_backslashes, erase_eof),
        )
    }

    pub fn move_cursor(&mut self, row: u16, column: u16) -> Result<IoResult> {
        self.runtime.block_on(self.session.move_cursor(row, column))
    }

    pub fn erase_eof(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.erase_eof())
    }

    pub fn tab(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.tab())
    }

    pub fn back_tab(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.back_tab())
    }

    pub fn home(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.home())
    }

    pub fn connect<S: AsRef<str>>(
        &mut self,
        host: &str,
        port: Option<&str>,
        lus: &[S],
        flags: Option<ConnectFlags>,
    ) -> Result<IoResult> {
        self.runtime
            .block_on(self.session.connect(host, port, lus, flags))
    }

    pub fn disconnect(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.disconnect())
    }

    pub fn ascii(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.ascii())
    }

    pub fn wait_for_field(&mut self) -> Result<IoResult> {
        self.runtime.block_on(self.session.wait_for_field())
    }

    /// Close the transport and shut the runtime down.
    pub fn close(self) -> Result<()> {
        let Self { runtime, session } = self;
        runtime.block_on(session.close())
    }
}

#[cfg(test)]
mod tests {
    use emu3270_core::config::Origin;

    use super::*;
    use crate::session::mock::{MockHandle, MockTransport};

    fn blocking(config: SessionConfig) -> (BlockingSession, MockHandle) {
        let (transport, handle) = MockTransport::new();
        (BlockingSession::new(transport, config).unwrap(), handle)
    }

    #[test]
    fn test_blocking_sends_same_text_as_async() {
        let (mut sync_session, sync_handle) = blocking(SessionConfig::new());
        sync_session.enter().unwrap();
        sync_session.pf(3).unwrap();
        sync_session.string("a b", true).unwrap();
        sync_session.string_at(4, 5, "x", true, true).unwrap();

        let (transport, async_handle) = MockTransport::new();
        let runtime = runtime().unwrap();
        runtime.block_on(async {
            let mut session = Session::new(transport, SessionConfig::new());
            session.enter().await.unwrap();
            session.pf(3).await.unwrap();
            session.string("a b", true).await.unwrap();
            session.string_at(4, 5, "x", true, true).await.unwrap();
        });

        assert_eq!(sync_handle.commands(), async_handle.commands());
    }

    #[test]
    fn test_blocking_errors_are_not_wrapped() {
        let (mut session, handle) = blocking(SessionConfig::new().with_exception_mode(true));
        handle.set_all_fail(true);

        match session.clear() {
            Err(Error::CommandFailed { command, message }) => {
                assert_eq!(command, "Clear()");
                assert_eq!(message, "Clear() failed");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
        assert!(matches!(
            session.pf(25),
            Err(Error::ArgumentOutOfRange { name: "pf", .. })
        ));
    }

    #[test]
    fn test_blocking_failure_as_value() {
        let (mut session, handle) = blocking(SessionConfig::new());
        handle.set_all_fail(true);
        let result = session.enter().unwrap();
        assert!(!result.success);

        session.set_exception_mode(true);
        assert!(session.exception_mode());
        assert!(session.enter().is_err());
    }

    #[test]
    fn test_blocking_uses_origin() {
        let (mut session, handle) = blocking(SessionConfig::new().with_origin(Origin::One));
        session.move_cursor(1, 1).unwrap();
        assert_eq!(handle.commands(), vec!["MoveCursor(0,0)"]);
        assert_eq!(session.config().origin, Origin::One);
    }

    #[test]
    fn test_blocking_connect_and_close() {
        let config = SessionConfig::new().with_default_connect_flags(ConnectFlags::SECURE);
        let (mut session, handle) = blocking(config);
        let lus: &[&str] = &[];
        assert_eq!(
            session.expand_host_name("host", Some("992"), lus, None).unwrap(),
            "L:host:992"
        );
        session.connect("host", Some("992"), lus, None).unwrap();
        session.disconnect().unwrap();
        session.close().unwrap();

        assert_eq!(handle.commands(), vec!["Connect(L:host:992)", "Disconnect()"]);
        assert!(handle.is_closed());
    }

    #[test]
    fn test_blocking_transport_error() {
        let (mut session, handle) = blocking(SessionConfig::new());
        handle.hang_up();
        assert!(matches!(session.io_raw("Enter()"), Err(Error::Transport(_))));
        assert!(matches!(session.ascii(), Err(Error::TransportClosed)));
    }

    #[test]
    fn test_blocking_connect_port_refused() {
        // Bind then drop to get a port with nothing listening.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        assert!(matches!(
            BlockingSession::connect_port(addr, SessionConfig::new()),
            Err(Error::Transport(_))
        ));
    }
}
