//! The command pipeline: one command in flight at a time.

use std::time::Instant;

use emu3270_core::error::{Error, Result};
use emu3270_core::protocol::{IoResult, ResponseParser};
use tracing::{debug, warn};

use crate::session::transport::Transport;

/// Owns the transport and runs commands through it, one at a time.
///
/// A response is always read to its terminal line before the next command
/// is written. After any transport failure, or when a `dispatch` future is
/// dropped before its response was fully read, the dispatcher refuses
/// further commands, since the position in the response stream is unknown.
pub struct Dispatcher {
    transport: Box<dyn Transport>,
    parser: ResponseParser,
    broken: bool,
    /// Set from the write until the terminal line is parsed.
    in_flight: bool,
}

impl Dispatcher {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            parser: ResponseParser::new(),
            broken: false,
            in_flight: false,
        }
    }

    /// Send one command line and wait for its result.
    ///
    /// A command the emulator rejects is returned as an unsuccessful
    /// [`IoResult`]; only channel failures are errors.
    pub async fn dispatch(&mut self, command: &str) -> Result<IoResult> {
        if self.in_flight && !self.broken {
            warn!("Previous command was abandoned mid-response; refusing '{}'", command);
            self.broken = true;
        }
        if self.is_broken() {
            return Err(Error::TransportClosed);
        }
        if command.contains(&['\r', '\n'][..]) {
            return Err(Error::invalid_argument(
                "command",
                "must be a single line",
            ));
        }

        let start = Instant::now();
        debug!("Sending: {}", command);
        self.in_flight = true;
        if let Err(e) = self.transport.write_line(command).await {
            return Err(self.poison(e));
        }

        loop {
            let line = match self.transport.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    warn!("Emulator closed the channel while running '{}'", command);
                    self.broken = true;
                    return Err(Error::TransportClosed);
                }
                Err(e) => return Err(self.poison(e)),
            };
            debug!("Received: {}", line.trim_end());

            if let Some(response) = self.parser.push_line(&line) {
                self.in_flight = false;
                let result = response.into_io_result(command, start.elapsed());
                if !result.success {
                    debug!(
                        "Command '{}' failed: {}",
                        command,
                        result.error_message().unwrap_or_default()
                    );
                }
                return Ok(result);
            }
        }
    }

    /// Close the transport. Later dispatches fail with `TransportClosed`.
    pub async fn close(&mut self) -> Result<()> {
        if self.broken {
            return Ok(());
        }
        self.broken = true;
        self.transport.close().await.map_err(Error::Transport)
    }

    /// True when no further command can be sent.
    pub fn is_broken(&self) -> bool {
        self.broken || self.in_flight || !self.parser.is_idle()
    }

    fn poison(&mut self, e: std::io::Error) -> Error {
        warn!("Transport error: {}", e);
        self.broken = true;
        Error::Transport(e)
    }
}
