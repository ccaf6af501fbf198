//! In-memory emulator used by the session tests.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::session::transport::Transport;

const STATUS: &str = "U F U C(mock.example.com) I 4 24 80 0 0 0x0 0.001";

#[derive(Default)]
struct MockState {
    commands: Vec<String>,
    pending: VecDeque<String>,
    data: Vec<String>,
    all_fail: bool,
    truncate_next: bool,
    hung_up: bool,
    closed: bool,
}

/// Transport half, handed to the code under test.
pub(crate) struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

/// Control half, kept by the test.
#[derive(Clone)]
pub(crate) struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub(crate) fn new() -> (Self, MockHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockHandle { state },
        )
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

impl MockHandle {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Command lines received so far.
    pub(crate) fn commands(&self) -> Vec<String> {
        self.state().commands.clone()
    }

    /// Make every following command fail.
    pub(crate) fn set_all_fail(&self, all_fail: bool) {
        self.state().all_fail = all_fail;
    }

    /// Data lines returned with every following successful command.
    pub(crate) fn set_data(&self, data: &[&str]) {
        self.state().data = data.iter().map(|s| s.to_string()).collect();
    }

    /// Send only part of the next response, then end the stream.
    pub(crate) fn truncate_next_response(&self) {
        self.state().truncate_next = true;
    }

    /// Fail every following write.
    pub(crate) fn hang_up(&self) {
        self.state().hung_up = true;
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state().closed
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut state = self.state();
        if state.hung_up || state.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock hung up"));
        }
        state.commands.push(line.to_string());

        let mut reply: Vec<String> = if state.all_fail {
            vec![format!("data: {line} failed")]
        } else {
            state.data.iter().map(|d| format!("data: {d}")).collect()
        };
        if state.truncate_next {
            state.truncate_next = false;
            state.pending.extend(reply.drain(..1.min(reply.len())));
            state.hung_up = true;
            return Ok(());
        }
        reply.push(STATUS.to_string());
        reply.push(if state.all_fail { "error" } else { "ok" }.to_string());
        state.pending.extend(reply);
        Ok(())
    }

    async fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.state().pending.pop_front())
    }

    async fn close(&mut self) -> io::Result<()> {
        self.state().closed = true;
        Ok(())
    }
}
