//! Emulator actions on an async [`Session`].
//!
//! Arguments are validated before anything is sent, so a rejected PF key
//! number or row never reaches the emulator.

use emu3270_core::action::{self, StringAtBlock};
use emu3270_core::error::Result;
use emu3270_core::host::ConnectFlags;
use emu3270_core::protocol::IoResult;

use crate::session::Session;

impl Session {
    pub async fn enter(&mut self) -> Result<IoResult> {
        self.io(&action::enter()).await
    }

    pub async fn clear(&mut self) -> Result<IoResult> {
        self.io(&action::clear()).await
    }

    /// Press PF key `n` (1-24).
    pub async fn pf(&mut self, n: u8) -> Result<IoResult> {
        let command = action::pf(n)?;
        self.io(&command).await
    }

    /// Press PA key `n` (1-3).
    pub async fn pa(&mut self, n: u8) -> Result<IoResult> {
        let command = action::pa(n)?;
        self.io(&command).await
    }

    /// Type `text` at the cursor.
    pub async fn string(&mut self, text: &str, quote_backslashes: bool) -> Result<IoResult> {
        let command = action::string(text, quote_backslashes)?;
        self.io(&command).await
    }

    /// Type `text` at (`row`, `column`), counted from the session origin.
    pub async fn string_at(
        &mut self,
        row: u16,
        column: u16,
        text: &str,
        quote_backslashes: bool,
        erase_eof: bool,
    ) -> Result<IoResult> {
        let blocks = [StringAtBlock::new(row, column, text)];
        self.string_at_blocks(&blocks, quote_backslashes, erase_eof)
            .await
    }

    /// Type several blocks of text in one command, in the order given.
    pub async fn string_at_blocks(
        &mut self,
        blocks: &[StringAtBlock],
        quote_backslashes: bool,
        erase_eof: bool,
    ) -> Result<IoResult> {
        let command = action::string_at(self.config.origin, blocks, quote_backslashes, erase_eof)?;
        self.io(&command).await
    }

    pub async fn move_cursor(&mut self, row: u16, column: u16) -> Result<IoResult> {
        let command = action::move_cursor(self.config.origin, row, column)?;
        self.io(&command).await
    }

    pub async fn erase_eof(&mut self) -> Result<IoResult> {
        self.io(&action::erase_eof()).await
    }

    pub async fn tab(&mut self) -> Result<IoResult> {
        self.io(&action::tab()).await
    }

    pub async fn back_tab(&mut self) -> Result<IoResult> {
        self.io(&action::back_tab()).await
    }

    pub async fn home(&mut self) -> Result<IoResult> {
        self.io(&action::home()).await
    }

    /// Connect to a host. `flags` of `None` uses the session defaults.
    pub async fn connect<S: AsRef<str>>(
        &mut self,
        host: &str,
        port: Option<&str>,
        lus: &[S],
        flags: Option<ConnectFlags>,
    ) -> Result<IoResult> {
        let command = action::connect(
            host,
            port,
            lus,
            flags,
            self.config.default_connect_flags,
        )?;
        self.io(&command).await
    }

    pub async fn disconnect(&mut self) -> Result<IoResult> {
        self.io(&action::disconnect()).await
    }

    /// Read the screen; each row is one line of `IoResult::result`.
    pub async fn ascii(&mut self) -> Result<IoResult> {
        self.io(&action::ascii()).await
    }

    pub async fn wait_for_field(&mut self) -> Result<IoResult> {
        self.io(&action::wait_for_field()).await
    }
}
