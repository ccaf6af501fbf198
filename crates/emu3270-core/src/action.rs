//! Builders for the emulator actions exposed by a session.
//!
//! Every builder validates its arguments and returns a ready-to-send
//! [`Command`]. Nothing here performs I/O, so validation failures never reach
//! the emulator.

use crate::command::{Action, Command};
use crate::config::Origin;
use crate::error::{Error, Result};
use crate::host::{expand_host_name, ConnectFlags};

/// Highest PF key number.
pub const MAX_PF: u8 = 24;
/// Highest PA key number.
pub const MAX_PA: u8 = 3;

/// Text to place at a screen position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringAtBlock {
    pub row: u16,
    pub column: u16,
    pub text: String,
}

impl StringAtBlock {
    pub fn new(row: u16, column: u16, text: impl Into<String>) -> Self {
        Self {
            row,
            column,
            text: text.into(),
        }
    }
}

pub fn enter() -> Command {
    Action::new("Enter").into()
}

pub fn clear() -> Command {
    Action::new("Clear").into()
}

/// Program function key `n` (1-24).
pub fn pf(n: u8) -> Result<Command> {
    if !(1..=MAX_PF).contains(&n) {
        return Err(Error::out_of_range("pf", n, 1, MAX_PF.into()));
    }
    Ok(Action::new("PF").arg(n).into())
}

/// Program attention key `n` (1-3).
pub fn pa(n: u8) -> Result<Command> {
    if !(1..=MAX_PA).contains(&n) {
        return Err(Error::out_of_range("pa", n, 1, MAX_PA.into()));
    }
    Ok(Action::new("PA").arg(n).into())
}

/// Type `text` at the cursor.
pub fn string(text: &str, quote_backslashes: bool) -> Result<Command> {
    Ok(Action::new("String").text(text, quote_backslashes)?.into())
}

fn move_cursor_action(origin: Origin, row: u16, column: u16) -> Result<Action> {
    let row = origin.to_native("row", row)?;
    let column = origin.to_native("column", column)?;
    Ok(Action::new("MoveCursor").arg(row).arg(column))
}

pub fn move_cursor(origin: Origin, row: u16, column: u16) -> Result<Command> {
    Ok(move_cursor_action(origin, row, column)?.into())
}

/// Type text at one or more positions, in the order given.
///
/// Each block becomes `MoveCursor(r,c) [EraseEOF() ]String(text)`.
pub fn string_at(
    origin: Origin,
    blocks: &[StringAtBlock],
    quote_backslashes: bool,
    erase_eof: bool,
) -> Result<Command> {
    if blocks.is_empty() {
        return Err(Error::invalid_argument("blocks", "at least one block is required"));
    }

    let mut command = Command::new();
    for block in blocks {
        command = command.then(move_cursor_action(origin, block.row, block.column)?);
        if erase_eof {
            command = command.then(Action::new("EraseEOF"));
        }
        command = command.then(Action::new("String").text(&block.text, quote_backslashes)?);
    }
    Ok(command)
}

pub fn erase_eof() -> Command {
    Action::new("EraseEOF").into()
}

pub fn tab() -> Command {
    Action::new("Tab").into()
}

pub fn back_tab() -> Command {
    Action::new("BackTab").into()
}

pub fn home() -> Command {
    Action::new("Home").into()
}

/// Connect to a host. See [`expand_host_name`] for the encoding.
pub fn connect<S: AsRef<str>>(
    host: &str,
    port: Option<&str>,
    lus: &[S],
    flags: Option<ConnectFlags>,
    default_flags: ConnectFlags,
) -> Result<Command> {
    let spec = expand_host_name(host, port, lus, flags, default_flags)?;
    Ok(Action::new("Connect").encoded(spec).into())
}

pub fn disconnect() -> Command {
    Action::new("Disconnect").into()
}

/// Read the whole screen as text; one data line per row.
pub fn ascii() -> Command {
    Action::new("Ascii").into()
}

/// Block until the host unlocks the keyboard in an input field.
pub fn wait_for_field() -> Command {
    Action::new("Wait").arg("InputField").into()
}
