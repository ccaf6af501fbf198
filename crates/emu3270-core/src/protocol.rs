//! Response grammar for the emulator scripting interface.
//!
//! Every command is answered by zero or more `data:` lines, one status line
//! and a terminal `ok` or `error` line:
//!
//! ```text
//! data: first line of output
//! data: second line
//! U F U C(host.example.com) I 4 24 80 0 0 0x0 0.001
//! ok
//! ```
//!
//! On failure the `data:` lines carry the error message.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DATA_PREFIX: &str = "data:";
const OK: &str = "ok";
const ERROR: &str = "error";

/// The outcome of one dispatched command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoResult {
    pub success: bool,
    /// Data lines returned by the emulator, without the `data: ` prefix.
    pub result: Vec<String>,
    /// Raw status line, if the emulator sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// The command line as sent.
    pub command: String,
    /// Wall-clock time from sending the command to reading `ok`/`error`.
    #[serde(with = "duration_ms")]
    pub execution_time: Duration,
}

impl IoResult {
    /// The error text of a failed command: all data lines joined by newlines.
    pub fn error_message(&self) -> Option<String> {
        if self.success {
            None
        } else if self.result.is_empty() {
            Some("command failed".to_string())
        } else {
            Some(self.result.join("\n"))
        }
    }

    /// Parse the status line, if present and well formed.
    pub fn status_line(&self) -> Option<StatusLine> {
        self.status.as_deref().and_then(StatusLine::parse)
    }
}

/// Incremental parser for a single response.
#[derive(Debug, Default)]
pub struct ResponseParser {
    data: Vec<String>,
    status: Option<String>,
}

/// A response whose terminal line has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub success: bool,
    pub data: Vec<String>,
    pub status: Option<String>,
}

impl Response {
    pub fn into_io_result(self, command: impl Into<String>, execution_time: Duration) -> IoResult {
        IoResult {
            success: self.success,
            result: self.data,
            status: self.status,
            command: command.into(),
            execution_time,
        }
    }
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line. Returns the finished response once the terminal line
    /// arrives; the parser is reset and can be reused.
    pub fn push_line(&mut self, line: &str) -> Option<Response> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
            self.data.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            return None;
        }

        let success = match line {
            OK => true,
            ERROR => false,
            _ => {
                self.status = Some(line.to_string());
                return None;
            }
        };

        let parsed = std::mem::take(self);
        Some(Response {
            success,
            data: parsed.data,
            status: parsed.status,
        })
    }

    /// True if no line of the current response has been seen yet.
    pub fn is_idle(&self) -> bool {
        self.data.is_empty() && self.status.is_none()
    }
}

/// Keyboard state field of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardState {
    Unlocked,
    Locked,
    /// Locked because of an operator error.
    Error,
}

/// The parsed status line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLine {
    pub keyboard: KeyboardState,
    pub formatted: bool,
    pub field_protected: bool,
    /// Host name when connected, `None` when not connected.
    pub connected_host: Option<String>,
    /// Emulator mode letter (`I` 3270, `L` NVT line, `C` NVT char, `P` pending, `N` none).
    pub mode: char,
    pub model: u8,
    pub rows: u16,
    pub columns: u16,
    /// 0-based cursor row.
    pub cursor_row: u16,
    /// 0-based cursor column.
    pub cursor_column: u16,
    pub window_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub execution_time: Option<f64>,
}

impl StatusLine {
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 12 {
            return None;
        }

        let keyboard = match fields[0] {
            "U" => KeyboardState::Unlocked,
            "L" => KeyboardState::Locked,
            "E" => KeyboardState::Error,
            _ => return None,
        };

        let connected_host = match fields[3] {
            "N" => None,
            c => Some(
                c.strip_prefix("C(")
                    .and_then(|h| h.strip_suffix(')'))?
                    .to_string(),
            ),
        };

        let mut mode = fields[4].chars();
        let mode = match (mode.next(), mode.next()) {
            (Some(c), None) => c,
            _ => return None,
        };

        Some(Self {
            keyboard,
            formatted: fields[1] == "F",
            field_protected: fields[2] == "P",
            connected_host,
            mode,
            model: fields[5].parse().ok()?,
            rows: fields[6].parse().ok()?,
            columns: fields[7].parse().ok()?,
            cursor_row: fields[8].parse().ok()?,
            cursor_column: fields[9].parse().ok()?,
            window_id: fields[10].to_string(),
            execution_time: fields[11].parse().ok(),
        })
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "U F U C(host.example.com) I 4 24 80 3 9 0x0 0.010";

    fn feed(lines: &[&str]) -> Option<Response> {
        let mut parser = ResponseParser::new();
        let mut done = None;
        for line in lines {
            assert!(done.is_none(), "response finished before {line:?}");
            done = parser.push_line(line);
        }
        done
    }

    #[test]
    fn test_ok_response_with_data() {
        let response = feed(&["data: hello", "data: world", STATUS, "ok"]).unwrap();
        assert!(response.success);
        assert_eq!(response.data, vec!["hello", "world"]);
        assert_eq!(response.status.as_deref(), Some(STATUS));
    }

    #[test]
    fn test_empty_data_line() {
        let response = feed(&["data:", "data: ", STATUS, "ok"]).unwrap();
        assert_eq!(response.data, vec!["", ""]);
    }

    #[test]
    fn test_data_keeps_inner_spacing() {
        let response = feed(&["data:   indented", STATUS, "ok"]).unwrap();
        assert_eq!(response.data, vec!["  indented"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let response = feed(&["data: x\r\n", "U U U N N 4 24 80 0 0 0x0 -\r\n", "ok\r\n"]).unwrap();
        assert!(response.success);
        assert_eq!(response.data, vec!["x"]);
        assert_eq!(
            response.status.as_deref(),
            Some("U U U N N 4 24 80 0 0 0x0 -")
        );
    }

    #[test]
    fn test_error_response() {
        let response = feed(&["data: Keyboard locked", STATUS, "error"]).unwrap();
        assert!(!response.success);
        let result = response.into_io_result("Enter()", Duration::from_millis(5));
        assert_eq!(result.error_message().as_deref(), Some("Keyboard locked"));
        assert_eq!(result.command, "Enter()");
    }

    #[test]
    fn test_error_without_message() {
        let result = feed(&["error"])
            .unwrap()
            .into_io_result("Clear()", Duration::ZERO);
        assert_eq!(result.error_message().as_deref(), Some("command failed"));
        assert!(result.status.is_none());
    }

    #[test]
    fn test_success_has_no_error_message() {
        let result = feed(&[STATUS, "ok"])
            .unwrap()
            .into_io_result("Enter()", Duration::ZERO);
        assert!(result.error_message().is_none());
    }

    #[test]
    fn test_parser_resets_between_responses() {
        let mut parser = ResponseParser::new();
        assert!(parser.push_line("data: one").is_none());
        assert!(!parser.is_idle());
        assert!(parser.push_line("ok").is_some());
        assert!(parser.is_idle());
        let second = parser.push_line("ok").unwrap();
        assert!(second.data.is_empty());
    }

    #[test]
    fn test_status_line_connected() {
        let status = StatusLine::parse(STATUS).unwrap();
        assert_eq!(status.keyboard, KeyboardState::Unlocked);
        assert!(status.formatted);
        assert!(!status.field_protected);
        assert_eq!(status.connected_host.as_deref(), Some("host.example.com"));
        assert_eq!(status.mode, 'I');
        assert_eq!(status.model, 4);
        assert_eq!((status.rows, status.columns), (24, 80));
        assert_eq!((status.cursor_row, status.cursor_column), (3, 9));
        assert_eq!(status.execution_time, Some(0.010));
    }

    #[test]
    fn test_status_line_disconnected() {
        let status = StatusLine::parse("L U U N N 2 24 80 0 0 0x0 -").unwrap();
        assert_eq!(status.keyboard, KeyboardState::Locked);
        assert!(status.connected_host.is_none());
        assert!(status.execution_time.is_none());
    }

    #[test]
    fn test_status_line_rejects_garbage() {
        assert!(StatusLine::parse("").is_none());
        assert!(StatusLine::parse("U F U").is_none());
        assert!(StatusLine::parse("X F U N N 2 24 80 0 0 0x0 -").is_none());
        assert!(StatusLine::parse("U F U N N two 24 80 0 0 0x0 -").is_none());
    }

    #[test]
    fn test_io_result_json() {
        let result = feed(&["data: a", STATUS, "ok"])
            .unwrap()
            .into_io_result("Ascii()", Duration::from_millis(12));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"execution_time\":12"));
        let back: IoResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.status_line().unwrap().cursor_row, 3);
    }
}
