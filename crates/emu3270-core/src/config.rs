//! Session configuration.
//!
//! A [`SessionConfig`] is fixed when a session is created. Values come from
//! the builder methods, optionally seeded from the environment:
//!
//! - `EMU3270_ORIGIN`: `0` or `1`
//! - `EMU3270_CONNECT_FLAGS`: flag letters, e.g. `LN`
//! - `EMU3270_EXCEPTION_MODE`: `1`/`true`/`yes` or `0`/`false`/`no`
//!
//! Empty values are ignored. Invalid values are logged and ignored.

use std::env;

use crate::error::{Error, Result};
use crate::host::ConnectFlags;

pub const ORIGIN_ENV: &str = "EMU3270_ORIGIN";
pub const CONNECT_FLAGS_ENV: &str = "EMU3270_CONNECT_FLAGS";
pub const EXCEPTION_MODE_ENV: &str = "EMU3270_EXCEPTION_MODE";

/// Numbering base for caller-supplied rows and columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Origin {
    /// Rows and columns start at 0, like the emulator itself.
    #[default]
    Zero,
    /// Rows and columns start at 1.
    One,
}

impl Origin {
    pub fn value(self) -> u16 {
        match self {
            Origin::Zero => 0,
            Origin::One => 1,
        }
    }

    /// Translate a caller coordinate into the emulator's 0-based one.
    pub fn to_native(self, name: &'static str, value: u16) -> Result<u16> {
        value
            .checked_sub(self.value())
            .ok_or_else(|| Error::out_of_range(name, value, self.value().into(), u16::MAX.into()))
    }
}

impl TryFrom<u16> for Origin {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(Origin::Zero),
            1 => Ok(Origin::One),
            other => Err(Error::out_of_range("origin", other, 0, 1)),
        }
    }
}

/// Per-session settings read by the dispatch path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub origin: Origin,
    /// Flags used by `Connect` when the caller does not pass any.
    pub default_connect_flags: ConnectFlags,
    /// Turn failed commands into `Error::CommandFailed`.
    pub exception_mode: bool,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_default_connect_flags(mut self, flags: ConnectFlags) -> Self {
        self.default_connect_flags = flags;
        self
    }

    pub fn with_exception_mode(mut self, exception_mode: bool) -> Self {
        self.exception_mode = exception_mode;
        self
    }

    /// Defaults overridden by any valid `EMU3270_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(origin) = non_empty_var(ORIGIN_ENV) {
            match origin.parse::<u16>().map_err(|e| e.to_string()).and_then(|v| {
                Origin::try_from(v).map_err(|e| e.to_string())
            }) {
                Ok(origin) => config.origin = origin,
                Err(e) => tracing::warn!("Ignoring {}='{}': {}", ORIGIN_ENV, origin, e),
            }
        }

        if let Some(letters) = non_empty_var(CONNECT_FLAGS_ENV) {
            match ConnectFlags::parse_letters(&letters) {
                Ok(flags) => config.default_connect_flags = flags,
                Err(e) => tracing::warn!("Ignoring {}='{}': {}", CONNECT_FLAGS_ENV, letters, e),
            }
        }

        if let Some(mode) = non_empty_var(EXCEPTION_MODE_ENV) {
            match parse_bool(&mode) {
                Some(on) => config.exception_mode = on,
                None => tracing::warn!(
                    "Ignoring {}='{}': expected true/false",
                    EXCEPTION_MODE_ENV,
                    mode
                ),
            }
        }

        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
