//! Connection flags and host-name expansion for the `Connect` action.
//!
//! The emulator accepts a single host string of the form
//! `[flags][lu1,lu2@]host[:port]`, where each flag is a one-letter prefix
//! followed by a colon and IPv6 literals are bracketed. The string is then
//! quoted like any other action argument.

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::quote::quote;

bitflags! {
    /// Options that change how the emulator connects to a host.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConnectFlags: u8 {
        /// Tunnel the connection through TLS (`L:`).
        const SECURE       = 0b0000_0001;
        /// Do not negotiate TN3270E (`N:`).
        const NON_TN3270E  = 0b0000_0010;
        /// Use telnet passthru (`P:`).
        const PASSTHRU     = 0b0000_0100;
        /// Do not wait for the host login screen (`C:`).
        const NO_LOGIN     = 0b0000_1000;
        /// Do not use the extended data stream (`S:`).
        const NON_EXTENDED = 0b0001_0000;
        /// Lock the screen size to the BIND image (`B:`).
        const BIND_LOCK    = 0b0010_0000;
    }
}

/// Flag tokens in the order they are rendered.
const CATALOG: &[(ConnectFlags, char)] = &[
    (ConnectFlags::SECURE, 'L'),
    (ConnectFlags::NON_TN3270E, 'N'),
    (ConnectFlags::PASSTHRU, 'P'),
    (ConnectFlags::NO_LOGIN, 'C'),
    (ConnectFlags::NON_EXTENDED, 'S'),
    (ConnectFlags::BIND_LOCK, 'B'),
];

impl ConnectFlags {
    /// Render the flag prefix, e.g. `L:N:`.
    pub fn prefix(self) -> String {
        CATALOG
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .flat_map(|(_, letter)| [*letter, ':'])
            .collect()
    }

    /// Parse flag letters such as `"LN"`, `"L:N:"` or `"l, n"`.
    pub fn parse_letters(letters: &str) -> Result<Self> {
        let mut flags = Self::empty();
        for c in letters.chars() {
            if c == ':' || c == ',' || c.is_whitespace() {
                continue;
            }
            let upper = c.to_ascii_uppercase();
            let (flag, _) = CATALOG
                .iter()
                .find(|(_, letter)| *letter == upper)
                .ok_or_else(|| {
                    Error::invalid_argument("connect flags", format!("unknown flag '{c}'"))
                })?;
            flags |= *flag;
        }
        Ok(flags)
    }
}

fn check_host(host: &str) -> Result<()> {
    if host.is_empty() {
        return Err(Error::invalid_argument("host", "must not be empty"));
    }
    // Non-ASCII characters are IDN labels and pass unchecked.
    if let Some(c) = host
        .chars()
        .find(|c| c.is_ascii() && !(c.is_ascii_alphanumeric() || "-_.:".contains(*c)))
    {
        return Err(Error::invalid_argument(
            "host",
            format!("'{host}' contains '{c}'"),
        ));
    }
    if host.matches(':').count() == 1 {
        return Err(Error::invalid_argument(
            "host",
            format!("'{host}' contains a single ':'; pass the port separately"),
        ));
    }
    Ok(())
}

fn check_port(port: &str) -> Result<()> {
    if port.is_empty() {
        return Err(Error::invalid_argument("port", "must not be empty"));
    }
    if let Some(c) = port
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(Error::invalid_argument(
            "port",
            format!("'{port}' contains '{c}'"),
        ));
    }
    Ok(())
}

fn check_lu(lu: &str) -> Result<()> {
    if lu.is_empty() {
        return Err(Error::invalid_argument("lu", "must not be empty"));
    }
    if let Some(c) = lu
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "-_.".contains(*c)))
    {
        return Err(Error::invalid_argument("lu", format!("'{lu}' contains '{c}'")));
    }
    Ok(())
}

/// Build the argument for a `Connect` action.
///
/// `flags` of `None` selects `default_flags`; `Some` replaces them entirely,
/// so `Some(ConnectFlags::empty())` connects with no flags at all.
pub fn expand_host_name<S: AsRef<str>>(
    host: &str,
    port: Option<&str>,
    lus: &[S],
    flags: Option<ConnectFlags>,
    default_flags: ConnectFlags,
) -> Result<String> {
    check_host(host)?;
    if let Some(port) = port {
        check_port(port)?;
    }
    for lu in lus {
        check_lu(lu.as_ref())?;
    }

    let mut spec = flags.unwrap_or(default_flags).prefix();

    if !lus.is_empty() {
        let joined: Vec<&str> = lus.iter().map(AsRef::as_ref).collect();
        spec.push_str(&joined.join(","));
        spec.push('@');
    }

    if host.contains(':') {
        spec.push('[');
        spec.push_str(host);
        spec.push(']');
    } else {
        spec.push_str(host);
    }

    if let Some(port) = port {
        spec.push(':');
        spec.push_str(port);
    }

    quote(&spec, true)
}
