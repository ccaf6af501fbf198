//! CLI argument parsing with clap derive macros.

use clap::{Args, Parser, Subcommand, ValueEnum};
use emu3270_client::{ConnectFlags, Origin};

/// Drive a 3270 emulator through its scripting interface.
///
/// Each invocation runs one action. By default an emulator (s3270) is
/// started as a child process; use --port to attach to an emulator already
/// listening on a script port instead.
#[derive(Debug, Parser)]
#[command(name = "emu3270", version)]
pub struct Cli {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Row/column numbering base
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(0..=1))]
    pub origin: Option<u16>,

    /// Exit with an error when the emulator rejects the command
    #[arg(long, global = true)]
    pub exception_mode: bool,

    /// Print the full result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Attach to an emulator script port
    #[arg(long, global = true, value_name = "HOST:PORT", conflicts_with = "exec")]
    pub port: Option<String>,

    /// Emulator program to start [default: s3270]
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub exec: Option<String>,

    /// Extra argument for the emulator program (repeatable)
    #[arg(long = "arg", global = true, value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Press Enter
    Enter,

    /// Press Clear
    Clear,

    /// Press a program function key (1-24)
    Pf { n: u8 },

    /// Press a program attention key (1-3)
    Pa { n: u8 },

    /// Type text at the cursor
    String(StringArgs),

    /// Type text at a screen position
    #[command(after_help = "\
Examples:
  emu3270 string-at 5 10 userid --erase-eof
  emu3270 --origin 1 string-at 1 1 'hello world'")]
    StringAt(StringAtArgs),

    /// Move the cursor
    MoveCursor { row: u16, column: u16 },

    /// Connect to a host
    #[command(after_help = "\
Examples:
  emu3270 connect mainframe.example.com
  emu3270 connect mainframe.example.com --host-port 992 --flag secure
  emu3270 connect 10.0.0.1 --lu LU1 --lu LU2
  emu3270 connect ::1 --flag non-tn3270e")]
    Connect(ConnectArgs),

    /// Disconnect from the host
    Disconnect,

    /// Print the screen as text
    Ascii,

    /// Send a command line exactly as given
    Raw {
        /// Command line, e.g. 'Wait(3,Output)'
        line: String,
    },
}

#[derive(Debug, Args)]
pub struct StringArgs {
    pub text: String,

    /// Pass backslashes through as emulator escapes
    #[arg(long)]
    pub raw_backslashes: bool,
}

#[derive(Debug, Args)]
pub struct StringAtArgs {
    pub row: u16,

    pub column: u16,

    pub text: String,

    /// Erase to end of field before typing
    #[arg(long)]
    pub erase_eof: bool,

    /// Pass backslashes through as emulator escapes
    #[arg(long)]
    pub raw_backslashes: bool,
}

#[derive(Debug, Args)]
pub struct ConnectArgs {
    /// Host name or IP address
    pub host: String,

    /// Host port or service name
    #[arg(long = "host-port", value_name = "PORT")]
    pub port: Option<String>,

    /// Logical unit name to request (repeatable)
    #[arg(long = "lu", value_name = "LU")]
    pub lus: Vec<String>,

    /// Connection flag (repeatable); overrides EMU3270_CONNECT_FLAGS
    #[arg(long = "flag", value_enum, value_name = "FLAG")]
    pub flags: Vec<FlagArg>,
}

impl ConnectArgs {
    /// `None` when no --flag was given, so session defaults apply.
    pub fn connect_flags(&self) -> Option<ConnectFlags> {
        if self.flags.is_empty() {
            return None;
        }
        Some(
            self.flags
                .iter()
                .fold(ConnectFlags::empty(), |acc, f| acc | ConnectFlags::from(*f)),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FlagArg {
    /// TLS tunnel (L:)
    Secure,
    /// No TN3270E negotiation (N:)
    NonTn3270e,
    /// Telnet passthru (P:)
    Passthru,
    /// Do not wait for the login screen (C:)
    NoLogin,
    /// No extended data stream (S:)
    NonExtended,
    /// Lock screen size to the BIND image (B:)
    BindLock,
}

impl From<FlagArg> for ConnectFlags {
    fn from(flag: FlagArg) -> Self {
        match flag {
            FlagArg::Secure => ConnectFlags::SECURE,
            FlagArg::NonTn3270e => ConnectFlags::NON_TN3270E,
            FlagArg::Passthru => ConnectFlags::PASSTHRU,
            FlagArg::NoLogin => ConnectFlags::NO_LOGIN,
            FlagArg::NonExtended => ConnectFlags::NON_EXTENDED,
            FlagArg::BindLock => ConnectFlags::BIND_LOCK,
        }
    }
}

impl Cli {
    pub fn origin(&self) -> Option<Origin> {
        match self.origin? {
            0 => Some(Origin::Zero),
            _ => Some(Origin::One),
        }
    }
}
