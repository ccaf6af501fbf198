//! emu3270 command-line entry point.

mod args;

use anyhow::Context;
use clap::Parser;
use emu3270_client::{BlockingSession, Error, IoResult, SessionConfig, DEFAULT_EMULATOR};
use tracing::{debug, error};

use crate::args::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(result) => {
            if let Err(e) = print_result(&result, json) {
                error!("{}", e);
                std::process::exit(1);
            }
            if !result.success {
                std::process::exit(1);
            }
        }
        Err(e) => {
            report_error(&e, json);
            std::process::exit(1);
        }
    }
}

/// Session configuration: environment first, then command-line overrides.
fn session_config(cli: &Cli) -> SessionConfig {
    let mut config = SessionConfig::from_env();
    if let Some(origin) = cli.origin() {
        config = config.with_origin(origin);
    }
    if cli.exception_mode {
        config = config.with_exception_mode(true);
    }
    config
}

fn open_session(cli: &Cli) -> anyhow::Result<BlockingSession> {
    let config = session_config(cli);
    debug!("Session config: {:?}", config);

    if let Some(addr) = &cli.target.port {
        return BlockingSession::connect_port(addr.as_str(), config)
            .with_context(|| format!("failed to attach to script port {addr}"));
    }

    let program = cli.target.exec.as_deref().unwrap_or(DEFAULT_EMULATOR);
    BlockingSession::start_process(program, &cli.target.args, config)
        .with_context(|| format!("failed to start emulator '{program}'"))
}

fn run(cli: Cli) -> anyhow::Result<IoResult> {
    let mut session = open_session(&cli)?;

    let result = match &cli.command {
        Commands::Enter => session.enter(),
        Commands::Clear => session.clear(),
        Commands::Pf { n } => session.pf(*n),
        Commands::Pa { n } => session.pa(*n),
        Commands::String(args) => session.string(&args.text, !args.raw_backslashes),
        Commands::StringAt(args) => session.string_at(
            args.row,
            args.column,
            &args.text,
            !args.raw_backslashes,
            args.erase_eof,
        ),
        Commands::MoveCursor { row, column } => session.move_cursor(*row, *column),
        Commands::Connect(args) => session.connect(
            &args.host,
            args.port.as_deref(),
            args.lus.as_slice(),
            args.connect_flags(),
        ),
        Commands::Disconnect => session.disconnect(),
        Commands::Ascii => session.ascii(),
        Commands::Raw { line } => session.io_raw(line),
    };

    // Shut the emulator down even when the command failed.
    if let Err(e) = session.close() {
        debug!("Closing session: {}", e);
    }
    Ok(result?)
}

fn print_result(result: &IoResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    if result.success {
        for line in &result.result {
            println!("{}", line);
        }
    } else {
        eprintln!(
            "Error: {}",
            result.error_message().unwrap_or_default()
        );
    }
    Ok(())
}

fn report_error(e: &anyhow::Error, json: bool) {
    let Some(err) = e.downcast_ref::<Error>() else {
        error!("{:#}", e);
        return;
    };

    if json {
        let body = serde_json::json!({
            "code": err.code(),
            "message": format!("{:#}", e),
            "suggestion": err.suggestion(),
        });
        println!("{}", body);
    } else {
        error!("{:#}", e);
        eprintln!("hint: {}", err.suggestion());
    }
}
