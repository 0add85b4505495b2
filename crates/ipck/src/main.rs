// # ipck - Interface Address Check
//
// Thin command-line layer over ipck-core. One invocation performs one check:
// capture the interface's addresses, compare them with the snapshot left by
// the previous run, estimate the stable ("primary") address, print the
// result and save the new snapshot.
//
// All diffing, selection and persistence rules live in ipck-core. This binary
// only parses arguments, installs logging, registers the compiled-in address
// sources and maps failures to exit codes.
//
// ## Configuration
//
// Command-line flags, with two environment fallbacks:
//
// - `IPCK_DIR`: snapshot directory (`-d/--dir`)
// - `IPCK_SOURCE`: address source, `ifaddrs` or `ifconfig` (`--source`)
// - `IPCK_LOG_LEVEL`: `trace`, `debug`, `info`, `warn` (default) or `error`
//
// Logs go to stderr; stdout carries only the report.
//
// ## Example
//
// ```bash
// # cron: print the stable global IPv6 address of eth0
// ipck -d /var/lib/ipck -s eth0
//
// # has anything changed since the last run? (read-only)
// ipck -d /var/lib/ipck -n -b eth0
// ```

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use ipck_core::{CheckEngine, FileSnapshotStore, SourceRegistry};
use std::env;
use std::io::Write;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Exit codes for the possible ways a check ends
///
/// - 0: Check completed and the report was printed
/// - 1: Bad arguments or configuration
/// - 2: Runtime failure (capture, corrupt snapshot, I/O)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IpckExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<IpckExitCode> for ExitCode {
    fn from(code: IpckExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Parse a log level name as accepted in `IPCK_LOG_LEVEL`
fn parse_log_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Map a failed check to its exit code
fn exit_code_for(err: &anyhow::Error) -> IpckExitCode {
    match err.downcast_ref::<ipck_core::Error>() {
        Some(e) if e.is_config() => IpckExitCode::ConfigError,
        _ => IpckExitCode::RuntimeError,
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here
            let _ = e.print();
            return if e.use_stderr() {
                IpckExitCode::ConfigError.into()
            } else {
                IpckExitCode::Success.into()
            };
        }
    };

    let level_name = env::var("IPCK_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    let Some(log_level) = parse_log_level(&level_name) else {
        eprintln!(
            "IPCK_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            level_name
        );
        return IpckExitCode::ConfigError.into();
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IpckExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IpckExitCode::RuntimeError.into();
        }
    };

    match rt.block_on(run_check(&cli)) {
        Ok(()) => IpckExitCode::Success.into(),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("ipck: {:#}", e);
            exit_code_for(&e).into()
        }
    }
}

/// Register every address source compiled into this binary
fn build_registry() -> SourceRegistry {
    #[allow(unused_mut)]
    let mut registry = SourceRegistry::new();

    #[cfg(feature = "ifaddrs")]
    ipck_source_ifaddrs::register(&mut registry);

    #[cfg(feature = "ifconfig")]
    ipck_source_ifconfig::register(&mut registry);

    debug!("Address sources: {:?}", registry.list_sources());
    registry
}

/// Run one check and print its report
async fn run_check(cli: &Cli) -> Result<()> {
    let config = cli.check_config();
    config.validate()?;

    let registry = build_registry();
    let source = registry.create_source(&config.source)?;
    let store = FileSnapshotStore::new(&config.state_dir);
    let interface = config.interface.clone();

    let engine = CheckEngine::new(source, Box::new(store), config)?;
    let outcome = engine
        .check()
        .await
        .with_context(|| format!("Check of {} failed", interface))?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(outcome.report.render(cli.output_mode()).as_bytes())
        .context("Failed to write report")?;
    stdout.flush().context("Failed to write report")?;

    Ok(())
}
