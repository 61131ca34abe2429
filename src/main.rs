//! tint-service - run Tint automaton programs over HTTP.
//!
//! Usage:
//!   tint-service serve [--port 8000]                        # Start HTTP server
//!   tint-service run --machine dfa [--verbose] PROG TESTS   # One-shot run

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Duration;
use tint_service::config::{self, ExitPolicy, ServiceConfig};
use tint_service::http_server;
use tint_service::platform;
use tint_service::state::AppState;
use tint_service::{Dispatcher, MachineType, Submission};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "tint-service")]
#[command(about = "Runs Tint automaton programs under a wall-clock timeout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Seconds to wait for running programs on shutdown
        #[arg(long, default_value = "10")]
        shutdown_grace_secs: u64,

        #[command(flatten)]
        runtime: RuntimeArgs,
    },
    /// Run a program file against a tests file and print the output
    Run {
        /// Interpreter mode
        #[arg(long, value_enum)]
        machine: MachineType,

        /// Print the full simulation trace
        #[arg(long)]
        verbose: bool,

        #[command(flatten)]
        runtime: RuntimeArgs,

        /// Program file
        program: PathBuf,

        /// Tests file
        tests: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RuntimeArgs {
    /// Directory for staged program and test files
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Directory holding tint-linux / tint-mac
    #[arg(long, default_value = ".")]
    bin_dir: PathBuf,

    /// Wall-clock limit per run in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Worker pool size (defaults to available parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Platform name used to pick the interpreter binary
    #[arg(long, default_value = platform::host_os())]
    platform: String,

    /// How a non-zero interpreter exit is reported
    #[arg(long, value_enum, default_value_t = ExitPolicy::Capture)]
    exit_policy: ExitPolicy,
}

impl RuntimeArgs {
    fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            scratch_dir: self.scratch_dir.unwrap_or_else(config::default_scratch_dir),
            bin_dir: self.bin_dir,
            platform: self.platform,
            timeout: Duration::from_secs(self.timeout_secs),
            workers: self.workers.unwrap_or_else(config::default_workers),
            exit_policy: self.exit_policy,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            shutdown_grace_secs,
            runtime,
        } => {
            let dispatcher = match Dispatcher::new(&runtime.into_config()) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    exit(1);
                }
            };

            let state = AppState::new(dispatcher.clone());
            if let Err(e) = http_server::run_server(port, state, shutdown_signal()).await {
                eprintln!("Error: {}", e);
                exit(1);
            }

            let grace = Duration::from_secs(shutdown_grace_secs);
            if tokio::time::timeout(grace, dispatcher.shutdown()).await.is_err() {
                warn!(in_flight = dispatcher.pool().in_flight(), "Shutdown grace elapsed, abandoning running programs");
            }
            info!("Server stopped");
        }
        Commands::Run {
            machine,
            verbose,
            runtime,
            program,
            tests,
        } => {
            let submission = match read_submission(&program, &tests, verbose) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    exit(1);
                }
            };
            let dispatcher = match Dispatcher::new(&runtime.into_config()) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    exit(1);
                }
            };

            let result = dispatcher.dispatch(submission, machine).await;
            dispatcher.shutdown().await;
            print!("{}", result.output);
            exit(if result.is_ok() { 0 } else { 1 });
        }
    }
}

fn read_submission(program: &Path, tests: &Path, verbose: bool) -> std::io::Result<Submission> {
    Ok(Submission {
        program: std::fs::read_to_string(program)?,
        tests: std::fs::read_to_string(tests)?,
        verbose: Some(verbose),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
