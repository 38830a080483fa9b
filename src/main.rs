mod config;
mod corpus;
mod output;
mod search;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lineq")]
#[command(about = "Exact-line query server over TCP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the query server in the foreground
    Serve {
        /// Path to the TOML configuration file
        #[arg(short, long, env = "LINEQ_CONFIG")]
        config: PathBuf,
    },
    /// Send a single query and print the verdict
    Query {
        /// The exact line to look up
        query: String,

        /// Path to the TOML configuration file
        #[arg(short, long, env = "LINEQ_CONFIG")]
        config: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Manage the background server daemon
    #[cfg(unix)]
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

#[cfg(unix)]
#[derive(Subcommand)]
enum DaemonAction {
    /// Start the daemon in background
    Start {
        /// Path to the TOML configuration file
        #[arg(short, long, env = "LINEQ_CONFIG")]
        config: PathBuf,
    },
    /// Stop the running daemon
    Stop,
    /// Check daemon status
    Status,
    /// Run the daemon in foreground (for debugging)
    Foreground {
        /// Path to the TOML configuration file
        #[arg(short, long, env = "LINEQ_CONFIG")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            let config = config::Config::load(&config)?;
            let server = server::Server::bind(&config)?;
            server.serve()
        }
        Commands::Query {
            query,
            config,
            no_color,
        } => {
            let config = config::Config::load(&config)?;
            let response = server::send_query(&config, &query)?;
            output::print_verdict(&response, !no_color)?;
            Ok(())
        }
        #[cfg(unix)]
        Commands::Daemon { action } => handle_daemon_command(action),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(unix)]
fn handle_daemon_command(action: DaemonAction) -> Result<()> {
    use server::daemon;

    match action {
        DaemonAction::Start { config } => {
            if daemon::is_running() {
                println!("Daemon is already running");
                return Ok(());
            }

            let config = config::Config::load(&config)?;

            println!("Starting lineqd daemon...");
            daemon::daemonize(config)?;

            // Wait a moment for the daemon to come up
            std::thread::sleep(std::time::Duration::from_millis(500));

            if daemon::is_running() {
                println!("Daemon started (pid file: {})", daemon::pid_path().display());
            } else {
                println!("Daemon may have failed to start. Check /tmp/lineqd-error.log");
            }
            Ok(())
        }

        DaemonAction::Stop => {
            if daemon::stop()? {
                println!("Daemon stopped");
            } else {
                println!("Daemon is not running");
            }
            Ok(())
        }

        DaemonAction::Status => {
            if daemon::is_running() {
                println!("Daemon is running (pid file: {})", daemon::pid_path().display());
            } else {
                println!("Daemon is not running");
            }
            Ok(())
        }

        DaemonAction::Foreground { config } => {
            let config = config::Config::load(&config)?;
            daemon::run_foreground(&config)
        }
    }
}
