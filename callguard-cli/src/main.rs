//! CallGuard CLI
//!
//! Command-line interface for CallGuard fraud signaling.

mod commands;
mod config;
mod display;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use config::CliConfig;

#[derive(Parser)]
#[command(name = "callguard")]
#[command(author, version, about = "Real-time call fraud signaling client", long_about = None)]
struct Cli {
    /// Data directory for CallGuard storage
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Fraud-scoring WebSocket endpoint
    #[arg(long, global = true, env = "CALLGUARD_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored phone number
    #[command(subcommand)]
    Phone(PhoneCommands),

    /// Show this installation's user id
    Identity,

    /// Interpret one fraud-signaling frame
    Interpret {
        /// Raw JSON frame as received from the endpoint
        frame: String,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a call session and print its events
    Monitor {
        /// Phone number for this call (defaults to the stored one)
        #[arg(long)]
        phone: Option<String>,

        /// Stop after this many seconds
        #[arg(long)]
        duration: Option<u64>,

        /// Give up after this many failed reconnect attempts
        #[arg(long)]
        max_reconnects: Option<u32>,

        /// Hang up as soon as a fraud alert arrives
        #[arg(long)]
        hang_up_on_alert: bool,

        /// Start recording once connected
        #[arg(long)]
        record: bool,
    },
}

#[derive(Subcommand)]
enum PhoneCommands {
    /// Save the phone number used for signaling
    Set {
        /// Phone number, any formatting
        number: String,
    },
    /// Show the stored phone number
    Show,
    /// Remove the stored phone number
    Clear,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("callguard=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("callguard")
    });

    let config = CliConfig {
        data_dir,
        endpoint: cli.endpoint,
    };

    match cli.command {
        Commands::Phone(cmd) => match cmd {
            PhoneCommands::Set { number } => commands::phone::set(&config, &number)?,
            PhoneCommands::Show => commands::phone::show(&config)?,
            PhoneCommands::Clear => commands::phone::clear(&config)?,
        },
        Commands::Identity => commands::identity::run(&config)?,
        Commands::Interpret { frame, json } => commands::interpret::run(&frame, json)?,
        Commands::Monitor {
            phone,
            duration,
            max_reconnects,
            hang_up_on_alert,
            record,
        } => commands::monitor::run(
            &config,
            commands::monitor::MonitorOptions {
                phone,
                duration,
                max_reconnects,
                hang_up_on_alert,
                record,
            },
        )?,
    }

    Ok(())
}
