//! Sellah CLI - operator tools for the seller dashboard.
//!
//! # Usage
//!
//! ```bash
//! # Show how raw backend statuses are displayed
//! sellah-cli status "in_transit" "PAYMENT_SENT" "cancelled"
//!
//! # Same, as JSON
//! sellah-cli status --json "ready for pickup"
//!
//! # List the whole status table
//! sellah-cli status --table
//!
//! # Check whether paths are public or protected
//! sellah-cli route / /login/help /dashboard/orders
//!
//! # Hash the seller password for DASHBOARD_SELLER_PASSWORD_HASH
//! echo -n 'secret' | sellah-cli hash-password
//! ```
//!
//! # Commands
//!
//! - `status` - Status normalization and display mapping
//! - `route` - Public/protected route classification
//! - `hash-password` - Argon2 PHC string for the dashboard config

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sellah-cli")]
#[command(author, version, about = "Sellah CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the display mapping of raw order statuses
    Status {
        /// Raw status strings as stored by the backend
        raw: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Print every known status
        #[arg(long, conflicts_with = "raw")]
        table: bool,
    },
    /// Classify request paths as public or protected
    Route {
        /// Request paths (query strings are ignored)
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Read a password from stdin and print its Argon2 hash
    HashPassword,
}

fn main() {
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sellah_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let output = match cli.command {
        Commands::Status { raw, json, table } => {
            let raw = if table {
                commands::status::known_statuses()
            } else {
                raw
            };
            if json {
                commands::status::render_json(&raw)?
            } else {
                commands::status::render_table(&raw)
            }
        }
        Commands::Route { paths } => commands::route::render(&paths),
        Commands::HashPassword => {
            let password = commands::password::read_password(std::io::stdin().lock())?;
            commands::password::hash(&password)?
        }
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}
