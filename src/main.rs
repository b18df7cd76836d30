// ============================================================
// File: main.rs
//
// Description:
//   Entry point for the customer churn index. Parses the
//   command-line flags into a `Config`, loads the startup data
//   (binary snapshot if present, otherwise the CSV export),
//   then hands off to the REPL.
//
//   Logs go to stderr and respect RUST_LOG; stdout is kept for
//   REPL responses.
// ============================================================
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use churnstore::config::{DEFAULT_CSV_FILE, DEFAULT_DATA_FILE, DEFAULT_MIN_DEGREE};
use churnstore::{repl_loop, Config, SchemaVersion, Session};

#[derive(Debug, Parser)]
#[command(name = "churnstore", about = "Customer churn analysis over a B-tree index")]
struct Cli {
    /// CSV export to import when no binary snapshot exists
    #[arg(long, default_value = DEFAULT_CSV_FILE)]
    csv: PathBuf,

    /// Binary snapshot file used by SAVE and LOAD
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// B-tree minimum degree (>= 2)
    #[arg(long, default_value_t = DEFAULT_MIN_DEGREE)]
    degree: usize,

    /// Record layout of the binary snapshot
    #[arg(long, value_enum, default_value_t = SchemaVersion::Canonical)]
    schema: SchemaVersion,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            csv_path: cli.csv,
            data_file: cli.data_file,
            min_degree: cli.degree,
            schema: cli.schema,
        }
    }
}


fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from(Cli::parse());
    let mut session = match Session::new(config) {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    println!("Customer Churn Index");

    // A failed startup load still leaves an empty, usable index
    match session.load_startup_data() {
        Ok(count) => info!(count, "startup data loaded"),
        Err(e) => error!(error = %e, "could not load startup data, starting empty"),
    }

    repl_loop(&mut session);
    ExitCode::SUCCESS
}
