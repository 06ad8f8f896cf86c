//! Command-line interface for `GeoLoad`.
//!
//! Scans a data directory for `*.geojson` files and publishes each one to
//! PostGIS (WGS84), OpenSearch and PostGIS (LV95). Every connection setting
//! can be given as a flag or through the environment.
//!
//! # Exit codes
//!
//! - `0` - every dataset was loaded or skipped as empty
//! - `1` - no input files, invalid configuration, or a failed load

mod display;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{Level, debug};
use tracing_log::LogTracer;
use tracing_subscriber::FmtSubscriber;

use geoload_core::config::DEFAULT_DATA_DIR;
use geoload_core::{
    LoadConfig, LoadObserver, LoadTarget, OpenSearchConfig, PostgisConfig, SinkOutcome,
};

#[derive(Parser)]
#[command(
    name = "geoload",
    version,
    about = "Load GeoJSON files into PostGIS and OpenSearch",
    long_about = "GeoLoad republishes every *.geojson file in a directory into three sinks:\n\
                  a PostGIS table in EPSG:4326, an OpenSearch index, and a PostGIS table\n\
                  reprojected to Swiss LV95 (EPSG:2056). Existing tables and indices are replaced."
)]
/// Command-line arguments and options for the `GeoLoad` CLI.
struct Cli {
    /// Enable verbose (INFO level) logging output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug (DEBUG level) logging output with detailed diagnostics.
    #[arg(short, long, global = true)]
    debug: bool,

    /// Directory containing the `.geojson` files to load.
    #[arg(long, env = "GEOLOAD_DATA_DIR", default_value = DEFAULT_DATA_DIR, value_name = "DIR")]
    data_dir: PathBuf,

    /// PostgreSQL host.
    #[arg(long, env = "PG_HOST", default_value = "localhost")]
    pg_host: String,

    /// PostgreSQL port.
    #[arg(long, env = "PG_PORT", default_value_t = 5432)]
    pg_port: u16,

    /// PostgreSQL database.
    #[arg(long, env = "PG_DB", default_value = "geodata")]
    pg_db: String,

    /// PostgreSQL user.
    #[arg(long, env = "PG_USER", default_value = "geo")]
    pg_user: String,

    /// PostgreSQL password.
    #[arg(long, env = "PG_PASSWORD", default_value = "geo", hide_env_values = true)]
    pg_password: String,

    /// OpenSearch base URL.
    #[arg(long, env = "OS_URL", default_value = "http://localhost:9200", value_name = "URL")]
    os_url: String,
}

impl Cli {
    fn load_config(&self) -> LoadConfig {
        LoadConfig {
            data_dir: self.data_dir.clone(),
            postgis: PostgisConfig::default()
                .with_host(&self.pg_host)
                .with_port(self.pg_port)
                .with_database(&self.pg_db)
                .with_credentials(&self.pg_user, &self.pg_password),
            opensearch: OpenSearchConfig::new(&self.os_url),
        }
    }
}

/// Prints the banner and one progress line per sink.
struct ConsoleProgress<'a> {
    config: &'a LoadConfig,
}

impl LoadObserver for ConsoleProgress<'_> {
    fn on_inputs(&mut self, count: usize) {
        if count > 0 {
            display::print_banner(self.config, count);
        }
    }

    fn on_sink_start(&mut self, dataset: &str, target: LoadTarget, sink_name: &str) {
        print!("  {dataset} -> {target} ({sink_name}) ... ");
        flush_progress(&mut std::io::stdout());
    }

    fn on_sink_done(&mut self, _dataset: &str, outcome: &SinkOutcome) {
        println!("{}", display::outcome_line(outcome));
        if outcome.target == LoadTarget::RelationalLv95 {
            println!();
        }
    }

    fn on_skipped(&mut self, dataset: &str) {
        println!("  {dataset}: empty, skipping");
    }
}

/// Pushes a partial progress line out before the sink call blocks. Returns
/// `false` if the flush failed; the failure is only logged.
fn flush_progress(out: &mut impl Write) -> bool {
    match out.flush() {
        Ok(()) => true,
        Err(e) => {
            debug!("Failed to flush progress output: {e}");
            false
        },
    }
}

/// Entry point for the `GeoLoad` command-line interface.
///
/// Parses arguments, configures logging and runs the load on a
/// single-threaded runtime; all sink calls are sequential.
fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        },
    };

    let config = cli.load_config();
    debug!("Configuration: {config:?}");
    let mut progress = ConsoleProgress { config: &config };

    match runtime.block_on(geoload_core::run(&config, &mut progress)) {
        Ok(summary) if summary.inputs.is_empty() => {
            println!("No .geojson files found in {}", config.data_dir.display());
            ExitCode::FAILURE
        },
        Ok(summary) => {
            display::display_summary(&summary);
            ExitCode::SUCCESS
        },
        Err(e) => {
            debug!("Run failed: {e:?}");
            eprintln!("\n{}", e.user_message());
            if let Some(suggestion) = e.recovery_suggestion() {
                eprintln!("Hint: {suggestion}");
            }
            ExitCode::FAILURE
        },
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    // Bridge logs from the `log` crate to the `tracing` ecosystem.
    LogTracer::init()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
