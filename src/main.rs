//! Course-Sweep main entry point
//!
//! This is the command-line interface for the Course-Sweep manifest extractor.

use anyhow::{bail, Context};
use clap::Parser;
use course_sweep::config::{load_config_with_hash, Config};
use course_sweep::crawler::{sweep, BatchStatus, RunOutcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Course-Sweep: extract ordered resource manifests from purchased courses
///
/// Logs in with a phone number (OTP) or a ready token, lists the purchased
/// courses, and writes a text and JSON manifest for each requested batch.
#[derive(Parser, Debug)]
#[command(name = "course-sweep")]
#[command(version = "1.0.0")]
#[command(about = "Extract ordered resource manifests from purchased courses", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the directory manifests are delivered into
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate config and show the endpoints that would be used, then exit
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    match sweep(config).await? {
        RunOutcome::AuthFailed => bail!("authentication failed"),
        RunOutcome::NoCourses => {
            tracing::warn!("No purchased courses found");
        }
        RunOutcome::Completed(reports) => {
            let delivered = reports
                .iter()
                .filter(|r| matches!(r.status, BatchStatus::Delivered(_)))
                .count();
            tracing::info!(
                "Run complete: {} of {} batches delivered",
                delivered,
                reports.len()
            );
        }
    }

    Ok(())
}

/// Filter directives for the given verbosity
///
/// The `audit` target stays at info in every mode, `--quiet` included.
fn log_directives(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error,audit=info";
    }
    match verbose {
        0 => "course_sweep=info,audit=info,warn",
        1 => "course_sweep=debug,audit=info,info",
        2 => "course_sweep=trace,audit=info,debug",
        _ => "trace",
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    // stdout belongs to the terminal channel; targets tell audit lines apart
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_directives(verbose, quiet)))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Course-Sweep Dry Run ===\n");

    println!("API:");
    println!("  Auth base URL: {}", config.api.auth_base_url);
    println!("  Content base URL: {}", config.api.content_base_url);
    println!("  Timeout: {}s", config.api.timeout_secs);
    println!("  Connect timeout: {}s", config.api.connect_timeout_secs);

    println!("\nClient:");
    println!("  User agent: {}", config.client.user_agent);
    println!("  Platform: {}", config.client.platform);

    println!("\nAuth:");
    println!("  Token prefix: {}", config.auth.token_prefix);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Max name length: {}", config.output.name_max_length);

    println!("\n✓ Configuration is valid");
}
