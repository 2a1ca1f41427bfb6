mod commands;
mod reporter;

use bunnyflow_cloud::CloudError;
use bunnyflow_core::CoreError;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bunnyflow")]
#[command(about = "Deploy a branch of a static site to bunny.net", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision storage, CDN, DNS and SSL for a branch, then sync its files
    Deploy(commands::deploy::DeployArgs),
    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout is reserved for the deployment report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 2 for bad inputs, 1 for everything else
fn exit_code(err: &anyhow::Error) -> u8 {
    let input_error = err
        .downcast_ref::<CoreError>()
        .is_some_and(CoreError::is_input_error)
        || err
            .downcast_ref::<CloudError>()
            .is_some_and(CloudError::is_input_error);

    if input_error { 2 } else { 1 }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Version => {
            println!("bunnyflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Deploy(args) => commands::deploy::handle(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(exit_code(&e))
        }
    }
}
