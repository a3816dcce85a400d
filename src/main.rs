// Copyright 2026 Pagemirror Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pagemirror::cli;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pagemirror",
    about = "Pagemirror — mirror a rendered web page and its static assets",
    version,
    after_help = "Run 'pagemirror <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture a page and its assets into a local directory
    Clone {
        /// Absolute URL to capture (must start with http:// or https://)
        url: String,
        /// Output directory for the mirror
        #[arg(long, default_value = "./cloned-site")]
        output: String,
        /// Navigation timeout in milliseconds
        #[arg(long, default_value = "30000")]
        timeout: u64,
        /// Deploy the capture to Vercel after a successful run
        #[arg(long)]
        deploy: bool,
    },
    /// Deploy an existing capture directory to Vercel
    Deploy {
        /// Directory to deploy
        dir: String,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("pagemirror=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagemirror=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Clone {
            url,
            output,
            timeout,
            deploy,
        } => cli::clone_cmd::run(&url, &output, timeout, deploy, cli.json).await,
        Commands::Deploy { dir } => cli::deploy_cmd::run(&dir).await,
        Commands::Doctor => cli::doctor::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pagemirror", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    result
}
