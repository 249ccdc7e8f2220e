//! Quizgen CLI
//!
//! Study reviewers and quizzes from lecture documents.
//!
//! Commands:
//!   serve    - Start HTTP server
//!   extract  - Print the text extracted from a document
//!   reviewer - Generate a study reviewer for a document
//!   quiz     - Generate a quiz for a document
//!   info     - Show effective configuration

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use quizgen::observability::init_tracing;
use quizgen::utils::expand_path;
use quizgen::{run_server, Config};

#[derive(Parser)]
#[command(name = "quizgen")]
#[command(about = "Study reviewers and quizzes from PDF and PPTX documents")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.quizgen/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the text extracted from a document
    Extract {
        /// PDF or PPTX file
        file: PathBuf,

        /// Keep page text untrimmed, as /upload/ does
        #[arg(long)]
        raw: bool,
    },

    /// Generate a study reviewer for a document
    Reviewer {
        /// PDF or PPTX file
        file: PathBuf,
    },

    /// Generate a quiz for a document
    Quiz {
        /// PDF or PPTX file
        file: PathBuf,

        /// Print the parsed items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show effective configuration
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real deployments inject the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(|p| PathBuf::from(expand_path(p)));
    let mut config = Config::load_with_env(config_path.as_deref())?;

    init_tracing(&config.logging);

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            run_server(&config).await?;
        }

        Commands::Extract { file, raw } => {
            commands::run_extract(&file, raw).await?;
        }

        Commands::Reviewer { file } => {
            commands::run_reviewer(&config, &file).await?;
        }

        Commands::Quiz { file, json } => {
            commands::run_quiz(&config, &file, json).await?;
        }

        Commands::Info => {
            commands::run_info(&config, config_path.as_deref())?;
        }
    }

    Ok(())
}
