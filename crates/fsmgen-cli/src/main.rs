//! fsmgen CLI
//!
//! Compiles state machine descriptions into Rust source.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// fsmgen - State machine code generator
#[derive(Parser)]
#[command(name = "fsmgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "fsmgen.yaml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new fsmgen project
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,

        /// Project name (defaults to directory name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Validate descriptions without generating code
    Validate {
        /// Validate a single description file instead of the project
        input: Option<String>,
    },

    /// Generate Rust code from descriptions
    Compile {
        /// Compile a single description file instead of the project
        input: Option<String>,

        /// Output file (single input) or directory (project)
        #[arg(short, long)]
        output: Option<String>,

        /// Package to wrap generated code in, overriding the description
        #[arg(short, long)]
        package: Option<String>,

        /// Rewrite outputs even when their source hash is unchanged
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Init { path, name } => {
            commands::init::run(&path, name.as_deref()).await?;
        }
        Commands::Validate { input } => {
            commands::validate::run(&cli.config, input.as_deref()).await?;
        }
        Commands::Compile {
            input,
            output,
            package,
            force,
        } => {
            commands::compile::run(
                &cli.config,
                input.as_deref(),
                output.as_deref(),
                package.as_deref(),
                force,
            )
            .await?;
        }
    }

    Ok(())
}
