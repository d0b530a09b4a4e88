//! docprompt command-line interface.
//!
//! `docprompt serve` starts the HTTP service; `docprompt extract <FILE>` runs
//! the same pipeline against a local file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docprompt::api::ExtractMetadataResponse;
use docprompt::{ExtractionConfig, SupportedTypes, process_file};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docprompt")]
#[command(version, about = "Document metadata extraction for prompt building", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(short = 'H', long, env = "DOCPROMPT_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "DOCPROMPT_PORT", default_value_t = 5000)]
        port: u16,

        /// Config file (.toml, .yaml, .yml or .json); discovered from the working directory when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Extract metadata from a local file
    Extract {
        /// Document to process
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Same JSON body the HTTP endpoint returns
    Json,
    /// Rendered prompt context only
    Text,
}

fn load_config(path: Option<&Path>) -> Result<ExtractionConfig> {
    if let Some(path) = path {
        return ExtractionConfig::from_file(path).with_context(|| format!("Failed to load config {}", path.display()));
    }

    Ok(ExtractionConfig::discover()
        .context("Failed to discover docprompt.toml")?
        .unwrap_or_default())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, config } => {
            let config = load_config(config.as_deref())?;
            docprompt::api::serve_with_config(&host, port, config)
                .await
                .context("Server exited with an error")?;
            Ok(())
        }

        Commands::Extract { file, format, config } => {
            let config = load_config(config.as_deref())?;
            let supported = SupportedTypes::default();

            let processed = tokio::task::spawn_blocking(move || process_file(&file, &config, &supported))
                .await
                .context("Extraction task panicked")??;

            match format {
                OutputFormat::Json => {
                    let response = ExtractMetadataResponse {
                        success: true,
                        metadata: processed.metadata,
                        prompt_context: processed.prompt_context,
                    };
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                OutputFormat::Text => println!("{}", processed.prompt_context),
            }

            Ok(())
        }
    }
}
