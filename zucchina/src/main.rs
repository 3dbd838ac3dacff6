//! Zucchina - proxy-client configuration expander
//!
//! This is the main entry point for the Zucchina CLI.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zucchina_api::AppState;
use zucchina_config::{Section, Template};
use zucchina_core::config::{ConfigLoader, ZucchinaConfig};
use zucchina_core::{codec, Fetch, SourceFetcher};

/// Zucchina - expand and serve sectioned proxy-client configurations
#[derive(Parser)]
#[command(name = "zucchina")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the runtime configuration (TOML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a configuration and print it
    Render {
        /// Local path or http(s) URL of the source configuration
        source: String,

        /// URL announced in the managed-config line (defaults to the served URL)
        #[arg(long)]
        url: Option<String>,
    },

    /// Serve expanded configurations over HTTP
    Serve {
        /// Address to listen on (overrides the configuration)
        #[arg(long)]
        listen: Option<String>,
    },

    /// Parse a configuration and summarize its sections
    Validate {
        /// Local path or http(s) URL of the source configuration
        source: String,
    },

    /// Encode a source location into a request token
    Encode {
        location: String,
    },

    /// Decode a request token back into its source location
    Decode {
        token: String,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    init_tracing(&config, cli.verbose);

    if cli.verbose {
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Render { source, url } => {
            let fetcher = SourceFetcher::new(&config.fetch)?;
            let text = fetcher
                .fetch(&source)
                .await
                .with_context(|| format!("Failed to read {}", source))?;

            let url = url.unwrap_or_else(|| config.server.document_url(&codec::encode(&source)));
            let (rendered, report) = zucchina_config::process(&text, &url, &fetcher).await;

            for failure in &report.failures {
                tracing::warn!("⚠️ Skipped {}: {}", failure.location, failure.reason);
            }
            print!("{}", rendered);
        }

        Commands::Serve { listen } => {
            let listen = listen.unwrap_or_else(|| config.server.listen.clone());
            let addr: SocketAddr = listen
                .parse()
                .with_context(|| format!("Invalid listen address: {}", listen))?;

            let fetcher = SourceFetcher::new(&config.fetch)?.allow_local(config.server.allow_local_sources);
            let state = Arc::new(AppState::new(config.server.clone(), Arc::new(fetcher)));

            tracing::info!("🚀 Zucchina v{} starting", zucchina_core::VERSION);
            zucchina_api::run_server(addr, state).await?;
        }

        Commands::Validate { source } => {
            let fetcher = SourceFetcher::new(&config.fetch)?;
            let text = fetcher
                .fetch(&source)
                .await
                .with_context(|| format!("Failed to read {}", source))?;

            let template = Template::parse(&text, "");
            let document = template.document();

            println!("✅ Configuration '{}' parsed", source);
            for section in Section::ALL {
                if document.has_section(section) {
                    println!("  [{}] {} entries", section, document.entries(section).len());
                }
            }
        }

        Commands::Encode { location } => {
            println!("{}", codec::encode(&location));
        }

        Commands::Decode { token } => {
            println!("{}", codec::decode(&token)?);
        }

        Commands::Version => {
            println!("Zucchina v{}", zucchina_core::VERSION);
        }
    }

    Ok(())
}

/// Log to stderr so rendered output on stdout stays clean.
/// `RUST_LOG` wins over the configured level.
fn init_tracing(config: &ZucchinaConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
