use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use telegram_post_extractor::config::Config;
use telegram_post_extractor::PostExtractor;

/// Extract posts from a saved Telegram channel preview page as JSON.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Channel username the page belongs to (without `@`).
    #[arg(env = "TELEGRAM_CHANNEL")]
    channel: String,

    /// HTML file of `https://t.me/s/<channel>`; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        static_proxy = %config.static_proxy,
        sticker_proxy = %config.sticker_proxy,
        "Configuration loaded"
    );

    let html = read_input(cli.input.as_ref())?;
    let channel = cli.channel.trim_start_matches('@');

    let extractor = PostExtractor::new(config);
    let posts = extractor.extract_page(&html, channel);

    info!(channel, count = posts.len(), "Extraction complete");

    let json = if cli.pretty {
        serde_json::to_string_pretty(&posts)
    } else {
        serde_json::to_string(&posts)
    }
    .context("Failed to serialize posts")?;

    println!("{json}");

    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut html = String::new();
            std::io::stdin()
                .read_to_string(&mut html)
                .context("Failed to read stdin")?;
            Ok(html)
        }
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,telegram_post_extractor=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    // stdout carries the extracted posts, so logs go to stderr.
    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
