use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use audio_recognition::{BlockingAudioRecognizer, ClientConfig};

/// Audio recognition - ask a multimodal model about an audio clip
#[derive(Parser, Debug)]
#[command(name = "audio-recognition")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Task for the model, e.g. "Transcribe this recording"
    #[arg(short = 'p', long = "prompt")]
    prompt: String,

    /// Audio source: http(s) URL or local file path
    #[arg(value_name = "SOURCE")]
    source: String,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => {
            info!("Loading configuration from {}", path.display());
            ClientConfig::from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => ClientConfig::from_env().context("failed to load configuration from environment")?,
    };

    info!("Using model {} at {}", config.model, config.base_url);

    let recognizer = BlockingAudioRecognizer::new(config)?;
    let text = recognizer.speech_to_text(&cli.source, &cli.prompt)?;

    println!("{text}");
    Ok(())
}
