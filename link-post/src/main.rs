//! link-post - Publish a caption and image to LinkedIn

use clap::Parser;
use std::io::Read;
use std::path::PathBuf;

use liblinkcast::logging::{LogFormat, LoggingConfig};
use liblinkcast::{Config, Credentials, ImageAsset, LinkcastError, LinkedInClient, Result};

#[derive(Parser, Debug)]
#[command(name = "link-post")]
#[command(about = "Publish a caption and image to LinkedIn", long_about = None)]
struct Cli {
    /// Caption text (reads from stdin if not provided)
    caption: Option<String>,

    /// Path to the image to attach
    #[arg(short, long)]
    image: PathBuf,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::new(LogFormat::Text, "error".to_string(), cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let caption = match cli.caption {
        Some(caption) => caption,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| LinkcastError::InvalidInput(format!("Failed to read stdin: {}", e)))?;
            buffer.trim_end().to_string()
        }
    };

    if caption.trim().is_empty() {
        return Err(LinkcastError::InvalidInput(
            "Caption cannot be empty".to_string(),
        ));
    }

    // Fails before any network call if the file is missing or empty
    let asset = ImageAsset::probe(&cli.image)?;

    let credentials = Credentials::from_env()?;
    let config = Config::load_or_default()?;
    let client = LinkedInClient::with_api_base(credentials, &config.linkedin.api_base);

    let receipt = client.publish(&caption, &asset).await?;

    match cli.format.as_str() {
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&receipt)
                    .map_err(|e| LinkcastError::InvalidInput(e.to_string()))?
            );
        }
        _ => {
            println!(
                "Published post: {}",
                receipt.post_id.as_deref().unwrap_or("unknown")
            );
        }
    }

    Ok(())
}
