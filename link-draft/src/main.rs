//! link-draft - Compose a LinkedIn post draft from a topic
//!
//! Gathers search context, generates post text and an image, and shows
//! the result for review. With `--publish` the operator approves the
//! draft interactively (or skips the prompt with `--yes`) and it goes
//! out through the publication sequence.

use clap::Parser;
use std::io::{BufRead, Write};

use liblinkcast::composer::discard_image;
use liblinkcast::logging::{LogFormat, LoggingConfig};
use liblinkcast::providers::{GoogleSearch, OpenAiImage, OpenAiText};
use liblinkcast::{
    Config, Credentials, Draft, DraftComposer, ImageAsset, LinkcastError, LinkedInClient, Result,
};

#[derive(Parser, Debug)]
#[command(name = "link-draft")]
#[command(about = "Compose a LinkedIn post draft from a topic", long_about = None)]
struct Cli {
    /// Topic to draft a post about (reads from stdin if not provided)
    topic: Option<String>,

    /// Publish the draft after composing it
    #[arg(short, long)]
    publish: bool,

    /// Skip the confirmation prompt when publishing
    #[arg(short = 'y', long)]
    yes: bool,

    /// Keep the staged image file after publishing
    #[arg(long)]
    keep_image: bool,

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
    let topic = match &cli.topic {
        Some(topic) => topic.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut buffer)
                .map_err(|e| LinkcastError::InvalidInput(format!("Failed to read stdin: {}", e)))?;
            buffer.trim().to_string()
        }
    };

    let config = Config::load_or_default()?;

    let composer = DraftComposer::new(
        Box::new(GoogleSearch::from_env(&config.search)?),
        Box::new(OpenAiText::from_env(&config.openai)?),
        Box::new(OpenAiImage::from_env(&config.openai)?),
    );

    let draft = composer.compose(&topic).await?;

    match cli.format.as_str() {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&draft)
                .map_err(|e| LinkcastError::InvalidInput(e.to_string()))?
        ),
        _ => print_preview(&draft),
    }

    if !cli.publish {
        println!(
            "\nStaged image kept at {} — publish with:\n  link-post --image {} \"...\"",
            draft.image_path.display(),
            draft.image_path.display()
        );
        return Ok(());
    }

    if !cli.yes && !confirm("Publish this post to LinkedIn? (y/N): ")? {
        println!("Publication cancelled.");
        if !cli.keep_image {
            discard_image(&draft.image_path);
        }
        return Ok(());
    }

    let asset = ImageAsset::probe(&draft.image_path)?;
    let credentials = Credentials::from_env()?;
    let client = LinkedInClient::with_api_base(credentials, &config.linkedin.api_base);

    let result = client.publish(&draft.content, &asset).await;

    if !cli.keep_image {
        discard_image(&draft.image_path);
    }

    let receipt = result?;
    println!(
        "Published post: {}",
        receipt.post_id.as_deref().unwrap_or("unknown")
    );

    Ok(())
}

fn print_preview(draft: &Draft) {
    println!("--- Draft: {} ---", draft.topic);
    println!("{}", draft.content);
    println!("---");
    if let Some(url) = &draft.image_url {
        println!("Image URL: {}", url);
    }
    println!("Image staged at: {}", draft.image_path.display());
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    std::io::stdout()
        .flush()
        .map_err(|e| LinkcastError::InvalidInput(e.to_string()))?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| LinkcastError::InvalidInput(format!("Failed to read stdin: {}", e)))?;

    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
