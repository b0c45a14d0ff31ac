//! link-topics - Suggest post topics from recent news

use clap::Parser;

use liblinkcast::logging::{LogFormat, LoggingConfig};
use liblinkcast::providers::{NewsApi, NewsProvider, NewsQuery};
use liblinkcast::{Config, LinkcastError, Result};

#[derive(Parser, Debug)]
#[command(name = "link-topics")]
#[command(about = "Suggest post topics from recent news", long_about = None)]
struct Cli {
    /// Search keywords
    #[arg(short, long, default_value = "artificial intelligence")]
    query: String,

    /// Article language code (e.g. en, es)
    #[arg(short, long)]
    language: Option<String>,

    /// How many days back to look
    #[arg(short, long)]
    days: Option<i64>,

    /// Maximum number of suggestions
    #[arg(short = 'n', long)]
    limit: Option<u32>,

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
    let config = Config::load_or_default()?;
    let news = NewsApi::from_env(&config.news)?;

    let mut query = NewsQuery::for_keywords(&cli.query, &config.news);
    if let Some(language) = cli.language {
        query.language = language;
    }
    if let Some(days) = cli.days {
        query.days_back = days;
    }
    if let Some(limit) = cli.limit {
        query.page_size = limit;
    }

    let suggestions = news.suggestions(&query).await?;

    match cli.format.as_str() {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&suggestions)
                .map_err(|e| LinkcastError::InvalidInput(e.to_string()))?
        ),
        _ => {
            if suggestions.is_empty() {
                println!("No articles found for '{}'.", cli.query);
                return Ok(());
            }
            for (i, suggestion) in suggestions.iter().enumerate() {
                match &suggestion.source {
                    Some(source) => println!("{}. {} ({})", i + 1, suggestion.title, source),
                    None => println!("{}. {}", i + 1, suggestion.title),
                }
                if let Some(description) = &suggestion.description {
                    println!("   {}", description);
                }
                println!("   {}", suggestion.url);
            }
        }
    }

    Ok(())
}
