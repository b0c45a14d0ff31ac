//! link-whoami - Resolve the author URN for a LinkedIn access token
//!
//! Setup helper for the other tools: given `LINKEDIN_ACCESS_TOKEN`, asks
//! the userinfo endpoint who the token belongs to and prints the URN to
//! put in `LINKEDIN_AUTHOR_URN`.

use clap::Parser;

use liblinkcast::credentials::{self, ACCESS_TOKEN_VAR};
use liblinkcast::error::ConfigError;
use liblinkcast::logging::{LogFormat, LoggingConfig};
use liblinkcast::{Config, Result};

#[derive(Parser, Debug)]
#[command(name = "link-whoami")]
#[command(about = "Resolve the author URN for a LinkedIn access token", long_about = None)]
struct Cli {
    /// Access token (falls back to LINKEDIN_ACCESS_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// Print only the URN, without the setup hint
    #[arg(short, long)]
    quiet: bool,

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
    let token = match cli.token {
        Some(token) => token,
        None => {
            dotenvy::dotenv().ok();
            match std::env::var(ACCESS_TOKEN_VAR) {
                Ok(token) if !token.trim().is_empty() => token.trim().to_string(),
                _ => return Err(ConfigError::MissingVar(ACCESS_TOKEN_VAR.to_string()).into()),
            }
        }
    };

    let config = Config::load_or_default()?;
    let urn = credentials::discover_author_urn(&token, &config.linkedin.api_base).await?;

    if cli.quiet {
        println!("{}", urn);
    } else {
        println!("Author URN: {}", urn);
        println!("Set it for the other tools with:");
        println!("  export LINKEDIN_AUTHOR_URN={}", urn);
    }

    Ok(())
}
