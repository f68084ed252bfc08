//! Mizan CLI binary.
//!
//! Screens a single ticker from the command line or serves the check
//! endpoint over HTTP.

mod logging;
mod server;

use clap::{Parser, Subcommand, ValueEnum};
use logging::{LogFormat, init_logging};
use mizan::{CheckResponse, ScreeningPolicy, Screener, text_report};
use mizan_data::edgar::ClientConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "mizan")]
#[command(about = "Mizan: Shariah compliance screening from SEC EDGAR filings", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// User-Agent sent to the SEC, conventionally "Name email@domain"
    #[arg(long, global = true, env = "MIZAN_USER_AGENT")]
    user_agent: Option<String>,

    /// JSON screening policy overriding the default thresholds and exclusions
    #[arg(long, global = true, env = "MIZAN_POLICY")]
    policy: Option<PathBuf>,

    /// Base log level or filter directives
    #[arg(long, global = true, default_value = "info", env = "MIZAN_LOG_LEVEL")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a single ticker
    Check {
        /// Ticker symbol (case-insensitive)
        ticker: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Serve GET /api/check?ticker=XYZ
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:3000", env = "MIZAN_ADDR")]
        addr: SocketAddr,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Response JSON
    Json,
    /// Human-readable report
    Text,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_format);

    let policy = match &cli.policy {
        Some(path) => ScreeningPolicy::load(path)?,
        None => ScreeningPolicy::default(),
    };
    let mut config = ClientConfig::default();
    if let Some(user_agent) = cli.user_agent {
        config = config.with_user_agent(user_agent);
    }
    let screener = Screener::with_config(config, policy)?;

    match cli.command {
        Commands::Check { ticker, format } => check(&screener, &ticker, format).await?,
        Commands::Serve { addr } => server::serve(addr, screener).await?,
    }

    Ok(())
}

async fn check(
    screener: &Screener,
    ticker: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let screening = screener.screen(ticker).await?;

    match format {
        OutputFormat::Json => {
            let response = CheckResponse::from(&screening);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => print!("{}", text_report(&screening)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["mizan", "check", "aapl", "--format", "text"]).unwrap();
        match cli.command {
            Commands::Check { ticker, format } => {
                assert_eq!(ticker, "aapl");
                assert_eq!(format, OutputFormat::Text);
            }
            Commands::Serve { .. } => panic!("expected check"),
        }
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_parse_serve_with_globals() {
        let cli = Cli::try_parse_from([
            "mizan",
            "serve",
            "--addr",
            "0.0.0.0:8080",
            "--log-format",
            "json",
            "--user-agent",
            "Acme ops@acme.test",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Serve { addr } if addr.port() == 8080));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.user_agent.as_deref(), Some("Acme ops@acme.test"));
    }
}
