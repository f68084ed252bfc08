//! Screen a single ticker against the live SEC registry.
//!
//! ```sh
//! MIZAN_USER_AGENT="Your Name you@example.com" cargo run -p mizan --example screen_ticker -- MSFT
//! ```

use mizan::data::edgar::ClientConfig;
use mizan::{ScreeningPolicy, Screener, text_report};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ticker = std::env::args().nth(1).unwrap_or_else(|| "MSFT".to_string());

    let mut config = ClientConfig::default();
    if let Ok(user_agent) = std::env::var("MIZAN_USER_AGENT") {
        config = config.with_user_agent(user_agent);
    }

    let screener = Screener::with_config(config, ScreeningPolicy::default())?;
    let screening = screener.screen(&ticker).await?;
    print!("{}", text_report(&screening));

    Ok(())
}
