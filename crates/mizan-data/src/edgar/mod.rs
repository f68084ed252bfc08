//! SEC EDGAR data fetching and parsing.
//!
//! This module provides access to the SEC EDGAR registry including:
//! - A paced, retrying client restricted to the SEC hosts
//! - Ticker to CIK resolution over three mapping files
//! - Filer profiles (SIC classification) from the submissions API
//! - XBRL company facts with annual-first, most-recent value selection
//!
//! # Example
//!
//! ```no_run
//! use mizan_data::edgar::{RegistryClient, Ticker, TickerResolver, concepts};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RegistryClient::new()?;
//!     let ticker = Ticker::parse("aapl")?;
//!     let cik = TickerResolver::default().resolve(&client, &ticker).await?;
//!
//!     let profile = client.company_profile(cik).await?;
//!     println!("Industry: {}", profile.industry());
//!
//!     let facts = client.company_facts(cik).await?;
//!     println!("Total Assets: {}", facts.pick(&[concepts::ASSETS]));
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod facts;
pub mod identifiers;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod resolver;
pub mod submissions;

// Re-export main types
pub use client::{
    ALLOWED_HOSTS, ClientConfig, HttpTransport, Pacer, RawResponse, RegistryClient, TokioPacer,
    Transport,
};
pub use facts::{CompanyFacts, DisclosureRecord, FilingType, concepts};
pub use identifiers::{Cik, Ticker};
pub use resolver::{ResolveStrategy, TickerResolver};
pub use submissions::{CompanyProfile, Industry};
