//! End-to-end screening of one ticker.

use crate::classifier::{self, ScreeningVerdict};
use crate::error::Result;
use crate::policy::ScreeningPolicy;
use crate::snapshot::FinancialSnapshot;
use mizan_data::edgar::{
    Cik, ClientConfig, HttpTransport, Industry, Pacer, RegistryClient, Ticker, TickerResolver,
    TokioPacer, Transport,
};
use tracing::{debug, info};

/// Everything learned while screening one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct Screening {
    /// Normalized ticker
    pub ticker: Ticker,
    /// Resolved filer identifier
    pub cik: Cik,
    /// Registered company name, when reported
    pub company_name: Option<String>,
    /// Industry classification
    pub industry: Industry,
    /// Extracted figures, absent when excluded by industry
    pub snapshot: Option<FinancialSnapshot>,
    /// The verdict
    pub verdict: ScreeningVerdict,
}

/// Screens tickers against a [`ScreeningPolicy`].
///
/// Requests run sequentially: resolve the CIK, fetch the filer profile for
/// the industry pre-check, then fetch company facts only when the industry
/// is permissible.
#[derive(Debug)]
pub struct Screener<T = HttpTransport, P = TokioPacer> {
    client: RegistryClient<T, P>,
    resolver: TickerResolver,
    policy: ScreeningPolicy,
}

impl Screener {
    /// Screener over the live registry.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig, policy: ScreeningPolicy) -> Result<Self> {
        Ok(Self::new(RegistryClient::with_config(config)?, policy))
    }
}

impl<T: Transport, P: Pacer> Screener<T, P> {
    /// Screener over an existing client, with the default resolution order.
    pub fn new(client: RegistryClient<T, P>, policy: ScreeningPolicy) -> Self {
        Self {
            client,
            resolver: TickerResolver::default(),
            policy,
        }
    }

    /// Replaces the ticker resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: TickerResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// The screening policy.
    pub const fn policy(&self) -> &ScreeningPolicy {
        &self.policy
    }

    /// The registry client.
    pub const fn client(&self) -> &RegistryClient<T, P> {
        &self.client
    }

    /// Screens one raw ticker.
    ///
    /// # Errors
    /// Fails on a blank ticker, an unresolvable ticker, an unreachable or
    /// undecodable registry, or when assets or revenue are missing.
    pub async fn screen(&self, raw_ticker: &str) -> Result<Screening> {
        let ticker = Ticker::parse(raw_ticker)?;
        let cik = self.resolver.resolve(&self.client, &ticker).await?;

        let profile = self.client.company_profile(cik).await?;
        let industry = profile.industry();

        if let Some(verdict) = classifier::screen_industry(&self.policy, &industry) {
            info!(
                ticker = %ticker,
                industry = %industry,
                note = %verdict.note,
                "excluded by industry"
            );
            return Ok(Screening {
                ticker,
                cik,
                company_name: profile.name,
                industry,
                snapshot: None,
                verdict,
            });
        }

        let facts = self.client.company_facts(cik).await?;
        let snapshot = FinancialSnapshot::from_facts(&facts);
        debug!(ticker = %ticker, ?snapshot, "extracted snapshot");
        snapshot.validate(ticker.as_str())?;

        let verdict = classifier::classify(&snapshot, &self.policy.thresholds);
        info!(
            ticker = %ticker,
            status = %verdict.status,
            note = %verdict.note,
            "screened"
        );

        Ok(Screening {
            ticker,
            cik,
            company_name: profile.name.or(facts.entity_name),
            industry,
            snapshot: Some(snapshot),
            verdict,
        })
    }
}
