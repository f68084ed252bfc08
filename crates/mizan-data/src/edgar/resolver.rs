//! Ticker to CIK resolution over SEC mapping files.
//!
//! Three sources are consulted in order. The flat `ticker.txt` file is the
//! most authoritative, so a hit there wins even if a later map disagrees.
//! Failures of all but the last source are logged and skipped.

use super::client::{Pacer, RegistryClient, Transport};
use super::identifiers::{Cik, Ticker};
use crate::error::{DataError, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Flat `ticker<TAB>cik` text mapping.
pub const TICKER_TXT_URL: &str = "https://www.sec.gov/include/ticker.txt";

/// Company tickers JSON (`{"0": {"cik_str": .., "ticker": .., "title": ..}, ..}`).
pub const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Company tickers with exchange listing.
pub const COMPANY_TICKERS_EXCHANGE_URL: &str =
    "https://www.sec.gov/files/company_tickers_exchange.json";

/// One source of ticker to CIK mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveStrategy {
    /// `ticker.txt`, one pair per line
    TickerText,
    /// `company_tickers.json`
    CompanyTickers,
    /// `company_tickers_exchange.json`
    CompanyTickersExchange,
}

impl ResolveStrategy {
    /// Default priority order.
    pub const ORDER: [Self; 3] = [
        Self::TickerText,
        Self::CompanyTickers,
        Self::CompanyTickersExchange,
    ];

    /// Document consulted by this strategy.
    pub const fn url(self) -> &'static str {
        match self {
            Self::TickerText => TICKER_TXT_URL,
            Self::CompanyTickers => COMPANY_TICKERS_URL,
            Self::CompanyTickersExchange => COMPANY_TICKERS_EXCHANGE_URL,
        }
    }

    /// Fetch this strategy's document and look the ticker up.
    ///
    /// `Ok(None)` means the document was read but has no entry for the
    /// ticker.
    pub async fn try_resolve<T: Transport, P: Pacer>(
        self,
        client: &RegistryClient<T, P>,
        ticker: &Ticker,
    ) -> Result<Option<Cik>> {
        match self {
            Self::TickerText => {
                let text = client.fetch_text(self.url()).await?;
                find_in_ticker_text(&text, ticker)
            }
            Self::CompanyTickers | Self::CompanyTickersExchange => {
                let json: Value = client.fetch_json(self.url()).await?;
                find_in_ticker_json(&json, ticker)
            }
        }
    }
}

/// Resolves tickers by trying each [`ResolveStrategy`] in turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerResolver {
    strategies: Vec<ResolveStrategy>,
}

impl Default for TickerResolver {
    fn default() -> Self {
        Self::new(ResolveStrategy::ORDER.to_vec())
    }
}

impl TickerResolver {
    /// Resolver over a custom strategy order.
    pub const fn new(strategies: Vec<ResolveStrategy>) -> Self {
        Self { strategies }
    }

    /// Strategies in the order they are tried.
    pub fn strategies(&self) -> &[ResolveStrategy] {
        &self.strategies
    }

    /// Map a ticker to its CIK.
    ///
    /// # Errors
    /// Returns [`DataError::TickerNotFound`] when the final strategy fails or
    /// misses; its failure, if any, is kept as the source.
    pub async fn resolve<T: Transport, P: Pacer>(
        &self,
        client: &RegistryClient<T, P>,
        ticker: &Ticker,
    ) -> Result<Cik> {
        let not_found = |source: Option<DataError>| DataError::TickerNotFound {
            ticker: ticker.to_string(),
            source: source.map(Box::new),
        };

        let Some((last, leading)) = self.strategies.split_last() else {
            return Err(not_found(None));
        };

        for strategy in leading {
            match strategy.try_resolve(client, ticker).await {
                Ok(Some(cik)) => {
                    info!(%ticker, %cik, ?strategy, "resolved ticker");
                    return Ok(cik);
                }
                Ok(None) => debug!(%ticker, ?strategy, "no entry, falling back"),
                Err(e) => warn!(%ticker, ?strategy, error = %e, "strategy failed, falling back"),
            }
        }

        match last.try_resolve(client, ticker).await {
            Ok(Some(cik)) => {
                info!(%ticker, %cik, strategy = ?last, "resolved ticker");
                Ok(cik)
            }
            Ok(None) => Err(not_found(None)),
            Err(e) => Err(not_found(Some(e))),
        }
    }
}

/// Look a ticker up in the flat text mapping.
///
/// Lines are split on runs of `|` or whitespace; the first field is the
/// ticker, the second the CIK. Only the first matching line is considered;
/// a missing or zero CIK on that line is an error.
pub fn find_in_ticker_text(text: &str, ticker: &Ticker) -> Result<Option<Cik>> {
    for line in text.lines() {
        let mut fields = line
            .trim()
            .split(|c: char| c == '|' || c.is_whitespace())
            .filter(|f| !f.is_empty());

        if !fields.next().is_some_and(|f| ticker.matches(f)) {
            continue;
        }

        let cik = fields
            .next()
            .map(str::parse::<Cik>)
            .transpose()?
            .filter(|cik| cik.value() != 0)
            .ok_or_else(|| {
                DataError::Parse(format!("ticker.txt entry for {} has no CIK", ticker))
            })?;
        return Ok(Some(cik));
    }
    Ok(None)
}

/// Look a ticker up in a JSON mapping.
///
/// Accepts an array of records, an object whose values are records, or the
/// tabular `{"fields": [..], "data": [[..], ..]}` layout. Records are
/// matched on `ticker`; the CIK is read from `cik_str`, then `cik`.
pub fn find_in_ticker_json(json: &Value, ticker: &Ticker) -> Result<Option<Cik>> {
    match json {
        Value::Object(map) => match (map.get("fields"), map.get("data")) {
            (Some(Value::Array(fields)), Some(Value::Array(rows))) => {
                find_in_table(fields, rows, ticker)
            }
            _ => find_in_records(map.values(), ticker),
        },
        Value::Array(items) => find_in_records(items.iter(), ticker),
        _ => Err(DataError::Parse(
            "ticker map is neither an object nor an array".to_string(),
        )),
    }
}

fn find_in_records<'a>(
    records: impl Iterator<Item = &'a Value>,
    ticker: &Ticker,
) -> Result<Option<Cik>> {
    for record in records {
        let symbol = record.get("ticker").and_then(Value::as_str);
        if !symbol.is_some_and(|s| ticker.matches(s)) {
            continue;
        }

        let cik = ["cik_str", "cik"]
            .iter()
            .filter_map(|key| record.get(*key))
            .find_map(cik_from_value)
            .ok_or_else(|| DataError::Parse(format!("entry for {} has no CIK", ticker)))?;
        return Ok(Some(cik));
    }
    Ok(None)
}

fn find_in_table(fields: &[Value], rows: &[Value], ticker: &Ticker) -> Result<Option<Cik>> {
    let (Some(ticker_col), Some(cik_col)) = (
        column_index(fields, &["ticker"]),
        column_index(fields, &["cik", "cik_str"]),
    ) else {
        return Err(DataError::Parse(
            "ticker table lacks ticker or cik column".to_string(),
        ));
    };

    for row in rows.iter().filter_map(Value::as_array) {
        let symbol = row.get(ticker_col).and_then(Value::as_str);
        if !symbol.is_some_and(|s| ticker.matches(s)) {
            continue;
        }

        let cik = row
            .get(cik_col)
            .and_then(cik_from_value)
            .ok_or_else(|| DataError::Parse(format!("row for {} has no CIK", ticker)))?;
        return Ok(Some(cik));
    }
    Ok(None)
}

fn column_index(fields: &[Value], names: &[&str]) -> Option<usize> {
    fields
        .iter()
        .position(|f| f.as_str().is_some_and(|f| names.contains(&f)))
}

/// CIK from a JSON number or numeric string; zero and blanks count as absent.
fn cik_from_value(value: &Value) -> Option<Cik> {
    let cik = match value {
        Value::Number(n) => n.as_u64().map(Cik::new),
        Value::String(s) => s.parse::<Cik>().ok(),
        _ => None,
    }?;
    (cik.value() != 0).then_some(cik)
}
