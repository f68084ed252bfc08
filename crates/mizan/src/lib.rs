#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/mizan-screen/mizan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod classifier;
pub mod error;
pub mod pipeline;
pub mod policy;
pub mod response;
pub mod snapshot;

// Registry access
pub use mizan_data as data;

pub use classifier::{Ratios, ScreeningVerdict, Status, classify, screen_industry};
pub use error::{Result, ScreenError};
pub use pipeline::{Screener, Screening};
pub use policy::{ExclusionCategory, ScreeningPolicy, Thresholds};
pub use response::{CACHE_CONTROL, CheckResponse, ErrorResponse, text_report};
pub use snapshot::FinancialSnapshot;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
