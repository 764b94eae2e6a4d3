//! # Domain Models
//!
//! Strongly-typed inputs of an analysis request.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`Bar`] | Daily OHLCV bar |
//! | [`BarSeries`] | Ordered bars for one symbol |
//! | [`RiskProfile`] | Conservative / moderate / aggressive |
//! | [`InvestmentHorizon`] | Short / medium / long term |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Every type validates its invariants at construction time:
//!
//! ```rust
//! use tradewise_core::{Symbol, ValidationError};
//!
//! assert_eq!(Symbol::parse(" msft ").unwrap().as_str(), "MSFT");
//! assert!(matches!(Symbol::parse(""), Err(ValidationError::EmptySymbol)));
//! ```

mod models;
mod profile;
mod symbol;
mod timestamp;

pub use models::{Bar, BarSeries};
pub use profile::{InvestmentHorizon, RiskProfile};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
