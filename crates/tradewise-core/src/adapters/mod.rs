//! Provider adapters implementing [`MarketDataSource`](crate::MarketDataSource).

pub mod yahoo;

pub use yahoo::YahooAdapter;
