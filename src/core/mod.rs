//! Core conversion logic and abstractions

pub mod amount;
pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod price;

// Re-export main types for cleaner imports
pub use amount::ToAmount;
pub use currency::{CurrencyCode, DEFAULT_CURRENCY, RateResolver, STABLE_COIN_ID, normalize};
pub use error::ConversionError;
pub use price::PriceLookup;
