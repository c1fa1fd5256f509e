pub mod static_prices;

pub use static_prices::StaticPriceLookup;
