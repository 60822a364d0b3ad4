//! eBay Finding API search keyed off catalog part numbers.

pub mod provider;

pub use provider::{EbayItem, EbayProvider};
