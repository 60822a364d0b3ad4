//! RockAuto catalog scrape.

pub mod categories;
pub mod provider;

pub use provider::RockAutoProvider;
