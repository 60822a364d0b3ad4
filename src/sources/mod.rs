//! Upstream part sources (catalog scrape + marketplace search) and the
//! record shapes they share.

pub mod ebay;
pub mod rockauto;

use serde::{Deserialize, Serialize};

use crate::normalization::price::round2;

/// Where a ranked record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    RockAuto,
    Ebay,
}

/// Vehicle the caller is shopping for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub make: String,
    pub year: i32,
    pub model: String,
}

impl Vehicle {
    pub fn new(make: impl Into<String>, year: i32, model: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            year,
            model: model.into(),
        }
    }

    /// `"2015 Honda Civic"`, used for synthetic descriptions and keywords.
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

/// Listing scraped from the catalog site; only lives for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPartInfo {
    pub part_number: Option<String>,
    pub oem_number: Option<String>,
    pub description: String,
    pub price: f64,
    pub url: String,
    pub brand: String,
}

impl CatalogPartInfo {
    /// Catalog listings are new parts with shipping folded into the price.
    pub fn into_part_result(self) -> PartResult {
        PartResult {
            name: self.description,
            price: self.price,
            shipping: 0.0,
            total_price: self.price,
            brand: self.brand,
            condition: "New".to_string(),
            part_number: self.part_number,
            url: self.url,
            source: Source::RockAuto,
            is_best_deal: false,
        }
    }
}

/// Unified record returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartResult {
    pub name: String,
    pub price: f64,
    pub shipping: f64,
    pub total_price: f64,
    pub brand: String,
    pub condition: String,
    pub part_number: Option<String>,
    pub url: String,
    pub source: Source,
    #[serde(default)]
    pub is_best_deal: bool,
}

impl PartResult {
    /// Total is `price + shipping` in whole cents.
    pub fn total_of(price: f64, shipping: f64) -> f64 {
        round2(price + shipping)
    }
}

/// Typed result of one source fetch so callers can tell live data from
/// placeholder or partial data.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome<T> {
    /// Real upstream data (possibly empty).
    Live(Vec<T>),
    /// Fallback or partial data; `reason` is the first failure seen.
    Degraded { items: Vec<T>, reason: String },
    /// Source not configured, nothing was requested.
    Disabled,
}

impl<T> SourceOutcome<T> {
    pub fn items(&self) -> &[T] {
        match self {
            SourceOutcome::Live(items) => items.as_slice(),
            SourceOutcome::Degraded { items, .. } => items.as_slice(),
            SourceOutcome::Disabled => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            SourceOutcome::Live(items) => items,
            SourceOutcome::Degraded { items, .. } => items,
            SourceOutcome::Disabled => Vec::new(),
        }
    }

    pub fn status(&self) -> SourceStatus {
        match self {
            SourceOutcome::Live(_) => SourceStatus::Live,
            SourceOutcome::Degraded { .. } => SourceStatus::Degraded,
            SourceOutcome::Disabled => SourceStatus::Disabled,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Live,
    Degraded,
    Disabled,
}
