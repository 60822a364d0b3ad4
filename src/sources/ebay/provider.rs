use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::normalization::price::value_as_f64;
use crate::sources::{CatalogPartInfo, PartResult, Source, SourceOutcome, Vehicle};

pub const DEFAULT_FINDING_URL: &str = "https://svcs.ebay.com/services/search/FindingService/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// eBay Motors > Parts & Accessories.
pub const PARTS_CATEGORY_ID: &str = "6028";
pub const ENTRIES_PER_PAGE: u32 = 5;
/// Catalog records searched per request.
pub const MAX_SEARCHED_RECORDS: usize = 3;

const SELLER_BRAND: &str = "eBay Seller";
const DEFAULT_CONDITION: &str = "Used";

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push('…');
    }
    s
}

/// Item parsed out of a Finding API response, before it is tied to a
/// catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct EbayItem {
    pub title: String,
    pub price: f64,
    pub shipping: f64,
    pub condition: String,
    pub url: String,
}

impl EbayItem {
    pub fn into_part_result(self, part_number: Option<String>) -> PartResult {
        PartResult {
            total_price: PartResult::total_of(self.price, self.shipping),
            name: self.title,
            price: self.price,
            shipping: self.shipping,
            brand: SELLER_BRAND.to_string(),
            condition: self.condition,
            part_number,
            url: self.url,
            source: Source::Ebay,
            is_best_deal: false,
        }
    }
}

/// eBay Finding API (`findItemsByKeywords`) client.
///
/// Without an app id the provider is disabled and never touches the network.
#[derive(Debug, Clone)]
pub struct EbayProvider {
    finding_url: String,
    http: Client,
    app_id: Option<String>,
}

impl EbayProvider {
    pub fn new(finding_url: Option<&str>, timeout_secs: Option<u64>) -> Result<Self> {
        let finding_url = finding_url.unwrap_or(DEFAULT_FINDING_URL).to_string();
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build eBay HTTP client")?;

        Ok(Self {
            finding_url,
            http,
            app_id: None,
        })
    }

    pub fn with_app_id(mut self, app_id: Option<String>) -> Self {
        self.app_id = app_id.filter(|s| !s.trim().is_empty());
        self
    }

    /// Whether a key is present (not whether eBay accepts it).
    pub fn is_configured(&self) -> bool {
        self.app_id.is_some()
    }

    /// Search eBay for the first [`MAX_SEARCHED_RECORDS`] catalog records,
    /// one call per record, in order.
    ///
    /// A failed call only loses that record's results; the outcome is then
    /// `Degraded` with whatever the other calls returned.
    pub async fn search_by_parts(
        &self,
        catalog: &[CatalogPartInfo],
        vehicle: &Vehicle,
    ) -> SourceOutcome<PartResult> {
        let Some(app_id) = self.app_id.as_deref() else {
            return SourceOutcome::Disabled;
        };

        let mut results = Vec::new();
        let mut first_error: Option<String> = None;

        for record in catalog.iter().take(MAX_SEARCHED_RECORDS) {
            let keywords = build_keywords(record, vehicle);
            match self.find_items(app_id, &keywords).await {
                Ok(items) => {
                    debug!(keywords = %keywords, items = items.len(), "ebay search ok");
                    results.extend(
                        items
                            .into_iter()
                            .map(|item| item.into_part_result(record.part_number.clone())),
                    );
                }
                Err(e) => {
                    warn!(keywords = %keywords, error = %e, "ebay search failed; skipping keywords");
                    first_error.get_or_insert_with(|| format!("{keywords}: {e:#}"));
                }
            }
        }

        match first_error {
            None => SourceOutcome::Live(results),
            Some(reason) => SourceOutcome::Degraded {
                items: results,
                reason,
            },
        }
    }

    async fn find_items(&self, app_id: &str, keywords: &str) -> Result<Vec<EbayItem>> {
        let resp = self
            .http
            .get(&self.finding_url)
            .header("Accept", "application/json")
            .query(&search_params(app_id, keywords))
            .send()
            .await
            .context("finding api request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = truncate_for_log(resp.text().await.unwrap_or_default(), 500);
            return Err(anyhow!("finding api returned {status} body={body}"));
        }

        let body: Value = resp
            .json()
            .await
            .context("finding api returned invalid json")?;
        parse_find_items_response(&body)
    }
}

/// Query string for one `findItemsByKeywords` call.
pub fn search_params(app_id: &str, keywords: &str) -> Vec<(&'static str, String)> {
    vec![
        ("OPERATION-NAME", "findItemsByKeywords".to_string()),
        ("SERVICE-VERSION", "1.0.0".to_string()),
        ("SECURITY-APPNAME", app_id.to_string()),
        ("RESPONSE-DATA-FORMAT", "JSON".to_string()),
        ("keywords", keywords.to_string()),
        ("categoryId", PARTS_CATEGORY_ID.to_string()),
        ("sortOrder", "PricePlusShippingLowest".to_string()),
        ("paginationInput.entriesPerPage", ENTRIES_PER_PAGE.to_string()),
    ]
}

/// Part and OEM numbers OR'ed together, or a vehicle description when the
/// record carries neither.
pub fn build_keywords(record: &CatalogPartInfo, vehicle: &Vehicle) -> String {
    let numbers: Vec<&str> = [record.part_number.as_deref(), record.oem_number.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect();

    if numbers.is_empty() {
        format!("{} {}", vehicle.describe(), record.description)
    } else {
        numbers.join(" OR ")
    }
}

/// The Finding API wraps every field in a single-element array.
fn first<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.get(key)?.as_array()?.first()
}

fn first_str<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    first(v, key)?.as_str()
}

/// Items of a `findItemsByKeywordsResponse` envelope. A missing result list
/// is zero items; an explicit `Failure` ack or an item without title, price
/// or URL is an error.
pub fn parse_find_items_response(body: &Value) -> Result<Vec<EbayItem>> {
    let Some(envelope) = first(body, "findItemsByKeywordsResponse") else {
        return Ok(Vec::new());
    };

    if first_str(envelope, "ack") == Some("Failure") {
        let message = first(envelope, "errorMessage")
            .and_then(|m| first(m, "error"))
            .and_then(|e| first_str(e, "message"))
            .unwrap_or("unknown error");
        return Err(anyhow!("finding api failure: {message}"));
    }

    let Some(items) = first(envelope, "searchResult")
        .and_then(|r| r.get("item"))
        .and_then(Value::as_array)
    else {
        return Ok(Vec::new());
    };

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| parse_item(item).with_context(|| format!("item {idx}")))
        .collect()
}

fn parse_item(item: &Value) -> Result<EbayItem> {
    let title = first_str(item, "title").context("missing title")?;
    let url = first_str(item, "viewItemURL").context("missing viewItemURL")?;
    let price = first(item, "sellingStatus")
        .and_then(|s| first(s, "currentPrice"))
        .and_then(|p| p.get("__value__"))
        .and_then(value_as_f64)
        .context("missing sellingStatus.currentPrice")?;

    let shipping = match first(item, "shippingInfo").and_then(|s| first(s, "shippingServiceCost")) {
        Some(cost) => cost
            .get("__value__")
            .and_then(value_as_f64)
            .context("unparseable shippingServiceCost")?
            .max(0.0),
        None => 0.0,
    };

    let condition = first(item, "condition")
        .and_then(|c| first_str(c, "conditionDisplayName"))
        .unwrap_or(DEFAULT_CONDITION);

    Ok(EbayItem {
        title: title.to_string(),
        price,
        shipping,
        condition: condition.to_string(),
        url: url.to_string(),
    })
}
