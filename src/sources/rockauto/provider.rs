use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect, Client};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::categories::{self, CategoryPath};
use crate::normalization::price::parse_price_text;
use crate::sources::{CatalogPartInfo, SourceOutcome, Vehicle};

pub const DEFAULT_BASE_URL: &str = "https://www.rockauto.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;

/// Only the first rows of a listing page are considered.
pub const MAX_LISTING_ROWS: usize = 6;

pub const ECONOMY_FALLBACK_PRICE: f64 = 59.99;
pub const OEM_FALLBACK_PRICE: f64 = 119.99;

const DEFAULT_BRAND: &str = "Aftermarket";

const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/120.0.0.0 Safari/537.36";

struct ListingSelectors {
    row: Selector,
    brand: Selector,
    text: Selector,
    price: Selector,
    part_number: Selector,
}

static SELECTORS: OnceLock<ListingSelectors> = OnceLock::new();

fn selectors() -> &'static ListingSelectors {
    SELECTORS.get_or_init(|| {
        let parse = |css: &str| Selector::parse(css).expect("static listing selector");
        ListingSelectors {
            row: parse(".listing-text-row"),
            brand: parse(".listing-text-row-brand"),
            text: parse(".listing-text-row-text"),
            price: parse(".listing-price"),
            part_number: parse(".listing-text-row-mfr-label"),
        }
    })
}

/// RockAuto catalog scraper.
///
/// One GET per lookup against
/// `{base}/en/catalog/{make},{year},{model},{group},{leaf}`; the listing rows
/// of that page become [`CatalogPartInfo`] records. Any failure degrades to
/// two synthetic Economy/OEM listings instead of an error.
#[derive(Debug, Clone)]
pub struct RockAutoProvider {
    base_url: String,
    http: Client,
}

impl RockAutoProvider {
    pub fn new(base_url: Option<&str>, timeout_secs: Option<u64>) -> Result<Self> {
        let base_url = base_url
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let timeout_secs = timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let http = Client::builder()
            .user_agent(BROWSER_UA)
            .default_headers(headers)
            .redirect(redirect::Policy::limited(10))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build RockAuto HTTP client")?;

        Ok(Self { base_url, http })
    }

    /// `{base}/en/catalog/honda,2015,civic+si`
    pub fn vehicle_url(&self, vehicle: &Vehicle) -> String {
        format!("{}/en/catalog/{}", self.base_url, vehicle_segment(vehicle))
    }

    pub fn catalog_url(&self, vehicle: &Vehicle, path: &CategoryPath) -> String {
        format!("{},{},{}", self.vehicle_url(vehicle), path.group, path.leaf)
    }

    /// Scrape the listing page for `category`. Never fails: upstream errors,
    /// non-success responses and pages without priced rows all come back as
    /// [`SourceOutcome::Degraded`] carrying the fallback listings.
    pub async fn fetch_parts(
        &self,
        vehicle: &Vehicle,
        category: &str,
    ) -> SourceOutcome<CatalogPartInfo> {
        let path = categories::resolve(category);
        let label = categories::part_label(category);
        let url = self.catalog_url(vehicle, path);

        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(url = %url, error = %e, "rockauto request failed; using fallback listings");
                let reason = format!("request failed: {e}");
                return degraded(vehicle, label, &self.vehicle_url(vehicle), reason);
            }
        };

        let status = resp.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "rockauto non-success; using fallback listings");
            return degraded(vehicle, label, &url, format!("catalog returned {status}"));
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %url, error = %e, "rockauto body read failed; using fallback listings");
                let reason = format!("body read failed: {e}");
                return degraded(vehicle, label, &self.vehicle_url(vehicle), reason);
            }
        };

        let parts = parse_listing_rows(&body, vehicle, &url);
        if parts.is_empty() {
            warn!(url = %url, bytes = body.len(), "rockauto page had no priced rows");
            return degraded(vehicle, label, &url, "no priced listing rows".to_string());
        }

        debug!(url = %url, rows = parts.len(), "rockauto listings parsed");
        SourceOutcome::Live(parts)
    }
}

fn degraded(
    vehicle: &Vehicle,
    label: &str,
    url: &str,
    reason: String,
) -> SourceOutcome<CatalogPartInfo> {
    SourceOutcome::Degraded {
        items: fallback_parts(vehicle, label, url),
        reason,
    }
}

pub fn vehicle_segment(vehicle: &Vehicle) -> String {
    format!(
        "{},{},{}",
        vehicle.make.to_lowercase(),
        vehicle.year,
        vehicle.model.to_lowercase().replace(' ', "+")
    )
}

/// Whitespace-stripped text of an element; `None` when nothing is left.
fn stripped_text(el: ElementRef<'_>) -> Option<String> {
    let text: String = el.text().map(str::trim).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the first [`MAX_LISTING_ROWS`] listing rows of a catalog page.
/// Rows without a `0.00`-style price are skipped.
pub fn parse_listing_rows(html: &str, vehicle: &Vehicle, url: &str) -> Vec<CatalogPartInfo> {
    let sel = selectors();
    let doc = Html::parse_document(html);

    let mut parts = Vec::new();
    for row in doc.select(&sel.row).take(MAX_LISTING_ROWS) {
        let first_text = |s: &Selector| row.select(s).next().and_then(stripped_text);

        let Some(price) = row
            .select(&sel.price)
            .next()
            .and_then(stripped_text)
            .and_then(|t| parse_price_text(&t))
        else {
            continue;
        };

        parts.push(CatalogPartInfo {
            part_number: first_text(&sel.part_number),
            oem_number: None,
            description: first_text(&sel.text)
                .unwrap_or_else(|| format!("{} Part", vehicle.describe())),
            price,
            url: url.to_string(),
            brand: first_text(&sel.brand).unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        });
    }
    parts
}

/// Economy and OEM placeholders shown when the live catalog is unusable.
pub fn fallback_parts(vehicle: &Vehicle, label: &str, url: &str) -> Vec<CatalogPartInfo> {
    let base = format!("{} {}", vehicle.describe(), label);
    vec![
        CatalogPartInfo {
            part_number: None,
            oem_number: None,
            description: format!("{base} (Economy)"),
            price: ECONOMY_FALLBACK_PRICE,
            url: url.to_string(),
            brand: "Economy".to_string(),
        },
        CatalogPartInfo {
            part_number: None,
            oem_number: None,
            description: format!("{base} (OEM)"),
            price: OEM_FALLBACK_PRICE,
            url: url.to_string(),
            brand: "OEM".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceStatus;
    use crate::test_support::serve_fixed;
    use actix_web::http::StatusCode;

    const LISTING_PAGE: &str = r#"
        <html><body><table>
          <tr class="listing-text-row">
            <td><span class="listing-text-row-brand"> REPLACEMENT </span></td>
            <td><span class="listing-text-row-text">Front Bumper Cover; Primed</span></td>
            <td><span class="listing-text-row-mfr-label">HO1000301</span></td>
            <td><span class="listing-price">$1,089.79</span></td>
          </tr>
          <tr class="listing-text-row">
            <td><span class="listing-text-row-brand">TYC</span></td>
            <td><span class="listing-price">Out of stock</span></td>
          </tr>
          <tr class="listing-text-row">
            <td><span class="listing-price">$64.50</span></td>
          </tr>
        </table></body></html>
    "#;

    fn civic() -> Vehicle {
        Vehicle::new("Honda", 2015, "Civic Si")
    }

    #[test]
    fn builds_lowercased_catalog_url() {
        let p = RockAutoProvider::new(Some("https://www.rockauto.com/"), None).unwrap();
        let url = p.catalog_url(&civic(), categories::resolve("mirror"));
        assert_eq!(
            url,
            "https://www.rockauto.com/en/catalog/honda,2015,civic+si,body+%26+lamp+assembly,mirror+-+side+view"
        );
        assert_eq!(p.vehicle_url(&civic()), "https://www.rockauto.com/en/catalog/honda,2015,civic+si");
    }

    #[test]
    fn parses_rows_and_skips_unpriced() {
        let parts = parse_listing_rows(LISTING_PAGE, &civic(), "u");
        assert_eq!(parts.len(), 2);

        assert_eq!(parts[0].brand, "REPLACEMENT");
        assert_eq!(parts[0].description, "Front Bumper Cover; Primed");
        assert_eq!(parts[0].part_number.as_deref(), Some("HO1000301"));
        assert_eq!(parts[0].price, 1089.79);
        assert_eq!(parts[0].url, "u");

        assert_eq!(parts[1].brand, "Aftermarket");
        assert_eq!(parts[1].description, "2015 Honda Civic Si Part");
        assert_eq!(parts[1].part_number, None);
        assert_eq!(parts[1].price, 64.5);
    }

    #[test]
    fn only_first_six_rows_are_read() {
        let row = r#"<div class="listing-text-row"><span class="listing-price">$10.00</span></div>"#;
        let html = format!("<html><body>{}</body></html>", row.repeat(9));
        assert_eq!(parse_listing_rows(&html, &civic(), "u").len(), MAX_LISTING_ROWS);
    }

    #[test]
    fn fallback_has_economy_and_oem() {
        let parts = fallback_parts(&civic(), "Hood", "u");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].description, "2015 Honda Civic Si Hood (Economy)");
        assert_eq!(parts[0].price, ECONOMY_FALLBACK_PRICE);
        assert_eq!(parts[0].brand, "Economy");
        assert_eq!(parts[1].description, "2015 Honda Civic Si Hood (OEM)");
        assert_eq!(parts[1].price, OEM_FALLBACK_PRICE);
        assert!(parts.iter().all(|p| p.part_number.is_none() && p.url == "u"));
    }

    #[tokio::test]
    async fn unreachable_catalog_falls_back_to_vehicle_url() {
        let p = RockAutoProvider::new(Some("http://127.0.0.1:1"), Some(2)).unwrap();
        let outcome = p.fetch_parts(&civic(), "glass").await;
        assert_eq!(outcome.status(), SourceStatus::Degraded);
        let items = outcome.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].price, 59.99);
        assert_eq!(items[1].price, 119.99);
        assert_eq!(items[0].description, "2015 Honda Civic Si Windshield Glass (Economy)");
        assert_eq!(items[0].url, "http://127.0.0.1:1/en/catalog/honda,2015,civic+si");
    }

    #[actix_web::test]
    async fn live_page_is_parsed() {
        let base = serve_fixed(StatusCode::OK, "text/html", LISTING_PAGE);
        let p = RockAutoProvider::new(Some(&base), Some(5)).unwrap();
        let outcome = p.fetch_parts(&civic(), "body").await;
        assert_eq!(outcome.status(), SourceStatus::Live);
        assert_eq!(outcome.items().len(), 2);
        assert!(outcome.items()[0].url.ends_with(",body+%26+lamp+assembly,bumper+cover"));
    }

    #[actix_web::test]
    async fn error_status_falls_back_to_catalog_url() {
        let base = serve_fixed(StatusCode::SERVICE_UNAVAILABLE, "text/html", "down");
        let p = RockAutoProvider::new(Some(&base), Some(5)).unwrap();
        let outcome = p.fetch_parts(&civic(), "unknown-category").await;
        assert_eq!(outcome.status(), SourceStatus::Degraded);
        let items = outcome.items();
        assert_eq!(items[0].description, "2015 Honda Civic Si Part (Economy)");
        assert!(items[0].url.ends_with(",body+%26+lamp+assembly,bumper+cover"));
    }

    #[actix_web::test]
    async fn page_without_rows_falls_back() {
        let base = serve_fixed(StatusCode::OK, "text/html", "<html><body>nothing here</body></html>");
        let p = RockAutoProvider::new(Some(&base), Some(5)).unwrap();
        let outcome = p.fetch_parts(&civic(), "body").await;
        match outcome {
            SourceOutcome::Degraded { items, reason } => {
                assert_eq!(items.len(), 2);
                assert_eq!(reason, "no priced listing rows");
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }
}
