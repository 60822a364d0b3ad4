//! Per-request aggregation: scrape the catalog, search the marketplace with
//! its part numbers, merge both and rank by total price.

use tracing::info;

use crate::api::models::{PartsRequest, PartsResponse, SourceCounts, SourceStatuses};
use crate::normalization::price::ranking_key;
use crate::sources::ebay::EbayProvider;
use crate::sources::rockauto::RockAutoProvider;
use crate::sources::{PartResult, Source};

/// Shared by all request handlers; holds only immutable config and HTTP
/// clients.
#[derive(Debug, Clone)]
pub struct PartsService {
    rockauto: RockAutoProvider,
    ebay: EbayProvider,
}

impl PartsService {
    pub fn new(rockauto: RockAutoProvider, ebay: EbayProvider) -> Self {
        Self { rockauto, ebay }
    }

    pub fn ebay_configured(&self) -> bool {
        self.ebay.is_configured()
    }

    /// Always answers: each source degrades on its own instead of failing
    /// the request.
    pub async fn compare(&self, req: &PartsRequest) -> PartsResponse {
        let vehicle = req.vehicle();

        // The uninformed search has no catalog records yet; it is superseded
        // below whenever the catalog produced anything.
        let (catalog, mut marketplace) = tokio::join!(
            self.rockauto.fetch_parts(&vehicle, &req.category),
            self.ebay.search_by_parts(&[], &vehicle),
        );

        if !catalog.items().is_empty() {
            marketplace = self.ebay.search_by_parts(catalog.items(), &vehicle).await;
        }

        let source_status = SourceStatuses {
            rockauto: catalog.status(),
            ebay: marketplace.status(),
        };

        let mut parts: Vec<PartResult> = catalog
            .into_items()
            .into_iter()
            .map(|info| info.into_part_result())
            .collect();
        parts.extend(marketplace.into_items());

        let response = build_response(rank_parts(parts), source_status);

        info!(
            make = %req.make,
            year = req.year,
            model = %req.model,
            category = %req.category,
            count = response.count,
            rockauto = ?response.source_status.rockauto,
            ebay = ?response.source_status.ebay,
            "parts compared"
        );
        response
    }
}

/// Stable ascending sort by total price with non-positive totals last; the
/// first record becomes the only best deal.
pub fn rank_parts(mut parts: Vec<PartResult>) -> Vec<PartResult> {
    parts.sort_by(|a, b| ranking_key(a.total_price).total_cmp(&ranking_key(b.total_price)));
    for p in parts.iter_mut() {
        p.is_best_deal = false;
    }
    if let Some(best) = parts.first_mut() {
        best.is_best_deal = true;
    }
    parts
}

pub fn build_response(parts: Vec<PartResult>, source_status: SourceStatuses) -> PartsResponse {
    let sources = SourceCounts {
        rockauto: parts.iter().filter(|p| p.source == Source::RockAuto).count(),
        ebay: parts.iter().filter(|p| p.source == Source::Ebay).count(),
    };
    PartsResponse {
        count: parts.len(),
        best_deal: parts.first().cloned(),
        sources,
        source_status,
        parts,
    }
}
