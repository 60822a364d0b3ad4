// API request/response models (DTOs)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sources::rockauto::categories::DEFAULT_CATEGORY;
use crate::sources::{PartResult, SourceStatus, Vehicle};

/// Error envelope for rejected requests (bad JSON, bad credentials)
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            meta: Some(Meta::now()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub version: String,
}

impl Meta {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: uuid::Uuid::new_v4().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Key presence only; validity is never checked
    pub ebay_configured: bool,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// `POST /parts` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartsRequest {
    pub make: String,
    pub year: i32,
    pub model: String,
    #[serde(default = "default_category")]
    pub category: String,
}

impl PartsRequest {
    pub fn vehicle(&self) -> Vehicle {
        Vehicle::new(self.make.clone(), self.year, self.model.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    pub rockauto: usize,
    pub ebay: usize,
}

/// Whether each source served live, degraded (fallback/partial) or no data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatuses {
    pub rockauto: SourceStatus,
    pub ebay: SourceStatus,
}

/// `POST /parts` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartsResponse {
    pub parts: Vec<PartResult>,
    pub count: usize,
    pub best_deal: Option<PartResult>,
    pub sources: SourceCounts,
    pub source_status: SourceStatuses,
}
