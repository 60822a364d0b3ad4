// API server implementation using actix-web

use crate::api::{auth, middleware, routes};
use crate::compare::PartsService;
use crate::sources::ebay::{self, EbayProvider};
use crate::sources::rockauto::{self, RockAutoProvider};
use crate::util::env::{env_opt, env_parse};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};

pub struct ApiServer {
    pub host: String,
    pub port: u16,
    pub api_secret: Option<String>,
    pub allowed_origins: String,
    pub ebay_app_id: Option<String>,
    pub rockauto_base_url: String,
    pub ebay_finding_url: String,
    pub rockauto_timeout_secs: u64,
    pub ebay_timeout_secs: u64,
}

impl ApiServer {
    /// Create server from environment variables
    pub fn from_env() -> Result<Self> {
        crate::util::env::init_env();

        let host = env_opt("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = env_opt("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("Invalid API_PORT")?;

        let allowed_origins = env_opt("ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string());

        Ok(Self {
            host,
            port,
            api_secret: env_opt("API_SECRET"),
            allowed_origins,
            ebay_app_id: env_opt("EBAY_APP_ID"),
            rockauto_base_url: env_opt("ROCKAUTO_BASE_URL")
                .unwrap_or_else(|| rockauto::provider::DEFAULT_BASE_URL.to_string()),
            ebay_finding_url: env_opt("EBAY_FINDING_URL")
                .unwrap_or_else(|| ebay::provider::DEFAULT_FINDING_URL.to_string()),
            rockauto_timeout_secs: env_parse(
                "ROCKAUTO_TIMEOUT_SECS",
                rockauto::provider::DEFAULT_TIMEOUT_SECS,
            ),
            ebay_timeout_secs: env_parse("EBAY_TIMEOUT_SECS", ebay::provider::DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Build the shared comparison service from this configuration
    pub fn parts_service(&self) -> Result<PartsService> {
        let rockauto = RockAutoProvider::new(
            Some(&self.rockauto_base_url),
            Some(self.rockauto_timeout_secs),
        )?;
        let ebay = EbayProvider::new(Some(&self.ebay_finding_url), Some(self.ebay_timeout_secs))?
            .with_app_id(self.ebay_app_id.clone());
        Ok(PartsService::new(rockauto, ebay))
    }

    /// Start the HTTP server
    pub async fn run(self) -> Result<()> {
        let bind_addr = format!("{}:{}", self.host, self.port);
        let service = web::Data::new(self.parts_service()?);

        tracing::info!(
            host = %self.host,
            port = %self.port,
            ebay_configured = service.ebay_configured(),
            auth_enabled = self.api_secret.is_some(),
            "Starting parts-compare API server"
        );

        let api_secret = self.api_secret.clone();
        let allowed_origins = self.allowed_origins.clone();

        HttpServer::new(move || {
            let (logger, compress) = middleware::setup_middleware();
            let cors = middleware::setup_cors(&allowed_origins);
            let auth = auth::Auth::new(api_secret.clone());

            App::new()
                .app_data(service.clone())
                .wrap(auth)
                .wrap(cors)
                .wrap(compress)
                .wrap(logger)
                .configure(routes::configure_routes)
        })
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind to {}", bind_addr))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}
