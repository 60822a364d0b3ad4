// HTTP API server binary for parts-compare
// Serves the RockAuto + eBay comparison endpoint

use anyhow::Result;
use parts_compare::api::ApiServer;
use parts_compare::util::env as env_util;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load dotenv/env once so RUST_LOG from .env is honoured
    env_util::init_env();

    parts_compare::tracing::init_tracing("info")?;

    tracing::info!("Initializing parts-compare API server");

    // Load configuration from environment
    let server = ApiServer::from_env()?;

    // Start HTTP server
    server.run().await?;

    Ok(())
}
