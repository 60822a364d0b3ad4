// API module for the parts-compare HTTP server
// Exposes the RockAuto + eBay comparison over JSON

pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
