//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::customers: Dashboard page, customer table, chart modal, customer JSON API
//! - routes::status: Loading/error overlay, reload, health and stats

pub mod chart;
pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use custdash_config::Config;
use custdash_core::{SharedDashboard, SourceRef};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub dashboard: SharedDashboard,
    pub source: SourceRef,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::customers::{
        api_customer_daily, api_customer_detail, api_customers, htmx_customer_chart, htmx_customers_table,
        page_dashboard,
    };
    use routes::status::{api_reload, api_stats, api_status, health_check, htmx_reload, htmx_status};

    let api = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/status", get(api_status))
        .route("/api/stats", get(api_stats))
        .route("/api/customers", get(api_customers))
        .route("/api/customers/:id", get(api_customer_detail))
        .route("/api/customers/:id/daily", get(api_customer_daily))
        .route("/api/reload", post(api_reload))
        .layer(CorsLayer::permissive());

    Router::new()
        // HTMX page routes
        .route("/", get(page_dashboard))
        // HTMX partial routes
        .route("/customers/table", get(htmx_customers_table))
        .route("/customers/:id/chart", get(htmx_customer_chart))
        .route("/status", get(htmx_status))
        .route("/reload", post(htmx_reload))
        .merge(api)
        .with_state(state)
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
</body>
</html>"#,
        custdash_utils::escape_html(title),
        content
    )
}

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &axum::http::HeaderMap, title: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        inner_content.to_string()
    } else {
        base_html(title, &format!("<main class='p-6'>{}</main>", inner_content))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until Ctrl-C.
pub async fn start_server(config: Config, dashboard: SharedDashboard, source: SourceRef) -> std::io::Result<()> {
    let addr = config.bind_address();
    let state = AppState { dashboard, source, config };

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting custdash server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Customer transactions dashboard)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    log::info!("Server stopped gracefully");
    Ok(())
}
