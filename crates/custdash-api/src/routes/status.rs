//! Loading/error overlay, reloads and service endpoints

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use custdash_core::{refresh, DashboardStats, DashboardStatus};
use custdash_utils::escape_html;

use crate::AppState;

/// Render the full-screen overlay shown while loading or after a failed load
///
/// While loading, the overlay polls `/status` every second. Once customers
/// are in but transactions are still on their way, it stays invisible and
/// keeps polling.
pub fn render_status_overlay(status: &DashboardStatus) -> String {
    if !status.loading && status.error.is_none() {
        if status.transactions_pending {
            return "<div id='status-overlay' hx-get='/status' hx-trigger='every 1s' hx-swap='outerHTML'></div>".to_string();
        }
        return "<div id='status-overlay'></div>".to_string();
    }

    let poll = if status.loading {
        " hx-get='/status' hx-trigger='every 1s' hx-swap='outerHTML'"
    } else {
        ""
    };

    let loading = if status.loading {
        "<div class='w-24 h-24 mb-6 rounded shadow bg-gray-100 flex justify-center items-center'><span>loading...</span></div>"
    } else {
        ""
    };

    let error = match &status.error {
        Some(message) => format!(
            r#"<div class='rounded shadow bg-red-700 p-4 text-white flex items-center gap-4'>
                <span>{}</span>
                <button hx-post='/reload' hx-target='#status-overlay' hx-swap='outerHTML'
                    class='bg-white text-red-700 px-3 py-1 rounded'>Retry</button>
            </div>"#,
            escape_html(message)
        ),
        None => String::new(),
    };

    format!(
        r#"<div id='status-overlay'{} class='rounded fixed bg-white top-0 left-0 w-full h-screen flex justify-center items-center z-50'>
            <div class='flex flex-col justify-center items-center'>{}{}</div>
        </div>"#,
        poll, loading, error
    )
}

/// HTMX: Current overlay
///
/// Once both fetches have settled without error, HTMX callers get an empty
/// overlay and a page refresh so the table picks up the new records.
pub async fn htmx_status(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let status = state.dashboard.read().await.status();
    let overlay = Html(render_status_overlay(&status));

    if status.is_settled() && status.error.is_none() && crate::is_htmx_request(&headers) {
        return ([("HX-Refresh", "true")], overlay).into_response();
    }
    overlay.into_response()
}

/// HTMX: Start a reload in the background and show the loading overlay
pub async fn htmx_reload(State(state): State<AppState>) -> Html<String> {
    state.dashboard.write().await.begin_load();

    let dashboard = state.dashboard.clone();
    let source = state.source.clone();
    tokio::spawn(async move {
        refresh(&dashboard, source.as_ref()).await;
    });

    let status = state.dashboard.read().await.status();
    Html(render_status_overlay(&status))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Get loading/error state (JSON API)
pub async fn api_status(State(state): State<AppState>) -> Json<DashboardStatus> {
    Json(state.dashboard.read().await.status())
}

/// Get record counts and the grand total (JSON API)
pub async fn api_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.dashboard.read().await.stats())
}

/// Reload records and return the resulting state (JSON API)
pub async fn api_reload(State(state): State<AppState>) -> Json<DashboardStatus> {
    log::info!("Reload requested from {}", state.source.describe());
    refresh(&state.dashboard, state.source.as_ref()).await;
    Json(state.dashboard.read().await.status())
}
