//! Dashboard page handlers.
//!
//! The overview handler queries the record store, builds view types, and
//! renders an Askama template; `/status` reports registry counts as JSON.

use askama::Template;
use axum::Json;
use axum::extract::State;
use axum::response::Html;
use serde_json::{Value, json};

use crate::DashboardState;
use crate::views::*;

fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "template render failed");
        format!("<pre>Template error: {e}</pre>")
    }))
}

// ── Overview ────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "overview.html")]
struct OverviewTemplate {
    summary: OverviewSummary,
    daemons: Vec<DaemonRow>,
}

/// GET /
pub async fn overview(State(state): State<DashboardState>) -> Html<String> {
    let daemons = state.store.list_daemons().unwrap_or_default();
    let markers = state.store.list_connected().unwrap_or_default();
    let connected = connected_names(&markers);

    let rows: Vec<DaemonRow> = daemons
        .iter()
        .map(|record| DaemonRow::build(&state.store, record, &connected))
        .collect();

    let summary = OverviewSummary {
        daemon_count: daemons.len(),
        connected_count: markers.len(),
        result_count: rows.iter().map(|row| row.result_count).sum(),
    };

    render(OverviewTemplate {
        summary,
        daemons: rows,
    })
}

// ── Status ──────────────────────────────────────────────────────

/// GET /status
pub async fn status(State(state): State<DashboardState>) -> Json<Value> {
    let daemons = state.store.list_daemons().unwrap_or_default();
    let connected = state.store.list_connected().map(|c| c.len()).unwrap_or(0);
    let results: usize = daemons
        .iter()
        .map(|record| {
            state
                .store
                .list_results(&record.daemon)
                .map(|r| r.len())
                .unwrap_or(0)
        })
        .sum();

    Json(json!({
        "daemons": daemons.len(),
        "connected": connected,
        "results": results,
    }))
}
