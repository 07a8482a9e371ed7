//! trident-dashboard — server-rendered web UI for the Trident registry.
//!
//! Provides axum route handlers that render the overview page and serve the
//! status endpoint.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `/` | Registry overview |
//! | `/status` | Status counts (JSON) |

pub mod pages;
pub mod views;

use axum::Router;
use axum::routing::get;
use trident_state::RecordStore;

/// Shared state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub store: RecordStore,
}

/// Build the dashboard router.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(pages::overview))
        .route("/status", get(pages::status))
        .with_state(state)
}
