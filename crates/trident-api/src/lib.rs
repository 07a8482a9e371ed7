//! trident-api — REST API for the Trident dashboard.
//!
//! Provides axum route handlers over the registry engine, plugin catalog,
//! and result ledger. Mounts the dashboard pages at the router root.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/trident/connect` | Connect (or register) a daemon |
//! | DELETE | `/trident/disconnect/{daemon}` | Disconnect a daemon |
//! | GET | `/trident/connected` | List connected daemons |
//! | DELETE | `/trident/remove/{daemon}` | Remove a daemon |
//! | GET | `/trident/{daemon}` | Get a daemon registration |
//! | GET | `/plugin/{daemon}` | List a daemon's plugins |
//! | GET | `/plugin/{daemon}/{plugin_name}` | Get one plugin |
//! | GET | `/result/{daemon}` | List all results |
//! | DELETE | `/result/{daemon}` | Delete all results |
//! | GET | `/result/{daemon}/{plugin_name}` | List plugin results |
//! | DELETE | `/result/{daemon}/{plugin_name}` | Delete plugin results |
//! | GET | `/result/{daemon}/{plugin_name}/{index}` | Get result at index |
//! | POST | `/result/{daemon}/{plugin_name}/{index}` | Push result at index |
//! | DELETE | `/result/{daemon}/{plugin_name}/{index}` | Delete result at index |
//! | GET | `/` | Dashboard page |
//! | GET | `/status` | Dashboard status |

pub mod handlers;
pub mod result_handlers;

use axum::Router;
use axum::routing::{delete, get, post};
use trident_registry::{PluginCatalog, RegistryEngine, ResultLedger};
use trident_state::RecordStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: RegistryEngine,
    pub catalog: PluginCatalog,
    pub ledger: ResultLedger,
}

impl ApiState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            registry: RegistryEngine::new(store.clone()),
            catalog: PluginCatalog::new(store.clone()),
            ledger: ResultLedger::new(store),
        }
    }
}

/// Build the complete router (registry + plugins + results + dashboard).
pub fn build_router(store: RecordStore) -> Router {
    let api_state = ApiState::new(store.clone());

    let dashboard_state = trident_dashboard::DashboardState {
        store: store.clone(),
    };

    let trident_routes = Router::new()
        .route("/connect", post(handlers::connect))
        .route("/disconnect/{daemon}", delete(handlers::disconnect))
        .route("/connected", get(handlers::connected))
        .route("/remove/{daemon}", delete(handlers::remove))
        .route("/{daemon}", get(handlers::daemon))
        .with_state(api_state.clone());

    let plugin_routes = Router::new()
        .route("/{daemon}", get(handlers::plugins))
        .route("/{daemon}/{plugin_name}", get(handlers::plugin))
        .with_state(api_state.clone());

    let result_routes = Router::new()
        .route(
            "/{daemon}",
            get(result_handlers::results).delete(result_handlers::delete_results),
        )
        .route(
            "/{daemon}/{plugin_name}",
            get(result_handlers::results_for_plugin)
                .delete(result_handlers::delete_results_for_plugin),
        )
        .route(
            "/{daemon}/{plugin_name}/{index}",
            get(result_handlers::result_at_index)
                .post(result_handlers::put_result)
                .delete(result_handlers::delete_result_at_index),
        )
        .with_state(api_state);

    Router::new()
        .nest("/trident", trident_routes)
        .nest("/plugin", plugin_routes)
        .nest("/result", result_routes)
        .merge(trident_dashboard::dashboard_router(dashboard_state))
}
