//! Registry and plugin catalog handlers.
//!
//! Each handler calls into the domain layer and maps its error taxonomy to
//! the wire contract: Validation → 400, NotFound → 404, Internal → 500.
//! Failure bodies carry generic status text only; detail goes to the logs.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use trident_registry::{ConnectSpec, PluginDecl, RegistryError};

use crate::ApiState;

/// Map a domain error onto its status code with a generic body.
pub(crate) fn error_response(err: RegistryError) -> Response {
    match err {
        RegistryError::Validation(msg) => {
            warn!(%msg, "request rejected");
            (StatusCode::BAD_REQUEST, "Bad Request").into_response()
        }
        RegistryError::NotFound(msg) => {
            debug!(%msg, "no matching records");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
        RegistryError::Internal(msg) => {
            error!(%msg, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub(crate) fn bad_request() -> Response {
    (StatusCode::BAD_REQUEST, "Bad Request").into_response()
}

// ── Connect ────────────────────────────────────────────────────

/// Connect request body.
#[derive(Deserialize)]
pub struct ConnectRequest {
    pub daemon: Option<String>,
    pub host_addr: Option<String>,
    pub worker_count: Option<u32>,
    pub arguments: Option<ConnectArguments>,
}

/// The `arguments` blob of a connect request. `logging_level` and `args`
/// are stored verbatim on the daemon; `plugins` becomes Plugin rows.
#[derive(Deserialize, Default)]
pub struct ConnectArguments {
    pub logging_level: Option<Value>,
    pub args: Option<Value>,
    #[serde(default)]
    pub plugins: BTreeMap<String, PluginEntry>,
}

/// One plugin entry. Only the `args` sub-object is persisted; the daemon
/// keeps `path`/`plugin_args` to itself.
#[derive(Deserialize, Default)]
pub struct PluginEntry {
    pub args: Option<Value>,
}

/// POST /trident/connect
pub async fn connect(
    State(state): State<ApiState>,
    body: Result<Json<ConnectRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return bad_request();
    };
    let arguments = req.arguments.unwrap_or_default();
    let spec = ConnectSpec {
        daemon: req.daemon,
        host_addr: req.host_addr,
        worker_count: req.worker_count,
        logging_level: arguments.logging_level,
        args: arguments.args,
        plugins: arguments
            .plugins
            .into_iter()
            .map(|(name, entry)| PluginDecl {
                name,
                arguments: entry.args,
            })
            .collect(),
    };
    match state.registry.connect(spec) {
        Ok(daemon) => (StatusCode::CREATED, Json(json!({ "daemon": daemon }))).into_response(),
        Err(e) => error_response(e),
    }
}

// ── Connectivity ───────────────────────────────────────────────

/// DELETE /trident/disconnect/{daemon}
pub async fn disconnect(State(state): State<ApiState>, Path(daemon): Path<String>) -> Response {
    match state.registry.disconnect(&daemon) {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /trident/connected
pub async fn connected(State(state): State<ApiState>) -> Response {
    match state.registry.list_connected() {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /trident/remove/{daemon}
pub async fn remove(State(state): State<ApiState>, Path(daemon): Path<String>) -> Response {
    match state.registry.remove(&daemon) {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /trident/{daemon}
pub async fn daemon(State(state): State<ApiState>, Path(daemon): Path<String>) -> Response {
    match state.registry.get(&daemon) {
        Ok(record) => Json(record).into_response(),
        Err(e) => error_response(e),
    }
}

// ── Plugins ────────────────────────────────────────────────────

/// GET /plugin/{daemon}
pub async fn plugins(State(state): State<ApiState>, Path(daemon): Path<String>) -> Response {
    match state.catalog.list_plugins(&daemon) {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /plugin/{daemon}/{plugin_name}
pub async fn plugin(
    State(state): State<ApiState>,
    Path((daemon, plugin_name)): Path<(String, String)>,
) -> Response {
    match state.catalog.get_plugin(&daemon, &plugin_name) {
        Ok(record) => Json(vec![record]).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trident_state::RecordStore;

    fn test_state() -> ApiState {
        ApiState::new(RecordStore::open_in_memory().unwrap())
    }

    fn registration_body() -> ConnectRequest {
        ConnectRequest {
            daemon: None,
            host_addr: Some("192.168.1.1".to_string()),
            worker_count: Some(5),
            arguments: Some(ConnectArguments {
                logging_level: Some(json!("DEBUG")),
                args: None,
                plugins: BTreeMap::from([(
                    "find-file".to_string(),
                    PluginEntry {
                        args: Some(json!({"store": {"path": "stores"}})),
                    },
                )]),
            }),
        }
    }

    #[tokio::test]
    async fn connect_returns_created_with_daemon_id() {
        let state = test_state();
        let resp = connect(State(state), Ok(Json(registration_body()))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn connect_without_host_addr_is_bad_request() {
        let state = test_state();
        let mut body = registration_body();
        body.host_addr = None;

        let resp = connect(State(state), Ok(Json(body))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn connected_empty_is_not_found() {
        let state = test_state();
        let resp = connected(State(state)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn disconnect_unknown_daemon_is_accepted() {
        let state = test_state();
        let resp = disconnect(State(state), Path("tired-panda".to_string())).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn remove_unknown_daemon_is_accepted() {
        let state = test_state();
        let resp = remove(State(state), Path("tired-panda".to_string())).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn get_unknown_daemon_is_not_found() {
        let state = test_state();
        let resp = daemon(State(state), Path("tired-panda".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn plugins_for_unknown_daemon_is_not_found() {
        let state = test_state();
        let resp = plugins(State(state), Path("tired-panda".to_string())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
