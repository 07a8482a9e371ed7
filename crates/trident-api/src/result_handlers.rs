//! Result ledger handlers.
//!
//! GETs return arrays (singleton for exact index lookups); POST upserts the
//! payload at (plugin, index); DELETEs always accept, at every granularity.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ApiState;
use crate::handlers::{bad_request, error_response};

/// Put-result request body: a map from string position to output value.
#[derive(Deserialize)]
pub struct PutResultRequest {
    pub result: Map<String, Value>,
}

/// POST /result/{daemon}/{plugin_name}/{index}
pub async fn put_result(
    State(state): State<ApiState>,
    Path((daemon, plugin_name, index)): Path<(String, String, i64)>,
    body: Result<Json<PutResultRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = body else {
        return bad_request();
    };
    match state
        .ledger
        .put_result(&daemon, &plugin_name, index, Value::Object(req.result))
    {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /result/{daemon}
pub async fn results(State(state): State<ApiState>, Path(daemon): Path<String>) -> Response {
    match state.ledger.list_results(&daemon) {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /result/{daemon}/{plugin_name}
pub async fn results_for_plugin(
    State(state): State<ApiState>,
    Path((daemon, plugin_name)): Path<(String, String)>,
) -> Response {
    match state.ledger.list_results_for_plugin(&daemon, &plugin_name) {
        Ok(records) => Json(records).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /result/{daemon}/{plugin_name}/{index}
pub async fn result_at_index(
    State(state): State<ApiState>,
    Path((daemon, plugin_name, index)): Path<(String, String, i64)>,
) -> Response {
    match state.ledger.get_result(&daemon, &plugin_name, index) {
        Ok(record) => Json(vec![record]).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /result/{daemon}
pub async fn delete_results(State(state): State<ApiState>, Path(daemon): Path<String>) -> Response {
    match state.ledger.delete_results(&daemon) {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /result/{daemon}/{plugin_name}
pub async fn delete_results_for_plugin(
    State(state): State<ApiState>,
    Path((daemon, plugin_name)): Path<(String, String)>,
) -> Response {
    match state.ledger.delete_results_for_plugin(&daemon, &plugin_name) {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /result/{daemon}/{plugin_name}/{index}
pub async fn delete_result_at_index(
    State(state): State<ApiState>,
    Path((daemon, plugin_name, index)): Path<(String, String, i64)>,
) -> Response {
    match state.ledger.delete_result(&daemon, &plugin_name, index) {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => error_response(e),
    }
}
