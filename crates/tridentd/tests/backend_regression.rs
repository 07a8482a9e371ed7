//! Backend contract regression tests.
//!
//! Drives the full router the way a daemon (or the dashboard UI) would:
//! connect, report plugins, push indexed results, and walk the read/delete
//! surface, asserting the exact status codes and wire shapes.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use trident_api::build_router;
use trident_state::RecordStore;

fn test_router() -> Router {
    build_router(RecordStore::open_in_memory().unwrap())
}

/// Registration fixture with two plugins, one of them bare (no args).
fn tired_panda() -> Value {
    json!({
        "host_addr": "192.168.1.1",
        "worker_count": 5,
        "arguments": {
            "logging_level": "DEBUG",
            "plugins": {
                "find-file": {
                    "path": "plugins.find_file",
                    "plugin_args": {"files": ["file1.html", "file2.css"]},
                    "args": {"store": {"path": "stores"}}
                },
                "scan-hosts-file": {
                    "path": "plugins.scan_file"
                }
            }
        }
    })
}

/// Registration fixture missing the required `host_addr`.
fn cool_kitten() -> Value {
    json!({
        "worker_count": 2,
        "arguments": {
            "logging_level": "INFO",
            "plugins": {
                "improved-find-file": {
                    "path": "plugins.improved_find_file",
                    "args": {"store": {"path": "stores"}}
                }
            }
        }
    })
}

fn find_file_result() -> Value {
    json!({"result": {"0": null, "1": null, "2": "file2.html"}})
}

fn improved_find_file_result() -> Value {
    json!({"result": {"0": null, "1": "file1.html", "2": "file2.html"}})
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn connect(router: &Router, body: Value) -> String {
    let (status, value) = send(router, "POST", "/trident/connect", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    value["daemon"].as_str().expect("daemon id").to_string()
}

// ── Dashboard ──────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_smoke() {
    let router = test_router();
    let (status, _) = send(&router, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_reports_counts() {
    let router = test_router();
    connect(&router, tired_panda()).await;

    let (status, value) = send(&router, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["daemons"], json!(1));
    assert_eq!(value["connected"], json!(1));
}

// ── Connect / disconnect / remove ──────────────────────────────

#[tokio::test]
async fn connect_then_get_daemon() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, value) = send(&router, "GET", &format!("/trident/{daemon}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["daemon"], json!(daemon));
    assert_eq!(value["host_addr"], json!("192.168.1.1"));
    assert_eq!(value["worker_count"], json!(5));
    assert_eq!(value["arguments"]["logging_level"], json!("DEBUG"));
}

#[tokio::test]
async fn connect_without_host_addr_is_rejected() {
    let router = test_router();
    let (status, _) = send(&router, "GET", "/trident/cool-kitten", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, value) = send(&router, "POST", "/trident/connect", Some(cool_kitten())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn connect_without_body_is_rejected() {
    let router = test_router();
    let (status, _) = send(&router, "POST", "/trident/connect", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn connected_lists_daemon() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, value) = send(&router, "GET", "/trident/connected", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!([{"daemon": daemon}]));
}

#[tokio::test]
async fn disconnect_then_connected_is_not_found() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, _) = send(&router, "DELETE", &format!("/trident/disconnect/{daemon}"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _) = send(&router, "GET", "/trident/connected", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The registration itself survives a disconnect.
    let (status, _) = send(&router, "GET", &format!("/trident/{daemon}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn disconnect_unconnected_daemon_is_accepted() {
    let router = test_router();
    let (status, _) = send(&router, "DELETE", "/trident/disconnect/tired-panda", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn reconnect_after_disconnect_by_name() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(&router, "DELETE", &format!("/trident/disconnect/{daemon}"), None).await;

    // Reconnecting by name needs no host_addr and creates no new rows.
    let reconnect = json!({"daemon": daemon});
    let (status, value) = send(&router, "POST", "/trident/connect", Some(reconnect)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["daemon"], json!(daemon));

    let (_, plugins) = send(&router, "GET", &format!("/plugin/{daemon}"), None).await;
    assert_eq!(plugins.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn repeated_connect_is_rejected() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let mut body = tired_panda();
    body["daemon"] = json!(daemon);
    let (status, _) = send(&router, "POST", "/trident/connect", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn remove_then_get_is_not_found() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, _) = send(&router, "DELETE", &format!("/trident/remove/{daemon}"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _) = send(&router, "GET", &format!("/trident/{daemon}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn remove_unregistered_daemon_is_accepted() {
    let router = test_router();
    let (status, _) = send(&router, "DELETE", "/trident/remove/tired-panda", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

// ── Plugins ────────────────────────────────────────────────────

#[tokio::test]
async fn plugins_roster_matches_declaration() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, value) = send(&router, "GET", &format!("/plugin/{daemon}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["plugin_name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"find-file"));
    assert!(names.contains(&"scan-hosts-file"));
}

#[tokio::test]
async fn plugin_lookup_returns_singleton() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, value) = send(&router, "GET", &format!("/plugin/{daemon}/find-file"), None).await;
    assert_eq!(status, StatusCode::OK);

    let plugins = value.as_array().unwrap();
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0]["plugin_name"], json!("find-file"));
    assert_eq!(plugins[0]["daemon"], json!(daemon));
    assert_eq!(plugins[0]["arguments"], json!({"store": {"path": "stores"}}));
}

#[tokio::test]
async fn plugin_without_args_has_null_arguments() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (_, value) = send(
        &router,
        "GET",
        &format!("/plugin/{daemon}/scan-hosts-file"),
        None,
    )
    .await;
    assert_eq!(value[0]["arguments"], Value::Null);
}

#[tokio::test]
async fn missing_plugin_is_not_found() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, _) = send(&router, "GET", &format!("/plugin/{daemon}/plugin-name"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Results ────────────────────────────────────────────────────

#[tokio::test]
async fn insert_result() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, _) = send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn insert_result_for_unregistered_daemon_is_rejected() {
    let router = test_router();
    let (status, _) = send(
        &router,
        "POST",
        "/result/tired-panda/find-file/0",
        Some(find_file_result()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn insert_result_without_payload_is_rejected() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, _) = send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn retrieve_results_for_daemon() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;

    let (status, value) = send(&router, "GET", &format!("/result/{daemon}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let results = value.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["result"]["2"], json!("file2.html"));
    assert_eq!(results[0]["plugin"], json!("find-file"));
    assert_eq!(results[0]["daemon"], json!(daemon));
}

#[tokio::test]
async fn results_for_daemon_with_none_is_not_found() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, _) = send(&router, "GET", &format!("/result/{daemon}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "GET", "/result/never-registered", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn retrieve_results_for_one_plugin() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/scan-hosts-file/0"),
        Some(find_file_result()),
    )
    .await;

    let (status, value) = send(&router, "GET", &format!("/result/{daemon}/find-file"), None).await;
    assert_eq!(status, StatusCode::OK);

    let results = value.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["plugin"], json!("find-file"));
}

#[tokio::test]
async fn results_for_unreported_plugin_is_not_found() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;

    let (status, _) = send(
        &router,
        "GET",
        &format!("/result/{daemon}/improved-find-file"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn result_indices_are_independent() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/1"),
        Some(improved_find_file_result()),
    )
    .await;

    let (status, value) = send(&router, "GET", &format!("/result/{daemon}/find-file/1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value[0]["result"]["1"], json!("file1.html"));

    let (_, value) = send(&router, "GET", &format!("/result/{daemon}/find-file/0"), None).await;
    assert_eq!(value[0]["result"]["1"], Value::Null);
    assert_eq!(value[0]["index"], json!(0));
}

#[tokio::test]
async fn result_overwrite_replaces_payload() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(json!({"result": {"3": "file3.html"}})),
    )
    .await;

    let (_, value) = send(&router, "GET", &format!("/result/{daemon}/find-file/0"), None).await;
    assert_eq!(value[0]["result"], json!({"3": "file3.html"}));
}

#[tokio::test]
async fn result_at_missing_index_is_not_found() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;

    let (status, _) = send(&router, "GET", &format!("/result/{daemon}/find-file/1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_results_wipes_all_plugins() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/scan-hosts-file/0"),
        Some(find_file_result()),
    )
    .await;

    let (status, _) = send(&router, "DELETE", &format!("/result/{daemon}"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, _) = send(&router, "GET", &format!("/result/{daemon}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting again is still accepted.
    let (status, _) = send(&router, "DELETE", &format!("/result/{daemon}"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn delete_results_for_plugin_leaves_other_plugins() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/scan-hosts-file/0"),
        Some(find_file_result()),
    )
    .await;

    let (status, _) = send(&router, "DELETE", &format!("/result/{daemon}/find-file"), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (_, value) = send(&router, "GET", &format!("/result/{daemon}"), None).await;
    let results = value.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["plugin"], json!("scan-hosts-file"));
}

#[tokio::test]
async fn delete_result_at_index_leaves_sibling_index() {
    let router = test_router();
    let daemon = connect(&router, tired_panda()).await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/0"),
        Some(find_file_result()),
    )
    .await;
    send(
        &router,
        "POST",
        &format!("/result/{daemon}/find-file/1"),
        Some(improved_find_file_result()),
    )
    .await;

    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/result/{daemon}/find-file/1"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, value) = send(&router, "GET", &format!("/result/{daemon}/find-file/0"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value[0]["result"]["2"], json!("file2.html"));
}
