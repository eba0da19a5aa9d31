mod common;

use baasix_mcp::errors::ErrorCode;
use common::{app_with_login, content_json};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn unknown_tool_yields_method_not_found_without_http() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({ "token": "t1" }));
        })
        .await;
    let app = app_with_login(&server.base_url());

    let err = app
        .dispatcher
        .dispatch("does_not_exist", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MethodNotFound);
    assert!(err.message.contains("unknown tool: does_not_exist"));
    // Rejected before any credential resolution or backend traffic.
    assert_eq!(login.hits_async().await, 0);
}

#[tokio::test]
async fn near_miss_tool_name_is_suggested() {
    let server = MockServer::start_async().await;
    let app = app_with_login(&server.base_url());

    let err = app
        .dispatcher
        .dispatch("list_itmes", &json!({ "collection": "products" }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MethodNotFound);
    assert!(err.message.contains("list_items"), "{}", err.message);
}

#[tokio::test]
async fn missing_required_field_yields_invalid_params_without_http() {
    let server = MockServer::start_async().await;
    let app = app_with_login(&server.base_url());

    let err = app
        .dispatcher
        .dispatch("list_items", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidParams);
    assert!(err.message.contains("missing required field 'collection'"));
}

#[tokio::test]
async fn list_items_success_is_wrapped_as_text_content() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/auth/login")
                .json_body(json!({ "email": "a@b.com", "password": "x" }));
            then.status(200).json_body(json!({ "token": "t1" }));
        })
        .await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/items/products")
                .query_param("limit", "2")
                .header("authorization", "Bearer t1");
            then.status(200)
                .json_body(json!({ "data": [{ "id": 1 }, { "id": 2 }] }));
        })
        .await;
    let app = app_with_login(&server.base_url());

    let envelope = app
        .dispatcher
        .dispatch("list_items", &json!({ "collection": "products", "limit": 2 }))
        .await
        .unwrap();
    let result = content_json(&envelope);
    assert_eq!(result["data"].as_array().unwrap().len(), 2);
    assert_eq!(login.hits_async().await, 1);
    assert_eq!(data.hits_async().await, 1);
}

#[tokio::test]
async fn backend_failure_surfaces_as_internal_error_with_upstream_message() {
    let server = MockServer::start_async().await;
    let _login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({ "token": "t1" }));
        })
        .await;
    let _data = server
        .mock_async(|when, then| {
            when.method(GET).path("/items/products");
            then.status(500)
                .json_body(json!({ "errors": [{ "message": "database unavailable" }] }));
        })
        .await;
    let app = app_with_login(&server.base_url());

    let err = app
        .dispatcher
        .dispatch("list_items", &json!({ "collection": "products" }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InternalError);
    assert_eq!(err.message, "database unavailable");
}

#[tokio::test]
async fn delete_item_hits_the_expected_endpoint() {
    let server = MockServer::start_async().await;
    let _login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({ "token": "t1" }));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/items/products/42");
            then.status(200).json_body(json!({ "deleted": 1 }));
        })
        .await;
    let app = app_with_login(&server.base_url());

    let envelope = app
        .dispatcher
        .dispatch("delete_item", &json!({ "collection": "products", "id": 42 }))
        .await
        .unwrap();
    assert_eq!(content_json(&envelope)["deleted"], 1);
    assert_eq!(delete.hits_async().await, 1);
}

#[tokio::test]
async fn server_health_works_without_any_credentials() {
    let server = MockServer::start_async().await;
    let health = server
        .mock_async(|when, then| {
            when.method(GET).path("/server/health");
            then.status(200).json_body(json!({ "status": "ok" }));
        })
        .await;
    // URL-only configuration.
    let app = baasix_mcp::app::App::with_credentials(common::credentials(&server.base_url()))
        .expect("app initializes");

    let envelope = app
        .dispatcher
        .dispatch("server_health", &json!({}))
        .await
        .unwrap();
    assert_eq!(content_json(&envelope)["status"], "ok");
    assert_eq!(health.hits_async().await, 1);
}

#[tokio::test]
async fn refresh_token_tool_reports_noop_with_explicit_token() {
    let server = MockServer::start_async().await;
    let app = baasix_mcp::app::App::with_credentials(
        common::credentials(&server.base_url()).with_token("static-token"),
    )
    .expect("app initializes");

    let envelope = app
        .dispatcher
        .dispatch("refresh_token", &json!({}))
        .await
        .unwrap();
    let result = content_json(&envelope);
    assert_eq!(result["refreshed"], false);
}

#[tokio::test]
async fn refresh_token_tool_performs_a_login_exchange() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({ "token": "t1" }));
        })
        .await;
    let app = app_with_login(&server.base_url());

    let envelope = app
        .dispatcher
        .dispatch("refresh_token", &json!({}))
        .await
        .unwrap();
    assert_eq!(content_json(&envelope)["refreshed"], true);
    assert_eq!(login.hits_async().await, 1);
}
