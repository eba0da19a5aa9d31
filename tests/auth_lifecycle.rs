mod common;

use baasix_mcp::errors::{ErrorCode, ToolErrorKind};
use baasix_mcp::services::api_client::ProxyRequest;
use common::{app_with_login, content_json, credentials, restore_env, ENV_LOCK};
use httpmock::prelude::*;
use reqwest::Method;
use serde_json::json;

#[tokio::test]
async fn token_is_reused_across_calls_inside_the_validity_window() {
    let _guard = ENV_LOCK.lock().await;
    let prev = std::env::var("BAASIX_TOKEN_TTL_SECS").ok();
    std::env::remove_var("BAASIX_TOKEN_TTL_SECS");

    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({ "token": "t1" }));
        })
        .await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/items/products")
                .header("authorization", "Bearer t1");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;
    let app = app_with_login(&server.base_url());

    for _ in 0..2 {
        app.dispatcher
            .dispatch("list_items", &json!({ "collection": "products" }))
            .await
            .unwrap();
    }
    assert_eq!(data.hits_async().await, 2);
    assert_eq!(login.hits_async().await, 1);

    restore_env("BAASIX_TOKEN_TTL_SECS", prev);
}

#[tokio::test]
async fn expired_token_triggers_a_fresh_login_exchange() {
    let _guard = ENV_LOCK.lock().await;
    let prev = std::env::var("BAASIX_TOKEN_TTL_SECS").ok();
    // Zero validity: every cached token is already past its expiry.
    std::env::set_var("BAASIX_TOKEN_TTL_SECS", "0");

    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(200).json_body(json!({ "token": "t1" }));
        })
        .await;
    let _data = server
        .mock_async(|when, then| {
            when.method(GET).path("/items/products");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;
    let app = app_with_login(&server.base_url());

    for _ in 0..2 {
        app.dispatcher
            .dispatch("list_items", &json!({ "collection": "products" }))
            .await
            .unwrap();
    }
    assert_eq!(login.hits_async().await, 2);

    restore_env("BAASIX_TOKEN_TTL_SECS", prev);
}

#[tokio::test]
async fn url_only_configuration_fails_authenticated_tools_per_invocation() {
    let server = MockServer::start_async().await;
    let app = baasix_mcp::app::App::with_credentials(credentials(&server.base_url()))
        .expect("app initializes");

    let err = app
        .dispatcher
        .dispatch("list_items", &json!({ "collection": "products" }))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InternalError);
    assert_eq!(err.message, "no authentication method available");

    // The process keeps serving: a second invocation gets the same answer.
    let err = app
        .dispatcher
        .dispatch("list_users", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.message, "no authentication method available");
}

#[tokio::test]
async fn rejected_login_surfaces_the_upstream_message() {
    let server = MockServer::start_async().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/auth/login");
            then.status(401)
                .json_body(json!({ "errors": [{ "message": "invalid credentials" }] }));
        })
        .await;
    let app = app_with_login(&server.base_url());

    let err = app
        .api
        .execute(&ProxyRequest::new(Method::GET, "/items/products"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Auth);
    assert_eq!(err.message, "invalid credentials");
    // Not retried automatically.
    assert_eq!(login.hits_async().await, 1);
}

#[tokio::test]
async fn explicit_token_is_attached_and_survives_refresh_tool() {
    let server = MockServer::start_async().await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/items/products")
                .header("authorization", "Bearer static-token");
            then.status(200).json_body(json!({ "data": [] }));
        })
        .await;
    let app = baasix_mcp::app::App::with_credentials(
        credentials(&server.base_url()).with_token("static-token"),
    )
    .expect("app initializes");

    // refresh_token is a no-op in this mode; the same token keeps working.
    let envelope = app
        .dispatcher
        .dispatch("refresh_token", &json!({}))
        .await
        .unwrap();
    assert_eq!(content_json(&envelope)["refreshed"], false);
    app.dispatcher
        .dispatch("list_items", &json!({ "collection": "products" }))
        .await
        .unwrap();
    assert_eq!(data.hits_async().await, 1);
}
