mod common;

use anyhow::Result;
use axum::http::Method;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // No database behind the test binary, so degraded is expected
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]["status"].is_string());
    Ok(())
}

#[tokio::test]
async fn health_reports_degraded_database() -> Result<()> {
    let res = common::send(
        common::test_app(None),
        common::request(Method::GET, "/health", None, None),
    )
    .await?;

    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.body["data"]["status"], "degraded");
    Ok(())
}

#[tokio::test]
async fn unknown_paths_return_json_404_without_static_dir() -> Result<()> {
    let res = common::send(
        common::test_app(None),
        common::request(Method::GET, "/api/nope", Some(common::HUMAN_ONLY), None),
    )
    .await?;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], "NOT_FOUND");
    Ok(())
}
