mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use sanctuary_api::access::SessionContext;
use sanctuary_api::auth::issue_token;

fn bearer(server: &common::TestServer, ctx: &SessionContext) -> Result<String> {
    Ok(format!("Bearer {}", issue_token(ctx, &server.state.config.security)?))
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::spawn_app(common::offline_state()?).await?;

    let res = reqwest::get(format!("{}/", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Sanctuary API");
    Ok(())
}

#[tokio::test]
async fn health_reports_unreachable_database() -> Result<()> {
    let server = common::spawn_app(common::offline_state()?).await?;

    let res = reqwest::get(format!("{}/health", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_token() -> Result<()> {
    let server = common::spawn_app(common::offline_state()?).await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/species", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/species", server.base_url))
        .header("Authorization", "Bearer not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn viewer_writes_are_refused_before_the_database() -> Result<()> {
    let server = common::spawn_app(common::offline_state()?).await?;
    let client = reqwest::Client::new();
    let auth = bearer(&server, &common::viewer())?;

    let res = client
        .post(format!("{}/api/species", server.base_url))
        .header("Authorization", &auth)
        .json(&json!({
            "common_name": "Snow Leopard",
            "scientific_name": "Panthera uncia",
            "conservation_status": "Vulnerable",
            "avg_lifespan": 18
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .post(format!("{}/api/routines/update-animal-health", server.base_url))
        .header("Authorization", &auth)
        .json(&json!({ "tracking_id": "TRK-001", "health_status": "Healthy" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn token_without_a_live_session_is_unavailable() -> Result<()> {
    let server = common::spawn_app(common::offline_state()?).await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/rangers", server.base_url))
        .header("Authorization", bearer(&server, &common::supervisor())?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn whoami_reflects_the_token() -> Result<()> {
    let server = common::spawn_app(common::offline_state()?).await?;
    let ctx = common::viewer();

    let res = reqwest::Client::new()
        .get(format!("{}/api/auth/whoami", server.base_url))
        .header("Authorization", bearer(&server, &ctx)?)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["identity"], "app_user");
    assert_eq!(body["data"]["role"], "Viewer");
    assert_eq!(body["data"]["can_mutate"], false);
    assert_eq!(body["data"]["active"], false);
    Ok(())
}

#[tokio::test]
async fn table_names_are_listed_and_unknown_tables_rejected() -> Result<()> {
    let server = common::spawn_app(common::offline_state()?).await?;
    let client = reqwest::Client::new();
    let auth = bearer(&server, &common::viewer())?;

    let res = client
        .get(format!("{}/api/tables", server.base_url))
        .header("Authorization", &auth)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    let names = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(names.len(), 13);
    assert!(names.contains(&json!("sighting_details")));

    let res = client
        .get(format!("{}/api/tables/pg_authid", server.base_url))
        .header("Authorization", &auth)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn login_validates_then_reports_connectivity() -> Result<()> {
    let server = common::spawn_app(common::offline_state()?).await?;
    let client = reqwest::Client::new();
    let url = format!("{}/auth/login", server.base_url);

    let res = client.post(&url).json(&json!({ "identity": "", "secret": "x" })).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(&url)
        .json(&json!({ "identity": "app_user", "secret": "pass" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(server.state.manager.session_count().await, 0);
    Ok(())
}
