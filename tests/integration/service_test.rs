//! End-to-end tests against a started service

use crate::support::{fail, ScriptedSource};
use coin_alert::app::{App, StartupError};
use coin_alert::config::Config;
use coin_alert::price::PriceSource;
use coin_alert::store::{DeviceStore, MemoryDeviceStore};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

fn test_config(refresh_interval_secs: u64) -> Config {
    let mut config = Config::default();
    config.server.bind_addr = "127.0.0.1:0".parse().unwrap();
    config.price.refresh_interval_secs = refresh_interval_secs;
    config
}

async fn start(
    source: Arc<ScriptedSource>,
    store: MemoryDeviceStore,
    refresh_interval_secs: u64,
) -> App {
    App::start(
        &test_config(refresh_interval_secs),
        source as Arc<dyn PriceSource>,
        Arc::new(store) as Arc<dyn DeviceStore>,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_seed_failure_prevents_startup() {
    let source = ScriptedSource::new(vec![fail("provider down")]);

    let result = App::start(
        &test_config(5),
        source as Arc<dyn PriceSource>,
        Arc::new(MemoryDeviceStore::new()) as Arc<dyn DeviceStore>,
    )
    .await;

    assert!(matches!(result, Err(StartupError::SeedFetch(_))));
}

#[tokio::test]
async fn test_serves_seeded_price_and_gates_methods() {
    let source = ScriptedSource::new(vec![Ok(dec!(30000.00))]);
    let store = MemoryDeviceStore::new();
    let app = start(source, store.clone(), 3600).await;
    let base = format!("http://{}", app.local_addr());
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    assert!(app.query().current_price().valid);

    let response = client
        .get(format!("{base}/api/current"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.text().await.unwrap(),
        r#"{"currentPrice":"30000.00"}"#
    );

    let response = client
        .post(format!("{base}/api/current"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

    let response = client
        .get(format!("{base}/api/register"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

    let response = client
        .post(format!("{base}/api/register"))
        .header("content-type", "application/json")
        .body(r#"{"id":"device-42"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    assert_eq!(store.registrations().await[0].id, "device-42");

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_background_refresh_recovers_after_failure() {
    let source = ScriptedSource::new(vec![
        Ok(dec!(30000.00)),
        fail("provider timeout"),
        Ok(dec!(30125.50)),
    ]);
    let app = start(Arc::clone(&source), MemoryDeviceStore::new(), 1).await;
    let base = format!("http://{}", app.local_addr());
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    let mut body = String::new();
    while tokio::time::Instant::now() < deadline {
        body = client
            .get(format!("{base}/api/current"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        if body.contains("30125.50") {
            break;
        }
        assert_eq!(body, r#"{"currentPrice":"30000.00"}"#);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(body, r#"{"currentPrice":"30125.50"}"#);
    assert!(source.calls() >= 3);

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_token_stops_refresher() {
    let source = ScriptedSource::new(vec![Ok(dec!(1))]);
    let app = start(Arc::clone(&source), MemoryDeviceStore::new(), 1).await;
    let token = app.shutdown_token();

    let run = tokio::spawn(app.run_until_shutdown());
    token.cancel();
    run.await.unwrap().unwrap();

    let calls = source.calls();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(source.calls(), calls);
}
