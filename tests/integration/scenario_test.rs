//! Seed, failed refresh and recovery as seen through the HTTP API

use crate::support::{fail, ScriptedSource};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use coin_alert::api::{self, AppState};
use coin_alert::app;
use coin_alert::config::ServerConfig;
use coin_alert::price::{PriceSource, QueryService, RefreshOutcome, Refresher};
use coin_alert::store::MemoryDeviceStore;
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn get_current(router: &axum::Router) -> (StatusCode, String) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/current")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_stale_on_failure_then_fresh_on_success() {
    let source = ScriptedSource::new(vec![
        Ok(dec!(30000.00)),
        fail("provider timeout"),
        Ok(dec!(30125.50)),
    ]);
    let cache = Arc::new(app::seed_cache(source.as_ref()).await.unwrap());
    let query = QueryService::new(Arc::clone(&cache));
    let router = api::router(
        AppState::new(query.clone(), Arc::new(MemoryDeviceStore::new())),
        &ServerConfig::default(),
    );
    let mut refresher = Refresher::new(
        Arc::clone(&source) as Arc<dyn PriceSource>,
        Arc::clone(&cache),
        Duration::from_secs(5),
    );

    // Seeded before any tick
    let seeded = query.current_price();
    assert!(seeded.valid);
    assert_eq!(
        get_current(&router).await,
        (StatusCode::OK, r#"{"currentPrice":"30000.00"}"#.to_string())
    );

    // Failed cycle leaves the snapshot untouched
    assert!(matches!(
        refresher.refresh_once().await,
        RefreshOutcome::Skipped { .. }
    ));
    assert_eq!(query.current_price(), seeded);
    assert_eq!(
        get_current(&router).await,
        (StatusCode::OK, r#"{"currentPrice":"30000.00"}"#.to_string())
    );

    // Successful cycle replaces value and advances the timestamp
    assert!(matches!(
        refresher.refresh_once().await,
        RefreshOutcome::Updated(_)
    ));
    let refreshed = query.current_price();
    assert_eq!(refreshed.value, dec!(30125.50));
    assert!(refreshed.fetched_at > seeded.fetched_at);
    assert_eq!(
        get_current(&router).await,
        (StatusCode::OK, r#"{"currentPrice":"30125.50"}"#.to_string())
    );
    assert_eq!(source.calls(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_readers_see_whole_snapshots() {
    let values = [dec!(30000.00), dec!(30125.50)];
    let source = ScriptedSource::new(vec![Ok(values[0])]);
    let cache = Arc::new(app::seed_cache(source.as_ref()).await.unwrap());
    let query = QueryService::new(Arc::clone(&cache));
    let seeded = query.current_price();

    let refreshed_source = ScriptedSource::new(vec![Ok(values[1])]);
    let mut refresher = Refresher::new(
        refreshed_source as Arc<dyn PriceSource>,
        Arc::clone(&cache),
        Duration::from_secs(5),
    );

    let readers: Vec<_> = (0..16)
        .map(|_| {
            let query = query.clone();
            tokio::spawn(async move {
                let mut seen = Vec::new();
                for _ in 0..1_000 {
                    seen.push(query.current_price());
                    tokio::task::yield_now().await;
                }
                seen
            })
        })
        .collect();

    let updated = match refresher.refresh_once().await {
        RefreshOutcome::Updated(snapshot) => snapshot,
        other => panic!("unexpected outcome: {:?}", other),
    };

    for reader in readers {
        for snapshot in reader.await.unwrap() {
            assert!(snapshot == seeded || snapshot == updated);
        }
    }
}
