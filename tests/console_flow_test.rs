use anyhow::Result;
use gbfs_console::app::screens::{CacheAction, CacheScreen, FeedProvidersScreen, StopPlaceMap};
use gbfs_console::config::ConsoleConfig;
use gbfs_console::core::alert::AlertSeverity;
use gbfs_console::core::bulk::BulkAction;
use gbfs_console::domain::model::SubscriptionStatus;
use gbfs_console::Backend;
use httpmock::prelude::*;
use serde_json::json;
use tokio_test::assert_ok;

fn backend_for(server: &MockServer) -> Backend {
    let mut config = ConsoleConfig::default();
    config.server.base_url = server.base_url();
    Backend::from_config(&config).unwrap()
}

async fn mock_provider_listing(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/admin/feed-providers");
            then.status(200).json_body(json!([
                { "systemId": "c" },
                { "systemId": "a" },
                { "systemId": "b" }
            ]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/feed-providers/subscription-statuses");
            then.status(200)
                .json_body(json!({"a": "STARTED", "b": "STARTING"}));
        })
        .await;
}

#[tokio::test]
async fn bulk_restart_keeps_failures_selected_for_retry() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_provider_listing(&server).await;
    let bulk = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/admin/feed-providers/bulk/restart")
                .json_body(json!(["a", "b", "c"]));
            then.status(200).json_body(json!({
                "a": "success",
                "b": "Subscription not found",
                "zz": "SUCCESS"
            }));
        })
        .await;

    let backend = backend_for(&server);
    let mut screen = FeedProvidersScreen::new(&backend.admin);
    assert_ok!(screen.load().await);

    let rows = screen.rows();
    assert_eq!(rows[0].provider.system_id, "a");
    assert_eq!(rows[2].subscription_status, SubscriptionStatus::Unknown);

    screen.select_all();
    let report = screen.bulk(BulkAction::Restart).await?;
    bulk.assert_async().await;

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.missing(), 1);
    assert_eq!(report.unexpected, vec!["zz"]);
    assert_eq!(screen.selection().len(), 2);
    assert!(!screen.selection().contains("a"));
    assert_eq!(screen.alert().unwrap().severity, AlertSeverity::Warning);
    Ok(())
}

#[tokio::test]
async fn failed_cache_action_surfaces_error_alert() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/admin/clear_old_cache");
            then.status(500).body("boom");
        })
        .await;

    let backend = backend_for(&server);
    let mut screen = CacheScreen::new(&backend.admin);
    let result = screen.run(CacheAction::ClearOldCache).await;

    assert!(result.is_err());
    assert!(screen.alert().unwrap().is_error());
    assert!(screen.can_run());
    Ok(())
}

#[tokio::test]
async fn map_skips_unreachable_systems() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gbfs/a/station_information");
            then.status(200).json_body(json!({
                "data": { "stations": [
                    { "station_id": "1", "name": "One", "lat": 10.0, "lon": 20.0 },
                    { "station_id": "2", "name": "Two", "lat": 30.0, "lon": 40.0 }
                ]}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gbfs/b/station_information");
            then.status(404);
        })
        .await;

    let backend = backend_for(&server);
    let config = ConsoleConfig::default();
    let mut map = StopPlaceMap::new(&backend.gbfs, &config.map);
    assert_ok!(map.load(&["a".to_string(), "b".to_string()]).await);

    assert_eq!(map.failures().len(), 1);
    let composition = map.compose();
    assert_eq!(composition.station_count, 2);
    assert_eq!(composition.style["center"], json!([30.0, 20.0]));
    assert!(composition.style["sources"]["stops-b"].is_null());
    Ok(())
}
