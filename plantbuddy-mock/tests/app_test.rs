use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use plantbuddy_api::{DeviceState, DeviceStatePatch, LightMode};
use plantbuddy_mock::app::create_app;
use plantbuddy_mock::store::Store;
use serde_json::json;
use tower::ServiceExt;

async fn seeded_app() -> (Store, Router) {
    let store = Store::default();
    store
        .insert(1, DeviceState {
            raw_water_level: 767,
            light_level: 65,
            is_soil_moist: true,
            is_pump_requested: false,
            ..Default::default()
        })
        .await;

    let router = create_app(store.clone(), "sensor_data");
    (store, router)
}

fn patch_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::PATCH)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_get_device_state() {
    let (_, router) = seeded_app().await;

    let request = Request::builder()
        .uri("/sensor_data/1")
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let record: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(record["water_level"], json!(767));
    assert_eq!(record["light_level"], json!(65));
    assert_eq!(record["is_moist"], json!(true));
    assert_eq!(record["is_button_pump"], json!(false));
}

#[tokio::test]
async fn test_get_missing_device() {
    let (_, router) = seeded_app().await;

    let request = Request::builder()
        .uri("/sensor_data/42")
        .method(Method::GET)
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_updates_only_given_fields() {
    let (store, router) = seeded_app().await;

    let request = patch_request(
        "/sensor_data/1",
        serde_json::to_string(&DeviceStatePatch::pump_requested(true)).unwrap(),
    );

    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = store.get(1).await.unwrap();
    assert!(stored.is_pump_requested);
    assert_eq!(stored.raw_water_level, 767);
    assert_eq!(stored.light_level, 65);

    let request = patch_request(
        "/sensor_data/1",
        serde_json::to_string(&DeviceStatePatch::light_mode(LightMode::Off)).unwrap(),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = store.get(1).await.unwrap();
    assert_eq!(stored.light_mode, Some(LightMode::Off));
    assert!(stored.is_pump_requested);
}

#[tokio::test]
async fn test_patch_rejects_empty_and_missing() {
    let (_, router) = seeded_app().await;

    let response = router
        .clone()
        .oneshot(patch_request("/sensor_data/1", String::from("{}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(patch_request(
            "/sensor_data/42",
            json!({ "is_button_pump": true }).to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
