//! HTTP-level tests for the /reservas surface, served from the
//! in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use embarque_api::{app, AppState};
use embarque_core::{Flight, ReservationService, SequenceCodeGenerator};
use embarque_store::MemoryStore;

fn test_app(seat_count: i32, codes: &[&str]) -> (Router, Uuid) {
    let store = Arc::new(MemoryStore::new());
    let flight = Flight::new(Uuid::new_v4(), seat_count);
    let flight_id = flight.id;
    store.insert_flight(flight).unwrap();

    let service = ReservationService::new(
        store.clone(),
        store,
        Arc::new(SequenceCodeGenerator::new(codes.iter().copied())),
    );
    let router = app(AppState {
        reservations: Arc::new(service),
    });
    (router, flight_id)
}

async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request build failed"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request build failed"),
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json parse failed")
    };
    (status, value)
}

async fn create_reservation(router: &Router, flight_id: Uuid, documento: &str) -> Value {
    let (status, body) = send_json(
        router,
        Method::POST,
        "/reservas",
        Some(json!({ "voo_id": flight_id, "documento": documento })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_create_returns_created_with_legacy_field_names() {
    let (router, flight_id) = test_app(30, &["045782"]);

    let body = create_reservation(&router, flight_id, "12345678900").await;

    assert_eq!(body["voo_id"], json!(flight_id.to_string()));
    assert_eq!(body["documento"], "12345678900");
    assert_eq!(body["codigo_reserva"], "045782");
    assert_eq!(body["status"], "pending");
    assert_eq!(body["num_poltrona"], Value::Null);
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn test_create_for_unknown_flight_is_404() {
    let (router, _) = test_app(30, &["000001"]);

    let (status, body) = send_json(
        &router,
        Method::POST,
        "/reservas",
        Some(json!({ "voo_id": Uuid::new_v4(), "documento": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_duplicate_create_is_409() {
    let (router, flight_id) = test_app(30, &["000001", "000002"]);

    create_reservation(&router, flight_id, "123").await;
    let (status, body) = send_json(
        &router,
        Method::POST,
        "/reservas",
        Some(json!({ "voo_id": flight_id, "documento": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_list_returns_flight_reservations() {
    let (router, flight_id) = test_app(30, &["000001", "000002"]);

    create_reservation(&router, flight_id, "111").await;
    create_reservation(&router, flight_id, "222").await;

    let (status, body) = send_json(
        &router,
        Method::GET,
        &format!("/reservas/{flight_id}"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let listed = body.as_array().expect("array body");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["documento"], "111");
    assert_eq!(listed[1]["documento"], "222");
}

#[tokio::test]
async fn test_list_unknown_flight_is_empty_200() {
    let (router, _) = test_app(30, &["000001"]);

    let (status, body) = send_json(
        &router,
        Method::GET,
        &format!("/reservas/{}", Uuid::new_v4()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_check_in_by_code() {
    let (router, flight_id) = test_app(30, &["045782"]);

    create_reservation(&router, flight_id, "123").await;
    let (status, body) = send_json(
        &router,
        Method::POST,
        "/reservas/045782/checkin/15",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["num_poltrona"], 15);
}

#[tokio::test]
async fn test_check_in_by_reservation_id() {
    let (router, flight_id) = test_app(30, &["000001"]);

    let created = create_reservation(&router, flight_id, "123").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send_json(
        &router,
        Method::PATCH,
        &format!("/reservas/{id}/checkin/7"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["num_poltrona"], 7);
}

#[tokio::test]
async fn test_check_in_unknown_code_is_404() {
    let (router, _) = test_app(30, &["000001"]);

    let (status, _) = send_json(
        &router,
        Method::POST,
        "/reservas/999999/checkin/1",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_check_in_seat_out_of_range_is_400() {
    let (router, flight_id) = test_app(30, &["045782"]);

    create_reservation(&router, flight_id, "123").await;

    for seat in [0, 31] {
        let (status, body) = send_json(
            &router,
            Method::POST,
            &format!("/reservas/045782/checkin/{seat}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "seat {seat}");
        assert!(body["error"].as_str().unwrap().contains("out of range"));
    }

    // The reservation is still pending with no seat.
    let (_, listed) = send_json(
        &router,
        Method::GET,
        &format!("/reservas/{flight_id}"),
        None,
    )
    .await;
    assert_eq!(listed[0]["status"], "pending");
    assert_eq!(listed[0]["num_poltrona"], Value::Null);
}

#[tokio::test]
async fn test_occupied_seat_is_409_for_both_routes() {
    let (router, flight_id) = test_app(30, &["000001", "000002", "000003"]);

    create_reservation(&router, flight_id, "123").await;
    create_reservation(&router, flight_id, "456").await;
    let third = create_reservation(&router, flight_id, "789").await;

    let (status, _) = send_json(
        &router,
        Method::POST,
        "/reservas/000001/checkin/15",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &router,
        Method::POST,
        "/reservas/000002/checkin/15",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("occupied"));

    let third_id = third["id"].as_str().unwrap();
    let (status, _) = send_json(
        &router,
        Method::PATCH,
        &format!("/reservas/{third_id}/checkin/15"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_second_check_in_is_409_and_keeps_seat() {
    let (router, flight_id) = test_app(30, &["000001"]);

    create_reservation(&router, flight_id, "123").await;

    let (status, _) = send_json(
        &router,
        Method::POST,
        "/reservas/000001/checkin/15",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        &router,
        Method::POST,
        "/reservas/000001/checkin/16",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already checked in"));

    let (_, listed) = send_json(
        &router,
        Method::GET,
        &format!("/reservas/{flight_id}"),
        None,
    )
    .await;
    assert_eq!(listed[0]["num_poltrona"], 15);
}
