//! In-process HTTP tests against the full router with in-memory storage

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use slotbook_adapters::{
    InMemoryBookingRepository, InMemoryNotificationDispatcher, InMemoryProviderRepository,
    InMemoryUserRepository,
};
use slotbook_api::{AppState, create_router};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(
        Arc::new(InMemoryProviderRepository::new()),
        Arc::new(InMemoryBookingRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryNotificationDispatcher::new()),
    );
    create_router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_provider(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/providers",
        Some(json!({"name": "Dr. A", "category": "Medical", "slots": ["09:00", "10:00"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn booking_body(provider_id: &str) -> Value {
    json!({
        "providerId": provider_id,
        "serviceType": "Medical",
        "date": "2024-06-01",
        "slot": "10:00",
        "clientName": "Jane",
        "clientEmail": "jane@x.com"
    })
}

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "slotbook");
}

#[tokio::test]
async fn test_booking_lifecycle_over_http() {
    let app = app();
    let p1 = create_provider(&app).await;

    let (status, first) = send(&app, "POST", "/bookings", Some(booking_body(&p1))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["status"], "pending");
    assert_eq!(first["providerId"], p1.as_str());
    assert_eq!(first["date"], "2024-06-01");

    let (status, conflict) = send(&app, "POST", "/bookings/book", Some(booking_body(&p1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(conflict["error"]["kind"], "conflict");
    assert_eq!(conflict["error"]["message"], "slot already booked");

    let id = first["id"].as_str().unwrap();
    let (status, cancelled) = send(
        &app,
        "PUT",
        &format!("/bookings/{id}"),
        Some(json!({"status": "cancelled"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, second) = send(&app, "POST", "/bookings", Some(booking_body(&p1))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(second["id"], first["id"]);

    let (status, listed) = send(&app, "GET", &format!("/bookings?providerId={p1}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["provider"]["name"], "Dr. A");

    let (status, by_client) = send(&app, "GET", "/bookings/client/JANE@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_client.as_array().unwrap().len(), 2);

    let (status, by_provider) =
        send(&app, "GET", &format!("/bookings/provider/{p1}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_provider.as_array().unwrap().len(), 2);

    let (status, deleted) = send(&app, "DELETE", &format!("/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["id"], id);

    let (status, missing) = send(&app, "GET", &format!("/bookings/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["error"]["kind"], "not_found");
}

#[tokio::test]
async fn test_create_booking_validation_and_not_found() {
    let app = app();
    let p1 = create_provider(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(json!({"providerId": p1, "serviceType": "Medical"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");
    assert_eq!(
        body["error"]["message"],
        "missing required fields: date, slot, clientName, clientEmail"
    );

    let mut unknown = booking_body("00000000-0000-4000-8000-000000000000");
    let (status, body) = send(&app, "POST", "/bookings", Some(unknown.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "provider not found");

    unknown["providerId"] = json!("definitely-not-an-id");
    let (status, _) = send(&app, "POST", "/bookings", Some(unknown)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut off_menu = booking_body(&p1);
    off_menu["slot"] = json!("23:00");
    let (status, body) = send(&app, "POST", "/bookings", Some(off_menu)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");

    let (status, listed) = send(&app, "GET", "/bookings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/bookings")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_request(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");

    let (status, body) = send(&app, "POST", "/bookings", Some(json!({"slot": 10}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");
}

#[tokio::test]
async fn test_status_update_errors() {
    let app = app();
    let p1 = create_provider(&app).await;
    let (_, booking) = send(&app, "POST", "/bookings", Some(booking_body(&p1))).await;
    let uri = format!("/bookings/{}", booking["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(json!({"status": "archived"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["kind"], "validation_error");

    let (status, _) = send(&app, "PUT", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({"status": "completed"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/bookings/00000000-0000-4000-8000-000000000000",
        Some(json!({"status": "confirmed"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_provider_crud_and_availability() {
    let app = app();
    let p1 = create_provider(&app).await;

    let (status, body) = send(&app, "POST", "/providers", Some(json!({"name": "Nameless"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "missing required fields: category");

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/providers/{p1}"),
        Some(json!({"specialty": "Cardiology"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["specialty"], "Cardiology");
    assert_eq!(updated["name"], "Dr. A");

    let (status, listed) = send(&app, "GET", "/providers?category=medical", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    send(&app, "POST", "/bookings", Some(booking_body(&p1))).await;
    let (status, availability) = send(
        &app,
        "GET",
        &format!("/providers/{p1}/availability?date=2024-06-01"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        availability["slots"],
        json!([{"slot": "09:00", "available": true}, {"slot": "10:00", "available": false}])
    );

    let (status, _) = send(&app, "GET", &format!("/providers/{p1}/availability"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &format!("/providers/{p1}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, orphaned) = send(&app, "GET", "/bookings", None).await;
    let orphaned = orphaned.as_array().unwrap();
    assert_eq!(orphaned[0]["status"], "cancelled");
    assert!(orphaned[0]["provider"].is_null());

    let (status, _) = send(&app, "GET", &format!("/providers/{p1}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_register_and_conflict() {
    let app = app();

    let (status, user) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"name": "Jane", "email": "Jane@X.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["email"], "jane@x.com");
    assert_eq!(user["role"], "client");

    let (status, body) = send(
        &app,
        "POST",
        "/users",
        Some(json!({"name": "Jane again", "email": "jane@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["kind"], "conflict");

    let id = user["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Jane");

    let (status, _) = send(&app, "GET", "/users/unknown", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_header() {
    let app = app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    assert!(doc["paths"]["/bookings"]["post"].is_object());
}
