use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use kuri_api::{
    app,
    state::{AppState, AuthSettings},
};
use kuri_booking::BookingService;
use kuri_core::catalog::NewCoffeeOption;
use kuri_core::repository::{AdminDirectory, CoffeeCatalog, ReservationLedger};
use kuri_notify::NoopMailer;
use kuri_store::memory::{MemoryAdminDirectory, MemoryCatalog, MemoryLedger};

const ADMIN_PASSWORD: &str = "kuri-admin-pw";

async fn test_state() -> AppState {
    let ledger: Arc<dyn ReservationLedger> = Arc::new(MemoryLedger::new());

    let catalog = Arc::new(MemoryCatalog::new());
    catalog
        .create(&NewCoffeeOption::from_input("Arabica Gayo", 45000, None).unwrap())
        .await
        .unwrap();
    let catalog: Arc<dyn CoffeeCatalog> = catalog;

    let admins: Arc<dyn AdminDirectory> = Arc::new(MemoryAdminDirectory::new());
    // Minimum cost keeps the test suite fast
    let hash = bcrypt::hash(ADMIN_PASSWORD, 4).unwrap();
    admins.ensure_bootstrap_admin("admin", &hash).await.unwrap();

    let booking = Arc::new(BookingService::new(
        ledger,
        Arc::clone(&catalog),
        Arc::new(NoopMailer),
        5,
    ));

    AppState {
        booking,
        catalog,
        admins,
        auth: AuthSettings {
            secret: "test-secret".to_string(),
            session_ttl_seconds: 3600,
        },
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking_body(time: &str, people: i32) -> Value {
    json!({
        "name": "Budi",
        "phone": "081234567890",
        "email": "budi@example.com",
        "date": "2024-06-01",
        "time": time,
        "people": people,
        "coffee": "arabica-gayo",
    })
}

#[tokio::test]
async fn test_booking_flow_and_capacity_rejection() {
    let app = app(test_state().await);

    // Party of 3 into an empty capacity-5 slot
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/reservations", booking_body("10:00", 3)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["reservation"]["total_amount"], 135000);
    assert_eq!(body["reservation"]["status"], "pending");

    // Second party of 3 is rejected with the real remaining count
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/reservations", booking_body("10:00", 3)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["availableSpots"], 2);
    assert_eq!(body["error"], "Only 2 spots available for this time slot");

    // The slot map reflects the booking
    let response = app
        .clone()
        .oneshot(get_request("/api/time-slots?date=2024-06-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let slots = body["availability"].as_array().unwrap();
    let ten = slots
        .iter()
        .find(|s| s["time"] == "10:00")
        .expect("10:00 slot present");
    assert_eq!(ten["available_spots"], 2);
    assert_eq!(ten["is_available"], true);
}

#[tokio::test]
async fn test_invalid_coffee_selection_is_404() {
    let app = app(test_state().await);

    let mut body = booking_body("10:00", 2);
    body["coffee"] = json!("kopi-tubruk");
    let response = app
        .oneshot(json_request("POST", "/api/reservations", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Invalid coffee selection");
}

#[tokio::test]
async fn test_time_slots_requires_date() {
    let app = app(test_state().await);
    let response = app.oneshot(get_request("/api/time-slots")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Date parameter is required");
}

#[tokio::test]
async fn test_search_requires_a_contact_field() {
    let app = app(test_state().await);

    let response = app
        .clone()
        .oneshot(get_request("/api/reservations/search"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Seed one booking, then find it by phone
    app.clone()
        .oneshot(json_request("POST", "/api/reservations", booking_body("11:00", 1)))
        .await
        .unwrap();
    let response = app
        .oneshot(get_request("/api/reservations/search?phone=081234567890"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["reservations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_confirm_payment_stamps_reservation() {
    let app = app(test_state().await);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/reservations", booking_body("12:00", 2)))
        .await
        .unwrap();
    let body = response_json(response).await;
    let id = body["reservation"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/reservations/{}/confirm-payment", id),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["reservation"]["status"], "confirmed");
    assert!(!body["reservation"]["payment_time"].is_null());

    // Unknown id is a 404
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/reservations/9999/confirm-payment",
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

async fn login_cookie(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/auth/login",
            json!({ "username": "admin", "password": ADMIN_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets the session cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .expect("cookie name=value pair")
        .to_string()
}

#[tokio::test]
async fn test_admin_routes_are_session_gated() {
    let app = app(test_state().await);

    // No cookie: rejected
    let response = app
        .clone()
        .oneshot(get_request("/api/admin/reservations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Unauthorized");

    // Wrong password: rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/auth/login",
            json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Valid session: dashboard data comes back
    let cookie = login_cookie(&app).await;
    let request = Request::builder()
        .method("GET")
        .uri("/api/admin/reservations")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["stats"]["total"].is_number());

    // /me reflects the logged-in account
    let request = Request::builder()
        .method("GET")
        .uri("/api/admin/auth/me")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["user"]["username"], "admin");
}

#[tokio::test]
async fn test_admin_status_update_rejects_illegal_transition() {
    let app = app(test_state().await);
    let cookie = login_cookie(&app).await;

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/reservations", booking_body("14:00", 2)))
        .await
        .unwrap();
    let body = response_json(response).await;
    let id = body["reservation"]["id"].as_i64().unwrap();

    let put = |status: &str, cookie: &str| {
        Request::builder()
            .method("PUT")
            .uri(format!("/api/admin/reservations/{}", id))
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie)
            .body(Body::from(
                serde_json::to_vec(&json!({ "status": status })).unwrap(),
            ))
            .unwrap()
    };

    // pending -> completed skips confirmation and is refused
    let response = app.clone().oneshot(put("completed", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Unknown status values never reach the ledger
    let response = app.clone().oneshot(put("archived", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Invalid status value");

    // pending -> cancelled is fine
    let response = app.clone().oneshot(put("cancelled", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["reservation"]["status"], "cancelled");
}

#[tokio::test]
async fn test_admin_coffee_crud_and_public_listing() {
    let app = app(test_state().await);
    let cookie = login_cookie(&app).await;

    // Create a new menu item
    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/coffee-options")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from(
            serde_json::to_vec(&json!({ "name": "House Blend", "price": 35000 })).unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["newCoffee"]["id"], "house-blend");

    // Soft-delete it again
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/admin/coffee-options")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from(
            serde_json::to_vec(&json!({ "id": "house-blend" })).unwrap(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The public menu only carries the remaining active item
    let response = app
        .oneshot(get_request("/api/coffee-options"))
        .await
        .unwrap();
    let body = response_json(response).await;
    let options = body["coffeeOptions"].as_array().unwrap();
    assert_eq!(options.len(), 1);
    assert_eq!(options[0]["id"], "arabica-gayo");
}
