//! API integration tests
//!
//! Need a running server with a migrated database.

use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

struct Setup {
    salon_id: String,
    staff_id: String,
    service_id: String,
    date: NaiveDate,
}

/// Create a UTC salon open 09:00-12:00 and 13:00-18:00 every day, one staff
/// member and a 30 minute service
async fn setup(client: &Client, buffer: i32) -> Setup {
    let salon: Value = client
        .post(format!("{}/salons", BASE_URL))
        .json(&json!({
            "name": "Integration Salon",
            "timezone": "UTC",
            "buffer_before": buffer,
            "buffer_after": buffer
        }))
        .send()
        .await
        .expect("Failed to create salon")
        .json()
        .await
        .expect("Failed to parse salon");
    let salon_id = salon["id"].as_str().expect("No salon id").to_string();

    for day in 0..7 {
        let response = client
            .put(format!("{}/salons/{}/schedule/{}", BASE_URL, salon_id, day))
            .json(&json!({
                "is_closed": false,
                "slots": [
                    { "start_time": "09:00", "end_time": "12:00" },
                    { "start_time": "13:00", "end_time": "18:00" }
                ]
            }))
            .send()
            .await
            .expect("Failed to set schedule");
        assert!(response.status().is_success());
    }

    let staff: Value = client
        .post(format!("{}/salons/{}/staff", BASE_URL, salon_id))
        .json(&json!({ "name": "Robin" }))
        .send()
        .await
        .expect("Failed to create staff")
        .json()
        .await
        .expect("Failed to parse staff");

    let service: Value = client
        .post(format!("{}/salons/{}/services", BASE_URL, salon_id))
        .json(&json!({ "name": "Cut", "duration": 30, "price": "25.00" }))
        .send()
        .await
        .expect("Failed to create service")
        .json()
        .await
        .expect("Failed to parse service");

    Setup {
        salon_id,
        staff_id: staff["id"].as_str().expect("No staff id").to_string(),
        service_id: service["id"].as_str().expect("No service id").to_string(),
        date: (Utc::now() + Duration::days(7)).date_naive(),
    }
}

async fn book(client: &Client, setup: &Setup, time: &str) -> reqwest::Response {
    client
        .post(format!("{}/bookings", BASE_URL))
        .json(&json!({
            "staff_id": setup.staff_id,
            "service_ids": [setup.service_id],
            "client_id": "00000000-0000-0000-0000-000000000001",
            "start_time": format!("{}T{}:00Z", setup.date, time)
        }))
        .send()
        .await
        .expect("Failed to send booking request")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_unknown_timezone_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/salons", BASE_URL))
        .json(&json!({ "name": "Nowhere", "timezone": "Mars/Olympus" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_overlapping_schedule_slots_are_rejected() {
    let client = Client::new();
    let setup = setup(&client, 0).await;

    let response = client
        .put(format!("{}/salons/{}/schedule/1", BASE_URL, setup.salon_id))
        .json(&json!({
            "is_closed": false,
            "slots": [
                { "start_time": "09:00", "end_time": "12:00" },
                { "start_time": "11:00", "end_time": "14:00" }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "OverlappingScheduleSlots");
}

#[tokio::test]
#[ignore]
async fn test_availability_respects_lunch_break() {
    let client = Client::new();
    let setup = setup(&client, 0).await;

    let response = client
        .get(format!(
            "{}/salons/{}/availability?date={}&service_ids={}",
            BASE_URL, setup.salon_id, setup.date, setup.service_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let slots: Vec<&str> = body["staff"][0]["slots"]
        .as_array()
        .expect("No slots")
        .iter()
        .filter_map(Value::as_str)
        .collect();

    assert_eq!(slots.first(), Some(&"09:00"));
    assert!(slots.contains(&"11:30"));
    assert!(!slots.contains(&"11:45"));
    assert!(!slots.contains(&"12:00"));
    assert_eq!(slots.last(), Some(&"17:30"));
}

#[tokio::test]
#[ignore]
async fn test_double_booking_returns_conflict() {
    let client = Client::new();
    let setup = setup(&client, 10).await;

    let first = book(&client, &setup, "10:00").await;
    assert_eq!(first.status(), 201);
    let created: Value = first.json().await.expect("Failed to parse booking");
    assert_eq!(created["status"], "PENDING");

    let clash = book(&client, &setup, "10:30").await;
    assert_eq!(clash.status(), 409);
    let body: Value = clash.json().await.expect("Failed to parse error");
    assert_eq!(body["error"], "SlotConflict");

    let outside = book(&client, &setup, "11:45").await;
    assert_eq!(outside.status(), 422);

    let next = book(&client, &setup, "10:40").await;
    assert_eq!(next.status(), 201);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_bookings_one_wins() {
    let client = Client::new();
    let setup = setup(&client, 0).await;

    let (a, b) = tokio::join!(book(&client, &setup, "14:00"), book(&client, &setup, "14:00"));
    let mut statuses = [a.status().as_u16(), b.status().as_u16()];
    statuses.sort_unstable();

    assert_eq!(statuses, [201, 409]);
}

#[tokio::test]
#[ignore]
async fn test_status_transitions() {
    let client = Client::new();
    let setup = setup(&client, 0).await;

    let created: Value = book(&client, &setup, "15:00")
        .await
        .json()
        .await
        .expect("Failed to parse booking");
    let id = created["id"].as_str().expect("No booking id");

    let confirm = client
        .put(format!("{}/bookings/{}/status", BASE_URL, id))
        .json(&json!({ "status": "CONFIRMED" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(confirm.status().is_success());

    let complete = client
        .put(format!("{}/bookings/{}/status", BASE_URL, id))
        .json(&json!({ "status": "COMPLETED" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(complete.status(), 422);

    let cancel = client
        .put(format!("{}/bookings/{}/status", BASE_URL, id))
        .json(&json!({ "status": "CANCELED" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(cancel.status().is_success());

    // The canceled booking no longer blocks the slot
    let again = book(&client, &setup, "15:00").await;
    assert_eq!(again.status(), 201);
}
