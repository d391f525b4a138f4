//! Tests de integración de la API sobre el almacén en memoria

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use driver_training_compliance::create_app;
use driver_training_compliance::state::AppState;

fn create_test_app() -> Router {
    create_app(AppState::in_memory())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

fn date_in(days: i64) -> String {
    (Utc::now().date_naive() + Duration::days(days)).to_string()
}

fn driver_payload(employee_id: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "first_name": "John",
        "last_name": "Smith",
        "email": "john.smith@company.com",
        "phone": "555-0123",
        "hire_date": "2023-01-15",
        "license_number": "CDL123456789",
        "license_class": "CDL Class A",
        "license_expiry": date_in(730),
        "date_of_birth": "1985-06-20",
        "address": "123 Main St, Anytown, ST 12345",
        "emergency_contact_name": "Jane Smith",
        "emergency_contact_phone": "555-0124"
    })
}

fn certification_payload(driver_id: &str, expires_in_days: i64) -> Value {
    json!({
        "driver_id": driver_id,
        "certification_name": "DOT Medical Certificate",
        "certification_type": "Medical",
        "issue_date": date_in(-700),
        "expiry_date": date_in(expires_in_days),
        "issuing_authority": "DOT Medical Examiner",
        "certificate_number": format!("MED-{}", expires_in_days)
    })
}

async fn create_driver(app: &Router, employee_id: &str) -> String {
    let (status, body) = post(app, "/api/drivers", driver_payload(employee_id)).await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_str().unwrap().to_string()
}

async fn seed_modules(app: &Router) -> Vec<Value> {
    let (status, body) = post(app, "/api/training-modules/initialize-defaults", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    body["modules"].as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_api_root() {
    let app = create_test_app();
    let (status, body) = get(&app, "/api/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Truck Driver Training Dashboard API");
}

#[tokio::test]
async fn test_driver_lifecycle() {
    let app = create_test_app();
    let id = create_driver(&app, "EMP001").await;

    let (status, driver) = get(&app, &format!("/api/drivers/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(driver["license_class"], "CDL Class A");
    assert_eq!(driver["is_active"], true);

    let (status, updated) = put(
        &app,
        &format!("/api/drivers/{}", id),
        json!({ "phone": "555-9999" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555-9999");
    assert_eq!(updated["first_name"], "John");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/drivers/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Driver deactivated successfully");

    let (status, body) = get(&app, &format!("/api/drivers/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Driver not found");

    let (_, drivers) = get(&app, "/api/drivers").await;
    assert!(drivers.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_driver_not_found_responses() {
    let app = create_test_app();

    let (status, _) = get(&app, "/api/drivers/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = put(&app, "/api/drivers/missing", json!({ "phone": "1" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/drivers/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_driver_payloads() {
    let app = create_test_app();

    let mut bad_email = driver_payload("EMP002");
    bad_email["email"] = json!("not-an-email");
    let (status, body) = post(&app, "/api/drivers", bad_email).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let mut bad_class = driver_payload("EMP003");
    bad_class["license_class"] = json!("Class Z");
    let (status, _) = post(&app, "/api/drivers", bad_class).await;
    assert!(status.is_client_error());

    let (status, _) = post(&app, "/api/drivers", json!({ "first_name": "Only" })).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_training_modules_seed_and_lookup() {
    let app = create_test_app();

    let (status, body) = post(&app, "/api/training-modules/initialize-defaults", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Created 8 default training modules");

    let (_, again) = post(&app, "/api/training-modules/initialize-defaults", json!({})).await;
    assert_eq!(again["message"], "Created 0 default training modules");

    let (_, modules) = get(&app, "/api/training-modules").await;
    let modules = modules.as_array().unwrap();
    assert_eq!(modules.len(), 8);

    let id = modules[0]["id"].as_str().unwrap();
    let (status, module) = get(&app, &format!("/api/training-modules/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(module["id"], id);

    let (status, body) = get(&app, "/api/training-modules/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Training module not found");
}

#[tokio::test]
async fn test_create_custom_module_defaults() {
    let app = create_test_app();
    let (status, module) = post(
        &app,
        "/api/training-modules",
        json!({
            "name": "Winter Driving",
            "description": "Ice and snow",
            "module_type": "safety",
            "duration_hours": 3.5
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(module["required_score"], 80);
    assert_eq!(module["is_mandatory"], true);
    assert_eq!(module["prerequisites"], json!([]));
}

#[tokio::test]
async fn test_progress_flow_and_driver_analytics() {
    let app = create_test_app();
    let driver_id = create_driver(&app, "EMP010").await;
    let modules = seed_modules(&app).await;
    let module_id = modules[0]["id"].as_str().unwrap().to_string();
    let module_name = modules[0]["name"].clone();

    let assignment = json!({ "driver_id": driver_id, "module_id": module_id });
    let (status, progress) = post(&app, "/api/training-progress", assignment.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["status"], "not_started");
    assert_eq!(progress["attempts"], 0);

    let (status, body) = post(&app, "/api/training-progress", assignment).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Training progress already exists for this driver-module combination"
    );

    let progress_id = progress["id"].as_str().unwrap();
    let (status, updated) = put(
        &app,
        &format!("/api/training-progress/{}", progress_id),
        json!({ "status": "completed", "score": 95 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completion_date"], json!(date_in(0)));
    assert_eq!(updated["attempts"], 1);

    let (_, listed) = get(
        &app,
        &format!("/api/training-progress?driver_id={}", driver_id),
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, analytics) = get(
        &app,
        &format!("/api/analytics/driver-progress/{}", driver_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["training_stats"]["total_assigned"], 1);
    assert_eq!(analytics["training_stats"]["completed"], 1);
    assert_eq!(analytics["training_stats"]["completion_rate"], 100.0);
    assert_eq!(analytics["training_stats"]["average_score"], 95.0);
    assert_eq!(analytics["progress_details"][0]["module_name"], module_name);

    let (status, performance) = get(
        &app,
        &format!("/api/analytics/module-performance/{}", module_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(performance["stats"]["completed"], 1);
    assert_eq!(performance["stats"]["average_attempts"], 1.0);
    assert_eq!(performance["performance_distribution"], json!([95]));

    let (status, summary) = get(&app, "/api/dashboard/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_drivers"], 1);
    assert_eq!(summary["active_drivers"], 1);
    assert_eq!(summary["total_training_modules"], 8);
    assert_eq!(summary["overall_completion_rate"], 100.0);
    assert_eq!(summary["recent_completions"], 1);
}

#[tokio::test]
async fn test_update_missing_progress() {
    let app = create_test_app();
    let (status, body) = put(
        &app,
        "/api/training-progress/missing",
        json!({ "status": "in_progress" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Training progress not found");
}

#[tokio::test]
async fn test_certifications_and_compliance() {
    let app = create_test_app();
    let driver_id = create_driver(&app, "EMP020").await;
    seed_modules(&app).await;

    let (status, soon) = post(&app, "/api/certifications", certification_payload(&driver_id, 10)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(soon["status"], "expiring_soon");

    let (_, expired) = post(&app, "/api/certifications", certification_payload(&driver_id, -3)).await;
    assert_eq!(expired["status"], "expired");

    let (_, active) = post(&app, "/api/certifications", certification_payload(&driver_id, 200)).await;
    assert_eq!(active["status"], "active");

    let (_, listed) = get(
        &app,
        &format!("/api/certifications?driver_id={}", driver_id),
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 3);

    let (status, expiring) = get(&app, "/api/certifications/expiring").await;
    assert_eq!(status, StatusCode::OK);
    let expiring = expiring.as_array().unwrap();
    assert_eq!(expiring.len(), 2);
    assert!(expiring.iter().all(|c| c["driver_name"] == "John Smith"));

    let (_, summary) = get(&app, "/api/dashboard/summary").await;
    assert_eq!(summary["drivers_with_expired_certifications"], 1);
    assert_eq!(summary["drivers_with_expiring_certifications"], 1);
    assert_eq!(summary["overall_completion_rate"], 0.0);

    let (status, report) = get(&app, "/api/analytics/compliance-report").await;
    assert_eq!(status, StatusCode::OK);
    let report = report.as_array().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0]["driver"]["id"], json!(driver_id));
    assert_eq!(report[0]["mandatory_training_completion"], "0/7");
    assert_eq!(report[0]["expired_certifications"], 1);
    assert_eq!(report[0]["license_status"], "Valid");
    assert_eq!(report[0]["compliance_status"], "Non-Compliant");
}

#[tokio::test]
async fn test_analytics_not_found() {
    let app = create_test_app();

    let (status, body) = get(&app, "/api/analytics/driver-progress/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Driver not found");

    let (status, body) = get(&app, "/api/analytics/module-performance/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Training module not found");
}

#[tokio::test]
async fn test_deactivated_driver_leaves_reports() {
    let app = create_test_app();
    let kept = create_driver(&app, "EMP030").await;
    let removed = create_driver(&app, "EMP031").await;

    send(&app, Method::DELETE, &format!("/api/drivers/{}", removed), None).await;

    let (_, summary) = get(&app, "/api/dashboard/summary").await;
    assert_eq!(summary["active_drivers"], 1);

    let (_, report) = get(&app, "/api/analytics/compliance-report").await;
    let report = report.as_array().unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report[0]["driver"]["id"], json!(kept));
    assert_eq!(report[0]["compliance_status"], "Compliant");

    let (status, _) = get(&app, &format!("/api/analytics/driver-progress/{}", removed)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_mirrors_request_origin() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/drivers")
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "GET")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}
