//! End-to-end tests of the HTTP surface against the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use meter_reading_api::{database::InMemoryMeasureStore, router::build_router, AppState, Config};

const IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk";

fn test_app() -> (Router, Arc<InMemoryMeasureStore>) {
    let store = Arc::new(InMemoryMeasureStore::new());
    let state = AppState::new(Config::default(), store.clone());
    (build_router(state), store)
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
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn upload(app: &Router, customer: &str, at: &str, kind: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/upload",
        Some(json!({
            "image": IMAGE,
            "customer_code": customer,
            "measure_datetime": at,
            "measure_type": kind,
        })),
    )
    .await
}

async fn confirm(app: &Router, measure_uuid: &str, value: i64) -> (StatusCode, Value) {
    send(
        app,
        Method::PATCH,
        "/confirm",
        Some(json!({ "measure_uuid": measure_uuid, "confirmed_value": value })),
    )
    .await
}

fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["error_code"], code, "unexpected body: {body}");
    assert!(body["error_description"].is_string());
}

#[tokio::test]
async fn test_upload_creates_customer_and_measure() {
    let (app, store) = test_app();
    let customer = Uuid::new_v4().to_string();

    let (status, body) = upload(&app, &customer, "2024-05-17T10:30:00Z", "WATER").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["image_url"], IMAGE);
    assert_eq!(body["measure_value"], 3);
    assert!(Uuid::parse_str(body["measure_uuid"].as_str().unwrap()).is_ok());
    assert_eq!(store.customer_count().await, 1);
    assert_eq!(store.measure_count().await, 1);
}

#[tokio::test]
async fn test_upload_same_month_and_type_is_double_report() {
    let (app, store) = test_app();
    let customer = Uuid::new_v4().to_string();

    let (status, _) = upload(&app, &customer, "2024-05-01T00:00:00Z", "water").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = upload(&app, &customer, "2024-05-31T23:00:00Z", "Water").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, "DOUBLE_REPORT");
    assert_eq!(body["error_description"], "Leitura do mês já realizada");

    // Other type in the same month, and same type in the next month
    let (status, _) = upload(&app, &customer, "2024-05-20T00:00:00Z", "gas").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = upload(&app, &customer, "2024-06-01T00:00:00Z", "water").await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(store.customer_count().await, 1);
    assert_eq!(store.measure_count().await, 3);
}

#[tokio::test]
async fn test_upload_rejects_invalid_fields() {
    let (app, store) = test_app();
    let customer = Uuid::new_v4().to_string();

    let (status, body) = upload(&app, "not-a-uuid", "2024-05-17T10:30:00Z", "water").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_DATA");
    assert_eq!(body["error_description"], "Invalid uuid");

    let (status, body) = upload(&app, &customer, "yesterday", "water").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_description"], "Invalid date");

    let (status, body) = upload(&app, &customer, "2024-05-17T10:30:00Z", "electric").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_DATA");

    let (status, body) = send(
        &app,
        Method::POST,
        "/upload",
        Some(json!({
            "image": "not an image",
            "customer_code": customer,
            "measure_datetime": "2024-05-17T10:30:00Z",
            "measure_type": "water",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_description"], "Invalid input");

    assert_eq!(store.measure_count().await, 0);
}

#[tokio::test]
async fn test_upload_reports_first_failing_field() {
    let (app, _) = test_app();

    let (status, body) = upload(&app, "nope", "nope", "nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_description"], "Invalid uuid");
}

#[tokio::test]
async fn test_malformed_json_is_invalid_data() {
    let (app, _) = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"image\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_error(&body, "INVALID_DATA");
}

#[tokio::test]
async fn test_confirm_lifecycle() {
    let (app, _) = test_app();
    let customer = Uuid::new_v4().to_string();

    let (_, uploaded) = upload(&app, &customer, "2024-03-10T08:00:00Z", "gas").await;
    let measure_uuid = uploaded["measure_uuid"].as_str().unwrap().to_string();

    // Wrong value leaves the measure unconfirmed
    let (status, body) = confirm(&app, &measure_uuid, 7).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "sucess": false }));

    let (status, body) = confirm(&app, &measure_uuid, 3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "sucess": true }));

    let (status, body) = confirm(&app, &measure_uuid, 3).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, "DOUBLE_REPORT");

    let (_, listed) = send(&app, Method::GET, &format!("/{customer}/list"), None).await;
    assert_eq!(listed["measures"][0]["has_confirmed"], true);
}

#[tokio::test]
async fn test_confirm_accepts_integral_float_value() {
    let (app, _) = test_app();
    let customer = Uuid::new_v4().to_string();

    let (_, uploaded) = upload(&app, &customer, "2024-04-02T09:00:00Z", "water").await;
    let measure_uuid = uploaded["measure_uuid"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/confirm",
        Some(json!({ "measure_uuid": measure_uuid, "confirmed_value": 2.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_DATA");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/confirm",
        Some(json!({ "measure_uuid": measure_uuid, "confirmed_value": 3.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "sucess": true }));
}

#[tokio::test]
async fn test_confirm_unknown_measure_is_not_found() {
    let (app, _) = test_app();

    let (status, body) = confirm(&app, &Uuid::new_v4().to_string(), 3).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "MEASURE_NOT_FOUND");
    assert_eq!(body["error_description"], "Leitura não encontrada");
}

#[tokio::test]
async fn test_confirm_rejects_invalid_body() {
    let (app, _) = test_app();

    let (status, body) = confirm(&app, "1234", 3).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_description"], "Invalid uuid");

    let (status, body) = confirm(&app, &Uuid::new_v4().to_string(), -1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_DATA");

    let (status, body) = send(
        &app,
        Method::PATCH,
        "/confirm",
        Some(json!({ "measure_uuid": Uuid::new_v4().to_string(), "confirmed_value": 2.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_DATA");
}

#[tokio::test]
async fn test_list_unknown_customer_is_not_found() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, &format!("/{}/list", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "MEASURES_NOT_FOUND");
    assert_eq!(body["error_description"], "Nenhuma leitura encontrada");
}

#[tokio::test]
async fn test_list_filters_by_type_newest_first() {
    let (app, _) = test_app();
    let customer = Uuid::new_v4().to_string();

    let (_, january) = upload(&app, &customer, "2024-01-15T12:00:00Z", "gas").await;
    let (_, february) = upload(&app, &customer, "2024-02-15T12:00:00Z", "gas").await;
    upload(&app, &customer, "2024-02-20T12:00:00Z", "water").await;

    let (status, body) = send(&app, Method::GET, &format!("/{customer}/list?measure_type=GAS"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customer_code"], customer.as_str());

    let measures = body["measures"].as_array().unwrap();
    assert_eq!(measures.len(), 2);
    assert_eq!(measures[0]["measure_uuid"], february["measure_uuid"]);
    assert_eq!(measures[1]["measure_uuid"], january["measure_uuid"]);
    assert!(measures.iter().all(|m| m["measure_type"] == "gas"));
    assert_eq!(measures[0]["has_confirmed"], false);
    assert_eq!(measures[0]["image_url"], IMAGE);

    let (status, body) = send(&app, Method::GET, &format!("/{customer}/list?measure_type="), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["measures"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, Method::GET, &format!("/{customer}/list"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["measures"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_empty_filter_result_is_ok() {
    let (app, _) = test_app();
    let customer = Uuid::new_v4().to_string();

    upload(&app, &customer, "2024-01-15T12:00:00Z", "water").await;

    let (status, body) = send(&app, Method::GET, &format!("/{customer}/list?measure_type=gas"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["measures"], json!([]));
}

#[tokio::test]
async fn test_list_rejects_unknown_type_and_bad_code() {
    let (app, _) = test_app();
    let customer = Uuid::new_v4().to_string();
    upload(&app, &customer, "2024-01-15T12:00:00Z", "water").await;

    let (status, body) = send(&app, Method::GET, &format!("/{customer}/list?measure_type=electric"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_TYPE");
    assert_eq!(body["error_description"], "Tipo de medição não permitida");

    let (status, body) = send(&app, Method::GET, "/not-a-uuid/list", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_DATA");
}

#[tokio::test]
async fn test_health_and_request_id() {
    let (app, _) = test_app();

    let request = Request::builder()
        .uri("/health")
        .header("X-Request-ID", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("X-Request-ID").unwrap(), "trace-me");

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dependencies"][0]["name"], "database");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _) = test_app();

    let (status, body) = send(&app, Method::GET, "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/upload"].is_object());
}
