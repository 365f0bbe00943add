use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Echo, Personal};
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn seed() -> Vec<Personal> {
    vec![
        Personal {
            id: Uuid::from_u128(1),
            nombre: "Ana".to_string(),
            dni: "30111222".to_string(),
            activo: true,
        },
        Personal {
            id: Uuid::from_u128(2),
            nombre: "Luis".to_string(),
            dni: "28999000".to_string(),
            activo: false,
        },
    ]
}

// --- list ---

#[tokio::test]
async fn list_personal_empty() {
    let resp = app().oneshot(get("/api/personal")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<Personal> = body_json(resp).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn list_personal_keeps_insertion_order() {
    let resp = app_with(seed()).oneshot(get("/api/personal")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<Personal> = body_json(resp).await;
    assert_eq!(records, seed());
}

// --- create ---

#[tokio::test]
async fn create_personal_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/personal",
            r#"{"nombre":"Marta","dni":"33444555"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let record: Personal = body_json(resp).await;
    assert_eq!(record.nombre, "Marta");
    assert!(record.activo);
}

#[tokio::test]
async fn create_personal_missing_field_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/personal", r#"{"nombre":"Marta"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete ---

#[tokio::test]
async fn get_personal_bad_uuid_returns_400() {
    let resp = app().oneshot(get("/api/personal/not-a-uuid")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_personal_applies_present_fields() {
    let resp = app_with(seed())
        .oneshot(json_request(
            "PUT",
            "/api/personal/00000000-0000-0000-0000-000000000002",
            r#"{"activo":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let record: Personal = body_json(resp).await;
    assert_eq!(record.nombre, "Luis");
    assert!(record.activo);
}

#[tokio::test]
async fn update_personal_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PUT",
            "/api/personal/00000000-0000-0000-0000-000000000000",
            r#"{"nombre":"Nadie"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_list() {
    use tower::Service;

    let mut app = app_with(seed()).into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/api/personal/00000000-0000-0000-0000-000000000001")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/personal"))
        .await
        .unwrap();
    let records: Vec<Personal> = body_json(resp).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].nombre, "Luis");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/api/personal/00000000-0000-0000-0000-000000000001")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- failure fixtures ---

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app().oneshot(get("/api/status/500")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn malformed_route_is_not_json() {
    let resp = app().oneshot(get("/api/malformed")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<serde_json::Value>(&bytes).is_err());
}

// --- echo ---

#[tokio::test]
async fn echo_reports_method_header_and_body() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/echo", r#"{"x":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.content_type.as_deref(), Some("application/json"));
    assert_eq!(echo.body, Some(serde_json::json!({"x": 1})));
}

#[tokio::test]
async fn echo_without_body() {
    let resp = app().oneshot(get("/api/echo")).await.unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.content_type, None);
    assert_eq!(echo.body, None);
}
