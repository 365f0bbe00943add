use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// A staff member on the payroll.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Personal {
    pub id: Uuid,
    pub nombre: String,
    pub dni: String,
    pub activo: bool,
}

#[derive(Deserialize)]
pub struct CreatePersonal {
    pub nombre: String,
    pub dni: String,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

fn default_activo() -> bool {
    true
}

#[derive(Deserialize)]
pub struct UpdatePersonal {
    pub nombre: Option<String>,
    pub dni: Option<String>,
    pub activo: Option<bool>,
}

/// What `/api/echo` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub content_type: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Records kept in insertion order so listings are stable.
pub type Db = Arc<RwLock<Vec<Personal>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

/// Router pre-loaded with `seed`.
pub fn app_with(seed: Vec<Personal>) -> Router {
    let db: Db = Arc::new(RwLock::new(seed));
    Router::new()
        .route("/api/personal", get(list_personal).post(create_personal))
        .route(
            "/api/personal/{id}",
            get(get_personal).put(update_personal).delete(delete_personal),
        )
        .route("/api/status/{code}", get(status))
        .route("/api/malformed", get(malformed))
        .route("/api/echo", get(echo).post(echo).put(echo).patch(echo).delete(echo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Vec::new()).await
}

pub async fn run_with(listener: TcpListener, seed: Vec<Personal>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(seed)).await
}

async fn list_personal(State(db): State<Db>) -> Json<Vec<Personal>> {
    Json(db.read().await.clone())
}

async fn create_personal(
    State(db): State<Db>,
    Json(input): Json<CreatePersonal>,
) -> (StatusCode, Json<Personal>) {
    let record = Personal {
        id: Uuid::new_v4(),
        nombre: input.nombre,
        dni: input.dni,
        activo: input.activo,
    };
    debug!(id = %record.id, "personal created");
    db.write().await.push(record.clone());
    (StatusCode::CREATED, Json(record))
}

async fn get_personal(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Personal>, StatusCode> {
    let records = db.read().await;
    records
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_personal(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePersonal>,
) -> Result<Json<Personal>, StatusCode> {
    let mut records = db.write().await;
    let record = records
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(nombre) = input.nombre {
        record.nombre = nombre;
    }
    if let Some(dni) = input.dni {
        record.dni = dni;
    }
    if let Some(activo) = input.activo {
        record.activo = activo;
    }
    Ok(Json(record.clone()))
}

async fn delete_personal(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut records = db.write().await;
    let before = records.len();
    records.retain(|p| p.id != id);
    if records.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Empty response with whatever status the path asks for.
async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

/// 200 with a body that is not JSON.
async fn malformed() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "application/json")], "{not json")
}

async fn echo(method: Method, headers: HeaderMap, body: Bytes) -> Result<Json<Echo>, StatusCode> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?)
    };
    Ok(Json(Echo {
        method: method.to_string(),
        content_type,
        body,
    }))
}
