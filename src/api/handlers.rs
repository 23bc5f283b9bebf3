use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::ApiState;
use crate::model::{Farm, Frontend};
use crate::store::{StoreError, Version};

/// Expected version supplied by the caller on every mutation; a missing or
/// malformed parameter is rejected before the store is touched.
#[derive(Debug, Deserialize)]
pub struct ExpectedVersion {
    pub version: Version,
}

/// Envelope for read responses: payload plus the version it was read at.
#[derive(Debug, Serialize)]
pub struct Versioned<T> {
    #[serde(rename = "_version")]
    pub version: Version,
    pub data: T,
}

/// Envelope carrying only a version (current version, delete results).
#[derive(Debug, Serialize)]
pub struct VersionInfo {
    #[serde(rename = "_version")]
    pub version: Version,
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

/// Store errors mapped onto protocol status codes.
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::AlreadyExists { .. } | StoreError::VersionMismatch { .. } => {
                StatusCode::CONFLICT
            }
            StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "code": status.as_u16(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn get_version(State(state): State<ApiState>) -> Json<VersionInfo> {
    Json(VersionInfo {
        version: state.store.version(),
    })
}

pub async fn list_frontends(State(state): State<ApiState>) -> Json<Versioned<Vec<Frontend>>> {
    let (data, version) = state.store.frontends();
    Json(Versioned { version, data })
}

pub async fn get_frontend(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<Versioned<Frontend>>, ApiError> {
    let (data, version) = state.store.frontend(&name)?;
    Ok(Json(Versioned { version, data }))
}

pub async fn create_frontend(
    State(state): State<ApiState>,
    Query(expected): Query<ExpectedVersion>,
    Json(frontend): Json<Frontend>,
) -> Result<(StatusCode, Json<Versioned<Frontend>>), ApiError> {
    let version = state
        .store
        .create_frontend(frontend.clone(), expected.version)?;
    Ok((
        StatusCode::CREATED,
        Json(Versioned {
            version,
            data: frontend,
        }),
    ))
}

pub async fn edit_frontend(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(expected): Query<ExpectedVersion>,
    Json(frontend): Json<Frontend>,
) -> Result<Json<Versioned<Frontend>>, ApiError> {
    let version = state
        .store
        .edit_frontend(&name, frontend.clone(), expected.version)?;
    Ok(Json(Versioned {
        version,
        data: frontend,
    }))
}

pub async fn delete_frontend(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(expected): Query<ExpectedVersion>,
) -> Result<Json<VersionInfo>, ApiError> {
    let version = state.store.delete_frontend(&name, expected.version)?;
    Ok(Json(VersionInfo { version }))
}

pub async fn list_farms(State(state): State<ApiState>) -> Json<Versioned<Vec<Farm>>> {
    let (data, version) = state.store.farms();
    Json(Versioned { version, data })
}

pub async fn get_farm(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> Result<Json<Versioned<Farm>>, ApiError> {
    let (data, version) = state.store.farm(&name)?;
    Ok(Json(Versioned { version, data }))
}

pub async fn create_farm(
    State(state): State<ApiState>,
    Query(expected): Query<ExpectedVersion>,
    Json(farm): Json<Farm>,
) -> Result<(StatusCode, Json<Versioned<Farm>>), ApiError> {
    let version = state.store.create_farm(farm.clone(), expected.version)?;
    Ok((
        StatusCode::CREATED,
        Json(Versioned {
            version,
            data: farm,
        }),
    ))
}

pub async fn edit_farm(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(expected): Query<ExpectedVersion>,
    Json(farm): Json<Farm>,
) -> Result<Json<Versioned<Farm>>, ApiError> {
    let version = state.store.edit_farm(&name, farm.clone(), expected.version)?;
    Ok(Json(Versioned {
        version,
        data: farm,
    }))
}

pub async fn delete_farm(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(expected): Query<ExpectedVersion>,
) -> Result<Json<VersionInfo>, ApiError> {
    let version = state.store.delete_farm(&name, expected.version)?;
    Ok(Json(VersionInfo { version }))
}
