use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shared::{CreateFarmRequest, DeleteResponse, Farm, UpdateFarmRequest};
use tracing::info;

use super::AppState;
use crate::error::AppResult;

pub async fn list_farms(State(state): State<AppState>) -> AppResult<Json<Vec<Farm>>> {
    info!("GET /api/farms");
    Ok(Json(state.farm_service.list_farms().await?))
}

pub async fn get_farm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Farm>> {
    info!("GET /api/farms/{}", id);
    Ok(Json(state.farm_service.get_farm(&id).await?))
}

pub async fn create_farm(
    State(state): State<AppState>,
    Json(request): Json<CreateFarmRequest>,
) -> AppResult<(StatusCode, Json<Farm>)> {
    info!("POST /api/farms - name: {}", request.name);
    let farm = state.farm_service.create_farm(request).await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

pub async fn update_farm(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateFarmRequest>,
) -> AppResult<Json<Farm>> {
    info!("PUT /api/farms/{}", id);
    Ok(Json(state.farm_service.update_farm(&id, request).await?))
}

pub async fn delete_farm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    info!("DELETE /api/farms/{}", id);
    Ok(Json(state.farm_service.delete_farm(&id).await?))
}
