use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shared::{CreateCropRequest, Crop, DeleteResponse, UpdateCropRequest};
use tracing::info;

use super::AppState;
use crate::error::AppResult;

pub async fn list_crops(State(state): State<AppState>) -> AppResult<Json<Vec<Crop>>> {
    info!("GET /api/crops");
    Ok(Json(state.crop_service.list_crops().await?))
}

pub async fn get_crop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Crop>> {
    info!("GET /api/crops/{}", id);
    Ok(Json(state.crop_service.get_crop(&id).await?))
}

pub async fn create_crop(
    State(state): State<AppState>,
    Json(request): Json<CreateCropRequest>,
) -> AppResult<(StatusCode, Json<Crop>)> {
    info!("POST /api/crops - name: {}", request.name);
    let crop = state.crop_service.create_crop(request).await?;
    Ok((StatusCode::CREATED, Json(crop)))
}

pub async fn update_crop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCropRequest>,
) -> AppResult<Json<Crop>> {
    info!("PUT /api/crops/{}", id);
    Ok(Json(state.crop_service.update_crop(&id, request).await?))
}

pub async fn delete_crop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    info!("DELETE /api/crops/{}", id);
    Ok(Json(state.crop_service.delete_crop(&id).await?))
}
