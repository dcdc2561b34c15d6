use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use shared::{CreateTaskRequest, DeleteResponse, Task, UpdateTaskRequest};
use tracing::info;

use super::AppState;
use crate::error::AppResult;

/// Body of the dashboard checkbox shortcut endpoint
#[derive(Deserialize, Debug)]
pub struct SetCompletedRequest {
    pub completed: bool,
}

pub async fn list_tasks(State(state): State<AppState>) -> AppResult<Json<Vec<Task>>> {
    info!("GET /api/tasks");
    Ok(Json(state.task_service.list_tasks().await?))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Task>> {
    info!("GET /api/tasks/{}", id);
    Ok(Json(state.task_service.get_task(&id).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    info!("POST /api/tasks - type: {}", request.task_type);
    let task = state.task_service.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    info!("PUT /api/tasks/{}", id);
    Ok(Json(state.task_service.update_task(&id, request).await?))
}

pub async fn set_task_completed(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetCompletedRequest>,
) -> AppResult<Json<Task>> {
    info!("PUT /api/tasks/{}/complete - {}", id, request.completed);
    Ok(Json(
        state
            .task_service
            .set_task_completed(&id, request.completed)
            .await?,
    ))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    info!("DELETE /api/tasks/{}", id);
    Ok(Json(state.task_service.delete_task(&id).await?))
}
