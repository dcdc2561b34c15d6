use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Html;
use axum::Json;
use shared::{CreateIncomeRequest, DeleteResponse, Income, UpdateIncomeRequest};
use tracing::info;

use super::expenses::csv_headers;
use super::{today, AppState, FilterQuery};
use crate::error::AppResult;

pub async fn list_income(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> AppResult<Json<Vec<Income>>> {
    info!("GET /api/income - query: {:?}", query);
    let range = query.date_range()?;
    Ok(Json(
        state
            .income_service
            .list_income_filtered(query.source(), range, today())
            .await?,
    ))
}

pub async fn get_income(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Income>> {
    info!("GET /api/income/{}", id);
    Ok(Json(state.income_service.get_income(&id).await?))
}

pub async fn create_income(
    State(state): State<AppState>,
    Json(request): Json<CreateIncomeRequest>,
) -> AppResult<(StatusCode, Json<Income>)> {
    info!("POST /api/income - source: {}", request.source);
    let income = state.income_service.create_income(request).await?;
    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn update_income(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateIncomeRequest>,
) -> AppResult<Json<Income>> {
    info!("PUT /api/income/{}", id);
    Ok(Json(state.income_service.update_income(&id, request).await?))
}

pub async fn delete_income(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    info!("DELETE /api/income/{}", id);
    Ok(Json(state.income_service.delete_income(&id).await?))
}

pub async fn export_income_csv(
    State(state): State<AppState>,
) -> AppResult<([(header::HeaderName, String); 2], String)> {
    info!("GET /api/income/export");
    let export = state.export_service.income_csv(today()).await?;
    Ok((csv_headers(&export.filename), export.content))
}

pub async fn print_income(State(state): State<AppState>) -> AppResult<Html<String>> {
    info!("GET /api/income/print");
    Ok(Html(state.export_service.income_print_html(today()).await?))
}
