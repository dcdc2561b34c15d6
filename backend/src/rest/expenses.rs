use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Html;
use axum::Json;
use shared::{CreateExpenseRequest, DeleteResponse, Expense, UpdateExpenseRequest};
use tracing::info;

use super::{today, AppState, FilterQuery};
use crate::error::AppResult;

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    info!("GET /api/expenses - query: {:?}", query);
    let range = query.date_range()?;
    Ok(Json(
        state
            .expense_service
            .list_expenses_filtered(query.category(), range, today())
            .await?,
    ))
}

pub async fn get_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Expense>> {
    info!("GET /api/expenses/{}", id);
    Ok(Json(state.expense_service.get_expense(&id).await?))
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    info!("POST /api/expenses - category: {}", request.category);
    let expense = state.expense_service.create_expense(request).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateExpenseRequest>,
) -> AppResult<Json<Expense>> {
    info!("PUT /api/expenses/{}", id);
    Ok(Json(
        state.expense_service.update_expense(&id, request).await?,
    ))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteResponse>> {
    info!("DELETE /api/expenses/{}", id);
    Ok(Json(state.expense_service.delete_expense(&id).await?))
}

pub async fn export_expenses_csv(
    State(state): State<AppState>,
) -> AppResult<([(header::HeaderName, String); 2], String)> {
    info!("GET /api/expenses/export");
    let export = state.export_service.expenses_csv(today()).await?;
    Ok((csv_headers(&export.filename), export.content))
}

pub async fn print_expenses(State(state): State<AppState>) -> AppResult<Html<String>> {
    info!("GET /api/expenses/print");
    Ok(Html(state.export_service.expenses_print_html(today()).await?))
}

pub(super) fn csv_headers(filename: &str) -> [(header::HeaderName, String); 2] {
    [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ]
}
