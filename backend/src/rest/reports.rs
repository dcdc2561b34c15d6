use axum::extract::{Query, State};
use axum::Json;
use chrono::Datelike;
use serde::Deserialize;
use shared::{DashboardResponse, FinancialSummaryResponse, MonthlyReportResponse};
use tracing::info;

use super::{today, AppState, FilterQuery};
use crate::error::AppResult;

#[derive(Deserialize, Debug)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
}

pub async fn financial_summary(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> AppResult<Json<FinancialSummaryResponse>> {
    info!("GET /api/reports/summary - query: {:?}", query);
    let range = query.date_range()?;
    Ok(Json(
        state
            .report_service
            .financial_summary(query.category(), query.source(), range, today())
            .await?,
    ))
}

pub async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> AppResult<Json<MonthlyReportResponse>> {
    let year = query.year.unwrap_or_else(|| today().year());
    info!("GET /api/reports/monthly - year: {}", year);
    Ok(Json(state.report_service.monthly_report(year).await?))
}

pub async fn dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardResponse>> {
    info!("GET /api/dashboard");
    Ok(Json(state.report_service.dashboard(today()).await?))
}
