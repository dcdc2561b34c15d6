//! HTTP surface: axum handlers over the domain services.
//!
//! Handlers stay thin: parse the request, call a service, serialize the
//! result. All error mapping lives in `AppError`'s `IntoResponse`.

mod advice;
mod crops;
mod expenses;
mod farms;
mod income;
mod reports;
mod tasks;

use crate::db::DbConnection;
use crate::domain::reports::{DateRange, CATEGORY_ALL};
use crate::domain::{
    CropService, ExpenseService, ExportService, FarmService, IncomeService, ReportService,
    TaskService,
};
use crate::error::{AppError, AppResult};
use axum::routing::{get, post, put};
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Clone)]
pub struct AppState {
    pub farm_service: FarmService,
    pub crop_service: CropService,
    pub task_service: TaskService,
    pub expense_service: ExpenseService,
    pub income_service: IncomeService,
    pub report_service: ReportService,
    pub export_service: ExportService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            farm_service: FarmService::new(db.clone()),
            crop_service: CropService::new(db.clone()),
            task_service: TaskService::new(db.clone()),
            expense_service: ExpenseService::new(db.clone()),
            income_service: IncomeService::new(db.clone()),
            report_service: ReportService::new(db.clone()),
            export_service: ExportService::new(db),
        }
    }
}

/// Category/source and date-range filters shared by the financial list and
/// report endpoints
#[derive(Deserialize, Debug, Default)]
pub struct FilterQuery {
    pub category: Option<String>,
    pub source: Option<String>,
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FilterQuery {
    fn date_range(&self) -> AppResult<DateRange> {
        DateRange::from_params(
            self.range.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
        )
        .map_err(AppError::Validation)
    }

    fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(CATEGORY_ALL)
    }

    fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(CATEGORY_ALL)
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// All routes below `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/farms", get(farms::list_farms).post(farms::create_farm))
        .route(
            "/farms/:id",
            get(farms::get_farm)
                .put(farms::update_farm)
                .delete(farms::delete_farm),
        )
        .route("/crops", get(crops::list_crops).post(crops::create_crop))
        .route(
            "/crops/:id",
            get(crops::get_crop)
                .put(crops::update_crop)
                .delete(crops::delete_crop),
        )
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/:id/complete", put(tasks::set_task_completed))
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route("/expenses/export", get(expenses::export_expenses_csv))
        .route("/expenses/print", get(expenses::print_expenses))
        .route(
            "/expenses/:id",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .route(
            "/income",
            get(income::list_income).post(income::create_income),
        )
        .route("/income/export", get(income::export_income_csv))
        .route("/income/print", get(income::print_income))
        .route(
            "/income/:id",
            get(income::get_income)
                .put(income::update_income)
                .delete(income::delete_income),
        )
        .route("/reports/summary", get(reports::financial_summary))
        .route("/reports/monthly", get(reports::monthly_report))
        .route("/dashboard", get(reports::dashboard))
        .route("/advice", post(advice::weather_advice))
}
