//! Report orchestration: financial summaries, monthly trend buckets, and the
//! dashboard view model.
//!
//! Load sequences fan out across entities concurrently and join before any
//! derivation; a failure in any branch fails the whole load so the client
//! can show its full-page error state and retry.

use crate::db::DbConnection;
use crate::domain::reports::{self, DateRange};
use crate::error::AppResult;
use chrono::{Duration, NaiveDate};
use shared::{
    growth_stage_label, CropView, DashboardResponse, FinancialSummaryResponse,
    MonthlyReportResponse, TaskView, EXPENSE_CATEGORIES, INCOME_SOURCES,
};
use std::collections::HashMap;
use tracing::info;

/// Farms referenced by a dangling foreign key render as this placeholder
const UNKNOWN_FARM: &str = "Unknown Farm";
const UNKNOWN_CROP: &str = "Unknown Crop";

/// How far ahead the dashboard looks for upcoming tasks
const UPCOMING_TASK_DAYS: i64 = 7;
const UPCOMING_TASK_LIMIT: usize = 5;

#[derive(Clone)]
pub struct ReportService {
    db: DbConnection,
}

impl ReportService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Totals and per-category breakdowns over the filtered period
    pub async fn financial_summary(
        &self,
        expense_category: &str,
        income_source: &str,
        range: DateRange,
        today: NaiveDate,
    ) -> AppResult<FinancialSummaryResponse> {
        info!(
            "Building financial summary: category={}, source={}, range={:?}",
            expense_category, income_source, range
        );

        let (expenses, income) =
            tokio::try_join!(self.db.list_expenses(), self.db.list_income())?;

        let expenses = reports::filter_by_category(&expenses, expense_category);
        let expenses = reports::filter_by_date_range(&expenses, range, today);
        let income = reports::filter_by_category(&income, income_source);
        let income = reports::filter_by_date_range(&income, range, today);

        Ok(FinancialSummaryResponse {
            totals: reports::compute_totals(&income, &expenses),
            expense_breakdown: reports::aggregate_by_category(&expenses, EXPENSE_CATEGORIES, false),
            income_breakdown: reports::aggregate_by_category(&income, INCOME_SOURCES, false),
            expense_count: expenses.len(),
            income_count: income.len(),
        })
    }

    /// 12 income + 12 expense calendar-month buckets for trend charts
    pub async fn monthly_report(&self, year: i32) -> AppResult<MonthlyReportResponse> {
        let (expenses, income) =
            tokio::try_join!(self.db.list_expenses(), self.db.list_income())?;

        Ok(MonthlyReportResponse {
            year,
            income: reports::bucket_by_month(&income, year),
            expenses: reports::bucket_by_month(&expenses, year),
        })
    }

    /// The landing-page view model: counts, all-time totals, upcoming tasks,
    /// and active crops, with dangling farm/crop links resolved to
    /// placeholder names.
    pub async fn dashboard(&self, today: NaiveDate) -> AppResult<DashboardResponse> {
        info!("Building dashboard view model");

        let (farms, crops, tasks, expenses, income) = tokio::try_join!(
            self.db.list_farms(),
            self.db.list_crops(),
            self.db.list_tasks(),
            self.db.list_expenses(),
            self.db.list_income(),
        )?;

        let farm_names: HashMap<&str, &str> = farms
            .iter()
            .map(|f| (f.id.as_str(), f.name.as_str()))
            .collect();
        let crop_names: HashMap<&str, &str> = crops
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        let farm_name_for = |id: &str| -> String {
            farm_names.get(id).unwrap_or(&UNKNOWN_FARM).to_string()
        };

        let horizon = today + Duration::days(UPCOMING_TASK_DAYS);
        let mut upcoming: Vec<&shared::Task> = tasks
            .iter()
            .filter(|t| !t.completed)
            .filter(|t| {
                shared::parse_record_date(&t.due_date)
                    .map(|due| due <= horizon)
                    .unwrap_or(false)
            })
            .collect();
        upcoming.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        let upcoming_tasks: Vec<TaskView> = upcoming
            .into_iter()
            .take(UPCOMING_TASK_LIMIT)
            .map(|t| TaskView {
                task: t.clone(),
                farm_name: farm_name_for(&t.farm_id),
                crop_name: t
                    .crop_id
                    .as_deref()
                    .map(|id| crop_names.get(id).unwrap_or(&UNKNOWN_CROP).to_string()),
            })
            .collect();

        let active_crops: Vec<CropView> = crops
            .iter()
            .filter(|c| c.growth_stage != "harvested")
            .map(|c| CropView {
                crop: c.clone(),
                farm_name: farm_name_for(&c.farm_id),
                growth_stage_label: growth_stage_label(&c.growth_stage),
            })
            .collect();

        let pending_task_count = tasks.iter().filter(|t| !t.completed).count();

        Ok(DashboardResponse {
            farm_count: farms.len(),
            crop_count: crops.len(),
            pending_task_count,
            totals: reports::compute_totals(&income, &expenses),
            upcoming_tasks,
            active_crops,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Crop, Expense, Farm, Income, Priority, SizeUnit, Task, TaskStatus};

    async fn create_test_service() -> (ReportService, DbConnection) {
        let db = DbConnection::init_test().await.unwrap();
        (ReportService::new(db.clone()), db)
    }

    fn farm(id: &str, name: &str) -> Farm {
        Farm {
            id: id.to_string(),
            name: name.to_string(),
            size: 10.0,
            size_unit: SizeUnit::Acres,
            location: "Valley".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn crop(id: &str, farm_id: &str, stage: &str) -> Crop {
        Crop {
            id: id.to_string(),
            farm_id: farm_id.to_string(),
            name: "Tomato".to_string(),
            variety: "Roma".to_string(),
            planting_date: "2024-03-01".to_string(),
            expected_harvest_date: "2024-07-01".to_string(),
            growth_stage: stage.to_string(),
            field: String::new(),
        }
    }

    fn task(id: &str, farm_id: &str, due: &str, status: TaskStatus) -> Task {
        let mut task = Task {
            id: id.to_string(),
            farm_id: farm_id.to_string(),
            crop_id: None,
            task_type: "weeding".to_string(),
            description: "Weed the rows".to_string(),
            due_date: due.to_string(),
            priority: Priority::Medium,
            status,
            completed: false,
        };
        task.sync_completed();
        task
    }

    fn expense(id: &str, category: &str, amount: f64, date: &str) -> Expense {
        Expense {
            id: id.to_string(),
            farm_id: "farm::1".to_string(),
            category: category.to_string(),
            amount,
            date: date.to_string(),
            description: "test".to_string(),
        }
    }

    fn income(id: &str, amount: f64, date: &str) -> Income {
        Income {
            id: id.to_string(),
            description: "Sale".to_string(),
            amount,
            date: date.to_string(),
            source: "crop_sales".to_string(),
            crop_id: None,
            farm_id: None,
            notes: String::new(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_summary_empty_database_is_all_zero() {
        let (service, _db) = create_test_service().await;
        let summary = service
            .financial_summary("all", "all", DateRange::AllTime, day(2024, 3, 20))
            .await
            .unwrap();
        assert_eq!(summary.totals.total_income, 0.0);
        assert_eq!(summary.totals.total_expenses, 0.0);
        assert_eq!(summary.totals.profit_margin, 0.0);
        assert!(summary.expense_breakdown.is_empty());
    }

    #[tokio::test]
    async fn test_summary_totals_and_breakdown() {
        let (service, db) = create_test_service().await;
        db.insert_expense(&expense("expense::1", "seeds", 100.0, "2024-03-01"))
            .await
            .unwrap();
        db.insert_expense(&expense("expense::2", "fuel", 50.0, "2024-03-15"))
            .await
            .unwrap();
        db.insert_income(&income("income::1", 500.0, "2024-03-05"))
            .await
            .unwrap();

        let summary = service
            .financial_summary("all", "all", DateRange::ThisMonth, day(2024, 3, 20))
            .await
            .unwrap();

        assert_eq!(summary.totals.total_expenses, 150.0);
        assert_eq!(summary.totals.total_income, 500.0);
        assert_eq!(summary.totals.net_profit, 350.0);
        assert_eq!(summary.totals.profit_margin, 70.0);
        assert_eq!(summary.expense_count, 2);
        assert_eq!(summary.expense_breakdown.len(), 2);
        assert_eq!(summary.income_breakdown[0].key, "crop_sales");
    }

    #[tokio::test]
    async fn test_monthly_report_buckets() {
        let (service, db) = create_test_service().await;
        db.insert_expense(&expense("expense::1", "seeds", 100.0, "2024-03-01"))
            .await
            .unwrap();
        db.insert_income(&income("income::1", 500.0, "2024-07-05"))
            .await
            .unwrap();

        let report = service.monthly_report(2024).await.unwrap();
        assert_eq!(report.expenses[2].total, 100.0);
        assert_eq!(report.income[6].total, 500.0);
        assert_eq!(report.income[0].total, 0.0);
    }

    #[tokio::test]
    async fn test_dashboard_resolves_dangling_links_to_placeholders() {
        let (service, db) = create_test_service().await;
        db.insert_farm(&farm("farm::1", "North Farm")).await.unwrap();
        // Crop on a farm that no longer exists
        db.insert_crop(&crop("crop::1", "farm::deleted", "growing"))
            .await
            .unwrap();
        db.insert_crop(&crop("crop::2", "farm::1", "harvested"))
            .await
            .unwrap();
        db.insert_task(&task("task::1", "farm::deleted", "2024-03-21", TaskStatus::Pending))
            .await
            .unwrap();

        let dashboard = service.dashboard(day(2024, 3, 20)).await.unwrap();

        assert_eq!(dashboard.farm_count, 1);
        assert_eq!(dashboard.crop_count, 2);
        // Harvested crops are not "active"
        assert_eq!(dashboard.active_crops.len(), 1);
        assert_eq!(dashboard.active_crops[0].farm_name, "Unknown Farm");
        assert_eq!(dashboard.upcoming_tasks.len(), 1);
        assert_eq!(dashboard.upcoming_tasks[0].farm_name, "Unknown Farm");
    }

    #[tokio::test]
    async fn test_dashboard_upcoming_tasks_window() {
        let (service, db) = create_test_service().await;
        db.insert_farm(&farm("farm::1", "North Farm")).await.unwrap();
        // Overdue, inside window, outside window, completed
        db.insert_task(&task("task::1", "farm::1", "2024-03-10", TaskStatus::Pending))
            .await
            .unwrap();
        db.insert_task(&task("task::2", "farm::1", "2024-03-25", TaskStatus::Pending))
            .await
            .unwrap();
        db.insert_task(&task("task::3", "farm::1", "2024-05-01", TaskStatus::Pending))
            .await
            .unwrap();
        db.insert_task(&task("task::4", "farm::1", "2024-03-21", TaskStatus::Completed))
            .await
            .unwrap();

        let dashboard = service.dashboard(day(2024, 3, 20)).await.unwrap();

        // Overdue tasks stay visible; completed and far-future ones do not
        assert_eq!(dashboard.upcoming_tasks.len(), 2);
        assert_eq!(dashboard.upcoming_tasks[0].task.id, "task::1");
        assert_eq!(dashboard.upcoming_tasks[1].task.id, "task::2");
        assert_eq!(dashboard.pending_task_count, 3);
    }
}
