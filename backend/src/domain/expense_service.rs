//! Expense service domain logic.

use crate::db::DbConnection;
use crate::domain::reports::{self, DateRange};
use crate::error::{AppError, AppResult};
use chrono::NaiveDate;
use shared::{CreateExpenseRequest, DeleteResponse, Expense, UpdateExpenseRequest};
use tracing::info;

#[derive(Clone)]
pub struct ExpenseService {
    db: DbConnection,
}

impl ExpenseService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_expenses(&self) -> AppResult<Vec<Expense>> {
        Ok(self.db.list_expenses().await?)
    }

    /// List expenses newest first, narrowed by category and date range
    pub async fn list_expenses_filtered(
        &self,
        category: &str,
        range: DateRange,
        today: NaiveDate,
    ) -> AppResult<Vec<Expense>> {
        let expenses = self.db.list_expenses().await?;
        let expenses = reports::filter_by_category(&expenses, category);
        let expenses = reports::filter_by_date_range(&expenses, range, today);
        Ok(reports::sort_by_date_descending(&expenses))
    }

    pub async fn get_expense(&self, id: &str) -> AppResult<Expense> {
        self.db
            .get_expense(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Expense not found: {}", id)))
    }

    pub async fn create_expense(&self, request: CreateExpenseRequest) -> AppResult<Expense> {
        super::require_non_empty(&request.farm_id, "Farm")?;
        super::require_non_empty(&request.category, "Category")?;
        super::require_non_empty(&request.description, "Description")?;
        super::require_positive_amount(request.amount)?;
        super::require_valid_date(&request.date, "Date")?;

        // The category is stored verbatim; values outside the known set get
        // a fallback label at display time instead of being rejected.
        let expense = Expense {
            id: Expense::generate_id(super::now_millis()?),
            farm_id: request.farm_id,
            category: request.category,
            amount: request.amount,
            date: request.date,
            description: request.description.trim().to_string(),
        };

        self.db.insert_expense(&expense).await?;
        info!(
            "Created expense {} ({} {:.2})",
            expense.id, expense.category, expense.amount
        );
        Ok(expense)
    }

    pub async fn update_expense(
        &self,
        id: &str,
        request: UpdateExpenseRequest,
    ) -> AppResult<Expense> {
        let mut expense = self.get_expense(id).await?;

        if let Some(farm_id) = request.farm_id {
            super::require_non_empty(&farm_id, "Farm")?;
            expense.farm_id = farm_id;
        }
        if let Some(category) = request.category {
            super::require_non_empty(&category, "Category")?;
            expense.category = category;
        }
        if let Some(amount) = request.amount {
            super::require_positive_amount(amount)?;
            expense.amount = amount;
        }
        if let Some(date) = request.date {
            super::require_valid_date(&date, "Date")?;
            expense.date = date;
        }
        if let Some(description) = request.description {
            super::require_non_empty(&description, "Description")?;
            expense.description = description.trim().to_string();
        }

        self.db.update_expense(&expense).await?;
        info!("Updated expense {}", expense.id);
        Ok(expense)
    }

    pub async fn delete_expense(&self, id: &str) -> AppResult<DeleteResponse> {
        let deleted = self.db.delete_expense(id).await?;
        let success_message = if deleted {
            info!("Deleted expense {}", id);
            "Expense deleted successfully".to_string()
        } else {
            format!("No expense found with id {}", id)
        };
        Ok(DeleteResponse {
            deleted,
            success_message,
        })
    }
}
