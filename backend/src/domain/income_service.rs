//! Income service domain logic.

use crate::db::DbConnection;
use crate::domain::reports::{self, DateRange};
use crate::error::{AppError, AppResult};
use chrono::NaiveDate;
use shared::{CreateIncomeRequest, DeleteResponse, Income, UpdateIncomeRequest};
use tracing::info;

#[derive(Clone)]
pub struct IncomeService {
    db: DbConnection,
}

impl IncomeService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_income(&self) -> AppResult<Vec<Income>> {
        Ok(self.db.list_income().await?)
    }

    /// List income newest first, narrowed by source and date range
    pub async fn list_income_filtered(
        &self,
        source: &str,
        range: DateRange,
        today: NaiveDate,
    ) -> AppResult<Vec<Income>> {
        let income = self.db.list_income().await?;
        let income = reports::filter_by_category(&income, source);
        let income = reports::filter_by_date_range(&income, range, today);
        Ok(reports::sort_by_date_descending(&income))
    }

    pub async fn get_income(&self, id: &str) -> AppResult<Income> {
        self.db
            .get_income(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Income record not found: {}", id)))
    }

    pub async fn create_income(&self, request: CreateIncomeRequest) -> AppResult<Income> {
        super::require_non_empty(&request.description, "Description")?;
        super::require_non_empty(&request.source, "Source")?;
        super::require_positive_amount(request.amount)?;
        super::require_valid_date(&request.date, "Date")?;

        let income = Income {
            id: Income::generate_id(super::now_millis()?),
            description: request.description.trim().to_string(),
            amount: request.amount,
            date: request.date,
            source: request.source,
            crop_id: request.crop_id.filter(|id| !id.trim().is_empty()),
            farm_id: request.farm_id.filter(|id| !id.trim().is_empty()),
            notes: request.notes.unwrap_or_default(),
        };

        self.db.insert_income(&income).await?;
        info!(
            "Created income {} ({} {:.2})",
            income.id, income.source, income.amount
        );
        Ok(income)
    }

    pub async fn update_income(&self, id: &str, request: UpdateIncomeRequest) -> AppResult<Income> {
        let mut income = self.get_income(id).await?;

        if let Some(description) = request.description {
            super::require_non_empty(&description, "Description")?;
            income.description = description.trim().to_string();
        }
        if let Some(amount) = request.amount {
            super::require_positive_amount(amount)?;
            income.amount = amount;
        }
        if let Some(date) = request.date {
            super::require_valid_date(&date, "Date")?;
            income.date = date;
        }
        if let Some(source) = request.source {
            super::require_non_empty(&source, "Source")?;
            income.source = source;
        }
        if let Some(crop_id) = request.crop_id {
            income.crop_id = if crop_id.trim().is_empty() {
                None
            } else {
                Some(crop_id)
            };
        }
        if let Some(farm_id) = request.farm_id {
            income.farm_id = if farm_id.trim().is_empty() {
                None
            } else {
                Some(farm_id)
            };
        }
        if let Some(notes) = request.notes {
            income.notes = notes;
        }

        self.db.update_income(&income).await?;
        info!("Updated income {}", income.id);
        Ok(income)
    }

    pub async fn delete_income(&self, id: &str) -> AppResult<DeleteResponse> {
        let deleted = self.db.delete_income(id).await?;
        let success_message = if deleted {
            info!("Deleted income {}", id);
            "Income record deleted successfully".to_string()
        } else {
            format!("No income record found with id {}", id)
        };
        Ok(DeleteResponse {
            deleted,
            success_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_service() -> IncomeService {
        let db = DbConnection::init_test().await.unwrap();
        IncomeService::new(db)
    }

    fn create_request(source: &str, amount: f64, date: &str) -> CreateIncomeRequest {
        CreateIncomeRequest {
            description: "Farmers market sales".to_string(),
            amount,
            date: date.to_string(),
            source: source.to_string(),
            crop_id: None,
            farm_id: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_income_validates_amount_and_date() {
        let service = create_test_service().await;
        assert!(service
            .create_income(create_request("crop_sales", -1.0, "2024-03-01"))
            .await
            .is_err());
        assert!(service
            .create_income(create_request("crop_sales", 10.0, "whenever"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_income_without_links() {
        let service = create_test_service().await;
        let income = service
            .create_income(create_request("crop_sales", 500.0, "2024-03-01"))
            .await
            .unwrap();
        assert_eq!(income.farm_id, None);
        assert_eq!(income.crop_id, None);
        assert_eq!(income.notes, "");
    }

    #[tokio::test]
    async fn test_list_filtered_by_source() {
        let service = create_test_service().await;
        service
            .create_income(create_request("crop_sales", 500.0, "2024-03-01"))
            .await
            .unwrap();
        service
            .create_income(create_request("grants", 1000.0, "2024-03-10"))
            .await
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let grants = service
            .list_income_filtered("grants", DateRange::AllTime, today)
            .await
            .unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].amount, 1000.0);
    }
}
