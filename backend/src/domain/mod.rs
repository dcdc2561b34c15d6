//! Domain services and the pure filter/aggregate engine.

pub mod advice;
pub mod crop_service;
pub mod expense_service;
pub mod export_service;
pub mod farm_service;
pub mod income_service;
pub mod report_service;
pub mod reports;
pub mod task_service;

pub use crop_service::CropService;
pub use expense_service::ExpenseService;
pub use export_service::ExportService;
pub use farm_service::FarmService;
pub use income_service::IncomeService;
pub use report_service::ReportService;
pub use task_service::TaskService;

use crate::error::{AppError, AppResult};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as epoch milliseconds, used for entity ID generation
pub(crate) fn now_millis() -> AppResult<u64> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(anyhow::Error::from)?
        .as_millis() as u64;
    Ok(millis)
}

/// Reject empty or whitespace-only required fields before any storage write
pub(crate) fn require_non_empty(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Amounts must be positive finite numbers
pub(crate) fn require_positive_amount(amount: f64) -> AppResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::Validation(
            "Amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/// Dates supplied through forms must parse; stored data is tolerated as-is
pub(crate) fn require_valid_date(value: &str, field: &str) -> AppResult<()> {
    if shared::parse_record_date(value).is_none() {
        return Err(AppError::Validation(format!(
            "{} must be a valid date (YYYY-MM-DD)",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("North Farm", "Name").is_ok());
        assert!(require_non_empty("", "Name").is_err());
        assert!(require_non_empty("   ", "Name").is_err());
    }

    #[test]
    fn test_require_positive_amount() {
        assert!(require_positive_amount(0.01).is_ok());
        assert!(require_positive_amount(0.0).is_err());
        assert!(require_positive_amount(-5.0).is_err());
        assert!(require_positive_amount(f64::NAN).is_err());
        assert!(require_positive_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_valid_date() {
        assert!(require_valid_date("2024-03-01", "Date").is_ok());
        assert!(require_valid_date("soon", "Date").is_err());
    }
}
