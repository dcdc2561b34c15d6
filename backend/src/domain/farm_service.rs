//! Farm service domain logic.

use crate::db::DbConnection;
use crate::error::{AppError, AppResult};
use shared::{CreateFarmRequest, DeleteResponse, Farm, UpdateFarmRequest};
use tracing::info;

#[derive(Clone)]
pub struct FarmService {
    db: DbConnection,
}

impl FarmService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_farms(&self) -> AppResult<Vec<Farm>> {
        Ok(self.db.list_farms().await?)
    }

    pub async fn get_farm(&self, id: &str) -> AppResult<Farm> {
        self.db
            .get_farm(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Farm not found: {}", id)))
    }

    pub async fn create_farm(&self, request: CreateFarmRequest) -> AppResult<Farm> {
        super::require_non_empty(&request.name, "Farm name")?;
        super::require_non_empty(&request.location, "Location")?;
        if !request.size.is_finite() || request.size <= 0.0 {
            return Err(AppError::Validation(
                "Farm size must be a positive number".to_string(),
            ));
        }

        let farm = Farm {
            id: Farm::generate_id(super::now_millis()?),
            name: request.name.trim().to_string(),
            size: request.size,
            size_unit: request.size_unit,
            location: request.location.trim().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        self.db.insert_farm(&farm).await?;
        info!("Created farm {} ({})", farm.id, farm.name);
        Ok(farm)
    }

    pub async fn update_farm(&self, id: &str, request: UpdateFarmRequest) -> AppResult<Farm> {
        let mut farm = self.get_farm(id).await?;

        if let Some(name) = request.name {
            super::require_non_empty(&name, "Farm name")?;
            farm.name = name.trim().to_string();
        }
        if let Some(size) = request.size {
            if !size.is_finite() || size <= 0.0 {
                return Err(AppError::Validation(
                    "Farm size must be a positive number".to_string(),
                ));
            }
            farm.size = size;
        }
        if let Some(size_unit) = request.size_unit {
            farm.size_unit = size_unit;
        }
        if let Some(location) = request.location {
            super::require_non_empty(&location, "Location")?;
            farm.location = location.trim().to_string();
        }

        self.db.update_farm(&farm).await?;
        info!("Updated farm {}", farm.id);
        Ok(farm)
    }

    /// Deleting a missing ID is not an error; it reports `deleted: false`.
    /// Crops, tasks, and expenses pointing at the deleted farm are left in
    /// place and resolve to "Unknown Farm" at display time.
    pub async fn delete_farm(&self, id: &str) -> AppResult<DeleteResponse> {
        let deleted = self.db.delete_farm(id).await?;
        let success_message = if deleted {
            info!("Deleted farm {}", id);
            "Farm deleted successfully".to_string()
        } else {
            format!("No farm found with id {}", id)
        };
        Ok(DeleteResponse {
            deleted,
            success_message,
        })
    }
}
