//! Crop service domain logic.

use crate::db::DbConnection;
use crate::error::{AppError, AppResult};
use shared::{CreateCropRequest, Crop, DeleteResponse, GrowthStage, UpdateCropRequest};
use tracing::info;

#[derive(Clone)]
pub struct CropService {
    db: DbConnection,
}

impl CropService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_crops(&self) -> AppResult<Vec<Crop>> {
        Ok(self.db.list_crops().await?)
    }

    pub async fn get_crop(&self, id: &str) -> AppResult<Crop> {
        self.db
            .get_crop(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Crop not found: {}", id)))
    }

    pub async fn create_crop(&self, request: CreateCropRequest) -> AppResult<Crop> {
        super::require_non_empty(&request.farm_id, "Farm")?;
        super::require_non_empty(&request.name, "Crop name")?;
        super::require_valid_date(&request.planting_date, "Planting date")?;
        super::require_valid_date(&request.expected_harvest_date, "Expected harvest date")?;

        // The farm link is not verified: a dangling farm_id renders as
        // "Unknown Farm" rather than failing the write.
        let crop = Crop {
            id: Crop::generate_id(super::now_millis()?),
            farm_id: request.farm_id,
            name: request.name.trim().to_string(),
            variety: request.variety.trim().to_string(),
            planting_date: request.planting_date,
            expected_harvest_date: request.expected_harvest_date,
            growth_stage: request
                .growth_stage
                .unwrap_or_else(|| GrowthStage::Planted.as_str().to_string()),
            field: request.field.unwrap_or_default(),
        };

        self.db.insert_crop(&crop).await?;
        info!("Created crop {} ({})", crop.id, crop.name);
        Ok(crop)
    }

    pub async fn update_crop(&self, id: &str, request: UpdateCropRequest) -> AppResult<Crop> {
        let mut crop = self.get_crop(id).await?;

        if let Some(farm_id) = request.farm_id {
            super::require_non_empty(&farm_id, "Farm")?;
            crop.farm_id = farm_id;
        }
        if let Some(name) = request.name {
            super::require_non_empty(&name, "Crop name")?;
            crop.name = name.trim().to_string();
        }
        if let Some(variety) = request.variety {
            crop.variety = variety.trim().to_string();
        }
        if let Some(planting_date) = request.planting_date {
            super::require_valid_date(&planting_date, "Planting date")?;
            crop.planting_date = planting_date;
        }
        if let Some(expected_harvest_date) = request.expected_harvest_date {
            super::require_valid_date(&expected_harvest_date, "Expected harvest date")?;
            crop.expected_harvest_date = expected_harvest_date;
        }
        if let Some(growth_stage) = request.growth_stage {
            // Any stage can be set at any time; transition order is not
            // enforced and unknown values are stored as given.
            crop.growth_stage = growth_stage;
        }
        if let Some(field) = request.field {
            crop.field = field;
        }

        self.db.update_crop(&crop).await?;
        info!("Updated crop {}", crop.id);
        Ok(crop)
    }

    pub async fn delete_crop(&self, id: &str) -> AppResult<DeleteResponse> {
        let deleted = self.db.delete_crop(id).await?;
        let success_message = if deleted {
            info!("Deleted crop {}", id);
            "Crop deleted successfully".to_string()
        } else {
            format!("No crop found with id {}", id)
        };
        Ok(DeleteResponse {
            deleted,
            success_message,
        })
    }
}
