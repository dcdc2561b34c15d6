use super::DbConnection;
use anyhow::Result;
use shared::Crop;
use sqlx::{sqlite::SqliteRow, Row};

fn crop_from_row(row: &SqliteRow) -> Crop {
    Crop {
        id: row.get("id"),
        farm_id: row.get("farm_id"),
        name: row.get("name"),
        variety: row.get("variety"),
        planting_date: row.get("planting_date"),
        expected_harvest_date: row.get("expected_harvest_date"),
        growth_stage: row.get("growth_stage"),
        field: row.get("field"),
    }
}

impl DbConnection {
    /// List all crops in insertion order
    pub async fn list_crops(&self) -> Result<Vec<Crop>> {
        let rows = sqlx::query("SELECT * FROM crops ORDER BY rowid")
            .fetch_all(self.pool())
            .await?;
        Ok(rows.iter().map(crop_from_row).collect())
    }

    /// Retrieve a crop by its ID
    pub async fn get_crop(&self, id: &str) -> Result<Option<Crop>> {
        let row = sqlx::query("SELECT * FROM crops WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.as_ref().map(crop_from_row))
    }

    /// Store a new crop
    pub async fn insert_crop(&self, crop: &Crop) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO crops (id, farm_id, name, variety, planting_date, expected_harvest_date, growth_stage, field)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&crop.id)
        .bind(&crop.farm_id)
        .bind(&crop.name)
        .bind(&crop.variety)
        .bind(&crop.planting_date)
        .bind(&crop.expected_harvest_date)
        .bind(&crop.growth_stage)
        .bind(&crop.field)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Update a crop in place; false when the ID does not exist
    pub async fn update_crop(&self, crop: &Crop) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE crops
            SET farm_id = ?, name = ?, variety = ?, planting_date = ?,
                expected_harvest_date = ?, growth_stage = ?, field = ?
            WHERE id = ?
            "#,
        )
        .bind(&crop.farm_id)
        .bind(&crop.name)
        .bind(&crop.variety)
        .bind(&crop.planting_date)
        .bind(&crop.expected_harvest_date)
        .bind(&crop.growth_stage)
        .bind(&crop.field)
        .bind(&crop.id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a crop by ID; false when the ID does not exist
    pub async fn delete_crop(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM crops WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
