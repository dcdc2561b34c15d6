use super::DbConnection;
use anyhow::Result;
use shared::{Farm, SizeUnit};
use sqlx::{sqlite::SqliteRow, Row};

fn farm_from_row(row: &SqliteRow) -> Farm {
    Farm {
        id: row.get("id"),
        name: row.get("name"),
        size: row.get("size"),
        size_unit: SizeUnit::from_key(&row.get::<String, _>("size_unit")),
        location: row.get("location"),
        created_at: row.get("created_at"),
    }
}

impl DbConnection {
    /// List all farms in insertion order
    pub async fn list_farms(&self) -> Result<Vec<Farm>> {
        let rows = sqlx::query("SELECT * FROM farms ORDER BY rowid")
            .fetch_all(self.pool())
            .await?;
        Ok(rows.iter().map(farm_from_row).collect())
    }

    /// Retrieve a farm by its ID
    pub async fn get_farm(&self, id: &str) -> Result<Option<Farm>> {
        let row = sqlx::query("SELECT * FROM farms WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.as_ref().map(farm_from_row))
    }

    /// Store a new farm
    pub async fn insert_farm(&self, farm: &Farm) -> Result<()> {
        sqlx::query(
            "INSERT INTO farms (id, name, size, size_unit, location, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&farm.id)
        .bind(&farm.name)
        .bind(farm.size)
        .bind(farm.size_unit.as_str())
        .bind(&farm.location)
        .bind(&farm.created_at)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Update a farm in place; false when the ID does not exist
    pub async fn update_farm(&self, farm: &Farm) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE farms SET name = ?, size = ?, size_unit = ?, location = ? WHERE id = ?",
        )
        .bind(&farm.name)
        .bind(farm.size)
        .bind(farm.size_unit.as_str())
        .bind(&farm.location)
        .bind(&farm.id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a farm by ID; false when the ID does not exist
    pub async fn delete_farm(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM farms WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
