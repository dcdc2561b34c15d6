use super::DbConnection;
use anyhow::Result;
use shared::Income;
use sqlx::{sqlite::SqliteRow, Row};

fn income_from_row(row: &SqliteRow) -> Income {
    Income {
        id: row.get("id"),
        description: row.get("description"),
        amount: row.get("amount"),
        date: row.get("date"),
        source: row.get("source"),
        crop_id: row.get("crop_id"),
        farm_id: row.get("farm_id"),
        notes: row.get("notes"),
    }
}

impl DbConnection {
    /// List all income records in insertion order
    pub async fn list_income(&self) -> Result<Vec<Income>> {
        let rows = sqlx::query("SELECT * FROM income ORDER BY rowid")
            .fetch_all(self.pool())
            .await?;
        Ok(rows.iter().map(income_from_row).collect())
    }

    /// Retrieve an income record by its ID
    pub async fn get_income(&self, id: &str) -> Result<Option<Income>> {
        let row = sqlx::query("SELECT * FROM income WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.as_ref().map(income_from_row))
    }

    /// Store a new income record
    pub async fn insert_income(&self, income: &Income) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO income (id, description, amount, date, source, crop_id, farm_id, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&income.id)
        .bind(&income.description)
        .bind(income.amount)
        .bind(&income.date)
        .bind(&income.source)
        .bind(&income.crop_id)
        .bind(&income.farm_id)
        .bind(&income.notes)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Update an income record in place; false when the ID does not exist
    pub async fn update_income(&self, income: &Income) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE income
            SET description = ?, amount = ?, date = ?, source = ?, crop_id = ?, farm_id = ?, notes = ?
            WHERE id = ?
            "#,
        )
        .bind(&income.description)
        .bind(income.amount)
        .bind(&income.date)
        .bind(&income.source)
        .bind(&income.crop_id)
        .bind(&income.farm_id)
        .bind(&income.notes)
        .bind(&income.id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an income record by ID; false when the ID does not exist
    pub async fn delete_income(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM income WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
