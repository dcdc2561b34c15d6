use super::DbConnection;
use anyhow::Result;
use shared::Expense;
use sqlx::{sqlite::SqliteRow, Row};

fn expense_from_row(row: &SqliteRow) -> Expense {
    Expense {
        id: row.get("id"),
        farm_id: row.get("farm_id"),
        category: row.get("category"),
        amount: row.get("amount"),
        date: row.get("date"),
        description: row.get("description"),
    }
}

impl DbConnection {
    /// List all expenses in insertion order
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query("SELECT * FROM expenses ORDER BY rowid")
            .fetch_all(self.pool())
            .await?;
        Ok(rows.iter().map(expense_from_row).collect())
    }

    /// Retrieve an expense by its ID
    pub async fn get_expense(&self, id: &str) -> Result<Option<Expense>> {
        let row = sqlx::query("SELECT * FROM expenses WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.as_ref().map(expense_from_row))
    }

    /// Store a new expense
    pub async fn insert_expense(&self, expense: &Expense) -> Result<()> {
        sqlx::query(
            "INSERT INTO expenses (id, farm_id, category, amount, date, description) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&expense.id)
        .bind(&expense.farm_id)
        .bind(&expense.category)
        .bind(expense.amount)
        .bind(&expense.date)
        .bind(&expense.description)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Update an expense in place; false when the ID does not exist
    pub async fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE expenses SET farm_id = ?, category = ?, amount = ?, date = ?, description = ? WHERE id = ?",
        )
        .bind(&expense.farm_id)
        .bind(&expense.category)
        .bind(expense.amount)
        .bind(&expense.date)
        .bind(&expense.description)
        .bind(&expense.id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an expense by ID; false when the ID does not exist
    pub async fn delete_expense(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_expense(id: &str, category: &str, amount: f64) -> Expense {
        Expense {
            id: id.to_string(),
            farm_id: "farm::1".to_string(),
            category: category.to_string(),
            amount,
            date: "2024-03-01".to_string(),
            description: "Spring supplies".to_string(),
        }
    }

    #[tokio::test]
    async fn test_expense_round_trip() {
        let db = DbConnection::init_test().await.unwrap();
        let expense = sample_expense("expense::1", "seeds", 100.0);
        db.insert_expense(&expense).await.unwrap();

        let loaded = db.get_expense("expense::1").await.unwrap().unwrap();
        assert_eq!(loaded, expense);
    }

    #[tokio::test]
    async fn test_expense_preserves_unknown_category() {
        let db = DbConnection::init_test().await.unwrap();
        let expense = sample_expense("expense::1", "veterinary_supplies", 75.0);
        db.insert_expense(&expense).await.unwrap();

        let loaded = db.get_expense("expense::1").await.unwrap().unwrap();
        assert_eq!(loaded.category, "veterinary_supplies");
    }

    #[tokio::test]
    async fn test_expense_update_and_delete() {
        let db = DbConnection::init_test().await.unwrap();
        let mut expense = sample_expense("expense::1", "fuel", 50.0);
        db.insert_expense(&expense).await.unwrap();

        expense.amount = 62.5;
        assert!(db.update_expense(&expense).await.unwrap());
        assert_eq!(
            db.get_expense("expense::1").await.unwrap().unwrap().amount,
            62.5
        );

        assert!(db.delete_expense("expense::1").await.unwrap());
        assert!(!db.delete_expense("expense::1").await.unwrap());
    }
}
