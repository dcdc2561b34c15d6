use super::DbConnection;
use anyhow::Result;
use shared::{Priority, Task, TaskStatus};
use sqlx::{sqlite::SqliteRow, Row};

// `status` is the stored source of truth; `completed` is re-derived on read.
fn task_from_row(row: &SqliteRow) -> Task {
    let mut task = Task {
        id: row.get("id"),
        farm_id: row.get("farm_id"),
        crop_id: row.get("crop_id"),
        task_type: row.get("task_type"),
        description: row.get("description"),
        due_date: row.get("due_date"),
        priority: Priority::from_key(&row.get::<String, _>("priority")),
        status: TaskStatus::from_key(&row.get::<String, _>("status")),
        completed: false,
    };
    task.sync_completed();
    task
}

impl DbConnection {
    /// List all tasks in insertion order
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query("SELECT * FROM tasks ORDER BY rowid")
            .fetch_all(self.pool())
            .await?;
        Ok(rows.iter().map(task_from_row).collect())
    }

    /// Retrieve a task by its ID
    pub async fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.as_ref().map(task_from_row))
    }

    /// Store a new task
    pub async fn insert_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, farm_id, crop_id, task_type, description, due_date, priority, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.farm_id)
        .bind(&task.crop_id)
        .bind(&task.task_type)
        .bind(&task.description)
        .bind(&task.due_date)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Update a task in place; false when the ID does not exist
    pub async fn update_task(&self, task: &Task) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET farm_id = ?, crop_id = ?, task_type = ?, description = ?,
                due_date = ?, priority = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.farm_id)
        .bind(&task.crop_id)
        .bind(&task.task_type)
        .bind(&task.description)
        .bind(&task.due_date)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(&task.id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a task by ID; false when the ID does not exist
    pub async fn delete_task(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(id: &str, status: TaskStatus) -> Task {
        let mut task = Task {
            id: id.to_string(),
            farm_id: "farm::1".to_string(),
            crop_id: Some("crop::1".to_string()),
            task_type: "irrigation".to_string(),
            description: "Water the north field".to_string(),
            due_date: "2024-03-10".to_string(),
            priority: Priority::High,
            status,
            completed: false,
        };
        task.sync_completed();
        task
    }

    #[tokio::test]
    async fn test_task_round_trip_derives_completed() {
        let db = DbConnection::init_test().await.unwrap();
        db.insert_task(&sample_task("task::1", TaskStatus::Completed))
            .await
            .unwrap();
        db.insert_task(&sample_task("task::2", TaskStatus::InProgress))
            .await
            .unwrap();

        let done = db.get_task("task::1").await.unwrap().unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed);

        let open = db.get_task("task::2").await.unwrap().unwrap();
        assert_eq!(open.status, TaskStatus::InProgress);
        assert!(!open.completed);
    }

    #[tokio::test]
    async fn test_task_without_crop_link() {
        let db = DbConnection::init_test().await.unwrap();
        let mut task = sample_task("task::1", TaskStatus::Pending);
        task.crop_id = None;
        db.insert_task(&task).await.unwrap();

        let loaded = db.get_task("task::1").await.unwrap().unwrap();
        assert_eq!(loaded.crop_id, None);
    }

    #[tokio::test]
    async fn test_task_update_status() {
        let db = DbConnection::init_test().await.unwrap();
        let mut task = sample_task("task::1", TaskStatus::Pending);
        db.insert_task(&task).await.unwrap();

        task.status = TaskStatus::Completed;
        task.sync_completed();
        assert!(db.update_task(&task).await.unwrap());

        let loaded = db.get_task("task::1").await.unwrap().unwrap();
        assert!(loaded.completed);

        assert!(db.delete_task("task::1").await.unwrap());
        assert!(!db.delete_task("task::1").await.unwrap());
    }
}
