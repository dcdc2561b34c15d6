//! Task service domain logic.
//!
//! `status` is the single source of truth for the task lifecycle; the
//! `completed` flag on the wire is always derived from it.

use crate::db::DbConnection;
use crate::error::{AppError, AppResult};
use shared::{CreateTaskRequest, DeleteResponse, Priority, Task, TaskStatus, UpdateTaskRequest};
use tracing::info;

#[derive(Clone)]
pub struct TaskService {
    db: DbConnection,
}

impl TaskService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        Ok(self.db.list_tasks().await?)
    }

    pub async fn get_task(&self, id: &str) -> AppResult<Task> {
        self.db
            .get_task(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task not found: {}", id)))
    }

    pub async fn create_task(&self, request: CreateTaskRequest) -> AppResult<Task> {
        super::require_non_empty(&request.farm_id, "Farm")?;
        super::require_non_empty(&request.task_type, "Task type")?;
        super::require_non_empty(&request.description, "Description")?;
        super::require_valid_date(&request.due_date, "Due date")?;

        let mut task = Task {
            id: Task::generate_id(super::now_millis()?),
            farm_id: request.farm_id,
            crop_id: request.crop_id.filter(|id| !id.trim().is_empty()),
            task_type: request.task_type.trim().to_string(),
            description: request.description.trim().to_string(),
            due_date: request.due_date,
            priority: request.priority.unwrap_or(Priority::Medium),
            status: request.status.unwrap_or(TaskStatus::Pending),
            completed: false,
        };
        task.sync_completed();

        self.db.insert_task(&task).await?;
        info!("Created task {} ({})", task.id, task.task_type);
        Ok(task)
    }

    pub async fn update_task(&self, id: &str, request: UpdateTaskRequest) -> AppResult<Task> {
        let mut task = self.get_task(id).await?;

        if let Some(farm_id) = request.farm_id {
            super::require_non_empty(&farm_id, "Farm")?;
            task.farm_id = farm_id;
        }
        if let Some(crop_id) = request.crop_id {
            task.crop_id = if crop_id.trim().is_empty() {
                None
            } else {
                Some(crop_id)
            };
        }
        if let Some(task_type) = request.task_type {
            super::require_non_empty(&task_type, "Task type")?;
            task.task_type = task_type.trim().to_string();
        }
        if let Some(description) = request.description {
            super::require_non_empty(&description, "Description")?;
            task.description = description.trim().to_string();
        }
        if let Some(due_date) = request.due_date {
            super::require_valid_date(&due_date, "Due date")?;
            task.due_date = due_date;
        }
        if let Some(priority) = request.priority {
            task.priority = priority;
        }
        if let Some(status) = request.status {
            task.status = status;
        }
        task.sync_completed();

        self.db.update_task(&task).await?;
        info!("Updated task {}", task.id);
        Ok(task)
    }

    /// Shortcut for the dashboard checkbox: set the lifecycle status and let
    /// `completed` follow from it
    pub async fn set_task_completed(&self, id: &str, completed: bool) -> AppResult<Task> {
        let status = if completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        };
        self.update_task(
            id,
            UpdateTaskRequest {
                farm_id: None,
                crop_id: None,
                task_type: None,
                description: None,
                due_date: None,
                priority: None,
                status: Some(status),
            },
        )
        .await
    }

    pub async fn delete_task(&self, id: &str) -> AppResult<DeleteResponse> {
        let deleted = self.db.delete_task(id).await?;
        let success_message = if deleted {
            info!("Deleted task {}", id);
            "Task deleted successfully".to_string()
        } else {
            format!("No task found with id {}", id)
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

    async fn create_test_service() -> TaskService {
        let db = DbConnection::init_test().await.unwrap();
        TaskService::new(db)
    }

    fn create_request() -> CreateTaskRequest {
        CreateTaskRequest {
            farm_id: "farm::1".to_string(),
            crop_id: None,
            task_type: "irrigation".to_string(),
            description: "Water the north field".to_string(),
            due_date: "2024-03-10".to_string(),
            priority: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_task_defaults() {
        let service = create_test_service().await;
        let task = service.create_task(create_request()).await.unwrap();
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.completed);
    }

    #[tokio::test]
    async fn test_completed_follows_status() {
        let service = create_test_service().await;
        let task = service.create_task(create_request()).await.unwrap();

        let done = service.set_task_completed(&task.id, true).await.unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed);

        let reopened = service.set_task_completed(&task.id, false).await.unwrap();
        assert_eq!(reopened.status, TaskStatus::Pending);
        assert!(!reopened.completed);
    }

    #[tokio::test]
    async fn test_status_update_drives_completed() {
        let service = create_test_service().await;
        let task = service.create_task(create_request()).await.unwrap();

        let updated = service
            .update_task(
                &task.id,
                UpdateTaskRequest {
                    farm_id: None,
                    crop_id: None,
                    task_type: None,
                    description: None,
                    due_date: None,
                    priority: Some(Priority::High),
                    status: Some(TaskStatus::Completed),
                },
            )
            .await
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_blank_crop_link_is_dropped() {
        let service = create_test_service().await;
        let mut request = create_request();
        request.crop_id = Some("  ".to_string());
        let task = service.create_task(request).await.unwrap();
        assert_eq!(task.crop_id, None);
    }

    #[tokio::test]
    async fn test_create_task_requires_description() {
        let service = create_test_service().await;
        let mut request = create_request();
        request.description = String::new();
        assert!(matches!(
            service.create_task(request).await,
            Err(AppError::Validation(_))
        ));
    }
}
