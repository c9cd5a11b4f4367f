// src/service/task_service.rs

use crate::api::dto::task_dto::{CreateTaskDto, TaskDto, UpdateTaskDto};
use crate::db::DbPool;
use crate::domain::assignment::{self, AssigneeUpdate, AssignmentChange};
use crate::error::{AppError, AppResult};
use crate::repository::project_repository::ProjectRepository;
use crate::repository::task_repository::{CreateTask, TaskChanges, TaskRepository};
use crate::repository::user_repository::UserRepository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct TaskService {
    repo: Arc<TaskRepository>,
    project_repo: Arc<ProjectRepository>,
    user_repo: Arc<UserRepository>,
}

impl TaskService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            repo: Arc::new(TaskRepository::new(db_pool.clone())),
            project_repo: Arc::new(ProjectRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool)),
        }
    }

    async fn ensure_project_exists(&self, project_id: Uuid) -> AppResult<()> {
        match self.project_repo.find_by_id(project_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Project is not found".to_string())),
        }
    }

    async fn ensure_user_exists(&self, user_id: Uuid) -> AppResult<()> {
        match self.user_repo.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("User is not found".to_string())),
        }
    }

    // --- CRUD ---

    pub async fn list_tasks(&self) -> AppResult<Vec<TaskDto>> {
        let tasks = self.repo.find_all().await?;
        Ok(tasks.into_iter().map(Into::into).collect())
    }

    pub async fn list_project_tasks(&self, project_id: Uuid) -> AppResult<Vec<TaskDto>> {
        self.ensure_project_exists(project_id).await?;
        let tasks = self.repo.find_by_project(project_id).await?;
        Ok(tasks.into_iter().map(Into::into).collect())
    }

    pub async fn get_task(&self, id: Uuid) -> AppResult<TaskDto> {
        self.repo
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("Task is not found".to_string()))
    }

    pub async fn create_task(&self, payload: CreateTaskDto) -> AppResult<TaskDto> {
        self.create_task_at(payload, Utc::now()).await
    }

    /// 指定時刻を「現在」としてタスクを作成する
    pub async fn create_task_at(
        &self,
        payload: CreateTaskDto,
        now: DateTime<Utc>,
    ) -> AppResult<TaskDto> {
        self.ensure_project_exists(payload.project_id).await?;
        if let Some(assignee_id) = payload.assignee_id {
            self.ensure_user_exists(assignee_id).await?;
        }

        let outcome = assignment::assign_on_create(payload.assignee_id, now);

        let task = self
            .repo
            .create(CreateTask {
                project_id: payload.project_id,
                assignee_id: outcome.assignee_id,
                title: payload.title.trim().to_string(),
                description: normalize_description(payload.description),
                due_date: payload.due_date,
                assigned_date: outcome.assigned_date,
            })
            .await?;

        info!(
            task_id = %task.id,
            project_id = %task.project_id,
            assignee_id = ?task.assignee_id,
            "Task created"
        );

        Ok(task.into())
    }

    pub async fn update_task(&self, id: Uuid, payload: UpdateTaskDto) -> AppResult<TaskDto> {
        self.update_task_at(id, payload, Utc::now()).await
    }

    /// 指定時刻を「現在」としてタスクを部分更新する
    pub async fn update_task_at(
        &self,
        id: Uuid,
        payload: UpdateTaskDto,
        now: DateTime<Utc>,
    ) -> AppResult<TaskDto> {
        let task = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task is not found".to_string()))?;

        let update = AssigneeUpdate::from(payload.assignee_id);
        if let AssigneeUpdate::Assign(user_id) = update {
            self.ensure_user_exists(user_id).await?;
        }

        let outcome =
            assignment::apply_assignee_update(task.assignee_id, task.assigned_date, update, now);

        let changes = TaskChanges {
            title: payload.title.map(|title| title.trim().to_string()),
            description: payload.description.map(|d| normalize_description(Some(d))),
            due_date: payload.due_date,
            assignee_id: (update != AssigneeUpdate::Keep).then_some(outcome.assignee_id),
            assigned_date: (outcome.assigned_date != task.assigned_date)
                .then_some(outcome.assigned_date),
        };

        let updated = self.repo.update(task, changes).await?;

        match outcome.change {
            AssignmentChange::Reassigned { from, to } => info!(
                task_id = %updated.id,
                previous_assignee = ?from,
                assignee_id = %to,
                "Task reassigned"
            ),
            AssignmentChange::Cleared => info!(task_id = %updated.id, "Task assignee cleared"),
            AssignmentChange::Unchanged | AssignmentChange::Untouched => {
                debug!(task_id = %updated.id, "Task updated without assignee change")
            }
        }

        Ok(updated.into())
    }

    pub async fn delete_task(&self, id: Uuid) -> AppResult<()> {
        let result = self.repo.delete(id).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Task is not found".to_string()));
        }
        info!(task_id = %id, "Task deleted");
        Ok(())
    }
}

/// 空白のみの説明は未設定として扱う
fn normalize_description(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}
