// src/repository/task_repository.rs
use crate::domain::task_model::{self, ActiveModel as TaskActiveModel, Entity as TaskEntity};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{entity::*, query::*, DbConn, DbErr, DeleteResult, Set};
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

/// 新規タスクの永続化に必要な値（`assigned_date` は呼び出し側で計算済み）
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub assigned_date: Option<DateTime<Utc>>,
}

/// 既存タスクへの変更。`None` のフィールドは変更しない
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub assignee_id: Option<Option<Uuid>>,
    pub assigned_date: Option<Option<DateTime<Utc>>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.assignee_id.is_none()
            && self.assigned_date.is_none()
    }
}

pub struct TaskRepository {
    db: DbConn,
}

impl TaskRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<task_model::Model>, DbErr> {
        TaskEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_all(&self) -> Result<Vec<task_model::Model>, DbErr> {
        TaskEntity::find()
            .order_by_desc(task_model::Column::CreatedDate)
            .all(&self.db)
            .await
    }

    pub async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<task_model::Model>, DbErr> {
        TaskEntity::find()
            .filter(task_model::Column::ProjectId.eq(project_id))
            .order_by_desc(task_model::Column::CreatedDate)
            .all(&self.db)
            .await
    }

    /// `assigned_date` が `[start, end)` に入る割り当て済みタスクを取得する
    pub async fn find_assigned_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<task_model::Model>, DbErr> {
        TaskEntity::find()
            .filter(task_model::Column::AssigneeId.is_not_null())
            .filter(task_model::Column::AssignedDate.gte(start))
            .filter(task_model::Column::AssignedDate.lt(end))
            .order_by_asc(task_model::Column::AssignedDate)
            .all(&self.db)
            .await
    }

    pub async fn count_by_assignee(&self, user_id: Uuid) -> Result<u64, DbErr> {
        TaskEntity::find()
            .filter(task_model::Column::AssigneeId.eq(user_id))
            .count(&self.db)
            .await
    }

    pub async fn create(&self, payload: CreateTask) -> Result<task_model::Model, DbErr> {
        let mut new_task = TaskActiveModel::new();
        new_task.project_id = Set(payload.project_id);
        new_task.assignee_id = Set(payload.assignee_id);
        new_task.title = Set(payload.title);
        new_task.description = Set(payload.description);
        new_task.due_date = Set(payload.due_date);
        new_task.assigned_date = Set(payload.assigned_date);

        new_task.insert(&self.db).await
    }

    /// 読み込み済みのタスクに変更を適用して保存する
    pub async fn update(
        &self,
        task: task_model::Model,
        changes: TaskChanges,
    ) -> Result<task_model::Model, DbErr> {
        if changes.is_empty() {
            return Ok(task); // 何も変更がなければ元のタスクを返す
        }

        let mut active_model: TaskActiveModel = task.into();

        if let Some(title) = changes.title {
            active_model.title = Set(title);
        }
        if let Some(description) = changes.description {
            active_model.description = Set(description);
        }
        if let Some(due_date) = changes.due_date {
            active_model.due_date = Set(due_date);
        }
        if let Some(assignee_id) = changes.assignee_id {
            active_model.assignee_id = Set(assignee_id);
        }
        if let Some(assigned_date) = changes.assigned_date {
            active_model.assigned_date = Set(assigned_date);
        }

        active_model.update(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        TaskEntity::delete_by_id(id).exec(&self.db).await
    }
}
