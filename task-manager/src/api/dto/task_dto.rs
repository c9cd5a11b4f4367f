// src/api/dto/task_dto.rs
use crate::domain::task_model;
use crate::types::deserialize_some;
use crate::utils::validation::common;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateTaskDto {
    pub project_id: Uuid,

    #[validate(
        length(
            min = common::task::TITLE_MIN_LENGTH,
            max = common::task::TITLE_MAX_LENGTH,
            message = "Task title must be between 1 and 100 characters"
        ),
        custom(function = common::validate_title)
    )]
    pub title: String,

    #[validate(length(
        max = common::task::DESCRIPTION_MAX_LENGTH,
        message = "Task description must not exceed 1000 characters"
    ))]
    pub description: Option<String>,

    pub due_date: Option<NaiveDate>,

    /// 作成時に担当者を指定すると `assigned_date` が即座に設定される
    pub assignee_id: Option<Uuid>,
}

/// 部分更新。`assignee_id` と `due_date` は省略と `null` を区別する
#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct UpdateTaskDto {
    #[validate(
        length(
            min = common::task::TITLE_MIN_LENGTH,
            max = common::task::TITLE_MAX_LENGTH,
            message = "Task title must be between 1 and 100 characters"
        ),
        custom(function = common::validate_title)
    )]
    pub title: Option<String>,

    /// 空文字を送ると説明を削除する
    #[validate(length(
        max = common::task::DESCRIPTION_MAX_LENGTH,
        message = "Task description must not exceed 1000 characters"
    ))]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<NaiveDate>>,

    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub assignee_id: Option<Option<Uuid>>,
}

impl UpdateTaskDto {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.assignee_id.is_none()
    }
}

// --- Response DTOs ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskDto {
    pub id: Uuid,
    pub project_id: Uuid,
    pub assignee_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub assigned_date: Option<DateTime<Utc>>,
}

impl From<task_model::Model> for TaskDto {
    fn from(model: task_model::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            assignee_id: model.assignee_id,
            title: model.title,
            description: model.description,
            created_date: model.created_date,
            due_date: model.due_date,
            assigned_date: model.assigned_date,
        }
    }
}
