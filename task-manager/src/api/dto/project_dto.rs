// src/api/dto/project_dto.rs
use crate::domain::project_model;
use crate::utils::validation::common;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateProjectDto {
    #[validate(
        length(
            min = common::project::TITLE_MIN_LENGTH,
            max = common::project::TITLE_MAX_LENGTH,
            message = "Project title must be between 1 and 100 characters"
        ),
        custom(function = common::validate_title)
    )]
    pub title: String,

    #[validate(length(
        max = common::project::DESCRIPTION_MAX_LENGTH,
        message = "Project description must not exceed 2000 characters"
    ))]
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct UpdateProjectDto {
    #[validate(
        length(
            min = common::project::TITLE_MIN_LENGTH,
            max = common::project::TITLE_MAX_LENGTH,
            message = "Project title must be between 1 and 100 characters"
        ),
        custom(function = common::validate_title)
    )]
    pub title: Option<String>,

    #[validate(length(
        max = common::project::DESCRIPTION_MAX_LENGTH,
        message = "Project description must not exceed 2000 characters"
    ))]
    pub description: Option<String>,
}

impl UpdateProjectDto {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct AddProjectMemberDto {
    pub user_id: Uuid,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_date: DateTime<Utc>,
}

impl From<project_model::Model> for ProjectDto {
    fn from(model: project_model::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            created_date: model.created_date,
        }
    }
}
