// src/service/project_service.rs

use crate::api::dto::project_dto::{CreateProjectDto, ProjectDto, UpdateProjectDto};
use crate::api::dto::user_dto::UserDto;
use crate::db::DbPool;
use crate::domain::project_model;
use crate::error::{AppError, AppResult};
use crate::repository::project_repository::ProjectRepository;
use crate::repository::user_repository::UserRepository;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct ProjectService {
    repo: Arc<ProjectRepository>,
    user_repo: Arc<UserRepository>,
}

impl ProjectService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            repo: Arc::new(ProjectRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool)),
        }
    }

    async fn find_project(&self, id: Uuid) -> AppResult<project_model::Model> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project is not found".to_string()))
    }

    pub async fn list_projects(&self) -> AppResult<Vec<ProjectDto>> {
        let projects = self.repo.find_all().await?;
        Ok(projects.into_iter().map(Into::into).collect())
    }

    pub async fn get_project(&self, id: Uuid) -> AppResult<ProjectDto> {
        Ok(self.find_project(id).await?.into())
    }

    pub async fn create_project(&self, payload: CreateProjectDto) -> AppResult<ProjectDto> {
        let project = self
            .repo
            .create(payload.title.trim().to_string(), payload.description)
            .await?;
        info!(project_id = %project.id, title = %project.title, "Project created");
        Ok(project.into())
    }

    pub async fn update_project(
        &self,
        id: Uuid,
        payload: UpdateProjectDto,
    ) -> AppResult<ProjectDto> {
        let project = self.find_project(id).await?;
        let updated = self
            .repo
            .update(
                project,
                payload.title.map(|title| title.trim().to_string()),
                payload.description,
            )
            .await?;
        Ok(updated.into())
    }

    /// プロジェクトを削除する（所属タスクも連鎖削除される）
    pub async fn delete_project(&self, id: Uuid) -> AppResult<()> {
        let result = self.repo.delete(id).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Project is not found".to_string()));
        }
        info!(project_id = %id, "Project deleted");
        Ok(())
    }

    pub async fn list_project_users(&self, id: Uuid) -> AppResult<Vec<UserDto>> {
        self.find_project(id).await?;
        let users = self.user_repo.find_by_project(id).await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> AppResult<Vec<UserDto>> {
        self.find_project(project_id).await?;
        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User is not found".to_string()));
        }

        self.repo.add_member(project_id, user_id).await?;
        info!(project_id = %project_id, user_id = %user_id, "Project member added");
        self.list_project_users(project_id).await
    }

    /// メンバーを外す。所属していなくてもエラーにしない
    pub async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.find_project(project_id).await?;
        let result = self.repo.remove_member(project_id, user_id).await?;
        if result.rows_affected > 0 {
            info!(project_id = %project_id, user_id = %user_id, "Project member removed");
        }
        Ok(())
    }
}
