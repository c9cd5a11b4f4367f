// src/service/user_service.rs

use crate::api::dto::project_dto::ProjectDto;
use crate::api::dto::user_dto::{CreateUserDto, UserDto};
use crate::db::DbPool;
use crate::domain::user_model;
use crate::domain::user_role::UserRole;
use crate::error::{AppError, AppResult};
use crate::repository::project_repository::ProjectRepository;
use crate::repository::task_repository::TaskRepository;
use crate::repository::user_repository::{CreateUser, UserRepository};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct UserService {
    repo: Arc<UserRepository>,
    task_repo: Arc<TaskRepository>,
    project_repo: Arc<ProjectRepository>,
}

impl UserService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            repo: Arc::new(UserRepository::new(db_pool.clone())),
            task_repo: Arc::new(TaskRepository::new(db_pool.clone())),
            project_repo: Arc::new(ProjectRepository::new(db_pool)),
        }
    }

    /// 呼び出し元ユーザーを取得する（認証用。存在しない場合は None）
    pub async fn find_user(&self, id: Uuid) -> AppResult<Option<user_model::Model>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserDto>> {
        let users = self.repo.find_all().await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn get_user(&self, id: Uuid) -> AppResult<UserDto> {
        self.repo
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| AppError::NotFound("User is not found".to_string()))
    }

    pub async fn create_user(&self, payload: CreateUserDto) -> AppResult<UserDto> {
        let username = payload.username.trim().to_string();
        if self.repo.is_username_taken(&username).await? {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                username
            )));
        }

        let role = payload
            .role
            .as_deref()
            .and_then(UserRole::parse)
            .unwrap_or_default();

        let email = payload
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        let user = self
            .repo
            .create(CreateUser {
                username,
                email,
                role: role.as_str().to_string(),
                is_superuser: payload.is_superuser,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, role = %role, "User created");
        Ok(user.into())
    }

    /// ユーザーを削除する。担当タスクが残っている場合は拒否する
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("User is not found".to_string()));
        }

        let assigned = self.task_repo.count_by_assignee(id).await?;
        if assigned > 0 {
            warn!(user_id = %id, assigned_tasks = assigned, "Refusing to delete user with assigned tasks");
            return Err(AppError::Conflict(format!(
                "User is assigned to {} task(s); reassign or clear them first",
                assigned
            )));
        }

        self.repo.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn list_user_projects(&self, user_id: Uuid) -> AppResult<Vec<ProjectDto>> {
        if self.repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User is not found".to_string()));
        }

        let projects = self.project_repo.find_by_member(user_id).await?;
        Ok(projects.into_iter().map(Into::into).collect())
    }
}
