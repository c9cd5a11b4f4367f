// task-manager/src/api/mod.rs
use crate::config::AppConfig;
use crate::middleware::auth::HasUserService;
use crate::service::{
    project_service::ProjectService, task_service::TaskService, user_service::UserService,
};
use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub project_service: Arc<ProjectService>,
    pub task_service: Arc<TaskService>,
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            user_service: Arc::new(UserService::new(db.clone())),
            project_service: Arc::new(ProjectService::new(db.clone())),
            task_service: Arc::new(TaskService::new(db.clone())),
            db: Arc::new(db),
            config: Arc::new(config.clone()),
        }
    }
}

impl HasUserService for AppState {
    fn user_service(&self) -> &Arc<UserService> {
        &self.user_service
    }
}

/// 全エンドポイントを統合したルーター
pub fn app_router(app_state: AppState) -> Router {
    Router::new()
        .merge(handlers::user_handler::user_router(app_state.clone()))
        .merge(handlers::project_handler::project_router(app_state.clone()))
        .merge(handlers::task_handler::task_router(app_state.clone()))
        .merge(handlers::system_handler::system_router(app_state))
}
