// src/api/handlers/system_handler.rs
use crate::api::AppState;
use crate::types::ApiResponse;
use axum::{extract::State, routing::get, Router};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub environment: String,
}

/// 認証不要のヘルスチェック
pub async fn health_check_handler(
    State(app_state): State<AppState>,
) -> ApiResponse<HealthResponse> {
    let database = match app_state.db.execute_unprepared("SELECT 1").await {
        Ok(_) => "ok",
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            "unavailable"
        }
    };

    ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        database: database.to_string(),
        environment: app_state.config.environment.clone(),
    })
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_handler))
        .with_state(app_state)
}
