// src/api/handlers/user_handler.rs
use crate::api::dto::project_dto::ProjectDto;
use crate::api::dto::user_dto::{CreateUserDto, UserDto};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::ManagerUser;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::info;
use validator::Validate;

pub async fn list_users_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
) -> AppResult<ApiResponse<Vec<UserDto>>> {
    let users = app_state.user_service.list_users().await?;
    Ok(ApiResponse::list(users))
}

pub async fn create_user_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    Json(payload): Json<CreateUserDto>,
) -> AppResult<ApiResponse<UserDto>> {
    payload.validate()?;

    info!(
        user_id = %user.user_id(),
        new_username = %payload.username,
        "Creating new user"
    );

    let created = app_state.user_service.create_user(payload).await?;
    Ok(ApiResponse::created(created))
}

pub async fn get_user_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<UserDto>> {
    let user = app_state.user_service.get_user(id).await?;
    Ok(ApiResponse::success(user))
}

pub async fn delete_user_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<StatusCode> {
    info!(user_id = %user.user_id(), target_user_id = %id, "Deleting user");
    app_state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_user_projects_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<Vec<ProjectDto>>> {
    let projects = app_state.user_service.list_user_projects(id).await?;
    Ok(ApiResponse::list(projects))
}

pub fn user_router(app_state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(get_user_handler).delete(delete_user_handler),
        )
        .route("/users/{id}/projects", get(list_user_projects_handler))
        .with_state(app_state)
}
