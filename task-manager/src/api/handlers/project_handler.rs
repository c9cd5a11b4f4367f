// src/api/handlers/project_handler.rs
use crate::api::dto::project_dto::{
    AddProjectMemberDto, CreateProjectDto, ProjectDto, UpdateProjectDto,
};
use crate::api::dto::task_dto::TaskDto;
use crate::api::dto::user_dto::UserDto;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::{UuidPair, ValidatedUuid};
use crate::middleware::auth::ManagerUser;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{delete, get},
    Router,
};
use tracing::info;
use validator::Validate;

pub async fn list_projects_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
) -> AppResult<ApiResponse<Vec<ProjectDto>>> {
    let projects = app_state.project_service.list_projects().await?;
    Ok(ApiResponse::list(projects))
}

pub async fn create_project_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    Json(payload): Json<CreateProjectDto>,
) -> AppResult<ApiResponse<ProjectDto>> {
    payload.validate()?;

    info!(
        user_id = %user.user_id(),
        project_title = %payload.title,
        "Creating new project"
    );

    let project = app_state.project_service.create_project(payload).await?;
    Ok(ApiResponse::created(project))
}

pub async fn get_project_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<ProjectDto>> {
    let project = app_state.project_service.get_project(id).await?;
    Ok(ApiResponse::success(project))
}

pub async fn update_project_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateProjectDto>,
) -> AppResult<ApiResponse<ProjectDto>> {
    if payload.is_empty() {
        return Err(AppError::BadRequest(
            "At least one of title or description must be provided".to_string(),
        ));
    }
    payload.validate()?;

    info!(user_id = %user.user_id(), project_id = %id, "Updating project");

    let project = app_state.project_service.update_project(id, payload).await?;
    Ok(ApiResponse::success(project))
}

pub async fn delete_project_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<StatusCode> {
    info!(user_id = %user.user_id(), project_id = %id, "Deleting project");
    app_state.project_service.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_project_tasks_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<Vec<TaskDto>>> {
    let tasks = app_state.task_service.list_project_tasks(id).await?;
    Ok(ApiResponse::list(tasks))
}

pub async fn list_project_users_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<Vec<UserDto>>> {
    let users = app_state.project_service.list_project_users(id).await?;
    Ok(ApiResponse::list(users))
}

pub async fn add_project_member_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<AddProjectMemberDto>,
) -> AppResult<ApiResponse<Vec<UserDto>>> {
    info!(
        user_id = %user.user_id(),
        project_id = %id,
        member_id = %payload.user_id,
        "Adding project member"
    );

    let members = app_state
        .project_service
        .add_member(id, payload.user_id)
        .await?;
    Ok(ApiResponse::list(members))
}

pub async fn remove_project_member_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    UuidPair(project_id, member_id): UuidPair,
) -> AppResult<StatusCode> {
    info!(
        user_id = %user.user_id(),
        project_id = %project_id,
        member_id = %member_id,
        "Removing project member"
    );

    app_state
        .project_service
        .remove_member(project_id, member_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn project_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/projects/{id}",
            get(get_project_handler)
                .put(update_project_handler)
                .patch(update_project_handler)
                .delete(delete_project_handler),
        )
        .route("/projects/{id}/tasks", get(list_project_tasks_handler))
        .route(
            "/projects/{id}/users",
            get(list_project_users_handler).post(add_project_member_handler),
        )
        .route(
            "/projects/{id}/users/{user_id}",
            delete(remove_project_member_handler),
        )
        .with_state(app_state)
}
