// src/api/handlers/task_handler.rs
use crate::api::dto::task_dto::{CreateTaskDto, TaskDto, UpdateTaskDto};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
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

// --- ハンドラ関数 ---

pub async fn list_tasks_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
) -> AppResult<ApiResponse<Vec<TaskDto>>> {
    let tasks = app_state.task_service.list_tasks().await?;
    Ok(ApiResponse::list(tasks))
}

pub async fn create_task_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    Json(payload): Json<CreateTaskDto>,
) -> AppResult<ApiResponse<TaskDto>> {
    payload.validate()?;

    info!(
        user_id = %user.user_id(),
        project_id = %payload.project_id,
        task_title = %payload.title,
        "Creating new task"
    );

    let task = app_state.task_service.create_task(payload).await?;
    Ok(ApiResponse::created(task))
}

pub async fn get_task_handler(
    State(app_state): State<AppState>,
    _user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<ApiResponse<TaskDto>> {
    let task = app_state.task_service.get_task(id).await?;
    Ok(ApiResponse::success(task))
}

pub async fn update_task_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateTaskDto>,
) -> AppResult<ApiResponse<TaskDto>> {
    if payload.is_empty() {
        return Err(AppError::BadRequest(
            "At least one of title, description, due_date or assignee_id must be provided"
                .to_string(),
        ));
    }
    payload.validate()?;

    info!(user_id = %user.user_id(), task_id = %id, "Updating task");

    let task = app_state.task_service.update_task(id, payload).await?;
    Ok(ApiResponse::success(task))
}

pub async fn delete_task_handler(
    State(app_state): State<AppState>,
    user: ManagerUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<StatusCode> {
    info!(user_id = %user.user_id(), task_id = %id, "Deleting task");
    app_state.task_service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- ルーター ---

pub fn task_router(app_state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .patch(update_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(app_state)
}
