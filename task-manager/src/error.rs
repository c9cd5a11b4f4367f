// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl AppError {
    fn simple(status: StatusCode, message: String, error_type: &str) -> (StatusCode, ErrorResponse) {
        (status, ErrorResponse::new(message, error_type))
    }

    /// フィールドごとのメッセージから 400 レスポンスを組み立てる
    fn validation(field_errors: HashMap<String, Vec<String>>) -> (StatusCode, ErrorResponse) {
        let mut errors: Vec<serde_json::Value> = field_errors
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |msg| json!({ "field": field, "message": msg }))
            })
            .collect();
        errors.sort_by_key(|e| e["field"].as_str().map(str::to_string));

        let mut response = ErrorResponse::new("Validation failed".to_string(), "validation_errors");
        response.validation_errors = Some(field_errors);
        response.errors = Some(errors);
        (StatusCode::BAD_REQUEST, response)
    }

    fn database(db_err: DbErr) -> (StatusCode, ErrorResponse) {
        // 制約違反は同時更新の競合としてクライアントに返す
        match db_err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                warn!(detail = %detail, "Unique constraint violated");
                return Self::simple(
                    StatusCode::CONFLICT,
                    "The resource already exists".to_string(),
                    "conflict",
                );
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                warn!(detail = %detail, "Foreign key constraint violated");
                return Self::simple(
                    StatusCode::CONFLICT,
                    "The resource is still referenced or refers to a missing resource".to_string(),
                    "conflict",
                );
            }
            _ => {}
        }

        error!(error = ?db_err, "Database error");

        let (status, message, operation) = match &db_err {
            DbErr::RecordNotFound(_) => (
                StatusCode::NOT_FOUND,
                "The requested resource was not found",
                None,
            ),
            DbErr::Exec(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database operation failed",
                Some("exec"),
            ),
            DbErr::Query(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database query failed",
                Some("query"),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred",
                None,
            ),
        };

        let mut response = ErrorResponse::new(message.to_string(), "database_error");
        response.details = operation.map(|op| json!({ "operation": op }));
        (status, response)
    }
}

/// validator のエラーをフィールド名ごとのメッセージに変換する
fn field_messages(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("Invalid value ({})", e.code), |m| m.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::DbErr(db_err) => Self::database(db_err),
            AppError::NotFound(message) => {
                Self::simple(StatusCode::NOT_FOUND, message, "not_found")
            }
            AppError::ValidationError(message) => {
                Self::simple(StatusCode::BAD_REQUEST, message, "validation_error")
            }
            AppError::ValidationErrors(errors) => {
                // "field: message" 形式の文字列をフィールドごとにまとめる
                let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
                for error in errors {
                    let (field, message) = match error.split_once(": ") {
                        Some((field, message)) => (field.to_string(), message.to_string()),
                        None => ("_".to_string(), error),
                    };
                    field_errors.entry(field).or_default().push(message);
                }
                Self::validation(field_errors)
            }
            AppError::ValidationFailure(errors) => Self::validation(field_messages(&errors)),
            AppError::BadRequest(message) => {
                Self::simple(StatusCode::BAD_REQUEST, message, "bad_request")
            }
            AppError::Unauthorized(message) => {
                Self::simple(StatusCode::UNAUTHORIZED, message, "unauthorized")
            }
            AppError::Forbidden(message) => Self::simple(StatusCode::FORBIDDEN, message, "forbidden"),
            AppError::Conflict(message) => Self::simple(StatusCode::CONFLICT, message, "conflict"),
            AppError::InternalServerError(message) => {
                error!(message = %message, "Internal server error");
                Self::simple(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    "internal_server_error",
                )
            }
            AppError::ExternalServiceError(message) => {
                error!(message = %message, "External service error");
                Self::simple(
                    StatusCode::SERVICE_UNAVAILABLE,
                    message,
                    "external_service_error",
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
    pub error_type: String,
}

impl ErrorResponse {
    fn new(message: String, error_type: &str) -> Self {
        Self {
            success: false,
            error: message.clone(),
            message,
            details: None,
            validation_errors: None,
            errors: None,
            error_type: error_type.to_string(),
        }
    }
}
