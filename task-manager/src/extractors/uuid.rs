use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// URLパスの直前セグメントからパラメータ名を推測する
fn uuid_param_name(path: &str, position: usize) -> &'static str {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let collection = segments
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 2 == 0)
        .nth(position)
        .map(|(_, segment)| *segment);

    match collection {
        Some("users") => "user_id",
        Some("projects") => "project_id",
        Some("tasks") => "task_id",
        _ => "id",
    }
}

fn parse_uuid(raw: &str, param_name: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        AppError::BadRequest(format!(
            "Invalid UUID format for '{}': '{}'",
            param_name, raw
        ))
    })
}

/// パスパラメータからUUIDを1つ抽出し、検証を行う
#[derive(Debug, Clone, Copy)]
pub struct ValidatedUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidatedUuid
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let param_name = uuid_param_name(parts.uri.path(), 0);
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                AppError::BadRequest(format!("Missing path parameter '{}': {}", param_name, e))
            })?;

        Ok(ValidatedUuid(parse_uuid(&raw, param_name)?))
    }
}

/// `/projects/{id}/users/{user_id}` のような2つのUUIDを持つパス用
#[derive(Debug, Clone, Copy)]
pub struct UuidPair(pub Uuid, pub Uuid);

impl<S> FromRequestParts<S> for UuidPair
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let path = parts.uri.path().to_string();
        let Path((first, second)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid path parameters: {}", e)))?;

        Ok(UuidPair(
            parse_uuid(&first, uuid_param_name(&path, 0))?,
            parse_uuid(&second, uuid_param_name(&path, 1))?,
        ))
    }
}
