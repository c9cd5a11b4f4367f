// src/types/response.rs

//! 成功時のレスポンスエンベロープ `{ success, data, meta }`

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip)]
    status: StatusCode,
}

/// リクエストIDは `x-request-id` レスポンスヘッダーで返す
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResponseMeta {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    fn with_status(status: StatusCode, data: T, count: Option<usize>) -> Self {
        Self {
            success: true,
            data: Some(data),
            meta: Some(ResponseMeta {
                timestamp: Utc::now(),
                count,
            }),
            status,
        }
    }

    /// 200 OK
    pub fn success(data: T) -> Self {
        Self::with_status(StatusCode::OK, data, None)
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data, None)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// 一覧。`meta.count` に件数を入れる
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self::with_status(StatusCode::OK, items, Some(count))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
