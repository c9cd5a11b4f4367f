// src/logging/mod.rs

use crate::middleware::auth::USER_ID_HEADER;
use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Level;
use uuid::Uuid;

#[macro_export]
macro_rules! log_with_context {
    ($level:expr, $msg:expr $(, $($key:expr => $value:expr),* $(,)?)?) => {
        match $level {
            tracing::Level::ERROR => {
                tracing::error!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::WARN => {
                tracing::warn!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::INFO => {
                tracing::info!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::DEBUG => {
                tracing::debug!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            _ => {
                tracing::trace!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
        }
    };
}

/// ゲートウェイから引き継ぐ / レスポンスで返すリクエストID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// リクエストコンテキスト
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
    /// ゲートウェイから渡された呼び出し元ユーザーID（未検証）
    pub user_id: Option<Uuid>,
    pub path: String,
    pub method: String,
}

impl RequestContext {
    fn from_request(req: &Request<Body>) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        Self {
            request_id: header(REQUEST_ID_HEADER)
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            user_id: header(USER_ID_HEADER).and_then(|value| Uuid::parse_str(value).ok()),
            path: req.uri().path().to_string(),
            method: req.method().to_string(),
        }
    }
}

/// ステータスに応じたログレベル（5xx は ERROR、4xx は WARN）
pub fn level_for_status(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

// ロギングミドルウェア
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let Some(context) = req.extensions().get::<RequestContext>().cloned() else {
        return next.run(req).await;
    };

    log_with_context!(
        Level::DEBUG,
        "Request started",
        "request_id" => &context.request_id,
        "method" => &context.method,
        "path" => &context.path,
    );

    let mut response = next.run(req).await;
    let status = response.status();

    log_with_context!(
        level_for_status(status),
        "Request completed",
        "request_id" => &context.request_id,
        "method" => &context.method,
        "path" => &context.path,
        "status" => status.as_u16(),
        "duration_ms" => start.elapsed().as_millis(),
        "user_id" => context.user_id,
    );

    if let Ok(value) = HeaderValue::from_str(&context.request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

// RequestContextを生成するミドルウェア
pub async fn inject_request_context(mut req: Request<Body>, next: Next) -> Response {
    let context = RequestContext::from_request(&req);
    req.extensions_mut().insert(context);
    next.run(req).await
}
