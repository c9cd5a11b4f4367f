// tests/common/request.rs
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
};
use serde::Serialize;
use serde_json::Value;
use task_manager::middleware::auth::USER_ID_HEADER;
use uuid::Uuid;

/// 認証済みユーザーとしてのHTTPリクエストを作成
pub fn create_request<T: Serialize>(
    method: &str,
    uri: &str,
    user_id: Option<Uuid>,
    body: Option<&T>,
) -> Request<Body> {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(user_id) = user_id {
        builder = builder.header(USER_ID_HEADER, user_id.to_string());
    }

    let body = match body {
        Some(body) => Body::from(serde_json::to_string(body).unwrap()),
        None => Body::empty(),
    };

    builder.body(body).unwrap()
}

/// ボディなしのリクエスト
pub fn empty_request(method: &str, uri: &str, user_id: Option<Uuid>) -> Request<Body> {
    create_request::<Value>(method, uri, user_id, None)
}

/// レスポンスボディをJSONとして読み込む
pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
