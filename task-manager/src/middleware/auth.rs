// src/middleware/auth.rs

//! 呼び出し元ユーザーの解決と権限チェック
//!
//! トークン検証は前段の認証ゲートウェイが行い、検証済みのユーザーIDを
//! `x-user-id` ヘッダーで渡す。ここではそのユーザーを読み込み、ロールを確認する。

use crate::domain::user_model;
use crate::error::AppError;
use crate::service::user_service::UserService;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// 認証ゲートウェイが設定するユーザーIDヘッダー
pub const USER_ID_HEADER: &str = "x-user-id";

/// 呼び出し元ユーザーを解決できる状態
pub trait HasUserService {
    fn user_service(&self) -> &Arc<UserService>;
}

/// 認証済みユーザー
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: user_model::Model,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// マネージャーまたはスーパーユーザーであることが確認済みのユーザー
#[derive(Debug, Clone)]
pub struct ManagerUser(pub AuthenticatedUser);

impl ManagerUser {
    pub fn user_id(&self) -> Uuid {
        self.0.user_id()
    }
}

/// ヘッダーからユーザーIDを取り出す
pub fn extract_user_id(parts: &Parts) -> Result<Uuid, AppError> {
    let raw = parts
        .headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            warn!(path = %parts.uri.path(), "Request without authenticated user");
            AppError::Unauthorized("Authentication credentials were not provided".to_string())
        })?;

    Uuid::parse_str(raw.trim()).map_err(|_| {
        warn!(path = %parts.uri.path(), "Malformed user id header");
        AppError::Unauthorized("Invalid authentication credentials".to_string())
    })
}

/// マネージャー権限のチェック（無効化されたアカウントは拒否）
pub fn ensure_manager_or_admin(user: &user_model::Model) -> Result<(), AppError> {
    if user.is_manager_or_admin() {
        return Ok(());
    }

    warn!(
        user_id = %user.id,
        role = %user.role,
        is_active = user.is_active,
        "Permission denied for non-manager user"
    );
    Err(AppError::Forbidden("Permissions denied".to_string()))
}

// --- Axum Extractors ---

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: HasUserService + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let user_id = extract_user_id(parts)?;
        let user = state.user_service().find_user(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "Authenticated user no longer exists");
            AppError::Unauthorized("Invalid authentication credentials".to_string())
        })?;

        let authenticated = AuthenticatedUser { user };
        parts.extensions.insert(authenticated.clone());
        Ok(authenticated)
    }
}

impl<S> FromRequestParts<S> for ManagerUser
where
    S: HasUserService + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticated = AuthenticatedUser::from_request_parts(parts, state).await?;
        ensure_manager_or_admin(&authenticated.user)?;
        Ok(ManagerUser(authenticated))
    }
}
