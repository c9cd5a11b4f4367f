// src/utils/validation/common.rs

//! 共通バリデーション定数と関数
//!
//! DTOファイル間で重複するバリデーションルールを統一管理します。

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

// =============================================================================
// バリデーション定数
// =============================================================================

/// ユーザー名の制約
pub mod username {
    pub const MIN_LENGTH: u64 = 1;
    pub const MAX_LENGTH: u64 = 150;
}

/// プロジェクト関連の制約
pub mod project {
    pub const TITLE_MIN_LENGTH: u64 = 1;
    pub const TITLE_MAX_LENGTH: u64 = 100;
    pub const DESCRIPTION_MAX_LENGTH: u64 = 2000;
}

/// タスク関連の制約
pub mod task {
    pub const TITLE_MIN_LENGTH: u64 = 1;
    pub const TITLE_MAX_LENGTH: u64 = 100;
    pub const DESCRIPTION_MAX_LENGTH: u64 = 1000;
}

// =============================================================================
// バリデーション正規表現
// =============================================================================

/// ユーザー名の正規表現パターン（英数字と @ . + - _）
pub static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9@.+_-]+$").expect("Invalid username regex"));

// =============================================================================
// カスタムバリデーション関数
// =============================================================================

/// ユーザー名の形式をバリデーション
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(username) {
        let mut error = ValidationError::new("invalid_username_format");
        error.message = Some(
            "Username may contain only letters, digits and @/./+/-/_ characters".into(),
        );
        return Err(error);
    }
    Ok(())
}

/// ロール名のバリデーション
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    if crate::domain::user_role::UserRole::parse(role).is_none() {
        let mut error = ValidationError::new("invalid_role");
        error.message = Some("Role must be one of: Manager, Developer".into());
        return Err(error);
    }
    Ok(())
}

/// 文字列が空白のみでないかをチェック
pub fn validate_not_empty_or_whitespace(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("empty_or_whitespace");
        error.message = Some("Field cannot be empty or contain only whitespace".into());
        return Err(error);
    }
    Ok(())
}

/// タイトル（タスク・プロジェクト共通）のバリデーション
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    validate_not_empty_or_whitespace(title)?;

    if title.contains('\0') || title.contains('\r') || title.contains('\n') {
        let mut error = ValidationError::new("invalid_characters");
        error.message =
            Some("Title cannot contain null, carriage return, or newline characters".into());
        return Err(error);
    }

    Ok(())
}
