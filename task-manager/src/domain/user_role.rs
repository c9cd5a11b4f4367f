// src/domain/user_role.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// ユーザーのロール。認可判定にのみ使用する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserRole {
    Manager,
    #[default]
    Developer,
}

impl UserRole {
    /// 文字列からUserRoleに変換（大文字小文字は区別しない）
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manager" => Some(Self::Manager),
            "developer" => Some(Self::Developer),
            _ => None,
        }
    }

    /// DBに保存する文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Developer => "Developer",
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
