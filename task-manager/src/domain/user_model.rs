// src/domain/user_model.rs

use super::user_role::UserRole;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub username: String,

    /// 通知の宛先。未設定のユーザーには通知しない
    #[sea_orm(nullable)]
    pub email: Option<String>,

    pub role: String,

    pub is_superuser: bool,

    pub is_active: bool,

    pub date_joined: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::task_model::Entity")]
    AssignedTasks,

    #[sea_orm(has_many = "crate::domain::project_member_model::Entity")]
    ProjectMemberships,
}

impl Related<crate::domain::project_member_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectMemberships.def()
    }
}

impl Related<crate::domain::task_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedTasks.def()
    }
}

// project_members を経由した多対多
impl Related<crate::domain::project_model::Entity> for Entity {
    fn to() -> RelationDef {
        crate::domain::project_member_model::Relation::Project.def()
    }

    fn via() -> Option<RelationDef> {
        Some(crate::domain::project_member_model::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            role: Set(UserRole::default().as_str().to_string()),
            is_superuser: Set(false),
            is_active: Set(true),
            date_joined: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    /// 保存されているロール文字列を列挙型として取得（不明な値は Developer 扱い）
    pub fn user_role(&self) -> UserRole {
        UserRole::parse(&self.role).unwrap_or_default()
    }

    /// マネージャーまたはスーパーユーザーで、かつ有効なアカウントか
    pub fn is_manager_or_admin(&self) -> bool {
        self.is_active && (self.user_role().is_manager() || self.is_superuser)
    }

    /// 通知に使える宛先（空文字は未設定とみなす）
    pub fn notification_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
