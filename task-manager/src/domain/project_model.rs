// src/domain/project_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_date: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    // プロジェクト削除時にタスクもカスケード削除される（外部キー側で定義）
    #[sea_orm(has_many = "crate::domain::task_model::Entity")]
    Tasks,

    #[sea_orm(has_many = "crate::domain::project_member_model::Entity")]
    Members,
}

impl Related<crate::domain::project_member_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<crate::domain::task_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        crate::domain::project_member_model::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(crate::domain::project_member_model::Relation::Project.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            description: Set(String::new()),
            created_date: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }
}
