// src/repository/user_repository.rs
use crate::domain::project_member_model;
use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use sea_orm::{entity::*, query::*, DbConn, DbErr, DeleteResult, Set};
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub is_superuser: bool,
}

pub struct UserRepository {
    db: DbConn,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    /// 複数IDを一括で取得する。存在しないIDは結果に含まれない
    pub async fn find_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, user_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = UserEntity::find()
            .filter(user_model::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }

    pub async fn find_all(&self) -> Result<Vec<user_model::Model>, DbErr> {
        UserEntity::find()
            .order_by_asc(user_model::Column::Username)
            .all(&self.db)
            .await
    }

    /// プロジェクトのメンバーを取得
    pub async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<user_model::Model>, DbErr> {
        UserEntity::find()
            .inner_join(project_member_model::Entity)
            .filter(project_member_model::Column::ProjectId.eq(project_id))
            .order_by_asc(user_model::Column::Username)
            .all(&self.db)
            .await
    }

    pub async fn is_username_taken(&self, username: &str) -> Result<bool, DbErr> {
        let count = UserEntity::find()
            .filter(user_model::Column::Username.eq(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, create_user: CreateUser) -> Result<user_model::Model, DbErr> {
        let mut new_user = UserActiveModel::new();
        new_user.username = Set(create_user.username);
        new_user.email = Set(create_user.email);
        new_user.role = Set(create_user.role);
        new_user.is_superuser = Set(create_user.is_superuser);

        new_user.insert(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        UserEntity::delete_by_id(id).exec(&self.db).await
    }
}
