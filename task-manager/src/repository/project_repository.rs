// src/repository/project_repository.rs
use crate::domain::project_member_model::{self, Entity as ProjectMemberEntity};
use crate::domain::project_model::{self, ActiveModel as ProjectActiveModel, Entity as ProjectEntity};
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::*, query::*, DbConn, DbErr, DeleteResult, Set};
use sea_orm::{QueryFilter, QueryOrder};
use uuid::Uuid;

pub struct ProjectRepository {
    db: DbConn,
}

impl ProjectRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<project_model::Model>, DbErr> {
        ProjectEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_all(&self) -> Result<Vec<project_model::Model>, DbErr> {
        ProjectEntity::find()
            .order_by_desc(project_model::Column::CreatedDate)
            .all(&self.db)
            .await
    }

    /// ユーザーが所属するプロジェクトを取得
    pub async fn find_by_member(&self, user_id: Uuid) -> Result<Vec<project_model::Model>, DbErr> {
        ProjectEntity::find()
            .inner_join(ProjectMemberEntity)
            .filter(project_member_model::Column::UserId.eq(user_id))
            .order_by_desc(project_model::Column::CreatedDate)
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        title: String,
        description: String,
    ) -> Result<project_model::Model, DbErr> {
        let mut new_project = ProjectActiveModel::new();
        new_project.title = Set(title);
        new_project.description = Set(description);

        new_project.insert(&self.db).await
    }

    pub async fn update(
        &self,
        project: project_model::Model,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<project_model::Model, DbErr> {
        if title.is_none() && description.is_none() {
            return Ok(project);
        }

        let mut active_model: ProjectActiveModel = project.into();

        if let Some(title) = title {
            active_model.title = Set(title);
        }
        if let Some(description) = description {
            active_model.description = Set(description);
        }

        active_model.update(&self.db).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<DeleteResult, DbErr> {
        ProjectEntity::delete_by_id(id).exec(&self.db).await
    }

    /// メンバーを追加する。既に所属している場合は何もしない
    pub async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> Result<(), DbErr> {
        let membership = project_member_model::ActiveModel {
            project_id: Set(project_id),
            user_id: Set(user_id),
        };

        ProjectMemberEntity::insert(membership)
            .on_conflict(
                OnConflict::columns([
                    project_member_model::Column::ProjectId,
                    project_member_model::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .do_nothing()
            .exec(&self.db)
            .await?;

        Ok(())
    }

    pub async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Result<DeleteResult, DbErr> {
        ProjectMemberEntity::delete_many()
            .filter(project_member_model::Column::ProjectId.eq(project_id))
            .filter(project_member_model::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
    }
}
