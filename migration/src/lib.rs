// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// マイグレーションモジュール
mod m20240301_000001_create_users_table;
mod m20240301_000002_create_projects_table;
mod m20240301_000003_create_project_members_table;
mod m20240301_000004_create_tasks_table;
mod m20240301_000005_create_initial_superuser;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20240301_000001_create_users_table::Migration),
            Box::new(m20240301_000002_create_projects_table::Migration),
            // 2. users / projects に依存するテーブル
            Box::new(m20240301_000003_create_project_members_table::Migration),
            Box::new(m20240301_000004_create_tasks_table::Migration),
            // 3. 初期スーパーユーザー作成
            Box::new(m20240301_000005_create_initial_superuser::Migration),
        ]
    }
}
