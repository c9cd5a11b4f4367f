// tests/common/app_helper.rs

use axum::Router;
use task_manager::api::{app_router, AppState};
use task_manager::config::AppConfig;
use task_manager::domain::user_model;

use crate::common;

/// テスト用アプリ（DBとマネージャーユーザー付き）
pub struct TestApp {
    pub router: Router,
    pub db: common::db::TestDatabase,
    pub manager: user_model::Model,
}

pub async fn setup_app() -> TestApp {
    let db = common::db::TestDatabase::new().await;
    let manager = common::test_data::create_manager(&db.connection).await;

    let app_state = AppState::new(db.connection.clone(), &AppConfig::for_testing());
    let router = app_router(app_state);

    TestApp {
        router,
        db,
        manager,
    }
}
