// tests/integration/notification_db_tests.rs

use chrono::{FixedOffset, NaiveDate};
use std::sync::Arc;
use task_manager::api::dto::task_dto::{CreateTaskDto, UpdateTaskDto};
use task_manager::config::NotificationConfig;
use task_manager::service::notification_service::{
    AssignmentQuery, AssignmentStore, DeliveryPolicy, NotificationService,
};
use task_manager::repository::task_repository::TaskRepository;
use task_manager::repository::user_repository::UserRepository;
use task_manager::service::task_service::TaskService;
use task_manager::service::user_service::UserService;

use crate::common::db::TestDatabase;
use crate::common::fakes::RecordingMailer;
use crate::common::test_data::{create_developer, create_project, create_user, march_first_at};

fn march_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn task_for(project_id: uuid::Uuid, title: &str, assignee: Option<uuid::Uuid>) -> CreateTaskDto {
    CreateTaskDto {
        project_id,
        title: title.to_string(),
        description: None,
        due_date: None,
        assignee_id: assignee,
    }
}

#[tokio::test]
async fn test_daily_run_notifies_todays_assignments() {
    let db = TestDatabase::new().await;
    let tasks = TaskService::new(db.connection.clone());
    let project_id = create_project(&db.connection, "Docs").await;

    let alex = create_developer(&db.connection, "alex").await;
    let sam = create_developer(&db.connection, "sam").await;
    let ghost = create_user(&db.connection, "ghost", None, "Developer").await;

    // 当日に割り当て
    tasks
        .create_task_at(task_for(project_id, "A", Some(alex.id)), march_first_at(10, 0))
        .await
        .unwrap();
    // 前日に割り当てられ、当日に別項目のみ更新
    let old = tasks
        .create_task_at(
            task_for(project_id, "old", Some(sam.id)),
            march_first_at(10, 0) - chrono::Duration::days(1),
        )
        .await
        .unwrap();
    tasks
        .update_task_at(
            old.id,
            UpdateTaskDto {
                title: Some("old, renamed".to_string()),
                ..Default::default()
            },
            march_first_at(11, 0),
        )
        .await
        .unwrap();
    // 宛先なし
    tasks
        .create_task_at(task_for(project_id, "hidden", Some(ghost.id)), march_first_at(12, 0))
        .await
        .unwrap();

    let mailer = Arc::new(RecordingMailer::new());
    let config = NotificationConfig {
        utc_offset_minutes: 0,
        ..NotificationConfig::default()
    };
    let service = NotificationService::from_config(db.connection.clone(), mailer.clone(), &config);

    let batch = service.run_for(march_first()).await.unwrap();

    assert_eq!(batch.delivered(), 1);
    assert!(!batch.is_aborted());
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, "alex@example.com");
    assert_eq!(
        sent[0].body,
        "Dear, alex! Task [A] has been assigned to you at 10:00 AM on March 01, 2024."
    );
}

#[tokio::test]
async fn test_reassignment_today_is_notified_to_new_assignee() {
    let db = TestDatabase::new().await;
    let tasks = TaskService::new(db.connection.clone());
    let project_id = create_project(&db.connection, "Docs").await;
    let u1 = create_developer(&db.connection, "u1").await;
    let u2 = create_developer(&db.connection, "u2").await;

    let task = tasks
        .create_task_at(task_for(project_id, "Docs", Some(u1.id)), march_first_at(8, 0))
        .await
        .unwrap();
    tasks
        .update_task_at(
            task.id,
            UpdateTaskDto {
                assignee_id: Some(Some(u2.id)),
                ..Default::default()
            },
            march_first_at(10, 0),
        )
        .await
        .unwrap();

    let store = AssignmentStore::new(
        Arc::new(TaskRepository::new(db.connection.clone())),
        Arc::new(UserRepository::new(db.connection.clone())),
    );
    let query = AssignmentQuery::new(Arc::new(store), FixedOffset::east_opt(0).unwrap());

    let eligible: Vec<_> = query.find_eligible(march_first()).await.unwrap().collect();
    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].user.id, u2.id);
    assert_eq!(eligible[0].assigned_at, march_first_at(10, 0));
}

#[tokio::test]
async fn test_fail_fast_batch_against_database() {
    let db = TestDatabase::new().await;
    let tasks = TaskService::new(db.connection.clone());
    let project_id = create_project(&db.connection, "Docs").await;

    for (n, hour) in [(1, 8), (2, 9), (3, 10)] {
        let user = create_developer(&db.connection, &format!("u{}", n)).await;
        tasks
            .create_task_at(
                task_for(project_id, &format!("task {}", n), Some(user.id)),
                march_first_at(hour, 0),
            )
            .await
            .unwrap();
    }

    let mailer = Arc::new(RecordingMailer::failing_for(&["u2@example.com"]));
    let config = NotificationConfig {
        utc_offset_minutes: 0,
        delivery_policy: DeliveryPolicy::FailFast,
        ..NotificationConfig::default()
    };
    let service = NotificationService::from_config(db.connection.clone(), mailer.clone(), &config);

    let batch = service.run_for(march_first()).await.unwrap();

    assert!(batch.is_aborted());
    assert_eq!(batch.delivered(), 1);
    assert_eq!(mailer.sent()[0].to_email, "u1@example.com");
    assert!(!mailer.attempts().contains(&"u3@example.com".to_string()));
}

#[tokio::test]
async fn test_deleted_user_is_not_notified() {
    let db = TestDatabase::new().await;
    let tasks = TaskService::new(db.connection.clone());
    let users = UserService::new(db.connection.clone());
    let project_id = create_project(&db.connection, "Docs").await;
    let alex = create_developer(&db.connection, "alex").await;

    let task = tasks
        .create_task_at(task_for(project_id, "A", Some(alex.id)), march_first_at(10, 0))
        .await
        .unwrap();
    // 担当を外してからユーザーを削除
    tasks
        .update_task_at(
            task.id,
            UpdateTaskDto {
                assignee_id: Some(None),
                ..Default::default()
            },
            march_first_at(11, 0),
        )
        .await
        .unwrap();
    users.delete_user(alex.id).await.unwrap();

    let mailer = Arc::new(RecordingMailer::new());
    let config = NotificationConfig {
        utc_offset_minutes: 0,
        ..NotificationConfig::default()
    };
    let service = NotificationService::from_config(db.connection.clone(), mailer.clone(), &config);

    let batch = service.run_for(march_first()).await.unwrap();
    assert!(batch.records.is_empty());
    assert!(mailer.attempts().is_empty());
}
