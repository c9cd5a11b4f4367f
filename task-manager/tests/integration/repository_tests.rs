// tests/integration/repository_tests.rs

use chrono::{Duration, Utc};
use task_manager::repository::project_repository::ProjectRepository;
use task_manager::repository::task_repository::{CreateTask, TaskChanges, TaskRepository};
use task_manager::repository::user_repository::UserRepository;
use uuid::Uuid;

use crate::common::db::TestDatabase;
use crate::common::test_data::{create_developer, create_project, march_first_at};

fn create_task(project_id: Uuid, assignee_id: Option<Uuid>, hour: Option<u32>) -> CreateTask {
    CreateTask {
        project_id,
        assignee_id,
        title: format!("task at {:?}", hour),
        description: None,
        due_date: None,
        assigned_date: hour.map(|h| march_first_at(h, 0)),
    }
}

#[tokio::test]
async fn test_find_assigned_between_filters_window_and_assignee() {
    let db = TestDatabase::new().await;
    let repo = TaskRepository::new(db.connection.clone());
    let project_id = create_project(&db.connection, "Docs").await;
    let alex = create_developer(&db.connection, "alex").await;

    let in_window = repo
        .create(create_task(project_id, Some(alex.id), Some(10)))
        .await
        .unwrap();
    let earlier = repo
        .create(create_task(project_id, Some(alex.id), Some(8)))
        .await
        .unwrap();
    // 担当者なし（割り当て日時のみ残っている）
    repo.create(create_task(project_id, None, Some(9)))
        .await
        .unwrap();
    // 翌日
    let mut next_day = create_task(project_id, Some(alex.id), None);
    next_day.assigned_date = Some(march_first_at(9, 0) + Duration::days(1));
    repo.create(next_day).await.unwrap();

    let start = march_first_at(0, 0);
    let found = repo
        .find_assigned_between(start, start + Duration::days(1))
        .await
        .unwrap();

    // 割り当て日時の昇順
    let ids: Vec<Uuid> = found.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![earlier.id, in_window.id]);
}

#[tokio::test]
async fn test_update_writes_only_given_fields() {
    let db = TestDatabase::new().await;
    let repo = TaskRepository::new(db.connection.clone());
    let project_id = create_project(&db.connection, "Docs").await;
    let alex = create_developer(&db.connection, "alex").await;

    let task = repo
        .create(create_task(project_id, Some(alex.id), Some(8)))
        .await
        .unwrap();

    let updated = repo
        .update(
            task.clone(),
            TaskChanges {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.assignee_id, task.assignee_id);
    assert_eq!(updated.assigned_date, task.assigned_date);
    assert_eq!(updated.created_date, task.created_date);
}

#[tokio::test]
async fn test_find_by_ids_returns_existing_users_only() {
    let db = TestDatabase::new().await;
    let repo = UserRepository::new(db.connection.clone());
    let alex = create_developer(&db.connection, "alex").await;
    let sam = create_developer(&db.connection, "sam").await;

    let found = repo
        .find_by_ids(&[alex.id, sam.id, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[&alex.id].username, "alex");

    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_project_members_and_cascade() {
    let db = TestDatabase::new().await;
    let projects = ProjectRepository::new(db.connection.clone());
    let users = UserRepository::new(db.connection.clone());
    let tasks = TaskRepository::new(db.connection.clone());

    let project_id = create_project(&db.connection, "Docs").await;
    let alex = create_developer(&db.connection, "alex").await;

    projects.add_member(project_id, alex.id).await.unwrap();
    // 二重追加はエラーにならない
    projects.add_member(project_id, alex.id).await.unwrap();

    let members = users.find_by_project(project_id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(
        projects.find_by_member(alex.id).await.unwrap()[0].id,
        project_id
    );

    let task = tasks
        .create(create_task(project_id, None, None))
        .await
        .unwrap();

    projects.delete(project_id).await.unwrap();

    assert!(tasks.find_by_id(task.id).await.unwrap().is_none());
    assert!(users.find_by_project(project_id).await.unwrap().is_empty());
    // ユーザー自体は残る
    assert!(users.find_by_id(alex.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_seeded_superuser_exists() {
    let db = TestDatabase::new().await;
    let users = UserRepository::new(db.connection.clone());

    assert!(users.is_username_taken("admin").await.unwrap());
    let all = users.find_all().await.unwrap();
    let admin = all.iter().find(|u| u.username == "admin").unwrap();
    assert!(admin.is_superuser);
    assert!(admin.is_manager_or_admin());
    assert!(admin.date_joined <= Utc::now());
}
