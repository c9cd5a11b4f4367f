// tests/unit/assignment_query_tests.rs

use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use task_manager::service::notification_service::AssignmentQuery;
use uuid::Uuid;

use crate::common::fakes::InMemorySource;
use crate::common::test_data::{build_task, build_user, march_first_at};

fn march_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

#[tokio::test]
async fn test_only_tasks_assigned_on_the_day_are_eligible() {
    crate::common::init_test_env();

    let alex = build_user("alex", Some("alex@example.com"));
    let task_a = build_task("A", Some(alex.id), Some(march_first_at(10, 0)));
    let task_b = build_task(
        "B",
        Some(alex.id),
        Some(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()),
    );

    let source = Arc::new(InMemorySource::new(vec![task_a.clone(), task_b], vec![alex]));
    let query = AssignmentQuery::new(source, utc());

    let eligible: Vec<_> = query.find_eligible(march_first()).await.unwrap().collect();

    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].task.id, task_a.id);
    assert_eq!(eligible[0].email, "alex@example.com");
    assert_eq!(eligible[0].assigned_at, march_first_at(10, 0));
}

#[tokio::test]
async fn test_day_boundaries_are_half_open() {
    let alex = build_user("alex", Some("alex@example.com"));
    let at_midnight = build_task("midnight", Some(alex.id), Some(march_first_at(0, 0)));
    let next_midnight = build_task(
        "next",
        Some(alex.id),
        Some(Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()),
    );

    let source = Arc::new(InMemorySource::new(
        vec![at_midnight.clone(), next_midnight],
        vec![alex],
    ));
    let query = AssignmentQuery::new(source, utc());

    let titles: Vec<String> = query
        .find_eligible(march_first())
        .await
        .unwrap()
        .map(|a| a.task.title)
        .collect();

    assert_eq!(titles, vec!["midnight".to_string()]);
}

#[tokio::test]
async fn test_users_without_email_are_skipped() {
    let no_email = build_user("ghost", None);
    let blank_email = build_user("blank", Some("   "));
    let sam = build_user("sam", Some("sam@example.com"));

    let tasks = vec![
        build_task("t1", Some(no_email.id), Some(march_first_at(8, 0))),
        build_task("t2", Some(blank_email.id), Some(march_first_at(9, 0))),
        build_task("t3", Some(sam.id), Some(march_first_at(10, 0))),
    ];

    let source = Arc::new(InMemorySource::new(tasks, vec![no_email, blank_email, sam]));
    let query = AssignmentQuery::new(source, utc());

    let usernames: Vec<String> = query
        .find_eligible(march_first())
        .await
        .unwrap()
        .map(|a| a.user.username)
        .collect();

    assert_eq!(usernames, vec!["sam".to_string()]);
}

#[tokio::test]
async fn test_tasks_of_deleted_users_are_skipped() {
    let deleted_user_id = Uuid::new_v4();
    let task = build_task("orphan", Some(deleted_user_id), Some(march_first_at(10, 0)));

    let source = Arc::new(InMemorySource::new(vec![task], vec![]));
    let query = AssignmentQuery::new(source.clone(), utc());

    let mut eligible = query.find_eligible(march_first()).await.unwrap();

    assert!(eligible.next().is_none());
    assert_eq!(source.lookups(), vec![vec![deleted_user_id]]);
}

#[tokio::test]
async fn test_unassigned_tasks_are_not_eligible() {
    // 担当者が外されても割り当て日時は残る
    let task = build_task("cleared", None, Some(march_first_at(10, 0)));

    let source = Arc::new(InMemorySource::new(vec![task], vec![]));
    let query = AssignmentQuery::new(source, utc());

    assert_eq!(query.find_eligible(march_first()).await.unwrap().count(), 0);
}

#[tokio::test]
async fn test_users_are_fetched_once_with_distinct_ids() {
    let alex = build_user("alex", Some("alex@example.com"));
    let sam = build_user("sam", Some("sam@example.com"));

    let tasks = vec![
        build_task("t1", Some(alex.id), Some(march_first_at(8, 0))),
        build_task("t2", Some(sam.id), Some(march_first_at(9, 0))),
        build_task("t3", Some(alex.id), Some(march_first_at(10, 0))),
    ];

    let source = Arc::new(InMemorySource::new(tasks, vec![alex.clone(), sam.clone()]));
    let query = AssignmentQuery::new(source.clone(), utc());

    let eligible: Vec<_> = query.find_eligible(march_first()).await.unwrap().collect();

    // ユーザーごとではなくタスクごとに1件
    assert_eq!(eligible.len(), 3);

    let lookups = source.lookups();
    assert_eq!(lookups.len(), 1);
    let mut requested = lookups[0].clone();
    requested.sort();
    let mut expected = vec![alex.id, sam.id];
    expected.sort();
    assert_eq!(requested, expected);
}

#[tokio::test]
async fn test_day_is_interpreted_in_configured_offset() {
    let alex = build_user("alex", Some("alex@example.com"));
    // JST 2024-03-01 01:00 == UTC 2024-02-29 16:00
    let early = build_task(
        "early",
        Some(alex.id),
        Some(Utc.with_ymd_and_hms(2024, 2, 29, 16, 0, 0).unwrap()),
    );
    // JST 2024-03-02 00:30
    let late = build_task("late", Some(alex.id), Some(march_first_at(15, 30)));

    let source = Arc::new(InMemorySource::new(vec![early.clone(), late], vec![alex]));
    let query = AssignmentQuery::new(source, FixedOffset::east_opt(9 * 3600).unwrap());

    let ids: Vec<Uuid> = query
        .find_eligible(march_first())
        .await
        .unwrap()
        .map(|a| a.task.id)
        .collect();

    assert_eq!(ids, vec![early.id]);
}

#[tokio::test]
async fn test_eligible_assignments_are_single_pass() {
    let alex = build_user("alex", Some("alex@example.com"));
    let task = build_task("A", Some(alex.id), Some(march_first_at(10, 0)));

    let source = Arc::new(InMemorySource::new(vec![task], vec![alex]));
    let query = AssignmentQuery::new(source, utc());

    let mut eligible = query.find_eligible(march_first()).await.unwrap();
    assert!(eligible.next().is_some());
    assert!(eligible.next().is_none());
    assert!(eligible.next().is_none());
}
