// tests/unit/notifier_tests.rs

use chrono::{FixedOffset, NaiveDate};
use std::sync::Arc;
use task_manager::domain::{task_model, user_model};
use task_manager::service::notification_service::{
    AssignmentQuery, DeliveryPolicy, EligibleAssignment, NotificationService, Notifier,
};

use crate::common::fakes::{InMemorySource, RecordingMailer};
use crate::common::test_data::{self, march_first_at};

const SUBJECT: &str = "Task manager email";

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn assignment(user: &user_model::Model, task: task_model::Model) -> EligibleAssignment {
    EligibleAssignment {
        email: user.email.clone().unwrap(),
        user: user.clone(),
        assigned_at: task.assigned_date.unwrap(),
        task,
    }
}

/// u1, u2, u3 にそれぞれ1件ずつ割り当て
fn three_assignments() -> Vec<EligibleAssignment> {
    (1..=3)
        .map(|n| {
            let email = format!("u{}@example.com", n);
            let user = test_data::build_user(&format!("u{}", n), Some(email.as_str()));
            let task = test_data::build_task(
                &format!("task {}", n),
                Some(user.id),
                Some(march_first_at(8 + n, 0)),
            );
            assignment(&user, task)
        })
        .collect()
}

#[tokio::test]
async fn test_notify_with_no_assignments_sends_nothing() {
    crate::common::init_test_env();

    let mailer = Arc::new(RecordingMailer::new());
    let notifier = Notifier::new(mailer.clone(), SUBJECT, utc(), DeliveryPolicy::FailFast);

    let batch = notifier.notify(Vec::<EligibleAssignment>::new()).await;

    assert!(batch.records.is_empty());
    assert!(!batch.is_aborted());
    assert!(mailer.attempts().is_empty());
}

#[tokio::test]
async fn test_message_body_and_subject() {
    let alex = test_data::build_user("alex", Some("alex@example.com"));
    let task = test_data::build_task("Write docs", Some(alex.id), Some(march_first_at(10, 0)));

    let mailer = Arc::new(RecordingMailer::new());
    let notifier = Notifier::new(mailer.clone(), SUBJECT, utc(), DeliveryPolicy::FailFast);

    let batch = notifier.notify(vec![assignment(&alex, task)]).await;

    assert_eq!(batch.delivered(), 1);
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, "alex@example.com");
    assert_eq!(sent[0].subject, SUBJECT);
    assert_eq!(
        sent[0].body,
        "Dear, alex! Task [Write docs] has been assigned to you at 10:00 AM on March 01, 2024."
    );
}

#[tokio::test]
async fn test_fail_fast_stops_at_first_failure() {
    let assignments = three_assignments();
    let u1 = assignments[0].user.id;
    let u2 = assignments[1].user.id;

    let mailer = Arc::new(RecordingMailer::failing_for(&["u2@example.com"]));
    let notifier = Notifier::new(mailer.clone(), SUBJECT, utc(), DeliveryPolicy::FailFast);

    let batch = notifier.notify(assignments).await;

    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].user_id, u1);
    assert!(batch.records[0].notified);

    let aborted = batch.aborted.expect("batch should be aborted");
    assert_eq!(aborted.user_id, u2);
    assert!(aborted.error.contains("u2@example.com"));

    // u3 には送信を試みない
    assert_eq!(
        mailer.attempts(),
        vec!["u1@example.com".to_string(), "u2@example.com".to_string()]
    );
}

#[tokio::test]
async fn test_isolated_policy_continues_after_failure() {
    let assignments = three_assignments();

    let mailer = Arc::new(RecordingMailer::failing_for(&["u2@example.com"]));
    let notifier = Notifier::new(mailer.clone(), SUBJECT, utc(), DeliveryPolicy::Isolated);

    let batch = notifier.notify(assignments).await;

    assert!(!batch.is_aborted());
    assert_eq!(batch.records.len(), 3);
    assert_eq!(
        batch.records.iter().map(|r| r.notified).collect::<Vec<_>>(),
        vec![true, false, true]
    );
    assert_eq!(batch.delivered(), 2);
    assert_eq!(batch.failed(), 1);
    assert_eq!(mailer.sent().len(), 2);
}

#[tokio::test]
async fn test_user_with_two_tasks_gets_two_messages() {
    let alex = test_data::build_user("alex", Some("alex@example.com"));
    let first = test_data::build_task("first", Some(alex.id), Some(march_first_at(8, 0)));
    let second = test_data::build_task("second", Some(alex.id), Some(march_first_at(9, 0)));

    let mailer = Arc::new(RecordingMailer::new());
    let notifier = Notifier::new(mailer.clone(), SUBJECT, utc(), DeliveryPolicy::FailFast);

    let batch = notifier
        .notify(vec![assignment(&alex, first), assignment(&alex, second)])
        .await;

    assert_eq!(batch.delivered(), 2);
    let bodies: Vec<String> = mailer.sent().into_iter().map(|m| m.body).collect();
    assert!(bodies[0].contains("[first]"));
    assert!(bodies[1].contains("[second]"));
}

#[tokio::test]
async fn test_notification_service_runs_query_and_notifier() {
    let alex = test_data::build_user("alex", Some("alex@example.com"));
    let ghost = test_data::build_user("ghost", None);
    let tasks = vec![
        test_data::build_task("A", Some(alex.id), Some(march_first_at(10, 0))),
        test_data::build_task("hidden", Some(ghost.id), Some(march_first_at(11, 0))),
        test_data::build_task(
            "B",
            Some(alex.id),
            Some(march_first_at(9, 0) + chrono::Duration::days(1)),
        ),
    ];

    let source = Arc::new(InMemorySource::new(tasks, vec![alex.clone(), ghost]));
    let mailer = Arc::new(RecordingMailer::new());
    let service = NotificationService::new(
        AssignmentQuery::new(source, utc()),
        Notifier::new(mailer.clone(), SUBJECT, utc(), DeliveryPolicy::FailFast),
    );

    let batch = service
        .run_for(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        .await
        .unwrap();

    assert_eq!(batch.delivered(), 1);
    assert_eq!(batch.records[0].user_id, alex.id);
    assert_eq!(mailer.sent().len(), 1);
    assert!(mailer.sent()[0].body.contains("Task [A]"));
}
