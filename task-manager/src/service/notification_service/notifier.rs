// src/service/notification_service/notifier.rs

//! 割り当て通知メールの送信

use super::eligible::EligibleAssignment;
use crate::utils::email::{mask_email, EmailMessage, Mailer};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 送信失敗時の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// 最初の失敗で残りのバッチを打ち切る
    FailFast,
    /// 失敗した宛先を記録して残りの送信を続ける
    Isolated,
}

impl FromStr for DeliveryPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "fail_fast" | "failfast" => Ok(Self::FailFast),
            "isolated" => Ok(Self::Isolated),
            other => Err(format!(
                "Unknown delivery policy '{other}', expected 'fail_fast' or 'isolated'"
            )),
        }
    }
}

impl DeliveryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailFast => "fail_fast",
            Self::Isolated => "isolated",
        }
    }
}

/// 1宛先ぶんの送信結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryRecord {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub notified: bool,
}

/// バッチを打ち切った送信失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchAbort {
    pub user_id: Uuid,
    pub error: String,
}

/// 1回の通知実行の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationBatch {
    pub records: Vec<DeliveryRecord>,
    /// `FailFast` で打ち切られた場合のみ `Some`
    pub aborted: Option<BatchAbort>,
}

impl NotificationBatch {
    pub fn delivered(&self) -> usize {
        self.records.iter().filter(|r| r.notified).count()
    }

    pub fn failed(&self) -> usize {
        self.records.len() - self.delivered()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}

/// 割り当て時刻を `3:05 PM on March 01, 2024` の形式で整形する
pub fn format_assignment_time(assigned_at: DateTime<Utc>, offset: FixedOffset) -> String {
    assigned_at
        .with_timezone(&offset)
        .format("%-I:%M %p on %B %d, %Y")
        .to_string()
}

pub fn compose_message(
    assignment: &EligibleAssignment,
    subject: &str,
    offset: FixedOffset,
) -> EmailMessage {
    EmailMessage {
        to_email: assignment.email.clone(),
        subject: subject.to_string(),
        body: format!(
            "Dear, {}! Task [{}] has been assigned to you at {}.",
            assignment.user.username,
            assignment.task.title,
            format_assignment_time(assignment.assigned_at, offset)
        ),
    }
}

pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    subject: String,
    offset: FixedOffset,
    policy: DeliveryPolicy,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        subject: impl Into<String>,
        offset: FixedOffset,
        policy: DeliveryPolicy,
    ) -> Self {
        Self {
            mailer,
            subject: subject.into(),
            offset,
            policy,
        }
    }

    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    /// 1組ずつ順番に送信する
    ///
    /// 空の入力では何も送信しない。`FailFast` では失敗した宛先以降は処理せず、
    /// それまでの結果と `aborted` を返す。
    pub async fn notify<I>(&self, assignments: I) -> NotificationBatch
    where
        I: IntoIterator<Item = EligibleAssignment>,
        I::IntoIter: Send,
    {
        let mut batch = NotificationBatch::default();

        for assignment in assignments {
            let message = compose_message(&assignment, &self.subject, self.offset);

            match self.mailer.send(&message).await {
                Ok(()) => {
                    info!(
                        user_id = %assignment.user.id,
                        task_id = %assignment.task.id,
                        to_email = %mask_email(&assignment.email),
                        "Assignment notification sent"
                    );
                    batch.records.push(DeliveryRecord {
                        user_id: assignment.user.id,
                        username: assignment.user.username,
                        email: assignment.email,
                        notified: true,
                    });
                }
                Err(e) => match self.policy {
                    DeliveryPolicy::FailFast => {
                        error!(
                            user_id = %assignment.user.id,
                            task_id = %assignment.task.id,
                            error = %e,
                            delivered = batch.records.len(),
                            "Assignment notification failed, aborting remaining batch"
                        );
                        batch.aborted = Some(BatchAbort {
                            user_id: assignment.user.id,
                            error: e.to_string(),
                        });
                        break;
                    }
                    DeliveryPolicy::Isolated => {
                        warn!(
                            user_id = %assignment.user.id,
                            task_id = %assignment.task.id,
                            error = %e,
                            "Assignment notification failed"
                        );
                        batch.records.push(DeliveryRecord {
                            user_id: assignment.user.id,
                            username: assignment.user.username,
                            email: assignment.email,
                            notified: false,
                        });
                    }
                },
            }
        }

        batch
    }
}
