// src/service/notification_service/eligible.rs

//! 「今日」割り当てられたタスクと、その通知先ユーザーの抽出

use crate::domain::{task_model, user_model};
use crate::error::AppResult;
use crate::repository::task_repository::TaskRepository;
use crate::repository::user_repository::UserRepository;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 抽出に必要な読み取り操作
#[async_trait]
pub trait AssignmentSource: Send + Sync {
    /// `assigned_date` が `[start, end)` に入る割り当て済みタスク
    async fn tasks_assigned_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<task_model::Model>>;

    /// IDでユーザーを一括取得する。存在しないIDは結果に含まれない
    async fn users_by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, user_model::Model>>;
}

/// リポジトリを使った `AssignmentSource` 実装
pub struct AssignmentStore {
    tasks: Arc<TaskRepository>,
    users: Arc<UserRepository>,
}

impl AssignmentStore {
    pub fn new(tasks: Arc<TaskRepository>, users: Arc<UserRepository>) -> Self {
        Self { tasks, users }
    }
}

#[async_trait]
impl AssignmentSource for AssignmentStore {
    async fn tasks_assigned_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<task_model::Model>> {
        Ok(self.tasks.find_assigned_between(start, end).await?)
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, user_model::Model>> {
        Ok(self.users.find_by_ids(ids).await?)
    }
}

/// 指定オフセットでの暦日 `day` をUTCの半開区間 `[start, end)` に変換する
pub fn day_window(day: NaiveDate, offset: FixedOffset) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_midnight = day.and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    let start = Utc.from_utc_datetime(&utc_midnight);
    (start, start + Duration::days(1))
}

/// 指定オフセットでの「今日」
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// 通知対象の (ユーザー, タスク) の組
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleAssignment {
    pub user: user_model::Model,
    pub task: task_model::Model,
    /// 正規化済みの宛先
    pub email: String,
    pub assigned_at: DateTime<Utc>,
}

/// 通知対象を1件ずつ返す遅延イテレータ
///
/// 一度しか走査できない。再度必要な場合は `find_eligible` を呼び直す。
#[derive(Debug)]
pub struct EligibleAssignments {
    tasks: std::vec::IntoIter<task_model::Model>,
    users: HashMap<Uuid, user_model::Model>,
    window: (DateTime<Utc>, DateTime<Utc>),
}

impl EligibleAssignments {
    pub fn new(
        tasks: Vec<task_model::Model>,
        users: HashMap<Uuid, user_model::Model>,
        window: (DateTime<Utc>, DateTime<Utc>),
    ) -> Self {
        Self {
            tasks: tasks.into_iter(),
            users,
            window,
        }
    }
}

impl Iterator for EligibleAssignments {
    type Item = EligibleAssignment;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, end) = self.window;

        for task in self.tasks.by_ref() {
            let (Some(assignee_id), Some(assigned_at)) = (task.assignee_id, task.assigned_date)
            else {
                continue;
            };
            if assigned_at < start || assigned_at >= end {
                continue;
            }

            // 削除済みユーザーは一括取得の結果に含まれない
            let Some(user) = self.users.get(&assignee_id) else {
                debug!(task_id = %task.id, assignee_id = %assignee_id, "Assignee not found, skipping");
                continue;
            };
            let Some(email) = user.notification_email() else {
                debug!(task_id = %task.id, user_id = %user.id, "Assignee has no email, skipping");
                continue;
            };

            return Some(EligibleAssignment {
                email: email.to_string(),
                user: user.clone(),
                task,
                assigned_at,
            });
        }

        None
    }
}

/// 通知対象の抽出クエリ
pub struct AssignmentQuery {
    source: Arc<dyn AssignmentSource>,
    offset: FixedOffset,
}

impl AssignmentQuery {
    pub fn new(source: Arc<dyn AssignmentSource>, offset: FixedOffset) -> Self {
        Self { source, offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// `day` に割り当てられ、宛先を持つユーザーがいるタスクを抽出する
    ///
    /// ユーザーは重複を除いたIDで1回だけ一括取得する。
    pub async fn find_eligible(&self, day: NaiveDate) -> AppResult<EligibleAssignments> {
        let window = day_window(day, self.offset);
        let tasks = self.source.tasks_assigned_between(window.0, window.1).await?;

        let assignee_ids: Vec<Uuid> = tasks
            .iter()
            .filter_map(|task| task.assignee_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let users = self.source.users_by_ids(&assignee_ids).await?;

        debug!(
            day = %day,
            tasks = tasks.len(),
            assignees = assignee_ids.len(),
            users_found = users.len(),
            "Resolved assignment candidates"
        );

        Ok(EligibleAssignments::new(tasks, users, window))
    }
}
