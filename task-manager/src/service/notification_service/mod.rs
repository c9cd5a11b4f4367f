// src/service/notification_service/mod.rs

//! 新しく割り当てられたタスクの担当者へのメール通知
//!
//! `AssignmentQuery` で当日分の (ユーザー, タスク) を抽出し、`Notifier` が
//! 1件ずつ送信する。重複送信の防止は当日フィルタのみに依存し、送信履歴は保存しない。

mod eligible;
mod notifier;

pub use eligible::{
    day_window, today_in, AssignmentQuery, AssignmentSource, AssignmentStore, EligibleAssignment,
    EligibleAssignments,
};
pub use notifier::{
    compose_message, format_assignment_time, BatchAbort, DeliveryPolicy, DeliveryRecord,
    NotificationBatch, Notifier,
};

use crate::config::NotificationConfig;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::repository::task_repository::TaskRepository;
use crate::repository::user_repository::UserRepository;
use crate::utils::email::Mailer;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{info, warn};

pub struct NotificationService {
    query: AssignmentQuery,
    notifier: Notifier,
}

impl NotificationService {
    pub fn new(query: AssignmentQuery, notifier: Notifier) -> Self {
        Self { query, notifier }
    }

    /// DB接続と Mailer から組み立てる
    pub fn from_config(
        db_pool: DbPool,
        mailer: Arc<dyn Mailer>,
        config: &NotificationConfig,
    ) -> Self {
        let store = AssignmentStore::new(
            Arc::new(TaskRepository::new(db_pool.clone())),
            Arc::new(UserRepository::new(db_pool)),
        );
        let offset = config.offset();

        Self::new(
            AssignmentQuery::new(Arc::new(store), offset),
            Notifier::new(mailer, config.subject.clone(), offset, config.delivery_policy),
        )
    }

    /// `day` に割り当てられたタスクの担当者へ通知する
    pub async fn run_for(&self, day: NaiveDate) -> AppResult<NotificationBatch> {
        let eligible = self.query.find_eligible(day).await?;
        let batch = self.notifier.notify(eligible).await;

        if let Some(abort) = &batch.aborted {
            warn!(
                day = %day,
                delivered = batch.delivered(),
                failed_user_id = %abort.user_id,
                error = %abort.error,
                "Assignment notification batch aborted"
            );
        } else {
            info!(
                day = %day,
                delivered = batch.delivered(),
                failed = batch.failed(),
                policy = self.notifier.policy().as_str(),
                "Assignment notification batch finished"
            );
        }

        Ok(batch)
    }

    /// 設定されたタイムゾーンでの今日の分を通知する
    pub async fn run_today(&self) -> AppResult<NotificationBatch> {
        self.run_for(today_in(self.query.offset())).await
    }
}
