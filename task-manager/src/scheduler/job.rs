// src/scheduler/job.rs

use super::ScheduledJob;
use crate::error::AppResult;
use crate::service::notification_service::NotificationService;
use async_trait::async_trait;
use std::sync::Arc;

/// 当日割り当てられたタスクの担当者へ通知するジョブ
pub struct DailyNotificationJob {
    service: Arc<NotificationService>,
}

impl DailyNotificationJob {
    pub fn new(service: Arc<NotificationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ScheduledJob for DailyNotificationJob {
    fn name(&self) -> &str {
        "daily_assignment_notification"
    }

    async fn run(&self) -> AppResult<()> {
        self.service.run_today().await?;
        Ok(())
    }
}
