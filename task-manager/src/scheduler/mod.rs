// src/scheduler/mod.rs

//! 定期ジョブの実行
//!
//! 起動時に間隔とジョブを渡して構成し、`start()` / `stop()` で明示的に制御する。
//! 初回実行は開始から1間隔後。実行中に次の時刻が来た場合、そのティックはスキップされる。

pub mod job;

pub use job::DailyNotificationJob;

use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// スケジューラから呼ばれるジョブ
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> AppResult<()>;
}

pub struct Scheduler {
    interval: Duration,
    job: Arc<dyn ScheduledJob>,
    cancel: Option<CancellationToken>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(interval: Duration, job: Arc<dyn ScheduledJob>) -> Self {
        Self {
            interval,
            job,
            cancel: None,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// バックグラウンドでループを開始する。既に動作中なら何もしない
    pub fn start(&mut self) {
        if self.is_running() {
            warn!(job = self.job.name(), "Scheduler is already running");
            return;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(self.interval, self.job.clone(), cancel.clone()));

        self.cancel = Some(cancel);
        self.handle = Some(handle);
    }

    /// ループを停止し、終了を待つ。実行中のジョブは中断される
    pub async fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(job = self.job.name(), error = %e, "Scheduler task terminated abnormally");
            }
        }
    }
}

async fn run_loop(period: Duration, job: Arc<dyn ScheduledJob>, cancel: CancellationToken) {
    let Some(first_tick) = Instant::now().checked_add(period) else {
        error!(
            job = job.name(),
            interval_secs = period.as_secs(),
            "Scheduler interval is too large, not starting"
        );
        return;
    };
    let mut ticker = interval_at(first_tick, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        job = job.name(),
        interval_secs = period.as_secs(),
        "Scheduler started"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                info!(job = job.name(), "Running scheduled job");
                tokio::select! {
                    _ = cancel.cancelled() => {
                        warn!(job = job.name(), "Scheduled job interrupted by shutdown");
                        break;
                    }
                    result = job.run() => {
                        if let Err(e) = result {
                            error!(job = job.name(), error = %e, "Scheduled job failed");
                        }
                    }
                }
            }
        }
    }

    info!(job = job.name(), "Scheduler stopped");
}
