// src/main.rs
use axum::middleware as axum_middleware;
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use task_manager::api::{app_router, AppState};
use task_manager::config::AppConfig;
use task_manager::db;
use task_manager::logging::{inject_request_context, logging_middleware};
use task_manager::middleware::cors::cors_layer;
use task_manager::scheduler::{DailyNotificationJob, Scheduler};
use task_manager::service::notification_service::NotificationService;
use task_manager::utils::email::{build_mailer, EmailConfig};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_manager=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting Task Manager server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env().expect("Failed to load configuration");
    tracing::info!(
        environment = %app_config.environment,
        notification_enabled = app_config.notification.enabled,
        "Configuration loaded"
    );

    // データベース接続を作成
    let db_pool = db::connect(&app_config)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created successfully.");

    Migrator::up(&db_pool, None)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied.");

    // 割り当て通知スケジューラ
    let mut scheduler = if app_config.notification.enabled {
        let email_config = EmailConfig::from_env()?;
        if app_config.is_production() && email_config.development_mode {
            tracing::warn!("EMAIL_DEVELOPMENT_MODE is on in production; notifications will only be logged");
        }
        let mailer = build_mailer(&email_config)?;
        let notification_service = Arc::new(NotificationService::from_config(
            db_pool.clone(),
            mailer,
            &app_config.notification,
        ));

        let mut scheduler = Scheduler::new(
            app_config.notification.interval(),
            Arc::new(DailyNotificationJob::new(notification_service)),
        );
        scheduler.start();
        Some(scheduler)
    } else {
        tracing::info!("Assignment notifications are disabled");
        None
    };

    // ルーターの設定
    let app_state = AppState::new(db_pool, &app_config);
    let app = app_router(app_state)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(inject_request_context))
        .layer(cors_layer(&app_config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    let server_addr = app_config.server_addr();
    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.stop().await;
    }

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
