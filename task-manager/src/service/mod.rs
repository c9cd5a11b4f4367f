// src/service/mod.rs
pub mod notification_service;
pub mod project_service;
pub mod task_service;
pub mod user_service;
