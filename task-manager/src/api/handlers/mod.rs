// src/api/handlers/mod.rs
pub mod project_handler;
pub mod system_handler;
pub mod task_handler;
pub mod user_handler;
