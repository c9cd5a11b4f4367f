// src/repository/mod.rs
pub mod project_repository;
pub mod task_repository;
pub mod user_repository;
