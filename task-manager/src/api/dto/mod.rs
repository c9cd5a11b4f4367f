// src/api/dto/mod.rs
pub mod project_dto;
pub mod task_dto;
pub mod user_dto;
