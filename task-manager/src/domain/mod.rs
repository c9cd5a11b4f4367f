// src/domain/mod.rs
pub mod assignment;
pub mod project_member_model;
pub mod project_model;
pub mod task_model;
pub mod user_model;
pub mod user_role;
