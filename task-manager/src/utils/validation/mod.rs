// src/utils/validation/mod.rs
pub mod common;
