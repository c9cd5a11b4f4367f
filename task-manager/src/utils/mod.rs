// src/utils/mod.rs
pub mod email;
pub mod validation;
