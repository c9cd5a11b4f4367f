// tests/integration/mod.rs

mod notification_db_tests;
mod repository_tests;
mod user_api_tests;
