// tests/unit/mod.rs

mod assignment_query_tests;
mod notifier_tests;
