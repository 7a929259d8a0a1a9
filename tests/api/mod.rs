//! REST API endpoint tests

mod faculty_tests;
mod group_tests;
mod health_tests;
