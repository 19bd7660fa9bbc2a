//! Session lifecycle tests

mod lifecycle_tests;
mod refresh_tests;
