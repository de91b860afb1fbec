//! End-to-end tests for whole generated units

mod integration_tests;
