//! Test helpers for seedbed-fixtures integration tests.
//!
//! Provides the datasets shared by the scenarios, a barrier-gated store for
//! concurrency checks and a one-time tracing subscriber for test output.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

#[path = "helpers/datasets.rs"]
pub mod datasets;
#[path = "helpers/gated.rs"]
pub mod gated;
#[path = "helpers/logging.rs"]
pub mod logging;
