//! Test utilities for integration testing.
//!
//! This module provides:
//! - In-memory and failing implementations of the store ports
//! - Factories for keys, config and token use cases
//! - `TestAppStateBuilder` for HTTP-level tests

mod app_state_builder;
mod factories;
mod store_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use store_mocks::*;
