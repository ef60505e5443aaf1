//! Shared test utilities for menu-ingest integration tests.
//!
//! This module provides:
//! - `PageBuilder` for assembling cafe pages in the daypart markup
//! - In-memory fetchers and stores for driving an `Ingestor` without a network

pub mod builders;
pub mod fakes;

pub use builders::*;
pub use fakes::*;
