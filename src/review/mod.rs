//! Review queue engine and card collection store
//!
//! This module provides:
//! - Deck and card management over a SQLite collection file
//! - Due-card selection with a blocking-deck priority gate
//! - Fixed-offset scheduling for the four review actions
//! - Review statistics

pub mod models;
pub mod queue;
pub mod scheduler;
pub mod storage;

pub use models::*;
pub use storage::{CardStore, CardStoreError};
