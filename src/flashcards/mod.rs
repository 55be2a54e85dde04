//! Decks of question/answer cards and their persistent store
//!
//! This module provides:
//! - Deck and card models
//! - Input validation for titles and card text
//! - The store: transactional CRUD with a live change feed
//! - JSON file and in-memory persistence backends

pub mod backend;
pub mod models;
pub mod storage;
pub mod validation;

pub use backend::{JsonFileBackend, MemoryBackend, PersistenceError, StoreBackend};
pub use models::*;
pub use storage::{Store, StoreError};
pub use validation::ValidationError;
