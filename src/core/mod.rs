//! Core types and functionality for AI-SDLC.
//!
//! This module contains the project's persistent state: configuration,
//! the lock recording the active workstream, slug generation and the
//! shared error type.

mod config;
mod error;
mod lock;
mod project;
mod slug;

pub use config::{Config, DEFAULT_ACTIVE_DIR, DEFAULT_DONE_DIR, DEFAULT_PROMPT_DIR};
pub use error::{Result, WorkflowError};
pub use lock::{Lock, LockStore};
pub use project::{find_project_root, write_file_atomic, CONFIG_FILE, LOCK_FILE};
pub use slug::{slugify, DEFAULT_SLUG};
