//! # AI-SDLC
//!
//! Markdown-driven software development lifecycle with AI prompt chaining.
//!
//! A project lists its lifecycle steps (idea, PRD, architecture, ...) in a
//! `.aisdlc` file. One workstream at a time walks those steps: each step is a
//! markdown file, and the prompt for the next step is built from the previous
//! step's output so it can be handed to any AI tool.
//!
//! ## Quick Start
//!
//! ```bash
//! aisdlc init
//! aisdlc new "My great idea"
//! aisdlc next
//! aisdlc status
//! aisdlc done
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod core;
pub mod init;
pub mod workflow;

// Re-export commonly used types
pub use self::core::{slugify, Config, Lock, LockStore, WorkflowError};
pub use workflow::{NextOutcome, Progress, Workflow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "aisdlc";
