//! Workstream lifecycle.
//!
//! A workstream walks the configured steps one at a time. Each step leaves a
//! markdown file in the workstream directory:
//!
//! - `{step}-{slug}.md` - the durable output of a step
//! - `_prompt-{step}.md` - a staging prompt built from the step's template
//!   and the previous step's output, removed once the step's output exists
//!
//! When the last step is reached the whole directory is archived.

mod engine;
mod progress;
mod prompt;

pub use engine::{Created, NextOutcome, Workflow};
pub use progress::{step_label, Progress};
pub use prompt::{first_step_document, merge_prompt, PLACEHOLDER};
