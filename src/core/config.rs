//! Configuration management for AI-SDLC.
//!
//! Handles loading the project's `.aisdlc` TOML file, which names the ordered
//! lifecycle steps and the directories workstreams live in.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::{Result, WorkflowError};
use super::project::CONFIG_FILE;

/// Default directory holding in-progress workstreams.
pub const DEFAULT_ACTIVE_DIR: &str = "doing";

/// Default directory holding archived workstreams.
pub const DEFAULT_DONE_DIR: &str = "done";

/// Default directory holding prompt templates.
pub const DEFAULT_PROMPT_DIR: &str = "prompts";

/// Project configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ordered lifecycle step names (e.g. `01-idea`)
    pub steps: Vec<String>,

    /// Directory for in-progress workstreams
    pub active_dir: String,

    /// Directory for archived workstreams
    pub done_dir: String,

    /// Directory for `{step}.instructions.md` prompt templates
    pub prompt_dir: String,
}

/// Config file as written on disk, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    steps: Option<Vec<String>>,
    active_dir: Option<String>,
    done_dir: Option<String>,
    prompt_dir: Option<String>,
}

impl Config {
    /// Load the configuration from the project root.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            return Err(WorkflowError::ConfigMissing { path });
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|source| WorkflowError::ConfigRead { path: path.clone(), source })?;
        Self::parse(&content).map_err(|err| match err {
            WorkflowError::ConfigCorrupt { source, .. } => {
                WorkflowError::ConfigCorrupt { path, source }
            }
            other => other,
        })
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content).map_err(|source| {
            WorkflowError::ConfigCorrupt { path: PathBuf::from(CONFIG_FILE), source }
        })?;

        let steps = raw
            .steps
            .ok_or_else(|| WorkflowError::ConfigInvalid("missing required 'steps' key".into()))?;
        validate_steps(&steps)?;

        Ok(Self {
            steps,
            active_dir: raw.active_dir.unwrap_or_else(|| DEFAULT_ACTIVE_DIR.to_string()),
            done_dir: raw.done_dir.unwrap_or_else(|| DEFAULT_DONE_DIR.to_string()),
            prompt_dir: raw.prompt_dir.unwrap_or_else(|| DEFAULT_PROMPT_DIR.to_string()),
        })
    }

    /// Path of the config file under a project root.
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// The step every new workstream starts at.
    pub fn first_step(&self) -> &str {
        &self.steps[0]
    }

    /// The step a workstream must reach before it can be archived.
    pub fn last_step(&self) -> &str {
        &self.steps[self.steps.len() - 1]
    }

    /// Index of a step in the sequence.
    pub fn position(&self, step: &str) -> Option<usize> {
        self.steps.iter().position(|s| s == step)
    }

    /// The step following `step`, or `None` when `step` is last or unknown.
    pub fn next_after(&self, step: &str) -> Option<&str> {
        self.position(step).and_then(|idx| self.steps.get(idx + 1)).map(String::as_str)
    }
}

fn validate_steps(steps: &[String]) -> Result<()> {
    if steps.is_empty() {
        return Err(WorkflowError::ConfigInvalid("'steps' must list at least one step".into()));
    }

    let mut seen = HashSet::new();
    for step in steps {
        if step.trim().is_empty() {
            return Err(WorkflowError::ConfigInvalid("step names must not be empty".into()));
        }
        if !seen.insert(step.as_str()) {
            return Err(WorkflowError::ConfigInvalid(format!("duplicate step '{step}'")));
        }
    }
    Ok(())
}
