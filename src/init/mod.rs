//! Project initialization.
//!
//! Writes the config file, prompt templates and workstream directories for a
//! new project. Existing files are left untouched.

mod templates;

pub use templates::{generate_config, prompt_templates, DEFAULT_STEPS};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{
    write_file_atomic, Config, Result, WorkflowError, DEFAULT_ACTIVE_DIR, DEFAULT_DONE_DIR,
    DEFAULT_PROMPT_DIR, LOCK_FILE,
};

/// One item the scaffold wrote or found already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffolded {
    /// Path relative to the project root
    pub path: PathBuf,
    /// Whether this run created it
    pub created: bool,
}

/// Initialize an AI-SDLC project in `root`.
pub fn init_project(root: &Path) -> Result<Vec<Scaffolded>> {
    let mut report = Vec::new();

    let config_path = Config::path(root);
    let created = write_if_missing(&config_path, &generate_config())?;
    report.push(relative(root, &config_path, created));

    for dir in [DEFAULT_PROMPT_DIR, DEFAULT_ACTIVE_DIR, DEFAULT_DONE_DIR] {
        let path = root.join(dir);
        let created = !path.is_dir();
        fs::create_dir_all(&path).map_err(|e| WorkflowError::io(&path, e))?;
        report.push(relative(root, &path, created));
    }

    let prompt_dir = root.join(DEFAULT_PROMPT_DIR);
    for (step, body) in prompt_templates() {
        let path = prompt_dir.join(format!("{step}.instructions.md"));
        let created = write_if_missing(&path, body)?;
        report.push(relative(root, &path, created));
    }

    let lock_path = root.join(LOCK_FILE);
    let created = write_if_missing(&lock_path, "{}")?;
    report.push(relative(root, &lock_path, created));

    Ok(report)
}

/// Atomically write `content` unless `path` already exists.
fn write_if_missing(path: &Path, content: &str) -> Result<bool> {
    if path.exists() {
        debug!("Keeping existing {}", path.display());
        return Ok(false);
    }
    write_file_atomic(path, content)?;
    debug!("Created {}", path.display());
    Ok(true)
}

fn relative(root: &Path, path: &Path, created: bool) -> Scaffolded {
    let path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    Scaffolded { path, created }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LockStore;
    use crate::workflow::Workflow;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_project() {
        let temp = tempdir().unwrap();
        let report = init_project(temp.path()).unwrap();

        assert!(report.iter().all(|item| item.created));
        assert!(temp.path().join(".aisdlc").is_file());
        assert!(temp.path().join("doing").is_dir());
        assert!(temp.path().join("done").is_dir());
        assert!(temp.path().join("prompts/02-prd.instructions.md").is_file());
        assert_eq!(LockStore::new(temp.path()).read(), None);

        // The scaffold is immediately usable
        let wf = Workflow::load(temp.path()).unwrap();
        assert_eq!(wf.config().first_step(), "01-idea");
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let temp = tempdir().unwrap();
        let custom = "steps = [\"01-idea\", \"02-prd\"]\n";
        fs::write(temp.path().join(".aisdlc"), custom).unwrap();

        let report = init_project(temp.path()).unwrap();
        let config_item = report.iter().find(|item| item.path == Path::new(".aisdlc")).unwrap();
        assert!(!config_item.created);
        assert_eq!(fs::read_to_string(temp.path().join(".aisdlc")).unwrap(), custom);

        let again = init_project(temp.path()).unwrap();
        assert!(again.iter().all(|item| !item.created));
    }
}
