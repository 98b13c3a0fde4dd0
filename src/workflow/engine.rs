//! Step engine: moves the active workstream through the configured steps.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::progress::Progress;
use super::prompt::{first_step_document, merge_prompt};
use crate::core::{slugify, Config, Lock, LockStore, Result, WorkflowError};

/// Result of creating a workstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    /// The new workstream's lock
    pub lock: Lock,
    /// The first step's file, ready to be filled in
    pub file: PathBuf,
}

/// Result of `next`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    /// The workstream is at the last step; it only needs archiving.
    Complete,
    /// A staging prompt was written and the next step's output is not there yet.
    Waiting {
        /// Step being prepared
        step: String,
        /// Staging prompt to hand to an AI tool
        staging: PathBuf,
        /// Where the step's output is expected
        expected: PathBuf,
    },
    /// The next step's output was found and the lock moved forward.
    Advanced {
        /// Step now current
        step: String,
        /// The output file that triggered the advance
        output: PathBuf,
        /// Staging prompt that was removed
        staging: PathBuf,
    },
}

/// Drives workstreams for one project root.
#[derive(Debug, Clone)]
pub struct Workflow {
    root: PathBuf,
    config: Config,
    locks: LockStore,
}

impl Workflow {
    /// Create a workflow for a project root and its loaded config.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        let root = root.into();
        let locks = LockStore::new(&root);
        Self { root, config, locks }
    }

    /// Load the config under `root` and create a workflow for it.
    pub fn load(root: &Path) -> Result<Self> {
        Ok(Self::new(root, Config::load(root)?))
    }

    /// Loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The lock store backing this workflow.
    pub fn locks(&self) -> &LockStore {
        &self.locks
    }

    /// Directory of an in-progress workstream.
    pub fn workdir(&self, slug: &str) -> PathBuf {
        self.root.join(&self.config.active_dir).join(slug)
    }

    /// Durable output file of a step.
    pub fn step_file(&self, slug: &str, step: &str) -> PathBuf {
        self.workdir(slug).join(format!("{step}-{slug}.md"))
    }

    /// Transient staging prompt for a step.
    pub fn staging_file(&self, slug: &str, step: &str) -> PathBuf {
        self.workdir(slug).join(format!("_prompt-{step}.md"))
    }

    /// Prompt template for a step.
    pub fn prompt_template(&self, step: &str) -> PathBuf {
        self.root.join(&self.config.prompt_dir).join(format!("{step}.instructions.md"))
    }

    /// Archive location of a workstream.
    pub fn archive_dir(&self, slug: &str) -> PathBuf {
        self.root.join(&self.config.done_dir).join(slug)
    }

    /// Start a workstream from a free-text title.
    ///
    /// Refuses while another workstream is active, and never reuses an
    /// existing workstream directory.
    pub fn start(&self, title: &str) -> Result<Created> {
        let title = title.trim();
        if title.is_empty() {
            return Err(WorkflowError::EmptyTitle);
        }
        if let Some(active) = self.locks.read() {
            return Err(WorkflowError::WorkstreamActive { slug: active.slug });
        }

        let slug = slugify(title);
        let workdir = self.workdir(&slug);
        if workdir.exists() {
            return Err(WorkflowError::WorkstreamExists(slug));
        }

        fs::create_dir_all(&workdir).map_err(|e| WorkflowError::io(&workdir, e))?;
        let first = self.config.first_step();
        let file = self.step_file(&slug, first);
        fs::write(&file, first_step_document(title)).map_err(|e| WorkflowError::io(&file, e))?;
        debug!("Wrote {}", file.display());

        let lock = Lock::new(&slug, first);
        self.locks.write(&lock)?;
        info!("Started workstream {} at {}", slug, first);

        Ok(Created { lock, file })
    }

    /// Stage the next step's prompt, advancing if its output already exists.
    ///
    /// Calling this again while waiting only regenerates the staging prompt.
    pub fn next(&self) -> Result<NextOutcome> {
        let mut lock = self.locks.read().ok_or(WorkflowError::NoActiveWorkstream)?;
        self.index_of(&lock.current)?;

        let Some(next_step) = self.config.next_after(&lock.current).map(str::to_string) else {
            return Ok(NextOutcome::Complete);
        };

        let previous = self.step_file(&lock.slug, &lock.current);
        if !previous.exists() {
            return Err(WorkflowError::MissingPreviousOutput { path: previous });
        }
        let template = self.prompt_template(&next_step);
        if !template.exists() {
            return Err(WorkflowError::MissingPromptTemplate { path: template });
        }

        debug!("Reading previous step from {}", previous.display());
        let previous_content =
            fs::read_to_string(&previous).map_err(|e| WorkflowError::io(&previous, e))?;
        debug!("Reading prompt template from {}", template.display());
        let template_content =
            fs::read_to_string(&template).map_err(|e| WorkflowError::io(&template, e))?;

        let staging = self.staging_file(&lock.slug, &next_step);
        fs::write(&staging, merge_prompt(&template_content, &previous_content))
            .map_err(|e| WorkflowError::io(&staging, e))?;
        debug!("Wrote staging prompt {}", staging.display());

        let output = self.step_file(&lock.slug, &next_step);
        if !output.exists() {
            return Ok(NextOutcome::Waiting { step: next_step, staging, expected: output });
        }

        lock.current.clone_from(&next_step);
        self.locks.write(&lock)?;
        info!("Advanced workstream {} to {}", lock.slug, next_step);

        if staging.exists() {
            fs::remove_file(&staging).map_err(|e| WorkflowError::io(&staging, e))?;
        }

        Ok(NextOutcome::Advanced { step: next_step, output, staging })
    }

    /// Current position of the active workstream, or `None` when idle.
    pub fn status(&self) -> Result<Option<Progress>> {
        let Some(lock) = self.locks.read() else {
            return Ok(None);
        };
        let index = self.index_of(&lock.current)?;
        Ok(Some(Progress {
            slug: lock.slug,
            current: lock.current,
            index,
            steps: self.config.steps.clone(),
        }))
    }

    /// Archive a finished workstream and clear the lock.
    ///
    /// Returns the archive directory. On failure the lock and the workstream
    /// directory are left as they were.
    pub fn done(&self) -> Result<PathBuf> {
        let lock = self.locks.read().ok_or(WorkflowError::NoActiveWorkstream)?;
        let last = self.config.last_step();
        if lock.current != last {
            return Err(WorkflowError::IncompleteWorkstream {
                current: lock.current,
                last: last.to_string(),
            });
        }

        let missing: Vec<String> = self
            .config
            .steps
            .iter()
            .filter(|step| !self.step_file(&lock.slug, step).exists())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(WorkflowError::MissingFiles(missing));
        }

        let from = self.workdir(&lock.slug);
        let to = self.archive_dir(&lock.slug);
        archive(&from, &to)?;
        if let Err(err) = self.locks.clear() {
            // Put the workstream back so the lock still matches the disk
            fs::rename(&to, &from).map_err(|source| WorkflowError::ArchiveIo {
                from: to.clone(),
                to: from.clone(),
                source,
            })?;
            return Err(err);
        }
        info!("Archived workstream {} to {}", lock.slug, to.display());

        Ok(to)
    }

    fn index_of(&self, step: &str) -> Result<usize> {
        self.config.position(step).ok_or_else(|| WorkflowError::StepNotFound {
            step: step.to_string(),
            available: self.config.steps.clone(),
        })
    }
}

/// Move a workstream directory into the done area with a single rename.
fn archive(from: &Path, to: &Path) -> Result<()> {
    let fail = |source: std::io::Error| WorkflowError::ArchiveIo {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if to.exists() {
        return Err(fail(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "archive destination already exists",
        )));
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(fail)?;
    }
    fs::rename(from, to).map_err(fail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    const STEPS: &str = "steps = [\"01-idea\", \"02-prd\", \"03-architecture\"]\n";

    fn project() -> (TempDir, Workflow) {
        let temp = tempdir().unwrap();
        let config = Config::parse(STEPS).unwrap();
        let prompts = temp.path().join("prompts");
        fs::create_dir_all(&prompts).unwrap();
        fs::write(prompts.join("02-prd.instructions.md"), "PRD from:\n<prev_step></prev_step>")
            .unwrap();
        fs::write(prompts.join("03-architecture.instructions.md"), "ARCH <prev_step></prev_step>")
            .unwrap();
        let workflow = Workflow::new(temp.path(), config);
        (temp, workflow)
    }

    #[test]
    fn test_start_creates_first_step_and_lock() {
        let (_temp, wf) = project();
        let created = wf.start("My Idea").unwrap();

        assert_eq!(created.lock.slug, "my-idea");
        assert_eq!(created.lock.current, "01-idea");
        assert_eq!(created.file, wf.workdir("my-idea").join("01-idea-my-idea.md"));
        assert!(fs::read_to_string(&created.file).unwrap().starts_with("# My Idea"));
        assert_eq!(wf.locks().read(), Some(created.lock));
    }

    #[test]
    fn test_start_refuses_while_active() {
        let (_temp, wf) = project();
        let first = wf.start("First").unwrap();
        let lock_before = fs::read_to_string(wf.locks().path()).unwrap();

        let err = wf.start("Second").unwrap_err();
        assert!(matches!(err, WorkflowError::WorkstreamActive { ref slug } if slug == "first"));
        assert!(!wf.workdir("second").exists());
        assert_eq!(fs::read_to_string(wf.locks().path()).unwrap(), lock_before);
        assert!(first.file.exists());
    }

    #[test]
    fn test_start_refuses_existing_directory() {
        let (_temp, wf) = project();
        fs::create_dir_all(wf.workdir("my-idea")).unwrap();

        let err = wf.start("My Idea").unwrap_err();
        assert!(matches!(err, WorkflowError::WorkstreamExists(ref s) if s == "my-idea"));
        assert_eq!(wf.locks().read(), None);
    }

    #[test]
    fn test_start_rejects_blank_title() {
        let (_temp, wf) = project();
        assert!(matches!(wf.start("   ").unwrap_err(), WorkflowError::EmptyTitle));
    }

    #[test]
    fn test_next_without_workstream() {
        let (_temp, wf) = project();
        assert!(matches!(wf.next().unwrap_err(), WorkflowError::NoActiveWorkstream));
    }

    #[test]
    fn test_next_waits_then_advances() {
        let (_temp, wf) = project();
        wf.start("My Idea").unwrap();

        let staging = wf.staging_file("my-idea", "02-prd");
        match wf.next().unwrap() {
            NextOutcome::Waiting { step, staging: s, expected } => {
                assert_eq!(step, "02-prd");
                assert_eq!(s, staging);
                assert_eq!(expected, wf.step_file("my-idea", "02-prd"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let merged = fs::read_to_string(&staging).unwrap();
        assert!(merged.starts_with("PRD from:\n# My Idea"));
        assert_eq!(wf.locks().read().unwrap().current, "01-idea");

        // Waiting again is idempotent
        assert!(matches!(wf.next().unwrap(), NextOutcome::Waiting { .. }));
        assert_eq!(wf.locks().read().unwrap().current, "01-idea");

        fs::write(wf.step_file("my-idea", "02-prd"), "# PRD").unwrap();
        match wf.next().unwrap() {
            NextOutcome::Advanced { step, .. } => assert_eq!(step, "02-prd"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(wf.locks().read().unwrap().current, "02-prd");
        assert!(!staging.exists());
    }

    #[test]
    fn test_next_keeps_created_timestamp() {
        let (_temp, wf) = project();
        let created = wf.start("My Idea").unwrap();
        fs::write(wf.step_file("my-idea", "02-prd"), "# PRD").unwrap();

        wf.next().unwrap();
        assert_eq!(wf.locks().read().unwrap().created, created.lock.created);
    }

    #[test]
    fn test_next_at_last_step_reports_complete() {
        let (_temp, wf) = project();
        wf.locks().write(&Lock::new("my-idea", "03-architecture")).unwrap();
        fs::create_dir_all(wf.workdir("my-idea")).unwrap();

        assert_eq!(wf.next().unwrap(), NextOutcome::Complete);
        let staged = fs::read_dir(wf.workdir("my-idea")).unwrap().count();
        assert_eq!(staged, 0);
    }

    #[test]
    fn test_next_requires_previous_output() {
        let (_temp, wf) = project();
        wf.start("My Idea").unwrap();
        fs::remove_file(wf.step_file("my-idea", "01-idea")).unwrap();

        let err = wf.next().unwrap_err();
        assert!(matches!(err, WorkflowError::MissingPreviousOutput { .. }));
    }

    #[test]
    fn test_next_requires_prompt_template() {
        let (_temp, wf) = project();
        wf.start("My Idea").unwrap();
        fs::remove_file(wf.prompt_template("02-prd")).unwrap();

        let err = wf.next().unwrap_err();
        assert!(matches!(err, WorkflowError::MissingPromptTemplate { .. }));
        assert!(!wf.staging_file("my-idea", "02-prd").exists());
    }

    #[test]
    fn test_unknown_current_step() {
        let (_temp, wf) = project();
        wf.locks().write(&Lock::new("my-idea", "99-gone")).unwrap();

        assert!(matches!(wf.next().unwrap_err(), WorkflowError::StepNotFound { .. }));
        assert!(matches!(wf.status().unwrap_err(), WorkflowError::StepNotFound { .. }));
    }

    #[test]
    fn test_status() {
        let (_temp, wf) = project();
        assert_eq!(wf.status().unwrap(), None);

        wf.start("My Idea").unwrap();
        let progress = wf.status().unwrap().unwrap();
        assert_eq!(progress.slug, "my-idea");
        assert_eq!(progress.index, 0);
        assert_eq!(progress.total(), 3);
    }

    #[test]
    fn test_done_requires_last_step() {
        let (_temp, wf) = project();
        wf.start("My Idea").unwrap();

        let err = wf.done().unwrap_err();
        assert!(matches!(err, WorkflowError::IncompleteWorkstream { .. }));
        assert!(wf.workdir("my-idea").exists());
        assert!(wf.locks().read().is_some());
    }

    #[test]
    fn test_done_lists_missing_files() {
        let (_temp, wf) = project();
        wf.start("My Idea").unwrap();
        fs::write(wf.step_file("my-idea", "03-architecture"), "# Arch").unwrap();
        let lock = Lock::new("my-idea", "03-architecture");
        wf.locks().write(&lock).unwrap();

        match wf.done().unwrap_err() {
            WorkflowError::MissingFiles(missing) => assert_eq!(missing, vec!["02-prd"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(wf.workdir("my-idea").exists());
        assert_eq!(wf.locks().read(), Some(lock));
    }

    #[test]
    fn test_done_archives_and_clears_lock() {
        let (_temp, wf) = project();
        wf.start("My Idea").unwrap();
        fs::write(wf.step_file("my-idea", "02-prd"), "# PRD").unwrap();
        fs::write(wf.step_file("my-idea", "03-architecture"), "# Arch").unwrap();
        wf.locks().write(&Lock::new("my-idea", "03-architecture")).unwrap();

        let archived = wf.done().unwrap();
        assert_eq!(archived, wf.archive_dir("my-idea"));
        assert!(archived.join("02-prd-my-idea.md").exists());
        assert!(!wf.workdir("my-idea").exists());
        assert_eq!(wf.locks().read(), None);
    }

    #[test]
    fn test_done_restores_workstream_when_lock_cannot_be_cleared() {
        let temp = tempdir().unwrap();
        let wf = Workflow::new(temp.path(), Config::parse("steps = [\"01-idea\"]").unwrap());
        let created = wf.start("Solo").unwrap();
        fs::create_dir(temp.path().join(".aisdlc.lock.tmp")).unwrap();

        assert!(matches!(wf.done().unwrap_err(), WorkflowError::Io { .. }));
        assert!(wf.workdir("solo").join("01-idea-solo.md").is_file());
        assert!(!wf.archive_dir("solo").exists());
        assert_eq!(wf.locks().read(), Some(created.lock));

        // Once the blocker is gone the archive goes through
        fs::remove_dir(temp.path().join(".aisdlc.lock.tmp")).unwrap();
        assert_eq!(wf.done().unwrap(), wf.archive_dir("solo"));
        assert_eq!(wf.locks().read(), None);
    }

    #[test]
    fn test_done_refuses_existing_archive() {
        let (_temp, wf) = project();
        wf.start("My Idea").unwrap();
        fs::write(wf.step_file("my-idea", "02-prd"), "# PRD").unwrap();
        fs::write(wf.step_file("my-idea", "03-architecture"), "# Arch").unwrap();
        let lock = Lock::new("my-idea", "03-architecture");
        wf.locks().write(&lock).unwrap();
        fs::create_dir_all(wf.archive_dir("my-idea")).unwrap();

        assert!(matches!(wf.done().unwrap_err(), WorkflowError::ArchiveIo { .. }));
        assert!(wf.workdir("my-idea").exists());
        assert_eq!(wf.locks().read(), Some(lock));
    }
}
