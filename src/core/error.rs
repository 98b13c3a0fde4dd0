//! Error types for workflow operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that can occur while loading configuration or moving a workstream
/// through its steps.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The `.aisdlc` config file does not exist.
    #[error(
        "{} not found. Ensure you are in an ai-sdlc project directory \
         (run `aisdlc init` to create one)",
        .path.display()
    )]
    ConfigMissing { path: PathBuf },

    /// The config file exists but is not valid TOML.
    #[error("configuration file {} is corrupted: {source}", .path.display())]
    ConfigCorrupt {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config file parsed but lacks required content.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// The config file could not be read.
    #[error("could not read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An operation needs an active workstream but none is recorded.
    #[error("No active workstream. Run `aisdlc new` first.")]
    NoActiveWorkstream,

    /// A workstream is already in progress.
    #[error(
        "Workstream '{slug}' is still active. \
         Finish it with `aisdlc done` before starting another."
    )]
    WorkstreamActive { slug: String },

    /// A workstream directory with this slug already exists.
    #[error("Work-stream '{0}' already exists.")]
    WorkstreamExists(String),

    /// The title given to `new` was blank.
    #[error("A workstream needs a title: aisdlc new \"Idea title\"")]
    EmptyTitle,

    /// The lock refers to a step the config no longer lists.
    #[error(
        "Current step '{step}' not found in configuration steps. Available steps: {}",
        .available.join(", ")
    )]
    StepNotFound { step: String, available: Vec<String> },

    /// The current step's output is required to build the next prompt.
    #[error(
        "The previous step's output file {} is missing. \
         Restore it or regenerate the step before continuing.",
        .path.display()
    )]
    MissingPreviousOutput { path: PathBuf },

    /// No prompt template exists for the upcoming step.
    #[error(
        "Prompt template file {} is missing. \
         Restore it from version control or your initial `aisdlc init` setup.",
        .path.display()
    )]
    MissingPromptTemplate { path: PathBuf },

    /// Archiving was requested before the last step was reached.
    #[error(
        "Workstream not finished yet (at '{current}', last step is '{last}'). \
         Complete all steps before archiving."
    )]
    IncompleteWorkstream { current: String, last: String },

    /// Step output files are missing from the workstream directory.
    #[error("Missing files: {}", .0.join(", "))]
    MissingFiles(Vec<String>),

    /// Moving the workstream to the done area failed.
    #[error("Error archiving work-stream from {} to {}: {source}", .from.display(), .to.display())]
    ArchiveIo {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other file system failure.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The lock record could not be serialized.
    #[error("could not serialize lock: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl WorkflowError {
    /// Wrap an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Whether this error is ordinary workflow misuse rather than a fault.
    ///
    /// Recoverable errors are reported to the user and the command still
    /// exits successfully.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoActiveWorkstream
                | Self::WorkstreamActive { .. }
                | Self::WorkstreamExists(_)
                | Self::StepNotFound { .. }
                | Self::IncompleteWorkstream { .. }
                | Self::MissingFiles(_)
        )
    }
}
