//! Progress rendering for the active workstream.

use std::fmt;

/// Position of a workstream in the step sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Workstream slug
    pub slug: String,
    /// Current step name
    pub current: String,
    /// Zero-based index of the current step
    pub index: usize,
    /// All configured steps, in order
    pub steps: Vec<String>,
}

impl Progress {
    /// Number of configured steps.
    pub fn total(&self) -> usize {
        self.steps.len()
    }

    /// Steps reached so far, counting the current one.
    pub fn completed(&self) -> usize {
        self.index + 1
    }

    /// Whether the workstream sits at the last step.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.steps.len()
    }

    /// Render steps as a bar, e.g. `✅idea ▸ ☐prd`.
    pub fn bar(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let mark = if i <= self.index { "✅" } else { "☐" };
                format!("{mark}{}", step_label(step))
            })
            .collect::<Vec<_>>()
            .join(" ▸ ")
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:20} {:12} {} ({}/{})",
            self.slug,
            self.current,
            self.bar(),
            self.completed(),
            self.total()
        )
    }
}

/// Display label of a step: the text after its numeric prefix.
///
/// `01-idea` becomes `idea`; a name without a dash loses its first two
/// characters.
pub fn step_label(step: &str) -> &str {
    match step.split_once('-') {
        Some((_, label)) => label,
        None => step.get(2..).unwrap_or(step),
    }
}
