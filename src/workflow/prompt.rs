//! Step file and prompt templates.

/// Marker in prompt templates replaced with the previous step's content.
pub const PLACEHOLDER: &str = "<prev_step></prev_step>";

/// Merge a prompt template with the previous step's output.
///
/// Every occurrence of [`PLACEHOLDER`] is replaced verbatim; nothing else in
/// the template is interpreted.
pub fn merge_prompt(template: &str, previous: &str) -> String {
    template.replace(PLACEHOLDER, previous)
}

/// Body of the first step's file for a new workstream.
pub fn first_step_document(title: &str) -> String {
    format!("# {title}\n\n## Problem\n\n## Solution\n\n## Rabbit Holes\n")
}
