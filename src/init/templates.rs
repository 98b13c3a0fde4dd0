//! Scaffold templates written by `aisdlc init`.

/// Lifecycle steps of a freshly initialized project.
pub const DEFAULT_STEPS: [&str; 8] = [
    "01-idea",
    "02-prd",
    "03-prd-plus",
    "04-architecture",
    "05-system-patterns",
    "06-tasks",
    "07-tasks-plus",
    "08-tests",
];

/// Generate the `.aisdlc` configuration file.
pub fn generate_config() -> String {
    let steps =
        DEFAULT_STEPS.iter().map(|s| format!("    \"{s}\",")).collect::<Vec<_>>().join("\n");
    format!(
        r#"# AI-SDLC Configuration
# Auto-generated configuration file

version = "{version}"

steps = [
{steps}
]

active_dir = "doing"
done_dir = "done"
prompt_dir = "prompts"
"#,
        version = env!("CARGO_PKG_VERSION"),
    )
}

/// Prompt templates keyed by the step they produce.
///
/// The first step is written by hand, so it has no template.
pub fn prompt_templates() -> Vec<(&'static str, &'static str)> {
    vec![
        ("02-prd", PRD_TEMPLATE),
        ("03-prd-plus", PRD_PLUS_TEMPLATE),
        ("04-architecture", ARCHITECTURE_TEMPLATE),
        ("05-system-patterns", SYSTEM_PATTERNS_TEMPLATE),
        ("06-tasks", TASKS_TEMPLATE),
        ("07-tasks-plus", TASKS_PLUS_TEMPLATE),
        ("08-tests", TESTS_TEMPLATE),
    ]
}

const PRD_TEMPLATE: &str = r#"# Product Requirements Document

You are a senior product manager. Turn the idea below into a PRD with:

- Problem statement and target users
- Goals and non-goals
- User stories with acceptance criteria
- Success metrics
- Open questions

## Idea

<prev_step></prev_step>
"#;

const PRD_PLUS_TEMPLATE: &str = r#"# PRD Review

Critically review the PRD below. Identify gaps, contradictions, risky
assumptions and missing edge cases, then produce an improved PRD that
resolves them.

## PRD

<prev_step></prev_step>
"#;

const ARCHITECTURE_TEMPLATE: &str = r#"# Architecture

You are a staff engineer. Design the architecture for the requirements
below. Cover components and their responsibilities, data model, external
interfaces, failure handling and the main trade-offs considered.

## Requirements

<prev_step></prev_step>
"#;

const SYSTEM_PATTERNS_TEMPLATE: &str = r#"# System Patterns

From the architecture below, document the conventions the implementation
must follow: module layout, naming, error handling, logging, configuration
and testing patterns.

## Architecture

<prev_step></prev_step>
"#;

const TASKS_TEMPLATE: &str = r#"# Implementation Tasks

Break the design below into small, ordered implementation tasks. Each task
needs a title, a short description, the files it touches and a definition
of done.

## Design

<prev_step></prev_step>
"#;

const TASKS_PLUS_TEMPLATE: &str = r#"# Task Review

Review the task list below. Split tasks that are too large, add missing
ones, fix ordering problems and flag tasks that depend on open questions.

## Tasks

<prev_step></prev_step>
"#;

const TESTS_TEMPLATE: &str = r#"# Test Plan

Write a test plan for the tasks below: unit tests per component,
integration tests for each user story and the edge cases that must be
covered before release.

## Tasks

<prev_step></prev_step>
"#;
