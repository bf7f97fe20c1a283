//! The diagnostic analytics pipeline: mistake classification, pacing and
//! stamina analysis, per-section and per-subskill breakdowns, pattern
//! detection, and action-plan synthesis.

pub mod action_plan;
pub mod mistake;
pub mod pacing;
pub mod patterns;
pub mod report;
pub mod section;
pub mod subskill;

#[cfg(test)]
pub(crate) mod testutil;

pub use report::{DiagnosticReport, generate_report};
