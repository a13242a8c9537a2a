//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the preference store and the HTTP report submitter.

pub mod preferences;
pub mod submission;
