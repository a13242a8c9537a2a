use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Optional customization hooks, called synchronously while a report window is
/// being prepared. Every hook has a default, so implementors override only
/// what they need.
pub trait FeedbackReporterDelegate: Send + Sync {
    /// Extra key/value pairs merged into the report payload
    fn custom_parameters(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Scrub the preference snapshot before it is attached
    fn anonymize_preferences(&self, preferences: Map<String, Value>) -> Map<String, Value> {
        preferences
    }

    /// Replacement submission endpoint
    fn target_url(&self) -> Option<String> {
        None
    }

    /// Replacement application name for the window title
    fn display_name(&self) -> Option<String> {
        None
    }
}

/// Delegate that keeps every default
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultDelegate;

impl FeedbackReporterDelegate for DefaultDelegate {}
