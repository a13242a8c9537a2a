use std::error::Error;

/// An exception or error the host wants to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionReport {
    pub name: String,
    pub reason: String,
    pub backtrace: Vec<String>,
}

impl ExceptionReport {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            backtrace: Vec::new(),
        }
    }

    pub fn with_backtrace<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.backtrace = frames.into_iter().map(Into::into).collect();
        self
    }

    /// Build from an error, folding its `source()` chain into the reason
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut reason = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            reason.push_str(&format!("\nCaused by: {}", cause));
            source = cause.source();
        }

        Self::new("Error", reason)
    }

    /// Text placed in the report window
    pub fn description(&self) -> String {
        let mut text = format!("{}: {}", self.name, self.reason);
        if !self.backtrace.is_empty() {
            text.push_str("\n\nBacktrace:\n");
            text.push_str(&self.backtrace.join("\n"));
        }
        text
    }
}

impl std::fmt::Display for ExceptionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}
