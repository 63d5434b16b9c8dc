//! Configuration for text rendering

/// What to emit for a placeholder whose label has no binding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Leave the `{{label}}` marker in the output
    #[default]
    Keep,
    /// Replace the marker with nothing
    Blank,
}

/// Configuration options for text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Handling of unbound placeholders
    pub missing: MissingPolicy,

    /// Whether to end non-empty output with a newline
    pub trailing_newline: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            missing: MissingPolicy::Keep,
            trailing_newline: false,
        }
    }
}

impl TextConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for unbound placeholders
    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    /// Set whether output ends with a newline
    pub fn with_trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }
}
