use std::fmt;

/// Failure to obtain an adapter from the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// No adapter satisfies every selection hint.
    ///
    /// `diagnostic` is the runtime's report, including the adapters it found.
    /// It is carried as-is and never parsed.
    NoAdapterFound { diagnostic: String },
}

impl SelectError {
    pub fn diagnostic(&self) -> &str {
        match self {
            SelectError::NoAdapterFound { diagnostic } => diagnostic,
        }
    }
}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectError::NoAdapterFound { diagnostic } => {
                write!(f, "no adapter found: {diagnostic}")
            }
        }
    }
}

impl std::error::Error for SelectError {}

/// A selection hint string that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintParseError {
    pub hint: String,
    pub reason: String,
}

impl HintParseError {
    pub(crate) fn new(hint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            hint: hint.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for HintParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid adapter hint {:?}: {}", self.hint, self.reason)
    }
}

impl std::error::Error for HintParseError {}
