/// Result of one push/pop validation scope cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeOutcome {
    NoError,
    ValidationError { message: String },
}

impl ScopeOutcome {
    pub fn from_error(error: Option<wgpu::Error>) -> Self {
        match error {
            None => ScopeOutcome::NoError,
            Some(err) => ScopeOutcome::ValidationError {
                message: err.to_string(),
            },
        }
    }
}
