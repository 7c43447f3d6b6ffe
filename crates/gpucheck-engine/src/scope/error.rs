use std::fmt;

/// The validation layer reported an error during a scoped unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device error: {}", self.message)
    }
}

impl std::error::Error for ValidationFailure {}

/// Computed or rendered data differs from what was expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub what: String,
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.what, self.expected, self.actual
        )
    }
}

impl std::error::Error for AssertionFailure {}

/// Fails with an [`AssertionFailure`] unless `actual == expected`.
pub fn ensure_eq<T>(what: &str, expected: &T, actual: &T) -> Result<(), AssertionFailure>
where
    T: PartialEq + fmt::Debug + ?Sized,
{
    if expected == actual {
        return Ok(());
    }

    Err(AssertionFailure {
        what: what.to_string(),
        expected: format!("{expected:?}"),
        actual: format!("{actual:?}"),
    })
}
