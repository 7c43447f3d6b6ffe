use std::fmt;

/// Host operating system family.
///
/// Resolved once per process with [`Platform::current`]. It only parameterizes
/// adapter selection hints; nothing else in the crate branches on it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Platform {
    Mac,
    Windows,
    Linux,
    /// Any host outside the three families above (BSDs, wasm, ...).
    Other,
}

impl Platform {
    /// Returns the platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Mac => "mac",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Other => "other",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
