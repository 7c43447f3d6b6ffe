use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};

/// Opt-in flag that asks for CI-friendly software adapters.
pub const CI_RENDERER_FLAG: &str = "WEBGPU_USE_CI_AVAILABLE_RENDERER";

/// When enabled, GPU tests fail instead of skipping if no adapter can be found.
pub const REQUIRE_GPU_FLAG: &str = "GPUCHECK_REQUIRE_GPU";

/// Read-only snapshot of environment variables.
///
/// Selection logic receives this value explicitly instead of reading the
/// process environment, so it stays a pure function of its inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    /// An environment with no variables set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Captures the current process environment, non-UTF-8 entries included.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { vars }
    }

    /// Value of `key`, or `None` when unset or not valid UTF-8.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_os(key)?.to_str()
    }

    pub fn get_os(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// True when `key` is present with a non-empty value.
    ///
    /// Any non-empty value counts, including "0", "false" and values that are
    /// not valid UTF-8.
    pub fn is_set(&self, key: &str) -> bool {
        self.get_os(key).is_some_and(|v| !v.is_empty())
    }

    /// True when `key` holds one of `1`, `true`, `yes`, `on` (case-insensitive).
    pub fn is_enabled(&self, key: &str) -> bool {
        let Some(raw) = self.get(key) else {
            return false;
        };

        let v = raw.trim();
        v == "1"
            || v.eq_ignore_ascii_case("true")
            || v.eq_ignore_ascii_case("yes")
            || v.eq_ignore_ascii_case("on")
    }

    /// Whether CI-friendly software adapter hints were requested.
    pub fn prefers_ci_renderer(&self) -> bool {
        self.is_set(CI_RENDERER_FLAG)
    }

    /// Whether GPU-dependent checks must run rather than skip.
    pub fn requires_gpu(&self) -> bool {
        self.is_enabled(REQUIRE_GPU_FLAG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_nothing_set() {
        let env = Environment::empty();
        assert!(!env.is_set(CI_RENDERER_FLAG));
        assert!(!env.prefers_ci_renderer());
        assert_eq!(env.get("PATH"), None);
    }

    #[test]
    fn any_non_empty_value_is_set() {
        for value in ["1", "true", "0", "false", "anything"] {
            let env = Environment::from_pairs([(CI_RENDERER_FLAG, value)]);
            assert!(env.prefers_ci_renderer(), "value {value:?} should count as set");
        }
    }

    #[test]
    fn empty_value_is_not_set() {
        let env = Environment::from_pairs([(CI_RENDERER_FLAG, "")]);
        assert!(!env.prefers_ci_renderer());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_value_still_counts_as_set() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![0x66, 0xff, 0x6f]);
        let env = Environment::from_pairs([(OsString::from(CI_RENDERER_FLAG), raw)]);
        assert!(env.prefers_ci_renderer());
        assert_eq!(env.get(CI_RENDERER_FLAG), None);
        assert!(env.get_os(CI_RENDERER_FLAG).is_some());
    }

    #[test]
    fn enabled_accepts_boolean_words_only() {
        for value in ["1", "true", "TRUE", "yes", "On", " 1 "] {
            let env = Environment::from_pairs([(REQUIRE_GPU_FLAG, value)]);
            assert!(env.requires_gpu(), "value {value:?} should enable");
        }
        for value in ["", "0", "false", "off", "maybe"] {
            let env = Environment::from_pairs([(REQUIRE_GPU_FLAG, value)]);
            assert!(!env.requires_gpu(), "value {value:?} should not enable");
        }
    }

    #[test]
    fn later_pairs_override_earlier_ones() {
        let env = Environment::from_pairs([("K", "a"), ("K", "b")]);
        assert_eq!(env.get("K"), Some("b"));
    }
}
