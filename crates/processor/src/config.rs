//! Processor configuration (environment-driven).

use std::num::NonZeroUsize;

use thiserror::Error;

/// Maximum number of undoable history entries. Unset means unbounded.
pub const HISTORY_LIMIT_ENV: &str = "CMDCORE_HISTORY_LIMIT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' (expected a positive integer)")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorConfig {
    pub history_limit: Option<NonZeroUsize>,
}

impl ProcessorConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let history_limit = match lookup(HISTORY_LIMIT_ENV) {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(raw.trim().parse::<NonZeroUsize>().map_err(|_| {
                ConfigError::Invalid {
                    key: HISTORY_LIMIT_ENV,
                    value: raw.clone(),
                }
            })?),
        };
        Ok(Self { history_limit })
    }

    /// Bound the history; `0` means unbounded.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = NonZeroUsize::new(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| {
            assert_eq!(key, HISTORY_LIMIT_ENV);
            value.map(str::to_string)
        }
    }

    #[test]
    fn unset_means_unbounded() {
        let config = ProcessorConfig::from_lookup(lookup(None)).unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }

    #[test]
    fn parses_positive_limit() {
        let config = ProcessorConfig::from_lookup(lookup(Some(" 25 "))).unwrap();
        assert_eq!(config.history_limit.map(NonZeroUsize::get), Some(25));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        for raw in ["0", "-3", "many"] {
            let err = ProcessorConfig::from_lookup(lookup(Some(raw))).unwrap_err();
            assert_eq!(
                err,
                ConfigError::Invalid {
                    key: HISTORY_LIMIT_ENV,
                    value: raw.to_string()
                }
            );
        }
    }

    #[test]
    fn zero_limit_in_code_means_unbounded() {
        assert_eq!(ProcessorConfig::default().with_history_limit(0).history_limit, None);
        assert!(ProcessorConfig::default().with_history_limit(3).history_limit.is_some());
    }
}
