use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SeshatError};

/// Immutable key/value settings for planners and the streaming step.
///
/// A `PlannerConfig` is built once, handed to a planner at construction,
/// and read-only thereafter, so many parallel planner invocations can
/// share one instance. List-valued settings are stored as comma-separated
/// strings, mirroring how the surrounding pipeline flattens its nested
/// configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    settings: HashMap<String, String>,
}

impl PlannerConfig {
    /// Builds a configuration from key/value pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            settings: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the raw string value for a key, if present.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Returns the string value for a key, failing if it is absent.
    pub fn require_string(&self, key: &str) -> Result<String> {
        self.get_string(key)
            .map(str::to_owned)
            .ok_or_else(|| missing(key))
    }

    /// Returns a comma-separated list value, if present. Entries are
    /// trimmed; empty entries are dropped.
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        self.get_string(key).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_owned)
                .collect()
        })
    }

    /// Returns a comma-separated list value, failing if the key is absent
    /// or the list is empty.
    pub fn require_string_list(&self, key: &str) -> Result<Vec<String>> {
        let list = self.get_string_list(key).ok_or_else(|| missing(key))?;
        if list.is_empty() {
            return Err(SeshatError::Config(format!(
                "configuration key '{key}' must name at least one field"
            )));
        }
        Ok(list)
    }

    /// Returns a boolean value, or the default when the key is absent.
    /// Anything other than "true" or "false" is a configuration error.
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get_string(key) {
            None => Ok(default),
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            Some(other) => Err(SeshatError::Config(format!(
                "configuration key '{key}' must be 'true' or 'false', got '{other}'"
            ))),
        }
    }

    /// Returns an integer value, failing if the key is absent or malformed.
    pub fn require_i64(&self, key: &str) -> Result<i64> {
        let raw = self.get_string(key).ok_or_else(|| missing(key))?;
        raw.parse::<i64>().map_err(|_| {
            SeshatError::Config(format!(
                "configuration key '{key}' must be an integer, got '{raw}'"
            ))
        })
    }

    /// Returns an integer value that must be strictly positive.
    pub fn require_positive_i64(&self, key: &str) -> Result<i64> {
        let value = self.require_i64(key)?;
        if value <= 0 {
            return Err(SeshatError::Config(format!(
                "configuration key '{key}' must be positive, got {value}"
            )));
        }
        Ok(value)
    }
}

fn missing(key: &str) -> SeshatError {
    SeshatError::Config(format!("required configuration key '{key}' is absent"))
}
