//! Runtime configuration.
//!
//! [`Config`] comes from the environment (after `.env` is loaded by the
//! binary). [`Settings`] are the user's persisted preferences and live in the
//! snapshot store next to the results, stored as a plain JSON object:
//! ```json
//! { "obfuscate": true }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::obfuscate::DEFAULT_KEY;

pub const DEFAULT_STORE_DIR: &str = ".cgpa_store";

/// Path fragment that identifies the published results page.
pub const RESULTS_PAGE_MARKER: &str = "result_published.php";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_dir: PathBuf,
    pub obfuscation_key: String,
    /// Sent as the `Cookie` header when fetching the results page over HTTP.
    pub session_cookie: Option<String>,
}

impl Config {
    /// Reads `CGPA_STORE_DIR`, `CGPA_OBFUSCATION_KEY` and `CGPA_SESSION_COOKIE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            store_dir: non_empty("CGPA_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR)),
            obfuscation_key: non_empty("CGPA_OBFUSCATION_KEY")
                .unwrap_or_else(|| DEFAULT_KEY.to_string()),
            session_cookie: non_empty("CGPA_SESSION_COOKIE"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Store the snapshot obfuscated rather than as plain JSON.
    pub obfuscate: bool,
}
