//! Settings for formbar-rs tools.
//!
//! [`Settings`] holds the runtime configuration used by the CLI and by
//! [`setup_logging`](crate::logging::setup_logging). Every field has a
//! default, so an empty settings file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The complete set of runtime settings.
///
/// # Examples
///
/// ```
/// use formbar_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Selects human-readable log output.
    pub debug: bool,

    // ── Documents ────────────────────────────────────────────────────

    /// Form documents checked by default when a command is given no file.
    pub documents: Vec<PathBuf>,

    // ── Output ───────────────────────────────────────────────────────

    /// Whether JSON output is pretty-printed.
    pub pretty_json: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "debug", "formbar_rs_config=trace").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            documents: Vec::new(),
            pretty_json: false,
            log_level: "info".to_string(),
        }
    }
}
