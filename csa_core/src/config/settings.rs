//! Analysis settings consulted by the core
//!
//! This is the core-facing subset of the product's settings aggregate: the
//! severity groups a run has enabled, whether inconclusive values may be
//! reported, and the process-wide terminate flag. Settings are read-only
//! during analysis; one instance is shared by every pass of a checker run.

use crate::config::library::Library;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

/// Severity groups that can be enabled per run (`--enable=...` style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum EnabledGroup {
    Warning = 0x1,
    Style = 0x2,
    Performance = 0x4,
    Portability = 0x8,
    Information = 0x10,
    UnusedFunction = 0x20,
    MissingInclude = 0x40,
    Internal = 0x80,
}

/// Global terminate request, observed cooperatively by long scans
static TERMINATED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Bit mask of enabled [`EnabledGroup`]s
    enabled: u32,

    /// Report values and findings that the analysis could not prove
    pub inconclusive: bool,

    /// Emit debug output for value-flow decisions
    pub debug_warnings: bool,

    /// How many translation units are analyzed in parallel
    pub jobs: u32,

    /// Emit verbose renderings in dumps
    pub verbose: bool,

    /// Per-function argument validity oracle
    #[serde(skip)]
    pub library: Library,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: 0,
            inconclusive: env::var(env_vars::INCONCLUSIVE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            debug_warnings: false,
            jobs: env::var(env_vars::JOBS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            verbose: false,
            library: Library::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable severity groups by id: a single name, a comma-separated list,
    /// or `"all"`. Returns an error message for unknown ids.
    pub fn add_enabled(&mut self, ids: &str) -> Result<(), String> {
        for id in ids.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let group = match id {
                "all" => {
                    self.enabled |= EnabledGroup::Warning as u32
                        | EnabledGroup::Style as u32
                        | EnabledGroup::Performance as u32
                        | EnabledGroup::Portability as u32
                        | EnabledGroup::Information as u32
                        | EnabledGroup::UnusedFunction as u32
                        | EnabledGroup::MissingInclude as u32;
                    continue;
                }
                "warning" => EnabledGroup::Warning,
                "style" => EnabledGroup::Style,
                "performance" => EnabledGroup::Performance,
                "portability" => EnabledGroup::Portability,
                "information" => EnabledGroup::Information,
                "unusedFunction" => EnabledGroup::UnusedFunction,
                "missingInclude" => EnabledGroup::MissingInclude,
                "internal" => EnabledGroup::Internal,
                _ => return Err(format!("unrecognized group id: {}", id)),
            };
            self.enabled |= group as u32;
        }
        Ok(())
    }

    /// Disable every group (error-severity findings stay on)
    pub fn clear_enabled(&mut self) {
        self.enabled = 0;
    }

    pub fn is_enabled(&self, group: EnabledGroup) -> bool {
        (self.enabled & group as u32) == group as u32
    }

    /// Request termination of the current run
    pub fn terminate(value: bool) {
        TERMINATED.store(value, Ordering::Relaxed);
    }

    /// Termination requested?
    pub fn terminated() -> bool {
        TERMINATED.load(Ordering::Relaxed)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const INCONCLUSIVE: &str = "CSA_INCONCLUSIVE";
    pub const JOBS: &str = "CSA_JOBS";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_enabled_single_and_list() {
        let mut settings = Settings::new();
        assert!(!settings.is_enabled(EnabledGroup::Warning));

        settings.add_enabled("warning").unwrap();
        assert!(settings.is_enabled(EnabledGroup::Warning));
        assert!(!settings.is_enabled(EnabledGroup::Style));

        settings.add_enabled("style,performance").unwrap();
        assert!(settings.is_enabled(EnabledGroup::Style));
        assert!(settings.is_enabled(EnabledGroup::Performance));
    }

    #[test]
    fn test_add_enabled_all() {
        let mut settings = Settings::new();
        settings.add_enabled("all").unwrap();
        assert!(settings.is_enabled(EnabledGroup::Warning));
        assert!(settings.is_enabled(EnabledGroup::MissingInclude));
        assert!(!settings.is_enabled(EnabledGroup::Internal));
    }

    #[test]
    fn test_add_enabled_unknown_id() {
        let mut settings = Settings::new();
        assert!(settings.add_enabled("noSuchGroup").is_err());
    }

    #[test]
    fn test_clear_enabled() {
        let mut settings = Settings::new();
        settings.add_enabled("all").unwrap();
        settings.clear_enabled();
        assert!(!settings.is_enabled(EnabledGroup::Warning));
    }

    #[test]
    fn test_terminate_flag() {
        assert!(!Settings::terminated());
        Settings::terminate(true);
        assert!(Settings::terminated());
        Settings::terminate(false);
        assert!(!Settings::terminated());
    }
}
