//! Startup configuration.
//!
//! Resolved once when the process starts, then passed explicitly into the
//! engine and store. Nothing below the binary reads environment variables.

use std::path::{Path, PathBuf};

use crate::errors::{Result, RiskWatchError};
use crate::logging_facility::Profile;

/// Database file used when neither a flag nor the environment names one
pub const DEFAULT_DB_PATH: &str = "riskwatch.db";

/// Configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiskWatchConfig {
    db_path: PathBuf,
    log_profile: Profile,
}

impl RiskWatchConfig {
    /// Create a new `RiskWatchConfig`.
    ///
    /// # Errors
    ///
    /// `InvalidFieldValue` for an empty database path.
    pub fn new(db_path: PathBuf, log_profile: Profile) -> Result<Self> {
        if db_path.as_os_str().is_empty() {
            return Err(RiskWatchError::InvalidFieldValue {
                field: "db_path".to_string(),
                reason: "database path cannot be empty".to_string(),
            });
        }
        Ok(Self {
            db_path,
            log_profile,
        })
    }

    /// Build from optional raw values, falling back to defaults for missing or blank ones
    ///
    /// # Errors
    ///
    /// `InvalidFieldValue` for an unknown log profile name.
    pub fn resolve(db_path: Option<PathBuf>, log_profile: Option<&str>) -> Result<Self> {
        let db_path = db_path
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
        let log_profile = match log_profile.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name
                .parse::<Profile>()
                .map_err(|reason| RiskWatchError::InvalidFieldValue {
                    field: "log_profile".to_string(),
                    reason,
                })?,
            None => Profile::default(),
        };
        Self::new(db_path, log_profile)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn log_profile(&self) -> Profile {
        self.log_profile
    }
}

impl Default for RiskWatchConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_profile: Profile::default(),
        }
    }
}
