//! installdesk configuration.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::reconcile::ReconciliationPolicy;

static DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const ENV_PREFIX: &str = "INSTALLDESK";

/// `INSTALLDESK_SAFETY_REFRESH_AFTER_MOVE=true` sets `safety_refresh_after_move`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_slot_min_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default()
}

fn default_slot_max_time() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default()
}

fn default_slot_duration_minutes() -> u32 {
    60
}

/// Configuration at ~/.config/installdesk/config.toml, overridable with
/// `INSTALLDESK_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default)]
    pub safety_refresh_after_move: bool,

    /// First row of the day grid.
    #[serde(default = "default_slot_min_time")]
    pub slot_min_time: NaiveTime,

    /// End of the day grid.
    #[serde(default = "default_slot_max_time")]
    pub slot_max_time: NaiveTime,

    #[serde(default = "default_slot_duration_minutes")]
    pub slot_duration_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            backend_url: default_backend_url(),
            safety_refresh_after_move: false,
            slot_min_time: default_slot_min_time(),
            slot_max_time: default_slot_max_time(),
            slot_duration_minutes: default_slot_duration_minutes(),
        }
    }
}

impl SchedulerConfig {
    pub fn config_path() -> ScheduleResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ScheduleError::Config("Could not determine config directory".into()))?
            .join("installdesk");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file first
    /// if none exists.
    pub fn load() -> ScheduleResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> ScheduleResult<Self> {
        Self::load_layered(path, environment())
    }

    /// `path` first, then `env` on top of it.
    fn load_layered(path: &Path, env: Environment) -> ScheduleResult<Self> {
        let config: SchedulerConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| ScheduleError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ScheduleError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScheduleResult<()> {
        if self.slot_min_time >= self.slot_max_time {
            return Err(ScheduleError::Config(format!(
                "slot_min_time ({}) must be before slot_max_time ({})",
                self.slot_min_time, self.slot_max_time
            )));
        }
        if self.slot_duration_minutes == 0 {
            return Err(ScheduleError::Config(
                "slot_duration_minutes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> ReconciliationPolicy {
        ReconciliationPolicy::new(self.safety_refresh_after_move)
    }

    pub fn save(&self, path: &Path) -> ScheduleResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ScheduleError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ScheduleError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ScheduleResult<()> {
        let contents = format!(
            "\
# installdesk configuration

# Appointment backend:
# backend_url = \"{DEFAULT_BACKEND_URL}\"

# Reload the calendar even after a move the backend accepted:
# safety_refresh_after_move = false

# Day grid:
# slot_min_time = \"08:00:00\"
# slot_max_time = \"18:00:00\"
# slot_duration_minutes = 60
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ScheduleError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ScheduleError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
