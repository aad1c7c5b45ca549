//! TOML-based engine configuration.
//!
//! Stores the tunables the caller owns:
//! - Lookback windows for each analyzer
//! - The age-aware overdue threshold policy
//! - The UTC offset used for local hour-of-day calculations
//!
//! Configuration is stored at `~/.config/lullaby/config.toml`.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::patterns::lookback;
use crate::prediction::AgeAwareThreshold;

/// Longest lookback window accepted, in days.
const MAX_LOOKBACK_DAYS: i64 = 366;

/// Lookback windows in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookbackConfig {
    #[serde(default = "default_time_of_day_days")]
    pub wake_time_days: i64,
    #[serde(default = "default_time_of_day_days")]
    pub bedtime_days: i64,
    #[serde(default = "default_wake_window_days")]
    pub wake_window_days: i64,
    #[serde(default = "default_quality_days")]
    pub quality_days: i64,
}

/// Overdue thresholds in minutes, stepped by age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueConfig {
    /// Up to 90 days old
    #[serde(default = "default_newborn_minutes")]
    pub newborn_minutes: f64,
    /// Up to one year old
    #[serde(default = "default_infant_minutes")]
    pub infant_minutes: f64,
    #[serde(default = "default_toddler_minutes")]
    pub toddler_minutes: f64,
    #[serde(default = "default_unknown_age_minutes")]
    pub unknown_age_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Local UTC offset, e.g. `+02:00`
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/lullaby/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub lookback: LookbackConfig,
    #[serde(default)]
    pub overdue: OverdueConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

// Default functions
fn default_time_of_day_days() -> i64 {
    lookback::TIME_OF_DAY
}
fn default_wake_window_days() -> i64 {
    lookback::WAKE_WINDOW
}
fn default_quality_days() -> i64 {
    lookback::QUALITY
}
fn default_newborn_minutes() -> f64 {
    AgeAwareThreshold::default().newborn_minutes
}
fn default_infant_minutes() -> f64 {
    AgeAwareThreshold::default().infant_minutes
}
fn default_toddler_minutes() -> f64 {
    AgeAwareThreshold::default().toddler_minutes
}
fn default_unknown_age_minutes() -> f64 {
    AgeAwareThreshold::default().unknown_age_minutes
}
fn default_utc_offset() -> String {
    "+00:00".into()
}

impl Default for LookbackConfig {
    fn default() -> Self {
        Self {
            wake_time_days: default_time_of_day_days(),
            bedtime_days: default_time_of_day_days(),
            wake_window_days: default_wake_window_days(),
            quality_days: default_quality_days(),
        }
    }
}

impl Default for OverdueConfig {
    fn default() -> Self {
        Self {
            newborn_minutes: default_newborn_minutes(),
            infant_minutes: default_infant_minutes(),
            toddler_minutes: default_toddler_minutes(),
            unknown_age_minutes: default_unknown_age_minutes(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset: default_utc_offset(),
        }
    }
}

impl OverdueConfig {
    pub fn policy(&self) -> AgeAwareThreshold {
        AgeAwareThreshold {
            newborn_minutes: self.newborn_minutes,
            infant_minutes: self.infant_minutes,
            toddler_minutes: self.toddler_minutes,
            unknown_age_minutes: self.unknown_age_minutes,
        }
    }
}

/// Returns `~/.config/lullaby[-dev]/` based on LULLABY_ENV.
///
/// Set LULLABY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("LULLABY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("lullaby-dev")
    } else {
        base_dir.join("lullaby")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::NoDataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Parse `Z`, `+HH:MM`, `-HH:MM` or `+HHMM` into a fixed offset.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "display.utc_offset".to_string(),
        message: format!("'{value}' is not an offset like +02:00"),
    };

    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = if let Some(rest) = trimmed.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(invalid());
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

impl EngineConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) => return Err(invalid("key names a section".into())),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing the defaults when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: EngineConfig = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and validate the result.
    ///
    /// The change is not persisted; call [`EngineConfig::save`] afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: EngineConfig = serde_json::from_value(json).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Reject values the analyzers cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lookbacks = [
            ("lookback.wake_time_days", self.lookback.wake_time_days),
            ("lookback.bedtime_days", self.lookback.bedtime_days),
            ("lookback.wake_window_days", self.lookback.wake_window_days),
            ("lookback.quality_days", self.lookback.quality_days),
        ];
        for (key, days) in lookbacks {
            if !(1..=MAX_LOOKBACK_DAYS).contains(&days) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be between 1 and {MAX_LOOKBACK_DAYS} days, got {days}"),
                });
            }
        }

        let thresholds = [
            ("overdue.newborn_minutes", self.overdue.newborn_minutes),
            ("overdue.infant_minutes", self.overdue.infant_minutes),
            ("overdue.toddler_minutes", self.overdue.toddler_minutes),
            ("overdue.unknown_age_minutes", self.overdue.unknown_age_minutes),
        ];
        for (key, minutes) in thresholds {
            if !minutes.is_finite() || minutes < 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be a non-negative number of minutes, got {minutes}"),
                });
            }
        }

        self.offset().map(|_| ())
    }

    /// The configured local offset.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        parse_utc_offset(&self.display.utc_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.lookback.wake_window_days, 7);
        assert_eq!(parsed.overdue.newborn_minutes, 15.0);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: EngineConfig = toml::from_str("[lookback]\nquality_days = 30\n").unwrap();
        assert_eq!(parsed.lookback.quality_days, 30);
        assert_eq!(parsed.lookback.bedtime_days, 14);
        assert_eq!(parsed.display.utc_offset, "+00:00");
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.get("lookback.quality_days").as_deref(), Some("14"));
        assert_eq!(cfg.get("display.utc_offset").as_deref(), Some("+00:00"));
        assert_eq!(cfg.get("missing.key"), None);
    }

    #[test]
    fn set_updates_and_validates() {
        let mut cfg = EngineConfig::default();
        cfg.set("overdue.infant_minutes", "25").unwrap();
        assert_eq!(cfg.overdue.infant_minutes, 25.0);

        cfg.set("display.utc_offset", "-05:00").unwrap();
        assert_eq!(cfg.offset().unwrap().local_minus_utc(), -5 * 3600);

        assert!(cfg.set("lookback.quality_days", "0").is_err());
        assert_eq!(cfg.lookback.quality_days, 14);
        assert!(matches!(cfg.set("nope", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(cfg.set("display.utc_offset", "noon").is_err());
    }

    #[test]
    fn offset_parsing() {
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("+0530").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_utc_offset("-08:00").unwrap().local_minus_utc(), -28800);
        assert!(parse_utc_offset("+25:00").is_err());
        assert!(parse_utc_offset("08:00").is_err());
        assert!(parse_utc_offset("+08:75").is_err());
    }

    #[test]
    fn overdue_policy_from_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.overdue.policy(), AgeAwareThreshold::default());
    }
}
