use crate::core::gate::is_keypad_pin;
use crate::errors::{AppError, AppResult};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

pub const ENV_PIN_CODE: &str = "KICK_PIN_CODE";
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Fixed offset used for every local-date computation (Malaysia = +8).
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    #[serde(default)]
    pub pin_code: Option<String>,
    #[serde(default)]
    pub telegram_bot_token: Option<String>,
    /// Comma-separated list of chat ids, one dispatch per id.
    #[serde(default)]
    pub telegram_chat_ids: Option<String>,
    #[serde(default = "default_api_base")]
    pub telegram_api_base: String,
    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,
    #[serde(default = "default_lookback_days")]
    pub default_lookback_days: u32,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default = "default_report_title")]
    pub report_title: String,
}

fn default_utc_offset_hours() -> i32 {
    8
}
fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}
fn default_notify_timeout_secs() -> u64 {
    5
}
fn default_lookback_days() -> u32 {
    10
}
fn default_report_file() -> String {
    "ethan_kick_report.pdf".to_string()
}
fn default_report_title() -> String {
    "Ethan Kick Report".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            utc_offset_hours: default_utc_offset_hours(),
            pin_code: None,
            telegram_bot_token: None,
            telegram_chat_ids: None,
            telegram_api_base: default_api_base(),
            notify_timeout_secs: default_notify_timeout_secs(),
            default_lookback_days: default_lookback_days(),
            report_file: default_report_file(),
            report_title: default_report_title(),
        }
    }

    /// Return the standard configuration directory (`~/.rkickcounter`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rkickcounter")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rkickcounter.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rkickcounter.sqlite")
    }

    /// Load configuration from file (or defaults if not found), then apply
    /// secret overrides from the environment.
    pub fn load() -> AppResult<Self> {
        let mut cfg = Self::load_from(&Self::config_file())?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    /// Secrets are never required to live in the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Some(pin) = non_empty_env(ENV_PIN_CODE) {
            self.pin_code = Some(pin);
        }
        if let Some(token) = non_empty_env(ENV_BOT_TOKEN) {
            self.telegram_bot_token = Some(token);
        }
        if let Some(ids) = non_empty_env(ENV_CHAT_ID) {
            self.telegram_chat_ids = Some(ids);
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, yaml).map_err(|_| AppError::ConfigSave)
    }

    /// The fixed offset used to turn UTC instants into local calendar dates.
    pub fn timezone(&self) -> AppResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).ok_or_else(|| {
            AppError::Config(format!(
                "utc_offset_hours out of range: {}",
                self.utc_offset_hours
            ))
        })
    }

    /// Configured PIN; the gate cannot work without one, and a secret the
    /// keypad cannot type would lock everyone out.
    pub fn pin(&self) -> AppResult<&str> {
        let pin = self
            .pin_code
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                AppError::Config(format!(
                    "no PIN configured (set `pin_code` or {ENV_PIN_CODE})"
                ))
            })?;

        if !is_keypad_pin(pin) {
            return Err(AppError::Config("pin_code must be 1-4 digits".into()));
        }
        Ok(pin)
    }

    /// Recipient ids parsed from the comma-separated setting.
    pub fn chat_ids(&self) -> Vec<String> {
        split_recipients(self.telegram_chat_ids.as_deref().unwrap_or(""))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_name {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Self::with_database(db_path.clone());

        if !is_test {
            fs::create_dir_all(&dir)?;
            config.save_to(&Self::config_file())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(config)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            split_recipients(" 111, 222 ,,333 "),
            vec!["111", "222", "333"]
        );
        assert!(split_recipients("").is_empty());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/kicks.sqlite\n").unwrap();
        assert_eq!(cfg.utc_offset_hours, 8);
        assert_eq!(cfg.notify_timeout_secs, 5);
        assert_eq!(cfg.default_lookback_days, 10);
        assert_eq!(cfg.report_file, "ethan_kick_report.pdf");
        assert_eq!(cfg.report_title, "Ethan Kick Report");
        assert!(cfg.pin_code.is_none());
    }

    #[test]
    fn timezone_is_a_fixed_offset_in_hours() {
        let cfg = Config::with_database(PathBuf::from("x.sqlite"));
        assert_eq!(cfg.timezone().unwrap().local_minus_utc(), 8 * 3600);

        let bad = Config {
            utc_offset_hours: 30,
            ..cfg
        };
        assert!(matches!(bad.timezone(), Err(AppError::Config(_))));
    }

    #[test]
    fn empty_pin_is_treated_as_missing() {
        let cfg = Config {
            pin_code: Some(String::new()),
            ..Config::with_database(PathBuf::from("x.sqlite"))
        };
        assert!(cfg.pin().is_err());
    }

    #[test]
    fn pin_must_be_typeable_on_the_keypad() {
        let with_pin = |pin: &str| Config {
            pin_code: Some(pin.to_string()),
            ..Config::with_database(PathBuf::from("x.sqlite"))
        };

        assert_eq!(with_pin("1234").pin().unwrap(), "1234");
        for bad in ["12345", "abcd"] {
            let err = with_pin(bad).pin().unwrap_err();
            assert!(err.to_string().contains("pin_code must be 1-4 digits"));
        }
    }
}
