use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_fields};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, success, warning};
use std::path::Path;
use std::process::Command;

const MASK: &str = "****";

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the effective configuration. Secrets are masked.
    pub fn print(cfg: &Config) -> AppResult<()> {
        let yaml = serde_yaml::to_string(&Self::redacted(cfg))
            .map_err(|e| AppError::Config(e.to_string()))?;
        header("Current configuration");
        println!("{yaml}");
        Ok(())
    }

    fn redacted(cfg: &Config) -> Config {
        let mut out = cfg.clone();
        if out.pin_code.is_some() {
            out.pin_code = Some(MASK.to_string());
        }
        if out.telegram_bot_token.is_some() {
            out.telegram_bot_token = Some(MASK.to_string());
        }
        out
    }

    /// List the keys missing from the configuration file.
    pub fn check(path: &Path) -> AppResult<Vec<&'static str>> {
        if !path.exists() {
            warning(format!(
                "No configuration file at {} (run `rkickcounter init`)",
                path.display()
            ));
            return Ok(Vec::new());
        }

        let missing = missing_fields(path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(format!("Missing keys: {}", missing.join(", ")));
            info("Run `rkickcounter config --migrate` to add them with default values.");
        }
        Ok(missing)
    }

    pub fn migrate(path: &Path) -> AppResult<bool> {
        if !path.exists() {
            return Err(AppError::ConfigLoad);
        }
        migrate_config_file(path)
    }

    /// Open the file in the requested editor, falling back to $EDITOR / $VISUAL
    /// or the platform default when it cannot be started.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });
        let requested = editor.map(str::to_string).unwrap_or_else(|| default_editor.clone());

        if run_editor(&requested, path) {
            success(format!("Configuration file edited using '{requested}'"));
            return Ok(());
        }
        if requested == default_editor {
            return Err(AppError::Config(format!("editor '{requested}' failed")));
        }

        warning(format!(
            "Editor '{requested}' not available, falling back to '{default_editor}'"
        ));
        if run_editor(&default_editor, path) {
            success(format!(
                "Configuration file edited using fallback '{default_editor}'"
            ));
            Ok(())
        } else {
            Err(AppError::Config(format!(
                "failed to edit configuration file using '{default_editor}'"
            )))
        }
    }
}

fn run_editor(editor: &str, path: &Path) -> bool {
    matches!(Command::new(editor).arg(path).status(), Ok(s) if s.success())
}
