use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::Path;

use crate::calendar::MAX_VISIBLE_EVENTS;
use crate::error::ErrorCode;
use crate::picker::date::DEFAULT_YEAR_SPAN;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub date_picker: DatePickerConfig,
}

/// An output mode that is not `pretty`, `text`, or `json`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output mode '{value}' from {origin} (expected pretty, text, or json)")]
pub struct UnknownOutputMode {
    pub origin: &'static str,
    pub value: String,
}

impl UnknownOutputMode {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidOutputMode
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Events a grid cell lists before summarizing the rest as a count.
    #[serde(default = "default_max_visible_events")]
    pub max_visible_events: usize,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            max_visible_events: default_max_visible_events(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePickerConfig {
    /// Years offered after the first selectable year.
    #[serde(default = "default_year_span")]
    pub year_span: u32,
}

impl Default for DatePickerConfig {
    fn default() -> Self {
        Self {
            year_span: default_year_span(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Load `<root>/.dashcal/config.toml`, or defaults when it does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".dashcal/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }
    load_toml(&path)
}

/// Load `<config_dir>/dashcal/config.toml`, or defaults when it does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("dashcal/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }
    load_toml(&path)
}

fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let parsed = toml::from_str::<T>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(parsed)
}

/// Merge project and user config with the `FORMAT` environment variable.
///
/// # Errors
///
/// Fails on unreadable or malformed config files, or an unknown output mode.
pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.as_deref(), env_format.as_deref())?;

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn resolve_output(
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
) -> Result<String> {
    fn normalize_output_mode(origin: &'static str, raw: &str) -> Result<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok("pretty"),
            "text" => Ok("text"),
            "json" => Ok("json"),
            other => Err(UnknownOutputMode {
                origin,
                value: other.to_string(),
            }
            .into()),
        }
    }

    if cli_json {
        return Ok("json".to_string());
    }

    if let Some(raw) = env_format {
        return normalize_output_mode("FORMAT", raw).map(str::to_string);
    }

    if let Some(raw) = user_output {
        return normalize_output_mode("user config", raw).map(str::to_string);
    }

    if std::io::stdout().is_terminal() {
        Ok("pretty".to_string())
    } else {
        Ok("text".to_string())
    }
}

const fn default_max_visible_events() -> usize {
    MAX_VISIBLE_EVENTS
}

const fn default_year_span() -> u32 {
    DEFAULT_YEAR_SPAN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_project_config(root: &Path, content: &str) {
        let dir = root.join(".dashcal");
        std::fs::create_dir_all(&dir).expect("create .dashcal");
        std::fs::write(dir.join("config.toml"), content).expect("write config");
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.calendar.max_visible_events, 3);
        assert_eq!(cfg.date_picker.year_span, 10);
    }

    #[test]
    fn partial_project_config_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("tempdir");
        write_project_config(root.path(), "[calendar]\nmax_visible_events = 5\n");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.calendar.max_visible_events, 5);
        assert_eq!(cfg.date_picker.year_span, 10);
    }

    #[test]
    fn malformed_project_config_names_the_file() {
        let root = tempfile::tempdir().expect("tempdir");
        write_project_config(root.path(), "[date_picker]\nyear_span = \"soon\"\n");
        let err = load_project_config(root.path()).expect_err("parse should fail");
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        let output = resolve_output(true, Some("pretty"), Some("text")).expect("resolve");
        assert_eq!(output, "json");
    }

    #[test]
    fn env_overrides_user_config() {
        let output = resolve_output(false, Some("pretty"), Some(" Text ")).expect("resolve");
        assert_eq!(output, "text");
        let output = resolve_output(false, Some("json"), None).expect("resolve");
        assert_eq!(output, "json");
    }

    #[test]
    fn unknown_output_mode_is_rejected() {
        let err = resolve_output(false, None, Some("yaml")).expect_err("should reject");
        assert!(err.to_string().contains("yaml"));
        let typed = err.downcast_ref::<UnknownOutputMode>().expect("typed error");
        assert_eq!(typed.origin, "FORMAT");
        assert_eq!(typed.error_code(), ErrorCode::InvalidOutputMode);
        assert!(resolve_output(false, Some("table"), None).is_err());
    }

    #[test]
    fn user_config_parses_output() {
        let cfg: UserConfig = toml::from_str("output = \"json\"\n").expect("parse");
        assert_eq!(cfg.output.as_deref(), Some("json"));
        let empty: UserConfig = toml::from_str("").expect("parse");
        assert_eq!(empty, UserConfig::default());
    }
}
