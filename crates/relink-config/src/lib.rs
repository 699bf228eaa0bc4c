mod config;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use relink_core::{RelinkError, RelinkResult, validate_url};
use tracing::debug;

pub use config::{ApiConfig, DEFAULT_BASE_URL, OutputConfig, RelinkConfig, Route};

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &["api.base_url", "api.route", "output.simple", "output.copy"];

pub fn config_path() -> RelinkResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| RelinkError::Config("home directory not found".to_string()))?;
    Ok(home.join(".relink").join("config.toml"))
}

pub fn load_config() -> RelinkResult<RelinkConfig> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> RelinkResult<RelinkConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(RelinkConfig::default());
    }
    let content = fs::read_to_string(path)
        .map_err(|err| RelinkError::Config(format!("failed to read config: {err}")))?;
    let config = toml::from_str(&content)
        .map_err(|err| RelinkError::Config(format!("failed to parse config: {err}")))?;
    Ok(config)
}

pub fn save_config(config: &RelinkConfig) -> RelinkResult<()> {
    save_config_to(&config_path()?, config)
}

pub fn save_config_to(path: &Path, config: &RelinkConfig) -> RelinkResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| RelinkError::Config(format!("failed to create config dir: {err}")))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|err| RelinkError::Config(format!("failed to serialize config: {err}")))?;
    fs::write(path, content)
        .map_err(|err| RelinkError::Config(format!("failed to write config: {err}")))?;
    Ok(())
}

pub fn resolve_base_url(config: &RelinkConfig) -> RelinkResult<String> {
    let base = non_blank_env("RELINK_BASE_URL")
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    validate_url(&base)
        .map_err(|err| RelinkError::Config(format!("bad base url '{base}': {err}")))?;
    Ok(base.trim_end_matches('/').to_string())
}

pub fn resolve_route(config: &RelinkConfig) -> RelinkResult<Route> {
    match non_blank_env("RELINK_ROUTE") {
        Some(value) => value.parse(),
        None => Ok(config.api.route.unwrap_or_default()),
    }
}

pub fn resolve_simple_output(config: &RelinkConfig) -> bool {
    env_flag("RELINK_OUTPUT_SIMPLE")
        .or(config.output.simple)
        .unwrap_or(false)
}

pub fn resolve_copy_output(config: &RelinkConfig) -> bool {
    env_flag("RELINK_OUTPUT_COPY")
        .or(config.output.copy)
        .unwrap_or(false)
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn env_flag(name: &str) -> Option<bool> {
    non_blank_env(name).map(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    normalized == "1" || normalized == "true" || normalized == "yes"
}

pub fn get_config_value(config: &RelinkConfig, key_path: &str) -> Option<String> {
    let parts: Vec<&str> = key_path.split('.').collect();

    match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url.clone(),
        ["api", "route"] => config.api.route.map(|route| route.to_string()),
        ["output", "simple"] => config.output.simple.map(|b| b.to_string()),
        ["output", "copy"] => config.output.copy.map(|b| b.to_string()),
        _ => None,
    }
}

pub fn set_config_value(key_path: &str, value: &str) -> RelinkResult<()> {
    set_config_value_at(&config_path()?, key_path, value)
}

/// Edits one key in place, keeping the rest of the file (comments included).
pub fn set_config_value_at(path: &Path, key_path: &str, value: &str) -> RelinkResult<()> {
    if !CONFIG_KEYS.contains(&key_path) {
        return Err(RelinkError::Config(format!(
            "unknown key '{key_path}' (expected one of: {})",
            CONFIG_KEYS.join(", ")
        )));
    }

    let item = match key_path {
        "api.base_url" => {
            validate_url(value)?;
            toml_edit::value(value)
        }
        "api.route" => toml_edit::value(value.parse::<Route>()?.to_string()),
        _ => toml_edit::value(parse_flag(value)),
    };

    let content = if path.exists() {
        fs::read_to_string(path)
            .map_err(|err| RelinkError::Config(format!("failed to read config: {err}")))?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|err| RelinkError::Config(format!("failed to parse config: {err}")))?;

    let Some((section, key)) = key_path.split_once('.') else {
        return Err(RelinkError::Config(format!("malformed key '{key_path}'")));
    };

    let table = doc
        .as_table_mut()
        .entry(section)
        .or_insert(toml_edit::Item::Table(Default::default()))
        .as_table_mut()
        .ok_or_else(|| RelinkError::Config(format!("cannot set nested value in '{key_path}'")))?;
    table[key] = item;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| RelinkError::Config(format!("failed to create config dir: {err}")))?;
    }
    fs::write(path, doc.to_string())
        .map_err(|err| RelinkError::Config(format!("failed to write config: {err}")))?;

    Ok(())
}

pub fn open_in_editor() -> RelinkResult<()> {
    let path = config_path()?;
    if !path.exists() {
        save_config(&RelinkConfig::default())?;
    }

    let editor = env::var("EDITOR").unwrap_or_else(|_| {
        if cfg!(target_os = "windows") {
            "notepad".to_string()
        } else {
            "vi".to_string()
        }
    });

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .map_err(|err| RelinkError::Config(format!("failed to open editor '{editor}': {err}")))?;

    if !status.success() {
        return Err(RelinkError::Config(format!(
            "editor exited with status: {status}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.api.base_url.is_none());
        assert_eq!(config.api.route.unwrap_or_default(), Route::Link);
    }

    #[test]
    fn set_value_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        set_config_value_at(&path, "api.base_url", "http://localhost:9000").unwrap();
        set_config_value_at(&path, "api.route", "category").unwrap();
        set_config_value_at(&path, "output.simple", "yes").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(
            get_config_value(&config, "api.base_url").as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(config.api.route, Some(Route::Category));
        assert_eq!(config.output.simple, Some(true));
        assert_eq!(get_config_value(&config, "output.copy"), None);
    }

    #[test]
    fn set_value_keeps_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# local backend\n[api]\nroute = \"link\"\n").unwrap();

        set_config_value_at(&path, "output.copy", "true").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# local backend"));
        assert!(content.contains("copy = true"));
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(matches!(
            set_config_value_at(&path, "api.odesli_key", "x"),
            Err(RelinkError::Config(_))
        ));
        assert!(set_config_value_at(&path, "api.route", "isrc").is_err());
        assert!(set_config_value_at(&path, "api.base_url", "not-a-url").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn base_url_defaults_to_local_backend() {
        // Only meaningful when the override is not set in the test environment.
        if env::var("RELINK_BASE_URL").is_ok() {
            return;
        }
        let mut config = RelinkConfig::default();
        assert_eq!(resolve_base_url(&config).unwrap(), DEFAULT_BASE_URL);

        config.api.base_url = Some("http://10.0.0.2:8000/".to_string());
        assert_eq!(resolve_base_url(&config).unwrap(), "http://10.0.0.2:8000");

        config.api.base_url = Some("nope".to_string());
        assert!(matches!(
            resolve_base_url(&config),
            Err(RelinkError::Config(_))
        ));
    }

    #[test]
    fn parses_flags_loosely() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("no"));
        assert!(!parse_flag("0"));
    }
}
