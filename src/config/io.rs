use std::path::{Path, PathBuf};

use crate::{app_dirs, atomic_file::atomic_write};

use super::{
    AppSettings, CONFIG_FILE_NAME, ConfigError, DEFAULT_MODEL_FILE_NAME, map_app_dir_error,
};

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the application root, returning defaults if missing.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    load_from(&config_path()?)
}

/// Load configuration from a specific file; a missing file yields defaults.
pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: AppSettings = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(settings.normalized())
}

/// Write the settings as TOML, creating parent directories as needed.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, data.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Local classifier artifact path: the configured one or the models directory default.
pub fn resolve_model_path(settings: &AppSettings) -> Result<PathBuf, ConfigError> {
    match &settings.model_path {
        Some(path) => Ok(path.clone()),
        None => Ok(app_dirs::models_dir()
            .map_err(map_app_dir_error)?
            .join(DEFAULT_MODEL_FILE_NAME)),
    }
}
