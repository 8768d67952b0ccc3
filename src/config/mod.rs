//! TOML settings stored in the application root.

mod errors;
mod io;
mod settings;


pub use errors::ConfigError;
pub use io::{config_path, load_from, load_or_default, resolve_model_path, save_to_path};
pub use settings::{AppSettings, DEFAULT_ALLOWED_HOSTS, DEFAULT_MODEL_FILE_NAME, MODEL_URL_ENV};

use crate::app_dirs;

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
