use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::encoding::BmiPolicy;

/// File name of the classifier artifact inside the models directory.
pub const DEFAULT_MODEL_FILE_NAME: &str = "obesity_risk_model.json";
/// Environment variable that overrides `model_url`.
pub const MODEL_URL_ENV: &str = "OBESITY_RISK_MODEL_URL";
/// Hosts the model may be downloaded from unless the config says otherwise.
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &[
    "github.com",
    "objects.githubusercontent.com",
    "raw.githubusercontent.com",
];

pub(super) const MIN_FETCH_TIMEOUT_SECS: u64 = 1;
pub(super) const MAX_FETCH_TIMEOUT_SECS: u64 = 120;

/// Settings persisted in `config.toml`.
///
/// Config keys (TOML): `model_path`, `model_url`, `model_sha256`, `allowed_hosts`,
/// `fetch_timeout_secs`, `bmi_policy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Local classifier artifact; defaults to the models directory.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// HTTPS location used when the local artifact is missing.
    #[serde(default)]
    pub model_url: Option<String>,
    /// Expected SHA-256 (hex) of the downloaded artifact.
    #[serde(default)]
    pub model_sha256: Option<String>,
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub bmi_policy: BmiPolicy,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            model_path: None,
            model_url: None,
            model_sha256: None,
            allowed_hosts: default_allowed_hosts(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            bmi_policy: BmiPolicy::default(),
        }
    }
}

impl AppSettings {
    pub(crate) fn normalized(mut self) -> Self {
        self.model_url = non_empty(self.model_url);
        self.model_sha256 = non_empty(self.model_sha256).map(|value| value.to_ascii_lowercase());
        self.fetch_timeout_secs = self
            .fetch_timeout_secs
            .clamp(MIN_FETCH_TIMEOUT_SECS, MAX_FETCH_TIMEOUT_SECS);
        let mut hosts: Vec<String> = Vec::with_capacity(self.allowed_hosts.len());
        for host in self.allowed_hosts {
            let host = host.trim().to_ascii_lowercase();
            if !host.is_empty() && !hosts.contains(&host) {
                hosts.push(host);
            }
        }
        self.allowed_hosts = hosts;
        self
    }

    /// Model URL, with the environment taking precedence over the file.
    pub fn effective_model_url(&self) -> Option<String> {
        non_empty(std::env::var(MODEL_URL_ENV).ok()).or_else(|| self.model_url.clone())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn default_allowed_hosts() -> Vec<String> {
    DEFAULT_ALLOWED_HOSTS
        .iter()
        .map(|host| host.to_string())
        .collect()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}
