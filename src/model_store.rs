//! Classifier artifact loading: local file first, one remote fetch as fallback.
//!
//! The first successful (or failed) load is cached for the rest of the process
//! through [`ModelHandle`]; nothing reloads or invalidates it.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
    time::Duration,
};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{
    atomic_file::atomic_write,
    classifier::{Classifier, LinearRiskModel, SchemaMismatch, check_schema},
    config::{AppSettings, ConfigError, resolve_model_path},
    http_client,
};

const MAX_MODEL_BYTES: usize = 64 * 1024 * 1024;

/// Neither the local artifact nor the remote one could be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Classifier unavailable: {}", .reasons.join("; "))]
pub struct ClassifierUnavailable {
    /// One entry per attempted source.
    pub reasons: Vec<String>,
}

/// Why no usable classifier is available for this process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error(transparent)]
    Unavailable(#[from] ClassifierUnavailable),
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
}

/// Where the classifier artifact is looked up.
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub local_path: PathBuf,
    pub url: Option<String>,
    pub sha256: Option<String>,
    pub allowed_hosts: HashSet<String>,
    pub timeout: Duration,
}

impl ModelSource {
    /// Resolve paths, URL and limits from the app settings.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            local_path: resolve_model_path(settings)?,
            url: settings.effective_model_url(),
            sha256: settings.model_sha256.clone(),
            allowed_hosts: settings.allowed_hosts.iter().cloned().collect(),
            timeout: Duration::from_secs(settings.fetch_timeout_secs),
        })
    }
}

/// Load the classifier, trying the local artifact and then the remote one once.
///
/// A remote artifact that loads successfully is persisted to `local_path` so later
/// launches skip the network; failing to persist it only logs a warning.
pub fn load_classifier(source: &ModelSource) -> Result<LinearRiskModel, ClassifierUnavailable> {
    load_classifier_with(source, download_bytes)
}

fn load_classifier_with<D>(
    source: &ModelSource,
    download: D,
) -> Result<LinearRiskModel, ClassifierUnavailable>
where
    D: FnOnce(&str, Duration) -> Result<Vec<u8>, String>,
{
    let mut reasons = Vec::new();
    match load_local(&source.local_path) {
        Ok(model) => {
            info!(path = %source.local_path.display(), "Loaded classifier from local artifact");
            return Ok(model);
        }
        Err(reason) => {
            warn!(%reason, "Local classifier artifact unusable");
            reasons.push(reason);
        }
    }

    let Some(url) = source.url.as_deref() else {
        reasons.push("no model URL configured".to_string());
        return Err(ClassifierUnavailable { reasons });
    };
    match fetch_remote(source, url, download) {
        Ok((model, bytes)) => {
            info!(%url, "Loaded classifier from remote artifact");
            if let Err(err) = persist(&source.local_path, &bytes) {
                warn!(
                    path = %source.local_path.display(),
                    %err,
                    "Failed to cache downloaded classifier"
                );
            }
            Ok(model)
        }
        Err(reason) => {
            warn!(%reason, "Remote classifier artifact unusable");
            reasons.push(reason);
            Err(ClassifierUnavailable { reasons })
        }
    }
}

/// Load the classifier and verify it accepts exactly what the encoder produces.
pub fn load_checked(source: &ModelSource) -> Result<Arc<dyn Classifier>, ModelError> {
    let model = load_classifier(source)?;
    check_schema(&model)?;
    info!(
        classes = model.classes.len(),
        columns = model.columns.len(),
        "Classifier schema verified"
    );
    Ok(Arc::new(model))
}

/// Download the artifact into `dest` after validating and verifying it.
pub fn fetch_to_path(source: &ModelSource, dest: &Path) -> Result<PathBuf, String> {
    let url = source
        .url
        .as_deref()
        .ok_or_else(|| "no model URL configured".to_string())?;
    let (_, bytes) = fetch_remote(source, url, download_bytes)?;
    persist(dest, &bytes)?;
    Ok(dest.to_path_buf())
}

/// Single-assignment holder for the process-wide classifier.
#[derive(Default)]
pub struct ModelHandle {
    cell: OnceLock<Result<Arc<dyn Classifier>, ModelError>>,
}

impl ModelHandle {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached outcome, running `load` only on the first call.
    pub fn get_or_load<F>(&self, load: F) -> Result<Arc<dyn Classifier>, ModelError>
    where
        F: FnOnce() -> Result<Arc<dyn Classifier>, ModelError>,
    {
        self.cell.get_or_init(load).clone()
    }

}

/// Process-wide classifier handle.
pub fn shared() -> &'static ModelHandle {
    static HANDLE: ModelHandle = ModelHandle::new();
    &HANDLE
}

fn load_local(path: &Path) -> Result<LinearRiskModel, String> {
    if !path.exists() {
        return Err(format!("no local artifact at {}", path.display()));
    }
    LinearRiskModel::load_json(path)
        .map_err(|err| format!("local artifact {} is invalid: {err}", path.display()))
}

fn fetch_remote<D>(
    source: &ModelSource,
    url: &str,
    download: D,
) -> Result<(LinearRiskModel, Vec<u8>), String>
where
    D: FnOnce(&str, Duration) -> Result<Vec<u8>, String>,
{
    validate_model_url(url, &source.allowed_hosts)?;
    let expected_sha256 = source.sha256.as_deref().map(normalize_sha256).transpose()?;
    let bytes = download(url, source.timeout)?;
    let model = verify_artifact(&bytes, expected_sha256.as_deref())
        .map_err(|err| format!("remote artifact {url} is invalid: {err}"))?;
    Ok((model, bytes))
}

/// Check the digest (when one is expected) and parse the downloaded artifact.
fn verify_artifact(
    bytes: &[u8],
    expected_sha256: Option<&str>,
) -> Result<LinearRiskModel, String> {
    if let Some(expected) = expected_sha256 {
        let actual = sha256_hex(bytes);
        if actual != expected {
            return Err(format!(
                "model SHA-256 mismatch: expected {expected}, got {actual}"
            ));
        }
    }
    LinearRiskModel::from_json_bytes(bytes)
}

fn download_bytes(url: &str, timeout: Duration) -> Result<Vec<u8>, String> {
    let response = http_client::agent(timeout)
        .get(url)
        .call()
        .map_err(|err| format!("Failed to download {url}: {err}"))?;
    if response.status() >= 400 {
        return Err(format!(
            "Failed to download {url}: HTTP {}",
            response.status()
        ));
    }
    http_client::read_response_bytes(response, MAX_MODEL_BYTES)
        .map_err(|err| format!("Failed to read {url}: {err}"))
}

fn persist(dest: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
    }
    atomic_write(dest, bytes).map_err(|err| format!("Failed to write {}: {err}", dest.display()))
}

fn validate_model_url(url: &str, allowed_hosts: &HashSet<String>) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|err| format!("Invalid model URL {url}: {err}"))?;
    if parsed.scheme() != "https" {
        return Err(format!("Model URL must use https: {url}"));
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| format!("Model URL is missing a host: {url}"))?;
    if !allowed_hosts.contains(host) {
        return Err(format!(
            "Model URL host '{host}' is not allowlisted; add it to allowed_hosts."
        ));
    }
    Ok(())
}

fn normalize_sha256(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.len() != 64 || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!(
            "Invalid SHA-256 value; expected 64 hex characters, got '{trimmed}'."
        ));
    }
    Ok(trimmed.to_ascii_lowercase())
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/model.json", addr)
    }

    fn model_json() -> String {
        serde_json::to_string(&LinearRiskModel::zeroed(vec!["0".into(), "1".into()])).unwrap()
    }

    fn source(dir: &Path, url: Option<&str>) -> ModelSource {
        ModelSource {
            local_path: dir.join("models").join("model.json"),
            url: url.map(str::to_string),
            sha256: None,
            allowed_hosts: ["raw.githubusercontent.com".to_string()].into_iter().collect(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn loads_local_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let source = source(dir.path(), None);
        persist(&source.local_path, model_json().as_bytes()).unwrap();
        let model = load_classifier(&source).unwrap();
        assert_eq!(model.classes.len(), 2);
    }

    #[test]
    fn missing_local_without_url_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_classifier(&source(dir.path(), None)).unwrap_err();
        assert_eq!(err.reasons.len(), 2);
        assert!(err.reasons[0].starts_with("no local artifact"));
        assert_eq!(err.reasons[1], "no model URL configured");
    }

    #[test]
    fn insecure_url_is_rejected_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let source = source(dir.path(), Some("http://raw.githubusercontent.com/model.json"));
        let err = load_classifier(&source).unwrap_err();
        assert!(err.reasons[1].contains("https"));
        assert!(err.to_string().starts_with("Classifier unavailable"));
    }

    #[test]
    fn unlisted_host_is_rejected() {
        let hosts: HashSet<String> = ["github.com".to_string()].into_iter().collect();
        let err = validate_model_url("https://untrusted.test/model.json", &hosts).unwrap_err();
        assert!(err.contains("allowlisted"));
        validate_model_url("https://github.com/acme/model.json", &hosts).unwrap();
    }

    #[test]
    fn download_reads_body_and_reports_http_errors() {
        let body = model_json();
        let url = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        ));
        let bytes = download_bytes(&url, Duration::from_secs(5)).unwrap();
        LinearRiskModel::from_json_bytes(&bytes).unwrap();

        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_string());
        let err = download_bytes(&url, Duration::from_secs(5)).unwrap_err();
        assert!(err.contains("404"));
    }

    #[test]
    fn sha256_is_normalized_and_checked() {
        assert!(normalize_sha256("nope").unwrap_err().contains("Invalid SHA-256"));
        let digest = sha256_hex(b"model");
        assert_eq!(normalize_sha256(&digest.to_uppercase()).unwrap(), digest);
    }

    #[test]
    fn handle_runs_loader_once_and_caches_failure() {
        let handle = ModelHandle::new();
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let result = handle.get_or_load(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ModelError::Unavailable(ClassifierUnavailable {
                    reasons: vec!["offline".into()],
                }))
            });
            assert!(matches!(result, Err(ModelError::Unavailable(_))));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn load_checked_accepts_matching_model() {
        let dir = tempfile::tempdir().unwrap();
        let source = source(dir.path(), None);
        persist(&source.local_path, model_json().as_bytes()).unwrap();
        let classifier = load_checked(&source).unwrap();
        assert_eq!(classifier.classes().to_vec(), vec!["0".to_string(), "1".to_string()]);
    }

    #[test]
    fn digest_mismatch_is_rejected() {
        let bytes = model_json().into_bytes();
        let wrong = sha256_hex(b"something else");
        let err = verify_artifact(&bytes, Some(&wrong)).unwrap_err();
        assert!(err.contains("SHA-256 mismatch"));
        verify_artifact(&bytes, Some(&sha256_hex(&bytes))).unwrap();
        verify_artifact(&bytes, None).unwrap();
    }

    #[test]
    fn remote_digest_mismatch_leaves_nothing_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = source(dir.path(), Some("https://raw.githubusercontent.com/m.json"));
        source.sha256 = Some(sha256_hex(b"expected artifact"));
        let body = model_json().into_bytes();

        let err = load_classifier_with(&source, |_, _| Ok(body)).unwrap_err();
        assert_eq!(err.reasons.len(), 2);
        assert!(err.reasons[1].contains("SHA-256 mismatch"));
        assert!(!source.local_path.exists());
    }

    #[test]
    fn remote_artifact_is_persisted_and_reused_locally() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://raw.githubusercontent.com/acme/models/main/model.json";
        let mut source = source(dir.path(), Some(url));
        let body = model_json().into_bytes();
        source.sha256 = Some(sha256_hex(&body).to_uppercase());

        let requested = std::cell::RefCell::new(Vec::new());
        let model = load_classifier_with(&source, |requested_url, timeout| {
            requested.borrow_mut().push((requested_url.to_string(), timeout));
            Ok(body.clone())
        })
        .unwrap();
        assert_eq!(model.classes.len(), 2);
        assert_eq!(
            requested.into_inner(),
            vec![(url.to_string(), Duration::from_secs(5))]
        );
        assert_eq!(std::fs::read(&source.local_path).unwrap(), body);

        let reloaded = load_classifier_with(&source, |_, _| {
            Err("network must not be used once the artifact is cached".to_string())
        })
        .unwrap();
        assert_eq!(reloaded.classes, model.classes);
    }
}
