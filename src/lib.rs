//! Library exports for the form host binaries and integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// End-to-end submission pipeline.
pub mod assessment;
/// Crash-safe file replacement.
pub(crate) mod atomic_file;
/// Classifier contract and the bundled linear model.
pub mod classifier;
/// Accent-insensitive ordering of display labels.
pub mod collation;
/// Persisted application settings.
pub mod config;
/// Form answers to classifier features.
pub mod encoding;
/// HTTP helpers for artifact downloads.
pub(crate) mod http_client;
/// Logging setup.
pub mod logging;
/// Classifier artifact loading and the process-wide handle.
pub mod model_store;
/// Verdict rendering.
pub mod presenter;
