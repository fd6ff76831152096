// src/models.rs

use serde::Deserialize;
use std::path::PathBuf;

/// The result of a successful `create` operation.
///
/// The registry key (`name`) and the on-disk directory name are allowed to
/// diverge: the directory is always named as requested, while the key is
/// deduplicated with an integer suffix when the requested name is taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEnv {
    /// The (possibly deduplicated) key under which the environment is registered.
    pub name: String,
    /// The absolute path of the environment's root directory.
    pub path: PathBuf,
}

/// A single row of `list()` output. Vanished directories are reported with
/// `exists: false` rather than omitted, so callers can offer cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSummary {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
}

/// One failed unit of a batch install.
#[derive(Debug, Clone)]
pub struct InstallFailure {
    /// The package spec as given by the caller (e.g. `requests==2.32`).
    pub package: String,
    /// Captured stderr (or spawn error) from the failing invocation.
    pub detail: String,
}

/// Aggregated result of a batch install. `succeeded` may be any value in
/// `0..=total`; there are no all-or-nothing semantics.
#[derive(Debug, Clone, Default)]
pub struct PartialOutcome {
    pub succeeded: usize,
    pub total: usize,
    pub failures: Vec<InstallFailure>,
}

impl PartialOutcome {
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.total
    }
}

/// One entry of `pip list --format=json`. Computed on demand, never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
}
