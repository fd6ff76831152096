// src/core/registry.rs
//
// The registry is the single source of truth for which virtual environments
// exist and where they live. It is loaded once per process, reconciled
// against the filesystem, and fully rewritten (write-to-temp-then-rename) on
// every mutation. Packages are never tracked here; only environments are.

use crate::constants::{ENSUREPIP_MODULE, PYTHON_BIN, VENV_MODULE};
use crate::core::venv;
use crate::models::{CreatedEnv, EnvironmentSummary, InstallFailure, PackageInfo, PartialOutcome};
use crate::system::executor::{CapturedOutput, CommandRunner, SystemRunner};

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, io};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Represents errors that can occur during registry and lifecycle operations.
///
/// External-tool failures are always captured as values; the only condition
/// treated as unrecoverable by callers is `PersistFailed`, since silently
/// losing the registry is the most damaging failure mode this tool has.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A directory already exists at the requested creation target.
    #[error("A directory already exists at '{}'. Refusing to adopt or overwrite it.", .path.display())]
    AlreadyExists { path: PathBuf },
    /// The requested name is not a key in the registry.
    #[error("No environment named '{name}' is registered.")]
    NotFound { name: String },
    /// The name is registered, but its directory vanished from disk.
    #[error("Environment '{name}' is registered but its directory '{}' no longer exists.", .path.display())]
    DirectoryMissing { name: String, path: PathBuf },
    /// The environment name is empty or would escape the base directory.
    #[error("'{name}' is not a valid environment name.")]
    InvalidName { name: String },
    /// The environment-creation tool failed; the registry was not mutated.
    #[error("Failed to create the virtual environment: {detail}")]
    CreationFailed { detail: String },
    /// The directory could not be removed; the entry is retained so the
    /// deletion stays visible and retryable.
    #[error("Failed to remove '{}': {source}", .path.display())]
    DeletionFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A single-package install failed. The registry is untouched.
    #[error("Failed to install '{package}': {detail}")]
    InstallFailed { package: String, detail: String },
    /// A forwarded pip command exited with a non-zero status (or could not be
    /// spawned). Carries the captured output so the caller decides what to
    /// display; this is a result value, not a fatal condition.
    #[error("pip command failed: {}", failure_detail(.output))]
    CommandFailed { output: CapturedOutput },
    /// The persisted registry file could not be read or parsed. Recovered at
    /// load time by treating the registry as empty.
    #[error("Registry file '{}' is unreadable: {detail}", .path.display())]
    ConfigUnreadable { path: PathBuf, detail: String },
    /// The registry file could not be rewritten. Mutations are rolled back
    /// in memory when this happens.
    #[error("Could not persist the registry to '{}': {source}", .path.display())]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

type RegistryResult<T> = Result<T, RegistryError>;

/// Renders a one-line reason from a failed invocation's captured output.
fn failure_detail(output: &CapturedOutput) -> String {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match output.status {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by a signal".to_string(),
    }
}

/// Owns the persisted name → path mapping and the primitive lifecycle
/// operations (create, delete, install, run, list).
///
/// Constructed once per process with an injected registry file path; the
/// in-memory mapping is the source of truth for the process's lifetime.
/// Registry mutations are not internally synchronized — a caller driving
/// this from multiple threads must serialize create/delete, which the
/// `&mut self` receivers enforce at compile time within one instance.
pub struct EnvironmentRegistry {
    file_path: PathBuf,
    envs: BTreeMap<String, PathBuf>,
    runner: Box<dyn CommandRunner>,
}

impl EnvironmentRegistry {
    /// Opens (or initializes) the registry at `file_path` using the real
    /// system process runner.
    pub fn open(file_path: PathBuf) -> RegistryResult<Self> {
        Self::with_runner(file_path, Box::new(SystemRunner))
    }

    /// Opens the registry with an explicit `CommandRunner`. This is the seam
    /// tests use to exercise lifecycle semantics without a Python install.
    pub fn with_runner(file_path: PathBuf, runner: Box<dyn CommandRunner>) -> RegistryResult<Self> {
        let envs = match load_mapping(&file_path) {
            Ok(envs) => envs,
            // A malformed registry is recovered, not propagated: the user
            // would rather re-register environments than be locked out.
            Err(e @ RegistryError::ConfigUnreadable { .. }) => {
                log::warn!("{e} Starting with an empty registry.");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        let mut registry = Self {
            file_path,
            envs,
            runner,
        };

        if !registry.file_path.exists() {
            registry.persist()?;
        }
        registry.reconcile()?;

        Ok(registry)
    }

    /// Prunes entries whose backing directory no longer exists and persists
    /// the mapping if anything was dropped.
    fn reconcile(&mut self) -> RegistryResult<()> {
        let stale: Vec<String> = self
            .envs
            .iter()
            .filter(|(_, path)| !path.is_dir())
            .map(|(name, _)| name.clone())
            .collect();

        if stale.is_empty() {
            return Ok(());
        }

        for name in &stale {
            log::info!("Pruning '{name}': its directory no longer exists.");
            self.envs.remove(name);
        }
        self.persist()
    }

    /// Creates a new virtual environment named `requested_name` under
    /// `base_dir` and registers it under a deduplicated key.
    ///
    /// The on-disk directory is always named `requested_name`; only the
    /// registry key gets an integer suffix on collision, so two environments
    /// both literally named "venv" in different base directories remain
    /// retrievable by distinct keys.
    ///
    /// With `fast`, the environment is created with `--without-pip` and pip
    /// is provisioned by a second, explicit `ensurepip` invocation.
    pub fn create(
        &mut self,
        base_dir: &Path,
        requested_name: &str,
        fast: bool,
    ) -> RegistryResult<CreatedEnv> {
        if requested_name.is_empty() || requested_name.contains(['/', '\\']) {
            return Err(RegistryError::InvalidName {
                name: requested_name.to_string(),
            });
        }

        let target = base_dir.join(requested_name);
        if target.exists() {
            return Err(RegistryError::AlreadyExists { path: target });
        }

        let key = self.unique_key(requested_name);

        let mut args: Vec<String> = vec!["-m".into(), VENV_MODULE.into()];
        if fast {
            args.push("--without-pip".into());
        }
        args.push(target.display().to_string());
        self.run_tool(Path::new(PYTHON_BIN), args)?;

        if fast {
            // `--without-pip` skips the slow pip unpacking; the environment's
            // own interpreter bootstraps it from the bundled wheel instead.
            let python = venv::python_path(&target);
            let bootstrap: Vec<String> =
                vec!["-m".into(), ENSUREPIP_MODULE.into(), "--upgrade".into()];
            self.run_tool(&python, bootstrap)?;
        }

        let absolute = dunce::canonicalize(&target).map_err(|e| RegistryError::CreationFailed {
            detail: format!("could not resolve the created directory: {e}"),
        })?;

        self.envs.insert(key.clone(), absolute.clone());
        if let Err(e) = self.persist() {
            self.envs.remove(&key);
            return Err(e);
        }

        log::info!("Registered '{key}' at {}", absolute.display());
        Ok(CreatedEnv {
            name: key,
            path: absolute,
        })
    }

    /// Removes the environment's directory and unregisters it.
    ///
    /// A directory that is already gone is treated as success — the point of
    /// deletion is that the environment no longer exists, and a stale entry
    /// should not stay behind just because someone beat us to the removal.
    pub fn delete(&mut self, name: &str) -> RegistryResult<()> {
        let path = self
            .envs
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })?;

        if path.exists() {
            fs::remove_dir_all(&path).map_err(|e| RegistryError::DeletionFailed {
                path: path.clone(),
                source: e,
            })?;
        } else {
            log::info!("Directory of '{name}' is already gone; unregistering only.");
        }

        self.envs.remove(name);
        if let Err(e) = self.persist() {
            self.envs.insert(name.to_string(), path);
            return Err(e);
        }
        Ok(())
    }

    /// Installs (or upgrades) a single package into the named environment.
    pub fn install_package(&self, name: &str, spec: &str) -> RegistryResult<()> {
        let root = self.resolve(name)?;
        let pip = venv::pip_path(root);
        self.run_pip(&pip, vec!["install".into(), spec.to_string()])
            .map(|_| ())
            .map_err(|detail| RegistryError::InstallFailed {
                package: spec.to_string(),
                detail,
            })
    }

    /// Installs a batch of packages, optimizing for the common case where all
    /// succeed: one combined invocation first, then a per-package fallback
    /// whose units are independent and order-insensitive (and therefore run
    /// in parallel). Results are aggregated only after all have finished;
    /// one failure never cancels the others.
    pub fn install_many(&self, name: &str, specs: &[String]) -> RegistryResult<PartialOutcome> {
        let root = self.resolve(name)?;
        if specs.is_empty() {
            return Ok(PartialOutcome::default());
        }
        let pip = venv::pip_path(root);

        let mut combined: Vec<String> = vec!["install".into()];
        combined.extend_from_slice(specs);
        if self.run_pip(&pip, combined).is_ok() {
            return Ok(PartialOutcome {
                succeeded: specs.len(),
                total: specs.len(),
                failures: Vec::new(),
            });
        }

        log::info!(
            "Combined install failed; retrying each of the {} packages individually.",
            specs.len()
        );
        let failures: Vec<InstallFailure> = specs
            .par_iter()
            .filter_map(|spec| {
                self.run_pip(&pip, vec!["install".into(), spec.clone()])
                    .err()
                    .map(|detail| InstallFailure {
                        package: spec.clone(),
                        detail,
                    })
            })
            .collect();

        Ok(PartialOutcome {
            succeeded: specs.len() - failures.len(),
            total: specs.len(),
            failures,
        })
    }

    /// Forwards `args` verbatim to the environment's pip binary and returns
    /// its captured output. A non-zero exit comes back as
    /// `RegistryError::CommandFailed` carrying the output — the caller
    /// decides whether and how to display it.
    pub fn run_command(&self, name: &str, args: &[String]) -> RegistryResult<CapturedOutput> {
        let root = self.resolve(name)?;
        let pip = venv::pip_path(root);

        let output = match self.runner.run(&pip, args, None) {
            Ok(output) => output,
            Err(e) => CapturedOutput {
                status: None,
                stdout: String::new(),
                stderr: e.to_string(),
            },
        };

        if output.success() {
            Ok(output)
        } else {
            Err(RegistryError::CommandFailed { output })
        }
    }

    /// Queries the environment's installed packages via
    /// `pip list --format=json`. Computed on demand, never cached.
    pub fn installed_packages(&self, name: &str) -> RegistryResult<Vec<PackageInfo>> {
        let output = self.run_command(name, &["list".into(), "--format=json".into()])?;
        let mut packages: Vec<PackageInfo> =
            serde_json::from_str(output.stdout.trim()).map_err(|e| {
                RegistryError::CommandFailed {
                    output: CapturedOutput {
                        status: output.status,
                        stdout: output.stdout.clone(),
                        stderr: format!("unexpected `pip list` output: {e}"),
                    },
                }
            })?;
        packages.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(packages)
    }

    /// Produces a summary row for every registered environment. Never fails:
    /// a directory that vanished since the last reconciliation is reported
    /// with `exists: false` rather than omitted.
    pub fn list(&self) -> Vec<EnvironmentSummary> {
        self.envs
            .iter()
            .map(|(name, path)| EnvironmentSummary {
                name: name.clone(),
                path: path.clone(),
                exists: path.is_dir(),
            })
            .collect()
    }

    /// Looks up the registered path for `name`, without checking existence.
    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.envs.get(name).map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    /// Resolves a name to an existing directory, distinguishing "never
    /// registered" from "registered but stale".
    fn resolve(&self, name: &str) -> RegistryResult<&PathBuf> {
        let path = self.envs.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })?;
        if !path.is_dir() {
            return Err(RegistryError::DirectoryMissing {
                name: name.to_string(),
                path: path.clone(),
            });
        }
        Ok(path)
    }

    /// First free key wins: `venv`, then `venv1`, `venv2`, ...
    fn unique_key(&self, base: &str) -> String {
        if !self.envs.contains_key(base) {
            return base.to_string();
        }
        let mut i: usize = 1;
        loop {
            let candidate = format!("{base}{i}");
            if !self.envs.contains_key(&candidate) {
                return candidate;
            }
            i += 1;
        }
    }

    /// Runs an environment-creation tool invocation, mapping any failure to
    /// `CreationFailed` without touching the registry.
    fn run_tool(&self, program: &Path, args: Vec<String>) -> RegistryResult<()> {
        match self.runner.run(program, &args, None) {
            Ok(output) if output.success() => Ok(()),
            Ok(output) => Err(RegistryError::CreationFailed {
                detail: failure_detail(&output),
            }),
            Err(e) => Err(RegistryError::CreationFailed {
                detail: e.to_string(),
            }),
        }
    }

    /// Runs pip with `args`, collapsing both spawn errors and non-zero exits
    /// into a one-line failure detail.
    fn run_pip(&self, pip: &Path, args: Vec<String>) -> Result<CapturedOutput, String> {
        match self.runner.run(pip, &args, None) {
            Ok(output) if output.success() => Ok(output),
            Ok(output) => Err(failure_detail(&output)),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Durably rewrites the whole mapping. The write goes to a temporary
    /// file in the same directory and is renamed over the registry, so a
    /// crash mid-write can never leave a torn file behind.
    fn persist(&self) -> RegistryResult<()> {
        let to_persist_error = |source: io::Error| RegistryError::PersistFailed {
            path: self.file_path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.envs)
            .map_err(io::Error::from)
            .map_err(to_persist_error)?;

        let dir = self.file_path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(to_persist_error)?;
        tmp.write_all(json.as_bytes()).map_err(to_persist_error)?;
        tmp.persist(&self.file_path)
            .map_err(|e| to_persist_error(e.error))?;

        log::debug!(
            "Persisted {} entries to {}",
            self.envs.len(),
            self.file_path.display()
        );
        Ok(())
    }
}

/// Reads the mapping from disk. A missing file is an empty registry; an
/// unreadable or malformed one surfaces as `ConfigUnreadable` for the caller
/// to recover from.
fn load_mapping(path: &Path) -> RegistryResult<BTreeMap<String, PathBuf>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let bytes = fs::read(path).map_err(|e| RegistryError::ConfigUnreadable {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| RegistryError::ConfigUnreadable {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    type FailPredicate = Box<dyn Fn(&str, &[String]) -> bool + Send + Sync>;

    /// A scripted `CommandRunner` that records every invocation, simulates
    /// `python -m venv` by creating the target directory, and fails any
    /// invocation matched by the predicate with a captured "boom" on stderr.
    struct FakeRunner {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        fail_if: Option<FailPredicate>,
        stdout: String,
    }

    impl FakeRunner {
        fn ok() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_if: None,
                stdout: String::new(),
            }
        }

        fn failing(pred: impl Fn(&str, &[String]) -> bool + Send + Sync + 'static) -> Self {
            Self {
                fail_if: Some(Box::new(pred)),
                ..Self::ok()
            }
        }

        fn with_stdout(stdout: &str) -> Self {
            Self {
                stdout: stdout.to_string(),
                ..Self::ok()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, index: usize) -> (String, Vec<String>) {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &self,
            program: &Path,
            args: &[String],
            _cwd: Option<&Path>,
        ) -> Result<CapturedOutput, crate::system::executor::ExecutionError> {
            let program = program.display().to_string();
            self.calls
                .lock()
                .unwrap()
                .push((program.clone(), args.to_vec()));

            if let Some(pred) = &self.fail_if
                && pred(&program, args)
            {
                return Ok(CapturedOutput {
                    status: Some(1),
                    stdout: String::new(),
                    stderr: "boom".to_string(),
                });
            }

            // Simulate the environment-creation tool.
            if args.first().map(String::as_str) == Some("-m")
                && args.get(1).map(String::as_str) == Some(VENV_MODULE)
                && let Some(target) = args.last()
            {
                fs::create_dir_all(target).unwrap();
            }

            Ok(CapturedOutput {
                status: Some(0),
                stdout: self.stdout.clone(),
                stderr: String::new(),
            })
        }
    }

    // The registry owns its runner as a trait object; sharing the fake
    // through an Arc lets tests assert on recorded invocations afterwards.
    impl CommandRunner for Arc<FakeRunner> {
        fn run(
            &self,
            program: &Path,
            args: &[String],
            cwd: Option<&Path>,
        ) -> Result<CapturedOutput, crate::system::executor::ExecutionError> {
            self.as_ref().run(program, args, cwd)
        }
    }

    fn registry_in(dir: &TempDir, runner: FakeRunner) -> EnvironmentRegistry {
        registry_with(dir, Arc::new(runner))
    }

    fn registry_with(dir: &TempDir, runner: Arc<FakeRunner>) -> EnvironmentRegistry {
        EnvironmentRegistry::with_runner(dir.path().join("registry.json"), Box::new(runner))
            .unwrap()
    }

    fn specs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn create_then_list_contains_exactly_the_new_entry() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("projects");
        fs::create_dir_all(&base).unwrap();

        let mut registry = registry_in(&tmp, FakeRunner::ok());
        let created = registry.create(&base, "venv", false).unwrap();

        assert_eq!(created.name, "venv");
        assert_eq!(created.path, dunce::canonicalize(base.join("venv")).unwrap());

        let listed = registry.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "venv");
        assert_eq!(listed[0].path, created.path);
        assert!(listed[0].exists);
    }

    #[test]
    fn create_deduplicates_registry_keys_with_integer_suffixes() {
        let tmp = TempDir::new().unwrap();
        let mut registry = registry_in(&tmp, FakeRunner::ok());

        let mut paths = Vec::new();
        for dir in ["a", "b", "c"] {
            let base = tmp.path().join(dir);
            fs::create_dir_all(&base).unwrap();
            paths.push(registry.create(&base, "venv", false).unwrap());
        }

        let keys: Vec<&str> = paths.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(keys, ["venv", "venv1", "venv2"]);
        assert_ne!(paths[0].path, paths[1].path);
        assert_ne!(paths[1].path, paths[2].path);
    }

    #[test]
    fn create_refuses_an_existing_directory_without_invoking_the_tool() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(base.join("venv")).unwrap();

        let mut registry = registry_in(&tmp, FakeRunner::ok());
        let err = registry.create(&base, "venv", false).unwrap_err();

        assert!(matches!(err, RegistryError::AlreadyExists { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn create_rejects_empty_and_separator_names() {
        let tmp = TempDir::new().unwrap();
        let mut registry = registry_in(&tmp, FakeRunner::ok());

        for bad in ["", "a/b", "a\\b"] {
            let err = registry.create(tmp.path(), bad, false).unwrap_err();
            assert!(matches!(err, RegistryError::InvalidName { .. }));
        }
    }

    #[test]
    fn failed_creation_leaves_the_registry_untouched() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let runner = FakeRunner::failing(|_, args| args.iter().any(|a| a == VENV_MODULE));
        let mut registry = registry_in(&tmp, runner);

        let err = registry.create(&base, "venv", false).unwrap_err();
        assert!(matches!(err, RegistryError::CreationFailed { .. }));
        assert!(registry.is_empty());

        // The persisted file is still an empty mapping.
        let reopened = registry_in(&tmp, FakeRunner::ok());
        assert!(reopened.is_empty());
    }

    #[test]
    fn fast_create_bootstraps_pip_with_a_second_invocation() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let runner = Arc::new(FakeRunner::ok());
        let mut registry = registry_with(&tmp, Arc::clone(&runner));
        registry.create(&base, "quick", true).unwrap();

        assert_eq!(runner.call_count(), 2);
        let (_, venv_args) = runner.call(0);
        assert!(venv_args.iter().any(|a| a == "--without-pip"));
        let (bootstrap_program, bootstrap_args) = runner.call(1);
        assert!(bootstrap_program.contains("quick"));
        assert!(bootstrap_args.iter().any(|a| a == ENSUREPIP_MODULE));
    }

    #[test]
    fn delete_removes_the_directory_and_the_entry() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let mut registry = registry_in(&tmp, FakeRunner::ok());
        let created = registry.create(&base, "venv", false).unwrap();

        registry.delete("venv").unwrap();
        assert!(!created.path.exists());
        assert!(registry.list().is_empty());
    }

    #[test]
    fn delete_of_an_already_missing_directory_still_unregisters() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let mut registry = registry_in(&tmp, FakeRunner::ok());
        let created = registry.create(&base, "venv", false).unwrap();
        fs::remove_dir_all(&created.path).unwrap();

        registry.delete("venv").unwrap();
        assert!(registry.list().is_empty());
    }

    #[test]
    fn delete_of_an_unknown_name_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let mut registry = registry_in(&tmp, FakeRunner::ok());
        let err = registry.delete("ghost").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[test]
    fn registry_round_trips_across_a_reopen() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let mut registry = registry_in(&tmp, FakeRunner::ok());
        registry.create(&base, "alpha", false).unwrap();
        registry.create(&base, "beta", false).unwrap();
        let before = registry.list();
        drop(registry);

        let reopened = registry_in(&tmp, FakeRunner::ok());
        assert_eq!(reopened.list(), before);
    }

    #[test]
    fn reconciliation_prunes_exactly_the_vanished_entry() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let mut registry = registry_in(&tmp, FakeRunner::ok());
        registry.create(&base, "keep", false).unwrap();
        let doomed = registry.create(&base, "gone", false).unwrap();
        fs::remove_dir_all(&doomed.path).unwrap();
        drop(registry);

        let reopened = registry_in(&tmp, FakeRunner::ok());
        let listed = reopened.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "keep");
    }

    #[test]
    fn a_malformed_registry_file_is_treated_as_empty() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("registry.json"), "not json at all {{{").unwrap();

        let registry = registry_in(&tmp, FakeRunner::ok());
        assert!(registry.is_empty());
    }

    #[test]
    fn install_on_an_unknown_name_spawns_nothing() {
        let tmp = TempDir::new().unwrap();
        let runner = Arc::new(FakeRunner::ok());
        let registry = registry_with(&tmp, Arc::clone(&runner));

        let err = registry.install_package("ghost", "requests").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn install_distinguishes_a_stale_entry_from_an_unknown_name() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let mut registry = registry_in(&tmp, FakeRunner::ok());
        let created = registry.create(&base, "venv", false).unwrap();
        fs::remove_dir_all(&created.path).unwrap();

        let err = registry.install_package("venv", "requests").unwrap_err();
        assert!(matches!(err, RegistryError::DirectoryMissing { .. }));
    }

    #[test]
    fn batch_install_reports_a_partial_outcome_and_mutates_nothing() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        // The combined invocation (more than one package after "install")
        // fails, as does the individual install of "bad".
        let runner = FakeRunner::failing(|_, args| {
            args.first().map(String::as_str) == Some("install")
                && (args.len() > 2 || args.iter().any(|a| a == "bad"))
        });
        let mut registry = registry_in(&tmp, runner);
        registry.create(&base, "venv", false).unwrap();
        let before = registry.list();

        let outcome = registry
            .install_many("venv", &specs(&["good-one", "bad", "good-two"]))
            .unwrap();

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.total, 3);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].package, "bad");
        assert_eq!(outcome.failures[0].detail, "boom");
        assert_eq!(registry.list(), before);
    }

    #[test]
    fn batch_install_of_nothing_is_trivially_complete() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let mut registry = registry_in(&tmp, FakeRunner::ok());
        registry.create(&base, "venv", false).unwrap();

        let outcome = registry.install_many("venv", &[]).unwrap();
        assert_eq!(outcome.total, 0);
        assert!(outcome.is_complete());
    }

    #[test]
    fn run_command_on_an_unknown_name_spawns_nothing() {
        let tmp = TempDir::new().unwrap();
        let runner = Arc::new(FakeRunner::ok());
        let registry = registry_with(&tmp, Arc::clone(&runner));

        let err = registry
            .run_command("ghost", &specs(&["list"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
        assert_eq!(runner.call_count(), 0);
    }

    #[test]
    fn run_command_surfaces_a_nonzero_exit_as_a_value() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let runner =
            FakeRunner::failing(|_, args| args.first().map(String::as_str) == Some("check"));
        let mut registry = registry_in(&tmp, runner);
        registry.create(&base, "venv", false).unwrap();

        let err = registry.run_command("venv", &specs(&["check"])).unwrap_err();
        match err {
            RegistryError::CommandFailed { output } => {
                assert_eq!(output.status, Some(1));
                assert_eq!(output.stderr, "boom");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn installed_packages_parses_and_sorts_pip_json() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("base");
        fs::create_dir_all(&base).unwrap();

        let runner = FakeRunner::with_stdout(
            r#"[{"name": "requests", "version": "2.32.3"},
                {"name": "Flask", "version": "3.1.0"}]"#,
        );
        let mut registry = registry_in(&tmp, runner);
        registry.create(&base, "venv", false).unwrap();

        let packages = registry.installed_packages("venv").unwrap();
        assert_eq!(packages.len(), 2);
        // Sorted case-insensitively by name.
        assert_eq!(packages[0].name, "Flask");
        assert_eq!(packages[1].name, "requests");
        assert_eq!(packages[1].version, "2.32.3");
    }
}
