// src/core/venv.rs
//
// The on-disk layout of a CPython virtual environment. Nothing here touches
// the registry; these are pure path computations shared by the registry and
// the CLI handlers.

use std::path::{Path, PathBuf};

/// The pip binary inside an environment's directory tree.
pub fn pip_path(env_root: &Path) -> PathBuf {
    if cfg!(windows) {
        env_root.join("Scripts").join("pip.exe")
    } else {
        env_root.join("bin").join("pip")
    }
}

/// The interpreter inside an environment's directory tree. Used for the
/// `ensurepip` bootstrap after a `--without-pip` creation.
pub fn python_path(env_root: &Path) -> PathBuf {
    if cfg!(windows) {
        env_root.join("Scripts").join("python.exe")
    } else {
        env_root.join("bin").join("python")
    }
}

/// Whether a directory plausibly contains an environment with a usable pip.
pub fn has_pip(env_root: &Path) -> bool {
    pip_path(env_root).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pip_lives_under_the_platform_bin_dir() {
        let root = Path::new("/tmp/some-env");
        let pip = pip_path(root);
        assert!(pip.starts_with(root));
        if cfg!(windows) {
            assert!(pip.ends_with("Scripts/pip.exe"));
        } else {
            assert!(pip.ends_with("bin/pip"));
        }
    }
}
