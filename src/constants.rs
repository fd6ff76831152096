// src/constants.rs

/// The name of the venvm directory inside the user's config directory.
pub const CONFIG_DIR_NAME: &str = "venvm";

/// The name of the persisted registry file (in ~/.config/venvm/).
pub const REGISTRY_FILENAME: &str = "registry.json";

/// The Python interpreter used to create virtual environments.
pub const PYTHON_BIN: &str = if cfg!(windows) { "python" } else { "python3" };

/// The stdlib module invoked to create a virtual environment (`python -m venv`).
pub const VENV_MODULE: &str = "venv";

/// The stdlib module invoked to bootstrap pip into a pip-less environment.
pub const ENSUREPIP_MODULE: &str = "ensurepip";
