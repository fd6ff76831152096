// src/core/mod.rs

pub mod paths;
pub mod registry;
pub mod venv;
