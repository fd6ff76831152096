// src/cli/handlers/mod.rs

// This module contains the logic for each CLI action.

pub mod commons;

pub mod create;
pub mod delete;
pub mod info;
pub mod install;
pub mod list;
pub mod open;
pub mod pip;
