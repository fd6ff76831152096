// src/cli/handlers/commons.rs

// This module contains shared functions used by multiple handlers.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::path::Path;
use walkdir::WalkDir;

/// Asks the user to confirm a destructive operation. Returns `Ok(false)`
/// (and prints a cancellation notice) when the user declines.
pub fn confirm_destruction(prompt: &str) -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !confirmed {
        println!("\n{}", "Operation cancelled.".yellow());
    }
    Ok(confirmed)
}

/// Computes the on-disk size of a directory tree. Derived on demand and never
/// cached; unreadable entries are simply skipped.
pub fn directory_size(root: &Path) -> u64 {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.metadata().ok())
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.len())
        .sum()
}

/// Renders a byte count the way a human wants to read it.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
