//! Shared command utilities
//!
//! This module contains:
//! - `load_rules` - Resolve and load the rule table config
//! - `load_observations` - Read an observation file, optionally scoped to a user
//! - `print_json` - Pretty JSON output for `--json`

use std::path::Path;

use anyhow::{Context, Result};
use attune_core::{config, history, import, LoadedConfig, Observation};
use serde::Serialize;

pub fn load_rules(path: Option<&Path>) -> Result<LoadedConfig> {
    config::load_config(path).context("Failed to load rule config")
}

pub fn load_observations(file: &Path, user: Option<i64>) -> Result<Vec<Observation>> {
    let imported = import::read_observations(file)
        .with_context(|| format!("Failed to read observations from {}", file.display()))?;

    if imported.skipped > 0 {
        tracing::warn!(
            skipped = imported.skipped,
            "Some observations were invalid and ignored"
        );
    }

    Ok(match user {
        Some(id) => history::for_user(&imported.records, id),
        None => imported.records,
    })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}
