//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, observation loading, JSON output)
//! - `analytics` - Window aggregates and insights
//! - `plan` - Session planning
//! - `history` - Observation history listing
//! - `sessions` - Therapy session analytics
//! - `rules` - Effective rule tables

pub mod analytics;
pub mod core;
pub mod history;
pub mod plan;
pub mod rules;
pub mod sessions;

// Re-export command functions for main.rs
pub use analytics::*;
pub use core::*;
pub use history::*;
pub use plan::*;
pub use rules::*;
pub use sessions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render a 0-10 score as a fixed-width bar
pub fn score_bar(value: f64) -> String {
    let filled = value.round().clamp(0.0, 10.0) as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}
