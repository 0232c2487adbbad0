//! Observation history command implementation

use std::path::Path;

use anyhow::{Context, Result};
use attune_core::history::{self, HistoryQuery};
use chrono::Utc;

use super::{load_observations, print_json, truncate};

pub fn cmd_history(file: &Path, query: HistoryQuery, user: Option<i64>, json: bool) -> Result<()> {
    let observations = load_observations(file, user)?;
    let page = history::page(&observations, query, Utc::now())
        .context("Failed to list observation history")?;

    if json {
        return print_json(&page);
    }

    let p = &page.pagination;
    println!();
    println!(
        "📖 Mood History (last {} days) · page {} of {} · {} entries",
        query.days,
        p.page,
        p.total_pages.max(1),
        p.total
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if page.entries.is_empty() {
        println!("   No entries on this page.");
        println!();
        return Ok(());
    }

    for obs in &page.entries {
        let emotions: Vec<&str> = obs.emotions.iter().map(|e| e.as_str()).collect();
        println!(
            "   {} │ mood {:>2} │ energy {:>2} │ stress {:>2} │ {}",
            obs.recorded_at.format("%Y-%m-%d %H:%M"),
            obs.mood_score,
            obs.energy_level,
            obs.stress_level,
            truncate(&emotions.join(", "), 30)
        );
        if let Some(ref notes) = obs.notes {
            println!("   {:16} │ {}", "", truncate(notes, 60));
        }
    }
    println!();

    Ok(())
}
