//! Therapy session analytics command implementation

use std::path::Path;

use anyhow::{Context, Result};
use attune_core::{import, sessions};
use chrono::Utc;

use super::print_json;

pub fn cmd_sessions(file: &Path, days: i64, json: bool) -> Result<()> {
    let imported = import::read_sessions(file)
        .with_context(|| format!("Failed to read sessions from {}", file.display()))?;
    if imported.skipped > 0 {
        tracing::warn!(
            skipped = imported.skipped,
            "Some session records were invalid and ignored"
        );
    }

    let analytics = sessions::analyze(&imported.records, days, Utc::now())
        .context("Failed to analyze sessions")?;

    if json {
        return print_json(&analytics);
    }

    println!();
    println!(
        "🎧 Session Analytics (last {} days) · {} sessions",
        analytics.window_days, analytics.total_sessions
    );
    println!("   ─────────────────────────────────────────────────────────────");

    if analytics.total_sessions == 0 {
        println!("   No sessions in this window.");
        println!();
        return Ok(());
    }

    println!("   By type");
    for stats in &analytics.by_type {
        println!(
            "   {:10} │ {:>3} sessions │ avg {:>5.1} min │ rating {}",
            stats.session_type.as_str(),
            stats.session_count,
            stats.avg_duration,
            format_rating(stats.avg_rating)
        );
    }

    if !analytics.goal_progress.is_empty() {
        println!();
        println!("   Goals");
        for goal in &analytics.goal_progress {
            println!(
                "   {:22} │ {:>3} sessions │ rating {}",
                goal.goal.as_str(),
                goal.session_count,
                format_rating(goal.avg_rating)
            );
        }
    }

    println!();
    println!("   Weekly");
    for week in &analytics.weekly_trends {
        println!(
            "   week of {} │ {:>3} sessions │ avg {:>5.1} min │ rating {}",
            week.week_start,
            week.session_count,
            week.avg_duration,
            format_rating(week.avg_rating)
        );
    }
    println!();

    Ok(())
}

/// Unrated groups carry a 0.0 average
fn format_rating(avg: f64) -> String {
    if avg > 0.0 {
        format!("{:.1}/5", avg)
    } else {
        "-".to_string()
    }
}
