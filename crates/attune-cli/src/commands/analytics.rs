//! Analytics and insight command implementations

use std::path::Path;

use anyhow::{Context, Result};
use attune_core::{AggregateWindow, AnalyticsConfig, InsightKind, Metric, TagCount};

use super::{load_observations, print_json, score_bar};

pub fn cmd_analytics(
    config: &AnalyticsConfig,
    file: &Path,
    days: i64,
    user: Option<i64>,
    json: bool,
) -> Result<()> {
    let observations = load_observations(file, user)?;
    let window = config
        .aggregator()
        .aggregate_now(&observations, days)
        .context("Failed to aggregate observations")?;

    if json {
        return print_json(&window);
    }

    println!();
    println!("📊 Mood Analytics (last {} days)", window.window_days);
    println!("   ─────────────────────────────────────────────────────────────");

    if window.is_empty() {
        println!("   No observations in this window.");
        println!();
        return Ok(());
    }

    println!("   Observations: {}", window.observation_count);
    println!();
    print_averages(&window);

    println!();
    println!("   Daily");
    for day in &window.daily_series {
        let anxiety = day
            .average(Metric::Anxiety)
            .map_or_else(|| "   -".to_string(), |v| format!("{:>4.1}", v));
        println!(
            "   {} │ mood {:>4.1} │ energy {:>4.1} │ stress {:>4.1} │ anxiety {} │ {} entr{}",
            day.date,
            day.averages.mood,
            day.averages.energy,
            day.averages.stress,
            anxiety,
            day.entry_count,
            if day.entry_count == 1 { "y" } else { "ies" }
        );
    }

    print_tags("Top emotions", &window.tag_frequency.emotions);
    print_tags("Top triggers", &window.tag_frequency.triggers);
    println!();

    Ok(())
}

fn print_averages(window: &AggregateWindow) {
    let rows = [
        ("Mood", Some(window.averages.mood)),
        ("Energy", Some(window.averages.energy)),
        ("Stress", Some(window.averages.stress)),
        ("Anxiety", window.average(Metric::Anxiety)),
    ];
    for (label, value) in rows {
        match value {
            Some(v) => println!("   {:8} {} {:.1}", label, score_bar(v), v),
            None => println!("   {:8} (not reported)", label),
        }
    }
}

fn print_tags(title: &str, tags: &[TagCount]) {
    if tags.is_empty() {
        return;
    }
    println!();
    println!("   {}", title);
    for tag in tags {
        println!("   {:>4}× {}", tag.count, tag.tag);
    }
}

pub fn cmd_insights(
    config: &AnalyticsConfig,
    file: &Path,
    days: i64,
    user: Option<i64>,
    json: bool,
) -> Result<()> {
    let observations = load_observations(file, user)?;
    let window = config
        .aggregator()
        .aggregate_now(&observations, days)
        .context("Failed to aggregate observations")?;
    let insights = config
        .insight_engine()
        .evaluate(&window, window.observation_count);

    if json {
        return print_json(&insights);
    }

    println!();
    println!("💡 Insights (last {} days)", window.window_days);
    println!("   ─────────────────────────────────────────────────────────────");

    if window.is_empty() {
        println!("   Not enough data yet. Log a few check-ins first.");
        println!();
        return Ok(());
    }
    if insights.is_empty() {
        println!("   Nothing stands out. Averages are within the usual range.");
        println!();
        return Ok(());
    }

    for insight in &insights {
        let icon = match insight.kind {
            InsightKind::Concern => "🔴",
            InsightKind::Warning => "🟠",
            InsightKind::Info => "🔵",
            InsightKind::Positive => "🟢",
        };
        println!();
        println!("   {} {}", icon, insight.title);
        println!("      {}", insight.message);
        for rec in &insight.recommendations {
            println!("      • {}", rec);
        }
    }
    println!();

    Ok(())
}
