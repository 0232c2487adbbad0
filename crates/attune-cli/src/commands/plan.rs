//! Session plan command implementation

use std::path::Path;

use anyhow::{Context, Result};
use attune_core::{AnalyticsConfig, PlanRequest};

use super::{load_observations, print_json};

pub fn cmd_plan(
    config: &AnalyticsConfig,
    session_type: &str,
    duration: f64,
    goals: &[String],
    file: Option<&Path>,
    user: Option<i64>,
    json: bool,
) -> Result<()> {
    let goal_names: Vec<&str> = goals.iter().map(String::as_str).collect();
    let request = PlanRequest::parse(session_type, duration, &goal_names)?;

    let observations = match file {
        Some(path) => load_observations(path, user)?,
        None => Vec::new(),
    };

    let plan = config
        .planner()
        .plan_from_history(&request, &observations)
        .context("Failed to build session plan")?;

    if json {
        return print_json(&plan);
    }

    println!();
    println!(
        "🧭 {} session plan ({:.0} minutes)",
        plan.session_type, plan.total_duration
    );
    println!("   ─────────────────────────────────────────────────────────────");
    if !plan.goals.is_empty() {
        let names: Vec<&str> = plan.goals.iter().map(|g| g.as_str()).collect();
        println!("   Goals: {}", names.join(", "));
    }

    for (i, phase) in plan.phases.iter().enumerate() {
        println!();
        println!("   {}. {} ({:.1} min)", i + 1, phase.name, phase.duration);
        for activity in &phase.activities {
            println!(
                "      {:>5.1} min │ {:20} │ {}",
                activity.duration,
                activity.activity_type.as_str(),
                activity.description
            );
        }
    }

    if !plan.recommendations.is_empty() {
        println!();
        println!("   Based on your recent check-ins:");
        for rec in &plan.recommendations {
            println!("      • {}", rec);
        }
    }
    println!();

    Ok(())
}
