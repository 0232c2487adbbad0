//! Rule table command implementation

use anyhow::Result;
use attune_core::config::default_config_path;
use attune_core::LoadedConfig;
use serde_json::json;

use super::print_json;

pub fn cmd_rules(loaded: &LoadedConfig, json: bool) -> Result<()> {
    let config = &loaded.config;

    if json {
        return print_json(&json!({
            "source": loaded.source.to_string(),
            "top_tags": config.top_tags,
            "recent_limit": config.recent_limit,
            "insight_rules": config.insight_rules,
            "planning_rules": config.planning_rules,
        }));
    }

    println!();
    println!("📐 Rule Tables");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Source: {}", loaded.source);
    if let Some(path) = default_config_path() {
        println!("   Override path: {}", path.display());
    }
    println!("   Top tags: {}", config.top_tags);
    println!("   Planner history: {} most recent check-ins", config.recent_limit);

    println!();
    println!("   Insight rules");
    for rule in &config.insight_rules {
        println!(
            "   {:14} │ {:8} │ {}",
            rule.condition.to_string(),
            rule.kind.as_str(),
            rule.title
        );
    }

    println!();
    println!("   Planning rules");
    for rule in &config.planning_rules {
        println!(
            "   {:14} │ {}",
            rule.condition.to_string(),
            rule.recommendations.join("; ")
        );
    }
    println!();

    Ok(())
}
