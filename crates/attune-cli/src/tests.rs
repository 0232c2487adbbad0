//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::PathBuf;

use attune_core::history::HistoryQuery;
use attune_core::AnalyticsConfig;
use chrono::{Duration, Utc};
use clap::Parser;
use tempfile::TempDir;

use crate::cli::{Cli, Commands};
use crate::commands::{self, score_bar, truncate};

/// Write a CSV of recent observations for two users
fn write_observations(dir: &TempDir) -> PathBuf {
    let now = Utc::now();
    let mut csv = String::from(
        "recorded_at,mood_score,energy_level,stress_level,anxiety_level,emotions,triggers,activities,notes,user_id\n",
    );
    for (days_ago, mood, stress, user) in [(1, 3, 8, 1), (2, 2, 9, 1), (3, 4, 8, 1), (2, 8, 2, 2)] {
        let at = (now - Duration::days(days_ago)).to_rfc3339();
        csv.push_str(&format!(
            "{},{},5,{},,anxious;sad,work,,rough day,{}\n",
            at, mood, stress, user
        ));
    }
    let path = dir.path().join("moods.csv");
    fs::write(&path, csv).unwrap();
    path
}

fn write_sessions(dir: &TempDir) -> PathBuf {
    let started = (Utc::now() - Duration::days(2)).to_rfc3339();
    let json = format!(
        r#"[
            {{"session_type": "music", "duration": 30, "goals": ["stress_reduction"],
              "status": "completed", "started_at": "{0}", "rating": 4}},
            {{"session_type": "art", "duration": 45, "status": "active", "started_at": "{0}"}}
        ]"#,
        started
    );
    let path = dir.path().join("sessions.json");
    fs::write(&path, json).unwrap();
    path
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long line of notes", 10), "a long ...");
    // Multi-byte characters count once
    assert_eq!(truncate("ééééééé", 5), "éé...");
}

#[test]
fn test_score_bar() {
    assert_eq!(score_bar(0.0).chars().count(), 10);
    assert_eq!(score_bar(7.4), "███████░░░");
    assert_eq!(score_bar(12.0), "██████████");
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_plan_duration_range() {
    let ok = Cli::try_parse_from(["attune", "plan", "--type", "art", "--duration", "120"]);
    assert!(ok.is_ok());

    for bad in ["4", "121"] {
        let result = Cli::try_parse_from(["attune", "plan", "--type", "art", "--duration", bad]);
        assert!(result.is_err(), "duration {} should be rejected", bad);
    }
}

#[test]
fn test_plan_defaults_and_goals() {
    let cli = Cli::try_parse_from([
        "attune",
        "--json",
        "plan",
        "-t",
        "music",
        "--goal",
        "mindfulness",
        "--goal",
        "stress_reduction",
    ])
    .unwrap();
    assert!(cli.json);
    match cli.command {
        Commands::Plan {
            duration, goals, ..
        } => {
            assert_eq!(duration, 30);
            assert_eq!(goals, vec!["mindfulness", "stress_reduction"]);
        }
        _ => panic!("expected plan command"),
    }
}

#[test]
fn test_history_defaults() {
    let cli = Cli::try_parse_from(["attune", "history", "--file", "moods.csv"]).unwrap();
    match cli.command {
        Commands::History {
            days, page, limit, ..
        } => {
            let query = HistoryQuery { days, page, limit };
            assert_eq!(query, HistoryQuery::default());
        }
        _ => panic!("expected history command"),
    }
}

// ========== Command Tests ==========

#[test]
fn test_load_observations_scopes_user() {
    let dir = TempDir::new().unwrap();
    let path = write_observations(&dir);

    assert_eq!(commands::load_observations(&path, None).unwrap().len(), 4);
    assert_eq!(commands::load_observations(&path, Some(1)).unwrap().len(), 3);
    assert!(commands::load_observations(&path, Some(99)).unwrap().is_empty());
}

#[test]
fn test_load_observations_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = commands::load_observations(&dir.path().join("nope.csv"), None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_analytics() {
    let dir = TempDir::new().unwrap();
    let path = write_observations(&dir);
    let config = AnalyticsConfig::default();

    assert!(commands::cmd_analytics(&config, &path, 30, Some(1), false).is_ok());
    assert!(commands::cmd_analytics(&config, &path, 30, None, true).is_ok());
}

#[test]
fn test_cmd_analytics_invalid_window() {
    let dir = TempDir::new().unwrap();
    let path = write_observations(&dir);
    let result = commands::cmd_analytics(&AnalyticsConfig::default(), &path, 0, None, false);
    assert!(result.is_err());
}

#[test]
fn test_cmd_insights() {
    let dir = TempDir::new().unwrap();
    let path = write_observations(&dir);
    let config = AnalyticsConfig::default();

    assert!(commands::cmd_insights(&config, &path, 7, Some(1), false).is_ok());
    assert!(commands::cmd_insights(&config, &path, 7, Some(99), false).is_ok());
}

#[test]
fn test_cmd_plan() {
    let dir = TempDir::new().unwrap();
    let path = write_observations(&dir);
    let config = AnalyticsConfig::default();
    let goals = vec!["stress_reduction".to_string()];

    assert!(commands::cmd_plan(&config, "combined", 60.0, &goals, Some(&path), Some(1), false).is_ok());
    assert!(commands::cmd_plan(&config, "guided", 30.0, &[], None, None, true).is_ok());
}

#[test]
fn test_cmd_plan_unknown_type() {
    let result = commands::cmd_plan(&AnalyticsConfig::default(), "dance", 30.0, &[], None, None, false);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Unknown session type"));
}

#[test]
fn test_cmd_history() {
    let dir = TempDir::new().unwrap();
    let path = write_observations(&dir);
    let query = HistoryQuery {
        limit: 2,
        ..Default::default()
    };

    assert!(commands::cmd_history(&path, query, None, false).is_ok());
    assert!(commands::cmd_history(&path, query, Some(2), true).is_ok());

    let bad = HistoryQuery {
        page: 0,
        ..Default::default()
    };
    assert!(commands::cmd_history(&path, bad, None, false).is_err());
}

#[test]
fn test_cmd_sessions() {
    let dir = TempDir::new().unwrap();
    let path = write_sessions(&dir);

    assert!(commands::cmd_sessions(&path, 30, false).is_ok());
    assert!(commands::cmd_sessions(&path, 30, true).is_ok());
    assert!(commands::cmd_sessions(&path, -1, false).is_err());
}

#[test]
fn test_cmd_rules_with_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "[analytics]\ntop_tags = 5\n").unwrap();

    let loaded = commands::load_rules(Some(&path)).unwrap();
    assert_eq!(loaded.config.top_tags, 5);
    assert!(commands::cmd_rules(&loaded, false).is_ok());
    assert!(commands::cmd_rules(&loaded, true).is_ok());
}

#[test]
fn test_load_rules_rejects_bad_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.toml");
    fs::write(&path, "[[insight_rules]]\nmetric = \"sleep\"\n").unwrap();

    assert!(commands::load_rules(Some(&path)).is_err());
}

#[test]
fn test_load_rules_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = commands::load_rules(Some(&dir.path().join("nope.toml")));

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Failed to load rule config"));
    assert!(format!("{:#}", err).contains("config not found"));
}
