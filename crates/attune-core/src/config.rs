//! Rule table configuration
//!
//! Holds the tunable parts of the analytics: tag table size, how many recent
//! observations the planner looks at, and both rule tables.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a three-layer resolution:
//! 1. An explicit path (e.g. `--config`), when it exists
//! 2. Override in data dir (~/.local/share/attune/config/rules.toml)
//! 3. Embedded defaults (compiled into binary)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::aggregate::{MetricAggregator, DEFAULT_TOP_TAGS};
use crate::error::{Error, Result};
use crate::insights::{InsightEngine, InsightKind};
use crate::models::Metric;
use crate::planner::{SessionPlanner, DEFAULT_RECENT_LIMIT};
use crate::rules::{
    default_insight_rules, default_planning_rules, Condition, Direction, InsightRule,
    RecommendationRule,
};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/rules.toml");

/// Effective analytics configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// Entries kept per tag frequency table
    pub top_tags: usize,
    /// Newest observations used for plan recommendations
    pub recent_limit: usize,
    pub insight_rules: Vec<InsightRule>,
    pub planning_rules: Vec<RecommendationRule>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_tags: DEFAULT_TOP_TAGS,
            recent_limit: DEFAULT_RECENT_LIMIT,
            insight_rules: default_insight_rules(),
            planning_rules: default_planning_rules(),
        }
    }
}

impl AnalyticsConfig {
    pub fn aggregator(&self) -> MetricAggregator {
        MetricAggregator::new(self.top_tags)
    }

    pub fn insight_engine(&self) -> InsightEngine {
        InsightEngine::with_rules(self.insight_rules.clone())
    }

    pub fn planner(&self) -> SessionPlanner {
        SessionPlanner::with_rules(self.planning_rules.clone()).with_recent_limit(self.recent_limit)
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Override(PathBuf),
    Embedded,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{}", path.display()),
            Self::Override(path) => write!(f, "{} (override)", path.display()),
            Self::Embedded => write!(f, "built-in defaults"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AnalyticsConfig,
    pub source: ConfigSource,
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("attune").join("config").join("rules.toml"))
}

/// Load configuration (explicit path, then override, then embedded default).
///
/// An explicit path that does not exist is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    let (content, source) = match explicit {
        Some(path) if !path.exists() => {
            return Err(Error::InvalidData(format!(
                "config not found: {}",
                path.display()
            )));
        }
        Some(path) => (read(path)?, ConfigSource::Explicit(path.to_path_buf())),
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => (read(&path)?, ConfigSource::Override(path)),
            None => (DEFAULT_CONFIG.to_string(), ConfigSource::Embedded),
        },
    };

    let config = parse_config(&content)?;
    tracing::debug!(
        source = %source,
        insight_rules = config.insight_rules.len(),
        planning_rules = config.planning_rules.len(),
        "Loaded rule configuration"
    );
    Ok(LoadedConfig { config, source })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::InvalidData(format!("Failed to read config {}: {}", path.display(), e))
    })
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    analytics: Option<RawAnalytics>,
    insight_rules: Option<Vec<RawInsightRule>>,
    planning_rules: Option<Vec<RawPlanningRule>>,
}

#[derive(Debug, Deserialize)]
struct RawAnalytics {
    top_tags: Option<usize>,
    recent_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawInsightRule {
    metric: String,
    direction: String,
    threshold: f64,
    kind: String,
    title: String,
    message: String,
    #[serde(default)]
    recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlanningRule {
    metric: String,
    direction: String,
    threshold: f64,
    #[serde(default)]
    recommendations: Vec<String>,
}

fn parse_condition(metric: &str, direction: &str, threshold: f64) -> Result<Condition> {
    let metric = metric.parse::<Metric>().map_err(Error::InvalidData)?;
    let direction = direction.parse::<Direction>().map_err(Error::InvalidData)?;
    if !threshold.is_finite() {
        return Err(Error::InvalidData(format!(
            "threshold for {} must be finite",
            metric
        )));
    }
    Ok(Condition::new(metric, direction, threshold))
}

/// Parse config from TOML content, layering it over the built-in defaults
pub fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(analytics) = raw.analytics {
        if let Some(top_tags) = analytics.top_tags {
            if top_tags == 0 {
                return Err(Error::InvalidData("top_tags must be at least 1".into()));
            }
            config.top_tags = top_tags;
        }
        if let Some(recent_limit) = analytics.recent_limit {
            if recent_limit == 0 {
                return Err(Error::InvalidData("recent_limit must be at least 1".into()));
            }
            config.recent_limit = recent_limit;
        }
    }

    // A table present in the file replaces the built-in one entirely
    if let Some(rules) = raw.insight_rules {
        config.insight_rules = rules
            .into_iter()
            .map(|r| {
                Ok(InsightRule {
                    condition: parse_condition(&r.metric, &r.direction, r.threshold)?,
                    kind: r.kind.parse::<InsightKind>().map_err(Error::InvalidData)?,
                    title: r.title,
                    message: r.message,
                    recommendations: r.recommendations,
                })
            })
            .collect::<Result<Vec<_>>>()?;
    }

    if let Some(rules) = raw.planning_rules {
        config.planning_rules = rules
            .into_iter()
            .map(|r| {
                Ok(RecommendationRule {
                    condition: parse_condition(&r.metric, &r.direction, r.threshold)?,
                    recommendations: r.recommendations,
                })
            })
            .collect::<Result<Vec<_>>>()?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_matches_builtin() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.top_tags, DEFAULT_TOP_TAGS);
        assert_eq!(config.insight_rules.len(), 4);
    }

    #[test]
    fn test_override_replaces_table() {
        let content = r#"
[analytics]
top_tags = 3

[[insight_rules]]
metric = "anxiety"
direction = "above"
threshold = 6
kind = "warning"
title = "Anxious Week"
message = "Anxiety has been high."
recommendations = ["Grounding exercise"]
"#;
        let config = parse_config(content).unwrap();

        assert_eq!(config.top_tags, 3);
        assert_eq!(config.recent_limit, DEFAULT_RECENT_LIMIT);
        assert_eq!(config.insight_rules.len(), 1);
        assert_eq!(config.insight_rules[0].condition.metric, Metric::Anxiety);
        assert_eq!(config.insight_rules[0].condition.threshold, 6.0);
        // Untouched table keeps its defaults
        assert_eq!(config.planning_rules, default_planning_rules());
    }

    #[test]
    fn test_empty_table_disables_rules() {
        let config = parse_config("insight_rules = []").unwrap();
        assert!(config.insight_rules.is_empty());
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let content = r#"
[[planning_rules]]
metric = "sleep"
direction = "below"
threshold = 4.0
"#;
        assert!(matches!(
            parse_config(content),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_zero_top_tags_rejected() {
        assert!(parse_config("[analytics]\ntop_tags = 0").is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, "[analytics]\nrecent_limit = 3\n").unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.source, ConfigSource::Explicit(path));
        assert_eq!(loaded.config.recent_limit, 3);
        assert_eq!(loaded.config.planner().recent_limit(), 3);
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        match load_config(Some(&missing)) {
            Err(Error::InvalidData(msg)) => assert!(msg.contains("config not found")),
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }
}
