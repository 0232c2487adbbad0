//! Attune Core Library
//!
//! Mood analytics for the Attune wellbeing tool:
//! - Metric aggregation over a time window (averages, daily series, tag tables)
//! - Insight rule engine over an aggregate window
//! - Session phase planner for music, art, combined and guided sessions
//! - Observation history paging and therapy session analytics
//! - JSON/CSV readers for observation and session exports
//! - Rule tables loaded from TOML with a user override

pub mod aggregate;
pub mod config;
pub mod error;
pub mod history;
pub mod import;
pub mod insights;
pub mod models;
pub mod planner;
pub mod rules;
pub mod sessions;

pub use aggregate::{
    AggregateWindow, DailyAggregate, MetricAggregator, MetricAverages, SampleCounts, TagCount,
    TagFrequency,
};
pub use config::{load_config, AnalyticsConfig, ConfigSource, LoadedConfig};
pub use error::{Error, Result};
pub use history::{HistoryPage, HistoryQuery, Pagination};
pub use import::{ImportFormat, Imported};
pub use insights::{Insight, InsightEngine, InsightKind};
pub use models::{Emotion, GoalTag, Metric, NewObservation, Observation, SessionType};
pub use planner::{Activity, ActivityType, Phase, PlanRequest, SessionPlan, SessionPlanner};
pub use rules::{Condition, Direction, InsightRule, RecommendationRule};
pub use sessions::{SessionAnalytics, SessionRecord, SessionStatus};
