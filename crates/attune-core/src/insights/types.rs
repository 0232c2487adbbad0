//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Pattern that may need attention soon
    Concern,
    /// Elevated levels worth acting on
    Warning,
    /// Informational observation
    Info,
    /// Positive reinforcement
    Positive,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Concern => "concern",
            InsightKind::Warning => "warning",
            InsightKind::Info => "info",
            InsightKind::Positive => "positive",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concern" => Ok(InsightKind::Concern),
            "warning" => Ok(InsightKind::Warning),
            "info" => Ok(InsightKind::Info),
            "positive" => Ok(InsightKind::Positive),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// A qualitative statement derived from a window's averages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    /// Short title (e.g., "High Stress Levels")
    pub title: String,
    /// One or two sentence explanation
    pub message: String,
    /// Suggested actions, in display order
    pub recommendations: Vec<String>,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            recommendations: Vec::new(),
        }
    }

    /// Attach recommendations
    pub fn with_recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = recommendations;
        self
    }
}
