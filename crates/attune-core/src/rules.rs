//! Threshold rule tables
//!
//! Both the insight engine and the session planner are driven by ordered
//! tables of threshold records rather than branching code. Each record names
//! a metric, a threshold and a strict comparison direction. Tables are loaded
//! from `config/rules.toml` (see [`crate::config`]); the functions here hold
//! the built-in defaults that file mirrors.

use serde::{Deserialize, Serialize};

use crate::aggregate::AggregateWindow;
use crate::insights::InsightKind;
use crate::models::Metric;

/// Strict comparison applied to a metric average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Above => ">",
            Self::Below => "<",
        }
    }

    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Above => value > threshold,
            Self::Below => value < threshold,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            _ => Err(format!("Unknown direction: {} (valid: above, below)", s)),
        }
    }
}

/// `metric direction threshold`, e.g. `stress > 7.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub metric: Metric,
    pub threshold: f64,
    pub direction: Direction,
}

impl Condition {
    pub fn new(metric: Metric, direction: Direction, threshold: f64) -> Self {
        Self {
            metric,
            threshold,
            direction,
        }
    }

    /// Whether the window's average satisfies this condition.
    ///
    /// A metric nobody reported never matches, so the 0.0 empty sentinel
    /// cannot trip a `below` rule.
    pub fn matches(&self, window: &AggregateWindow) -> bool {
        window
            .average(self.metric)
            .is_some_and(|avg| self.direction.holds(avg, self.threshold))
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.metric,
            self.direction.symbol(),
            self.threshold
        )
    }
}

/// One row of the insight rule table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRule {
    #[serde(flatten)]
    pub condition: Condition,
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub recommendations: Vec<String>,
}

/// One row of the planning recommendation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRule {
    #[serde(flatten)]
    pub condition: Condition,
    pub recommendations: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Built-in insight rules, in evaluation order.
///
/// "Low Mood Pattern" and "Great Mood Trend" are not mutually exclusive by
/// construction; with tuned thresholds both may fire for the same window.
pub fn default_insight_rules() -> Vec<InsightRule> {
    vec![
        InsightRule {
            condition: Condition::new(Metric::Mood, Direction::Below, 4.0),
            kind: InsightKind::Concern,
            title: "Low Mood Pattern".to_string(),
            message: "Your mood has been lower than usual. Consider engaging in activities that typically boost your mood.".to_string(),
            recommendations: strings(&[
                "Practice mindfulness",
                "Listen to uplifting music",
                "Engage in physical activity",
            ]),
        },
        InsightRule {
            condition: Condition::new(Metric::Stress, Direction::Above, 7.0),
            kind: InsightKind::Warning,
            title: "High Stress Levels".to_string(),
            message: "Your stress levels have been elevated. Try stress-reduction techniques."
                .to_string(),
            recommendations: strings(&[
                "Deep breathing exercises",
                "Generate calming music",
                "Practice progressive muscle relaxation",
            ]),
        },
        InsightRule {
            condition: Condition::new(Metric::Energy, Direction::Below, 4.0),
            kind: InsightKind::Info,
            title: "Low Energy".to_string(),
            message: "Your energy levels seem low. Consider activities that can help boost your energy.".to_string(),
            recommendations: strings(&[
                "Light exercise",
                "Energizing music",
                "Adequate sleep",
                "Proper nutrition",
            ]),
        },
        InsightRule {
            condition: Condition::new(Metric::Mood, Direction::Above, 7.0),
            kind: InsightKind::Positive,
            title: "Great Mood Trend".to_string(),
            message: "Your mood has been consistently positive. Keep up the good work!"
                .to_string(),
            recommendations: strings(&[
                "Continue current activities",
                "Share your success strategies",
                "Maintain your routine",
            ]),
        },
    ]
}

/// Built-in planning recommendation rules, in evaluation order
pub fn default_planning_rules() -> Vec<RecommendationRule> {
    vec![
        RecommendationRule {
            condition: Condition::new(Metric::Stress, Direction::Above, 7.0),
            recommendations: strings(&[
                "Focus on stress-reduction techniques",
                "Consider shorter, more frequent sessions",
            ]),
        },
        RecommendationRule {
            condition: Condition::new(Metric::Mood, Direction::Below, 4.0),
            recommendations: strings(&[
                "Engage with uplifting content",
                "Practice self-compassion exercises",
            ]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MetricAggregator;

    #[test]
    fn test_direction_is_strict() {
        assert!(Direction::Above.holds(7.1, 7.0));
        assert!(!Direction::Above.holds(7.0, 7.0));
        assert!(Direction::Below.holds(3.9, 4.0));
        assert!(!Direction::Below.holds(4.0, 4.0));
    }

    #[test]
    fn test_condition_ignores_missing_metric() {
        let empty = MetricAggregator::default().summarize(&[]);
        let cond = Condition::new(Metric::Anxiety, Direction::Below, 4.0);
        assert!(!cond.matches(&empty));
    }

    #[test]
    fn test_condition_display() {
        let cond = Condition::new(Metric::Stress, Direction::Above, 7.0);
        assert_eq!(cond.to_string(), "stress > 7");
    }

    #[test]
    fn test_default_tables_order() {
        let titles: Vec<_> = default_insight_rules()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Low Mood Pattern",
                "High Stress Levels",
                "Low Energy",
                "Great Mood Trend"
            ]
        );
        assert_eq!(default_planning_rules().len(), 2);
    }
}
