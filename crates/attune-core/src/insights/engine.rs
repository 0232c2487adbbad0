//! Insight Engine - evaluates the rule table against an aggregate window

use crate::aggregate::AggregateWindow;
use crate::rules::{default_insight_rules, InsightRule};

use super::types::Insight;

/// Evaluates an ordered table of threshold rules.
///
/// Rules are independent: every rule that matches appends one insight, in
/// table order. Results are not re-sorted.
#[derive(Debug, Clone)]
pub struct InsightEngine {
    rules: Vec<InsightRule>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in rule table
    pub fn new() -> Self {
        Self::with_rules(default_insight_rules())
    }

    /// Create an engine with an explicit rule table
    pub fn with_rules(rules: Vec<InsightRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[InsightRule] {
        &self.rules
    }

    /// Produce insights for a window.
    ///
    /// With `observation_count == 0` there is nothing to say, so the result
    /// is empty no matter what the aggregate holds.
    pub fn evaluate(&self, aggregate: &AggregateWindow, observation_count: usize) -> Vec<Insight> {
        if observation_count == 0 {
            return Vec::new();
        }

        let insights: Vec<Insight> = self
            .rules
            .iter()
            .filter(|rule| rule.condition.matches(aggregate))
            .inspect(|rule| {
                tracing::debug!(
                    rule = %rule.condition,
                    kind = rule.kind.as_str(),
                    title = %rule.title,
                    "Insight rule fired"
                );
            })
            .map(|rule| {
                Insight::new(rule.kind, rule.title.clone(), rule.message.clone())
                    .with_recommendations(rule.recommendations.clone())
            })
            .collect();

        tracing::debug!(
            rules = self.rules.len(),
            fired = insights.len(),
            "Insight evaluation complete"
        );
        insights
    }
}
