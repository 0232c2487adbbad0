//! Session Phase Planner
//!
//! Builds a time-boxed therapy session plan:
//! - Grounding & Assessment: `min(10, 20%)` of the session
//! - Core phase(s) for the session type, sharing 60% of the session
//! - Integration & Reflection: everything left, split evenly between
//!   journaling and goal setting
//!
//! The last phase absorbs whatever the grounding cap and float rounding
//! leave over, so phase durations always add up to the requested total.
//! Recommendations come from a small rule table evaluated against the
//! caller's recent mood aggregate.

pub mod template;
pub mod types;

use crate::aggregate::{AggregateWindow, MetricAggregator};
use crate::error::{Error, Result};
use crate::history;
use crate::models::{GoalTag, Observation, SessionType};
use crate::rules::{default_planning_rules, RecommendationRule};

pub use template::{
    core_phases, PhaseTemplate, CORE_SHARE, GROUNDING_CAP_MINUTES, GROUNDING_SHARE,
};
pub use types::{Activity, ActivityType, Phase, SessionPlan};

/// Number of recent observations the planner looks at by default
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// What the caller asked for
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub session_type: SessionType,
    /// Minutes
    pub total_duration: f64,
    pub goals: Vec<GoalTag>,
}

impl PlanRequest {
    pub fn new(session_type: SessionType, total_duration: f64, goals: Vec<GoalTag>) -> Self {
        Self {
            session_type,
            total_duration,
            goals,
        }
    }

    /// Build a request from untyped input (session type and goal names)
    pub fn parse(session_type: &str, total_duration: f64, goals: &[&str]) -> Result<Self> {
        let session_type = session_type.parse::<SessionType>()?;
        let goals = goals
            .iter()
            .map(|g| g.parse::<GoalTag>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(session_type, total_duration, goals))
    }
}

/// Plans sessions with a fixed recommendation rule table
#[derive(Debug, Clone)]
pub struct SessionPlanner {
    rules: Vec<RecommendationRule>,
    recent_limit: usize,
    aggregator: MetricAggregator,
}

impl Default for SessionPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionPlanner {
    /// Create a planner with the built-in recommendation rules
    pub fn new() -> Self {
        Self::with_rules(default_planning_rules())
    }

    /// Create a planner with an explicit recommendation rule table
    pub fn with_rules(rules: Vec<RecommendationRule>) -> Self {
        Self {
            rules,
            recent_limit: DEFAULT_RECENT_LIMIT,
            aggregator: MetricAggregator::default(),
        }
    }

    /// Set how many recent observations [`plan_from_history`](Self::plan_from_history) uses
    pub fn with_recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    pub fn rules(&self) -> &[RecommendationRule] {
        &self.rules
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Build a plan.
    ///
    /// `aggregate` should summarize the user's recent observations; with
    /// `observation_count == 0` no recommendations are added. Empty `goals`
    /// are fine, goals are carried as metadata only.
    pub fn plan(
        &self,
        session_type: SessionType,
        total_duration: f64,
        goals: &[GoalTag],
        aggregate: &AggregateWindow,
        observation_count: usize,
    ) -> Result<SessionPlan> {
        if !total_duration.is_finite() || total_duration <= 0.0 {
            return Err(Error::invalid(format!(
                "total_duration must be a positive number of minutes, got {}",
                total_duration
            )));
        }

        let phases = build_phases(session_type, total_duration);
        let recommendations = if observation_count > 0 {
            self.recommendations(aggregate)
        } else {
            Vec::new()
        };

        let plan = SessionPlan {
            session_type,
            total_duration,
            goals: dedup(goals.iter().copied()),
            phases,
            recommendations,
        };

        tracing::debug!(
            session_type = session_type.as_str(),
            total_duration,
            phases = plan.phases.len(),
            recommendations = plan.recommendations.len(),
            "Built session plan"
        );
        Ok(plan)
    }

    /// Plan from a raw observation history.
    ///
    /// Only the `recent_limit` newest observations feed the recommendations.
    pub fn plan_from_history(
        &self,
        request: &PlanRequest,
        observations: &[Observation],
    ) -> Result<SessionPlan> {
        let recent = history::most_recent(observations, self.recent_limit);
        let aggregate = self.aggregator.summarize(&recent);
        self.plan(
            request.session_type,
            request.total_duration,
            &request.goals,
            &aggregate,
            recent.len(),
        )
    }

    fn recommendations(&self, aggregate: &AggregateWindow) -> Vec<String> {
        dedup(
            self.rules
                .iter()
                .filter(|rule| rule.condition.matches(aggregate))
                .flat_map(|rule| rule.recommendations.iter().cloned()),
        )
    }
}

/// Lay out all phases so that their durations sum to `total`
fn build_phases(session_type: SessionType, total: f64) -> Vec<Phase> {
    let grounding = GROUNDING_CAP_MINUTES.min(total * GROUNDING_SHARE);

    // Core phases share one 0.6 * total budget, so combined gets 0.3 each
    // rather than a full 0.6 per phase (which would plan 1.2 * total)
    let cores = core_phases(session_type);
    let core_each = total * CORE_SHARE / cores.len() as f64;

    let mut phases = Vec::with_capacity(cores.len() + 2);
    phases.push(template::GROUNDING.build(grounding));
    phases.extend(cores.iter().map(|tpl| tpl.build(core_each)));

    let used: f64 = phases.iter().map(|p| p.duration).sum();
    phases.push(template::INTEGRATION.build(total - used));
    phases
}

/// Drop repeats, keeping first occurrences in order
fn dedup<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    items.fold(Vec::new(), |mut acc, item| {
        if !acc.contains(&item) {
            acc.push(item);
        }
        acc
    })
}
