//! Therapy session records and session analytics
//!
//! A [`SessionRecord`] tracks a started session through completion. The
//! analytics in [`analyze`] summarize a window of records per session type,
//! per goal, and per ISO week.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::window_start;
use crate::error::{Error, Result};
use crate::models::{GoalTag, SessionType};

/// Lowest and highest accepted session rating
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A therapy session as tracked by the surrounding application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub session_type: SessionType,
    /// Planned length in minutes
    pub duration: f64,
    #[serde(default)]
    pub goals: Vec<GoalTag>,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

impl SessionRecord {
    /// Start a new active session
    pub fn start(
        session_type: SessionType,
        duration: f64,
        goals: Vec<GoalTag>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(Error::invalid(format!(
                "duration must be a positive number of minutes, got {}",
                duration
            )));
        }
        Ok(Self {
            id: None,
            session_type,
            duration,
            goals,
            status: SessionStatus::Active,
            started_at: now,
            ended_at: None,
            rating: None,
            feedback: None,
            achievements: Vec::new(),
        })
    }

    /// Complete an active session
    pub fn end(
        &mut self,
        rating: Option<u8>,
        feedback: Option<String>,
        achievements: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.status != SessionStatus::Active {
            return Err(Error::invalid("only active sessions can be ended"));
        }
        if let Some(r) = rating {
            if !RATING_RANGE.contains(&r) {
                return Err(Error::invalid(format!(
                    "rating must be between {} and {}, got {}",
                    RATING_RANGE.start(),
                    RATING_RANGE.end(),
                    r
                )));
            }
        }
        self.status = SessionStatus::Completed;
        self.ended_at = Some(now);
        self.rating = rating;
        self.feedback = feedback;
        self.achievements = achievements;
        Ok(())
    }
}

/// Per-session-type summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeStats {
    pub session_type: SessionType,
    pub session_count: usize,
    pub avg_duration: f64,
    /// Over rated sessions only; 0.0 when none are rated
    pub avg_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal: GoalTag,
    pub session_count: usize,
    pub avg_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTrend {
    /// Monday of the ISO week (UTC)
    pub week_start: NaiveDate,
    pub session_count: usize,
    pub avg_rating: f64,
    pub avg_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAnalytics {
    pub window_days: u32,
    pub total_sessions: usize,
    pub by_type: Vec<TypeStats>,
    pub goal_progress: Vec<GoalProgress>,
    pub weekly_trends: Vec<WeeklyTrend>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    sessions: usize,
    duration: f64,
    rating_total: f64,
    rated: usize,
}

impl Tally {
    fn add(self, record: &SessionRecord) -> Self {
        Self {
            sessions: self.sessions + 1,
            duration: self.duration + record.duration,
            rating_total: self.rating_total + record.rating.map(f64::from).unwrap_or(0.0),
            rated: self.rated + usize::from(record.rating.is_some()),
        }
    }

    fn avg_duration(&self) -> f64 {
        if self.sessions == 0 {
            0.0
        } else {
            self.duration / self.sessions as f64
        }
    }

    fn avg_rating(&self) -> f64 {
        if self.rated == 0 {
            0.0
        } else {
            self.rating_total / self.rated as f64
        }
    }
}

fn week_start(at: DateTime<Utc>) -> NaiveDate {
    let date = at.date_naive();
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Summarize the sessions started within `window_days` of `reference`
pub fn analyze(
    records: &[SessionRecord],
    window_days: i64,
    reference: DateTime<Utc>,
) -> Result<SessionAnalytics> {
    let days = u32::try_from(window_days)
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| {
            Error::invalid(format!(
                "window_days must be a positive integer, got {}",
                window_days
            ))
        })?;

    let cutoff = window_start(reference, i64::from(days));
    let mut in_window: Vec<&SessionRecord> = records
        .iter()
        .filter(|r| r.started_at >= cutoff && r.started_at <= reference)
        .collect();
    in_window.sort_by_key(|r| r.started_at);

    let per_type = in_window
        .iter()
        .fold(BTreeMap::<SessionType, Tally>::new(), |mut acc, r| {
            let tally = acc.entry(r.session_type).or_default();
            *tally = tally.add(r);
            acc
        });
    let by_type = per_type
        .into_iter()
        .map(|(session_type, t)| TypeStats {
            session_type,
            session_count: t.sessions,
            avg_duration: t.avg_duration(),
            avg_rating: t.avg_rating(),
        })
        .collect();

    // Vec keeps first-seen order for the tie-break below
    let mut per_goal = in_window
        .iter()
        .flat_map(|r| r.goals.iter().map(move |g| (*g, *r)))
        .fold(Vec::<(GoalTag, Tally)>::new(), |mut acc, (goal, r)| {
            match acc.iter_mut().find(|(g, _)| *g == goal) {
                Some((_, tally)) => *tally = tally.add(r),
                None => acc.push((goal, Tally::default().add(r))),
            }
            acc
        });
    per_goal.sort_by(|a, b| b.1.sessions.cmp(&a.1.sessions));
    let goal_progress = per_goal
        .into_iter()
        .map(|(goal, t)| GoalProgress {
            goal,
            session_count: t.sessions,
            avg_rating: t.avg_rating(),
        })
        .collect();

    let per_week = in_window
        .iter()
        .fold(BTreeMap::<NaiveDate, Tally>::new(), |mut acc, r| {
            let tally = acc.entry(week_start(r.started_at)).or_default();
            *tally = tally.add(r);
            acc
        });
    let weekly_trends = per_week
        .into_iter()
        .map(|(week_start, t)| WeeklyTrend {
            week_start,
            session_count: t.sessions,
            avg_rating: t.avg_rating(),
            avg_duration: t.avg_duration(),
        })
        .collect();

    tracing::debug!(
        window_days = days,
        sessions = in_window.len(),
        "Computed session analytics"
    );

    Ok(SessionAnalytics {
        window_days: days,
        total_sessions: in_window.len(),
        by_type,
        goal_progress,
        weekly_trends,
    })
}
