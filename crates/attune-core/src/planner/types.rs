//! Session plan structures

use serde::{Deserialize, Serialize};

use crate::models::{GoalTag, SessionType};

/// Descriptive label for a planned activity.
///
/// `MusicGeneration` and `ArtGeneration` only name the step; nothing here
/// talks to a media service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    BreathingExercise,
    MoodCheck,
    MusicGeneration,
    ActiveListening,
    ArtGeneration,
    ArtReflection,
    GuidedMeditation,
    BodyScan,
    Journaling,
    GoalSetting,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BreathingExercise => "breathing_exercise",
            Self::MoodCheck => "mood_check",
            Self::MusicGeneration => "music_generation",
            Self::ActiveListening => "active_listening",
            Self::ArtGeneration => "art_generation",
            Self::ArtReflection => "art_reflection",
            Self::GuidedMeditation => "guided_meditation",
            Self::BodyScan => "body_scan",
            Self::Journaling => "journaling",
            Self::GoalSetting => "goal_setting",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single timed step inside a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Minutes, may be fractional
    pub duration: f64,
    pub description: String,
}

/// A named, time-boxed segment of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    /// Minutes, equal to the sum of its activity durations
    pub duration: f64,
    pub activities: Vec<Activity>,
}

/// A fully time-boxed therapy session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub session_type: SessionType,
    /// Requested length in minutes; phase durations sum to this
    pub total_duration: f64,
    pub goals: Vec<GoalTag>,
    pub phases: Vec<Phase>,
    /// Deduplicated, in rule order
    pub recommendations: Vec<String>,
}

impl SessionPlan {
    /// Sum of all phase durations
    pub fn planned_minutes(&self) -> f64 {
        self.phases.iter().map(|p| p.duration).sum()
    }
}
