//! Domain models for Attune

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest accepted self-report score
pub const MIN_SCORE: u8 = 1;
/// Highest accepted self-report score
pub const MAX_SCORE: u8 = 10;
/// Maximum length of free-text notes on an observation
pub const MAX_NOTES_LEN: usize = 500;

/// Enumerated emotion tags a user can attach to an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Happy,
    Sad,
    Anxious,
    Calm,
    Angry,
    Excited,
    Peaceful,
    Frustrated,
    Hopeful,
    Overwhelmed,
    Content,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Anxious => "anxious",
            Self::Calm => "calm",
            Self::Angry => "angry",
            Self::Excited => "excited",
            Self::Peaceful => "peaceful",
            Self::Frustrated => "frustrated",
            Self::Hopeful => "hopeful",
            Self::Overwhelmed => "overwhelmed",
            Self::Content => "content",
        }
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(Self::Happy),
            "sad" => Ok(Self::Sad),
            "anxious" => Ok(Self::Anxious),
            "calm" => Ok(Self::Calm),
            "angry" => Ok(Self::Angry),
            "excited" => Ok(Self::Excited),
            "peaceful" => Ok(Self::Peaceful),
            "frustrated" => Ok(Self::Frustrated),
            "hopeful" => Ok(Self::Hopeful),
            "overwhelmed" => Ok(Self::Overwhelmed),
            "content" => Ok(Self::Content),
            _ => Err(format!("Unknown emotion: {}", s)),
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Goals a user can declare for a therapy session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTag {
    StressReduction,
    MoodImprovement,
    AnxietyRelief,
    EmotionalRegulation,
    SelfExpression,
    Mindfulness,
}

impl GoalTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StressReduction => "stress_reduction",
            Self::MoodImprovement => "mood_improvement",
            Self::AnxietyRelief => "anxiety_relief",
            Self::EmotionalRegulation => "emotional_regulation",
            Self::SelfExpression => "self_expression",
            Self::Mindfulness => "mindfulness",
        }
    }
}

impl std::str::FromStr for GoalTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stress_reduction" => Ok(Self::StressReduction),
            "mood_improvement" => Ok(Self::MoodImprovement),
            "anxiety_relief" => Ok(Self::AnxietyRelief),
            "emotional_regulation" => Ok(Self::EmotionalRegulation),
            "self_expression" => Ok(Self::SelfExpression),
            "mindfulness" => Ok(Self::Mindfulness),
            _ => Err(Error::invalid(format!("Unknown goal: {}", s))),
        }
    }
}

impl std::fmt::Display for GoalTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of therapy session to plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Music,
    Art,
    Combined,
    Guided,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Art => "art",
            Self::Combined => "combined",
            Self::Guided => "guided",
        }
    }

    pub fn all() -> &'static [SessionType] {
        &[Self::Music, Self::Art, Self::Combined, Self::Guided]
    }
}

impl std::str::FromStr for SessionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "music" => Ok(Self::Music),
            "art" => Ok(Self::Art),
            "combined" => Ok(Self::Combined),
            "guided" => Ok(Self::Guided),
            _ => Err(Error::invalid(format!(
                "Unknown session type: {} (valid: music, art, combined, guided)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Numeric metric carried by every observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Mood,
    Energy,
    Stress,
    Anxiety,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mood => "mood",
            Self::Energy => "energy",
            Self::Stress => "stress",
            Self::Anxiety => "anxiety",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mood" => Ok(Self::Mood),
            "energy" => Ok(Self::Energy),
            "stress" => Ok(Self::Stress),
            "anxiety" => Ok(Self::Anxiety),
            _ => Err(format!(
                "Unknown metric: {} (valid: mood, energy, stress, anxiety)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field set for creating or replacing an observation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewObservation {
    pub mood_score: u8,
    pub energy_level: u8,
    pub stress_level: u8,
    #[serde(default)]
    pub anxiety_level: Option<u8>,
    pub emotions: Vec<Emotion>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
}

impl NewObservation {
    /// Check score ranges, emotion presence and notes length
    pub fn validate(&self) -> Result<()> {
        check_score("mood_score", self.mood_score)?;
        check_score("energy_level", self.energy_level)?;
        check_score("stress_level", self.stress_level)?;
        if let Some(anxiety) = self.anxiety_level {
            check_score("anxiety_level", anxiety)?;
        }
        if self.emotions.is_empty() {
            return Err(Error::invalid("emotions must contain at least one tag"));
        }
        if let Some(ref notes) = self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(Error::invalid(format!(
                    "notes must be at most {} characters",
                    MAX_NOTES_LEN
                )));
            }
        }
        Ok(())
    }
}

fn check_score(field: &str, value: u8) -> Result<()> {
    if (MIN_SCORE..=MAX_SCORE).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "{} must be between {} and {}, got {}",
            field, MIN_SCORE, MAX_SCORE, value
        )))
    }
}

/// One self-reported affect measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub id: Option<i64>,
    /// Owning user; observations never change owner
    #[serde(default)]
    pub user_id: Option<i64>,
    pub mood_score: u8,
    pub energy_level: u8,
    pub stress_level: u8,
    #[serde(default)]
    pub anxiety_level: Option<u8>,
    pub emotions: Vec<Emotion>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Observation {
    /// Create a validated observation recorded at the given time
    pub fn new(input: NewObservation, recorded_at: DateTime<Utc>) -> Result<Self> {
        input.validate()?;
        Ok(Self {
            id: None,
            user_id: None,
            mood_score: input.mood_score,
            energy_level: input.energy_level,
            stress_level: input.stress_level,
            anxiety_level: input.anxiety_level,
            emotions: input.emotions,
            notes: input.notes,
            triggers: input.triggers,
            activities: input.activities,
            recorded_at,
            updated_at: None,
        })
    }

    /// Assign the owning user
    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Replace every user-supplied field at once.
    ///
    /// There is no partial patch: optional fields missing from `input` are
    /// cleared. On validation failure the observation is left untouched.
    /// `id`, `user_id` and `recorded_at` are never changed.
    pub fn replace(&mut self, input: NewObservation, now: DateTime<Utc>) -> Result<()> {
        input.validate()?;
        self.mood_score = input.mood_score;
        self.energy_level = input.energy_level;
        self.stress_level = input.stress_level;
        self.anxiety_level = input.anxiety_level;
        self.emotions = input.emotions;
        self.notes = input.notes;
        self.triggers = input.triggers;
        self.activities = input.activities;
        self.updated_at = Some(now);
        Ok(())
    }

    /// Check the stored fields against the same rules as creation
    pub fn validate(&self) -> Result<()> {
        self.as_input().validate()
    }

    /// Value of a numeric metric, `None` when the observation lacks it
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Mood => Some(f64::from(self.mood_score)),
            Metric::Energy => Some(f64::from(self.energy_level)),
            Metric::Stress => Some(f64::from(self.stress_level)),
            Metric::Anxiety => self.anxiety_level.map(f64::from),
        }
    }

    fn as_input(&self) -> NewObservation {
        NewObservation {
            mood_score: self.mood_score,
            energy_level: self.energy_level,
            stress_level: self.stress_level,
            anxiety_level: self.anxiety_level,
            emotions: self.emotions.clone(),
            notes: self.notes.clone(),
            triggers: self.triggers.clone(),
            activities: self.activities.clone(),
        }
    }
}
