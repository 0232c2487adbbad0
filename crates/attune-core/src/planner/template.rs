//! Phase templates
//!
//! A session is always Grounding & Assessment, then the core phase(s) for the
//! session type, then Integration & Reflection. Core phases are picked by an
//! exhaustive match on [`SessionType`], so adding a session type forces a
//! decision about its core phase.

use crate::models::SessionType;

use super::types::{Activity, ActivityType, Phase};

/// Upper bound on the grounding phase, in minutes
pub const GROUNDING_CAP_MINUTES: f64 = 10.0;
/// Grounding phase share of the session before the cap applies
pub const GROUNDING_SHARE: f64 = 0.2;
/// Share of the session reserved for core therapeutic activity
pub const CORE_SHARE: f64 = 0.6;

/// How an activity claims time from its phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Allocation {
    /// Fixed minutes, capped at what is left in the phase
    Minutes(f64),
    /// Fraction of the phase duration
    Fraction(f64),
    /// Whatever the earlier activities left over
    Remainder,
}

#[derive(Debug, Clone, Copy)]
pub struct ActivityTemplate {
    pub activity_type: ActivityType,
    pub allocation: Allocation,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseTemplate {
    pub name: &'static str,
    /// The last entry must be [`Allocation::Remainder`]
    pub activities: &'static [ActivityTemplate],
}

impl PhaseTemplate {
    /// Lay the activities out over `duration` minutes.
    ///
    /// The final activity takes the remainder so activity durations always
    /// add up to the phase duration.
    pub fn build(&self, duration: f64) -> Phase {
        let mut remaining = duration;
        let activities = self
            .activities
            .iter()
            .enumerate()
            .map(|(i, tpl)| {
                let minutes = if i + 1 == self.activities.len() {
                    remaining
                } else {
                    match tpl.allocation {
                        Allocation::Minutes(m) => m.min(remaining),
                        Allocation::Fraction(f) => (duration * f).min(remaining),
                        Allocation::Remainder => remaining,
                    }
                };
                remaining -= minutes;
                Activity {
                    activity_type: tpl.activity_type,
                    duration: minutes,
                    description: tpl.description.to_string(),
                }
            })
            .collect();

        Phase {
            name: self.name.to_string(),
            duration,
            activities,
        }
    }
}

pub const GROUNDING: PhaseTemplate = PhaseTemplate {
    name: "Grounding & Assessment",
    activities: &[
        ActivityTemplate {
            activity_type: ActivityType::BreathingExercise,
            allocation: Allocation::Minutes(3.0),
            description: "Deep breathing to center yourself",
        },
        ActivityTemplate {
            activity_type: ActivityType::MoodCheck,
            allocation: Allocation::Remainder,
            description: "Quick mood assessment",
        },
    ],
};

pub const MUSIC_THERAPY: PhaseTemplate = PhaseTemplate {
    name: "Music Therapy",
    activities: &[
        ActivityTemplate {
            activity_type: ActivityType::MusicGeneration,
            allocation: Allocation::Fraction(0.3),
            description: "Generate personalized therapeutic music",
        },
        ActivityTemplate {
            activity_type: ActivityType::ActiveListening,
            allocation: Allocation::Remainder,
            description: "Mindful listening and emotional processing",
        },
    ],
};

pub const ART_THERAPY: PhaseTemplate = PhaseTemplate {
    name: "Art Therapy",
    activities: &[
        ActivityTemplate {
            activity_type: ActivityType::ArtGeneration,
            allocation: Allocation::Fraction(0.4),
            description: "Create therapeutic visual art",
        },
        ActivityTemplate {
            activity_type: ActivityType::ArtReflection,
            allocation: Allocation::Remainder,
            description: "Reflect on the created art and emotions",
        },
    ],
};

pub const GUIDED_PRACTICE: PhaseTemplate = PhaseTemplate {
    name: "Guided Practice",
    activities: &[
        ActivityTemplate {
            activity_type: ActivityType::GuidedMeditation,
            allocation: Allocation::Fraction(0.7),
            description: "Follow a guided meditation matched to your goals",
        },
        ActivityTemplate {
            activity_type: ActivityType::BodyScan,
            allocation: Allocation::Remainder,
            description: "Slow body scan to notice where emotions sit",
        },
    ],
};

pub const INTEGRATION: PhaseTemplate = PhaseTemplate {
    name: "Integration & Reflection",
    activities: &[
        ActivityTemplate {
            activity_type: ActivityType::Journaling,
            allocation: Allocation::Fraction(0.5),
            description: "Write about your experience",
        },
        ActivityTemplate {
            activity_type: ActivityType::GoalSetting,
            allocation: Allocation::Remainder,
            description: "Set intentions for moving forward",
        },
    ],
};

/// Core phases for a session type, in emission order
pub fn core_phases(session_type: SessionType) -> &'static [PhaseTemplate] {
    match session_type {
        SessionType::Music => &[MUSIC_THERAPY],
        SessionType::Art => &[ART_THERAPY],
        SessionType::Combined => &[MUSIC_THERAPY, ART_THERAPY],
        SessionType::Guided => &[GUIDED_PRACTICE],
    }
}
