//! Insight Engine - qualitative feedback on mood trends
//!
//! Turns an [`AggregateWindow`](crate::aggregate::AggregateWindow) into a list
//! of insights (concern, warning, info, positive), each carrying
//! recommendation text. The thresholds and texts live in a rule table that
//! can be overridden through configuration.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attune_core::insights::InsightEngine;
//!
//! let window = aggregator.aggregate(&observations, 7, now)?;
//! let insights = InsightEngine::new().evaluate(&window, window.observation_count);
//! ```

pub mod engine;
pub mod types;

pub use engine::InsightEngine;
pub use types::{Insight, InsightKind};
