//! Metric Aggregator
//!
//! Reduces a list of observations over a trailing window into:
//! - Per-metric averages (mood, energy, stress, anxiety)
//! - A per-day series (UTC calendar dates, ascending, empty days omitted)
//! - Tag frequency tables for emotions and triggers
//!
//! ## Empty windows
//!
//! When no observation contributes to a metric its average is `0.0`. That
//! sentinel is never ambiguous with real data because scores start at 1;
//! use [`SampleCounts`] to tell "no data" apart explicitly.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Metric, Observation};

/// Default number of entries kept in each tag frequency table
pub const DEFAULT_TOP_TAGS: usize = 10;

/// Mean of each numeric metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricAverages {
    pub mood: f64,
    pub energy: f64,
    pub stress: f64,
    pub anxiety: f64,
}

impl MetricAverages {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Mood => self.mood,
            Metric::Energy => self.energy,
            Metric::Stress => self.stress,
            Metric::Anxiety => self.anxiety,
        }
    }
}

/// Number of observations that supplied each metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCounts {
    pub mood: usize,
    pub energy: usize,
    pub stress: usize,
    pub anxiety: usize,
}

impl SampleCounts {
    pub fn get(&self, metric: Metric) -> usize {
        match metric {
            Metric::Mood => self.mood,
            Metric::Energy => self.energy,
            Metric::Stress => self.stress,
            Metric::Anxiety => self.anxiety,
        }
    }
}

/// Averages for one calendar day (UTC)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub averages: MetricAverages,
    /// Per-metric sample counts; a zero marks a `0.0` average as "not reported"
    pub samples: SampleCounts,
    pub entry_count: usize,
}

impl DailyAggregate {
    /// Day average of a metric, or `None` when nobody reported it that day
    pub fn average(&self, metric: Metric) -> Option<f64> {
        (self.samples.get(metric) > 0).then(|| self.averages.get(metric))
    }
}

/// Occurrence count of a single tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Ranked tag tables, emotions and triggers kept separately
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFrequency {
    pub emotions: Vec<TagCount>,
    pub triggers: Vec<TagCount>,
}

/// Aggregated view of the observations inside a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateWindow {
    pub window_days: u32,
    /// End of the window; the window covers `[reference_time - window_days, reference_time]`
    pub reference_time: DateTime<Utc>,
    pub observation_count: usize,
    pub averages: MetricAverages,
    pub samples: SampleCounts,
    pub daily_series: Vec<DailyAggregate>,
    pub tag_frequency: TagFrequency,
}

impl AggregateWindow {
    pub fn is_empty(&self) -> bool {
        self.observation_count == 0
    }

    /// Average of a metric, or `None` when no observation supplied it
    pub fn average(&self, metric: Metric) -> Option<f64> {
        if self.samples.get(metric) == 0 {
            None
        } else {
            Some(self.averages.get(metric))
        }
    }
}

/// Running sums folded over observations
#[derive(Debug, Clone, Copy, Default)]
struct MetricSums {
    entries: usize,
    totals: MetricAverages,
    samples: SampleCounts,
}

impl MetricSums {
    fn add(self, obs: &Observation) -> Self {
        let anxiety = obs.metric(Metric::Anxiety);
        Self {
            entries: self.entries + 1,
            totals: MetricAverages {
                mood: self.totals.mood + f64::from(obs.mood_score),
                energy: self.totals.energy + f64::from(obs.energy_level),
                stress: self.totals.stress + f64::from(obs.stress_level),
                anxiety: self.totals.anxiety + anxiety.unwrap_or(0.0),
            },
            samples: SampleCounts {
                mood: self.samples.mood + 1,
                energy: self.samples.energy + 1,
                stress: self.samples.stress + 1,
                anxiety: self.samples.anxiety + usize::from(anxiety.is_some()),
            },
        }
    }

    fn averages(&self) -> MetricAverages {
        MetricAverages {
            mood: mean(self.totals.mood, self.samples.mood),
            energy: mean(self.totals.energy, self.samples.energy),
            stress: mean(self.totals.stress, self.samples.stress),
            anxiety: mean(self.totals.anxiety, self.samples.anxiety),
        }
    }
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Builds [`AggregateWindow`]s with a fixed tag table size
#[derive(Debug, Clone, Copy)]
pub struct MetricAggregator {
    top_tags: usize,
}

impl Default for MetricAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_TAGS)
    }
}

impl MetricAggregator {
    pub fn new(top_tags: usize) -> Self {
        Self { top_tags }
    }

    pub fn top_tags(&self) -> usize {
        self.top_tags
    }

    /// Aggregate the observations recorded within `window_days` of `reference`.
    ///
    /// Input order does not matter. Observations recorded after `reference`
    /// are ignored along with those older than the window.
    pub fn aggregate(
        &self,
        observations: &[Observation],
        window_days: i64,
        reference: DateTime<Utc>,
    ) -> Result<AggregateWindow> {
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
        let in_window: Vec<&Observation> = observations
            .iter()
            .filter(|o| o.recorded_at >= cutoff && o.recorded_at <= reference)
            .collect();

        let window = self.build(in_window, days, reference);
        tracing::debug!(
            window_days = days,
            input = observations.len(),
            in_window = window.observation_count,
            days_with_data = window.daily_series.len(),
            "Aggregated observation window"
        );
        Ok(window)
    }

    /// Aggregate using the current time as the window end
    pub fn aggregate_now(
        &self,
        observations: &[Observation],
        window_days: i64,
    ) -> Result<AggregateWindow> {
        self.aggregate(observations, window_days, Utc::now())
    }

    /// Aggregate every given observation regardless of age.
    ///
    /// The resulting window ends at the newest observation and spans whole
    /// days back to the oldest one (at least one day).
    pub fn summarize(&self, observations: &[Observation]) -> AggregateWindow {
        let newest = observations.iter().map(|o| o.recorded_at).max();
        let oldest = observations.iter().map(|o| o.recorded_at).min();
        let (reference, days) = match (newest, oldest) {
            (Some(newest), Some(oldest)) => {
                let span = newest - oldest;
                let whole = span.num_days() + i64::from(span > Duration::days(span.num_days()));
                (newest, u32::try_from(whole.max(1)).unwrap_or(u32::MAX))
            }
            _ => (Utc::now(), 1),
        };
        self.build(observations.iter().collect(), days, reference)
    }

    fn build(
        &self,
        mut in_window: Vec<&Observation>,
        window_days: u32,
        reference: DateTime<Utc>,
    ) -> AggregateWindow {
        // Stable sort keeps input order for identical timestamps
        in_window.sort_by_key(|o| o.recorded_at);

        let overall = in_window
            .iter()
            .fold(MetricSums::default(), |acc, obs| acc.add(obs));

        let by_day = in_window
            .iter()
            .fold(BTreeMap::<NaiveDate, MetricSums>::new(), |mut acc, obs| {
                let day = acc.entry(obs.recorded_at.date_naive()).or_default();
                *day = day.add(obs);
                acc
            });

        let daily_series = by_day
            .into_iter()
            .map(|(date, sums)| DailyAggregate {
                date,
                averages: sums.averages(),
                samples: sums.samples,
                entry_count: sums.entries,
            })
            .collect();

        let tag_frequency = TagFrequency {
            emotions: rank_tags(
                in_window
                    .iter()
                    .flat_map(|o| o.emotions.iter().map(|e| e.as_str())),
                self.top_tags,
            ),
            triggers: rank_tags(
                in_window
                    .iter()
                    .flat_map(|o| o.triggers.iter().map(String::as_str)),
                self.top_tags,
            ),
        };

        AggregateWindow {
            window_days,
            reference_time: reference,
            observation_count: overall.entries,
            averages: overall.averages(),
            samples: overall.samples,
            daily_series,
            tag_frequency,
        }
    }
}

/// Start of a `days`-long window ending at `reference`.
///
/// Windows reaching past the earliest representable instant start there.
pub(crate) fn window_start(reference: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|span| reference.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Aggregate with the default tag table size
pub fn aggregate(
    observations: &[Observation],
    window_days: i64,
    reference: DateTime<Utc>,
) -> Result<AggregateWindow> {
    MetricAggregator::default().aggregate(observations, window_days, reference)
}

/// Count tags and rank them by count (descending), ties in first-seen order
fn rank_tags<'a>(tags: impl Iterator<Item = &'a str>, limit: usize) -> Vec<TagCount> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut ranked = tags.fold(Vec::<TagCount>::new(), |mut acc, tag| {
        match index.get(tag) {
            Some(&i) => acc[i].count += 1,
            None => {
                index.insert(tag, acc.len());
                acc.push(TagCount {
                    tag: tag.to_string(),
                    count: 1,
                });
            }
        }
        acc
    });

    // sort_by is stable, so equal counts stay in first-seen order
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Emotion;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn obs(days_ago: i64, mood: u8, energy: u8, stress: u8) -> Observation {
        Observation {
            id: None,
            user_id: None,
            mood_score: mood,
            energy_level: energy,
            stress_level: stress,
            anxiety_level: None,
            emotions: vec![Emotion::Calm],
            notes: None,
            triggers: vec![],
            activities: vec![],
            recorded_at: reference() - Duration::days(days_ago),
            updated_at: None,
        }
    }

    #[test]
    fn test_empty_observations() {
        let window = aggregate(&[], 30, reference()).unwrap();

        assert!(window.is_empty());
        assert!(window.daily_series.is_empty());
        assert!(window.tag_frequency.emotions.is_empty());
        assert!(window.tag_frequency.triggers.is_empty());
        assert_eq!(window.averages, MetricAverages::default());
        assert_eq!(window.averages.mood, 0.0);
        assert_eq!(window.average(Metric::Mood), None);
    }

    #[test]
    fn test_non_positive_window_rejected() {
        for days in [0, -3] {
            let err = aggregate(&[], days, reference()).unwrap_err();
            assert!(matches!(err, Error::InvalidParameter(_)));
        }
    }

    #[test]
    fn test_huge_window_covers_everything() {
        let observations = vec![obs(1, 4, 4, 4), obs(20_000, 6, 6, 6)];
        let window = aggregate(&observations, 1_000_000_000, reference()).unwrap();

        assert_eq!(window.window_days, 1_000_000_000);
        assert_eq!(window.observation_count, 2);
        assert_eq!(window.averages.mood, 5.0);
    }

    #[test]
    fn test_window_start_clamps() {
        assert_eq!(
            window_start(reference(), 7),
            reference() - Duration::days(7)
        );
        assert_eq!(
            window_start(reference(), i64::MAX),
            DateTime::<Utc>::MIN_UTC
        );
    }

    #[test]
    fn test_out_of_window_ignored() {
        let observations = vec![obs(1, 2, 5, 5), obs(40, 10, 10, 10), obs(-1, 10, 10, 10)];
        let window = aggregate(&observations, 30, reference()).unwrap();

        assert_eq!(window.observation_count, 1);
        assert_eq!(window.averages.mood, 2.0);
    }

    #[test]
    fn test_window_boundary_inclusive() {
        let observations = vec![obs(7, 4, 4, 4)];
        let window = aggregate(&observations, 7, reference()).unwrap();
        assert_eq!(window.observation_count, 1);
    }

    #[test]
    fn test_anxiety_average_skips_missing() {
        let mut a = obs(1, 5, 5, 5);
        a.anxiety_level = Some(8);
        let b = obs(2, 5, 5, 5);
        let window = aggregate(&[a, b], 30, reference()).unwrap();

        assert_eq!(window.averages.anxiety, 8.0);
        assert_eq!(window.samples.anxiety, 1);
        assert_eq!(window.samples.mood, 2);
    }

    #[test]
    fn test_daily_series_ascending_and_grouped() {
        let observations = vec![obs(1, 8, 5, 5), obs(3, 2, 5, 5), obs(1, 6, 5, 5)];
        let window = aggregate(&observations, 30, reference()).unwrap();

        assert_eq!(window.daily_series.len(), 2);
        assert!(window.daily_series[0].date < window.daily_series[1].date);
        assert_eq!(window.daily_series[0].entry_count, 1);
        assert_eq!(window.daily_series[1].entry_count, 2);
        assert_eq!(window.daily_series[1].averages.mood, 7.0);
    }

    #[test]
    fn test_daily_samples_mark_unreported_metrics() {
        let mut a = obs(2, 5, 5, 5);
        a.anxiety_level = Some(6);
        let b = obs(1, 5, 5, 5);
        let window = aggregate(&[a, b], 30, reference()).unwrap();

        let [reported, unreported] = &window.daily_series[..] else {
            panic!("expected two days");
        };
        assert_eq!(reported.samples.anxiety, 1);
        assert_eq!(reported.average(Metric::Anxiety), Some(6.0));
        assert_eq!(unreported.samples.anxiety, 0);
        assert_eq!(unreported.averages.anxiety, 0.0);
        assert_eq!(unreported.average(Metric::Anxiety), None);
        assert_eq!(unreported.average(Metric::Mood), Some(5.0));
    }

    #[test]
    fn test_tag_frequency_ranking() {
        let mut a = obs(3, 5, 5, 5);
        a.emotions = vec![Emotion::Happy];
        a.triggers = vec!["Work".to_string()];
        let mut b = obs(2, 5, 5, 5);
        b.emotions = vec![Emotion::Calm, Emotion::Calm];
        b.triggers = vec!["work".to_string(), "sleep".to_string()];
        let mut c = obs(1, 5, 5, 5);
        c.emotions = vec![Emotion::Sad];
        c.triggers = vec!["sleep".to_string()];

        // Input order is shuffled; ranking follows recorded_at
        let window = aggregate(&[c, a, b], 30, reference()).unwrap();

        let emotions: Vec<_> = window
            .tag_frequency
            .emotions
            .iter()
            .map(|t| (t.tag.as_str(), t.count))
            .collect();
        assert_eq!(emotions, vec![("calm", 2), ("happy", 1), ("sad", 1)]);

        let triggers: Vec<_> = window
            .tag_frequency
            .triggers
            .iter()
            .map(|t| (t.tag.as_str(), t.count))
            .collect();
        // Case-sensitive: "Work" and "work" are different tags
        assert_eq!(triggers, vec![("sleep", 2), ("Work", 1), ("work", 1)]);
    }

    #[test]
    fn test_tag_frequency_truncated() {
        let mut a = obs(1, 5, 5, 5);
        a.triggers = (0..15).map(|i| format!("t{}", i)).collect();
        let window = MetricAggregator::new(3)
            .aggregate(&[a], 30, reference())
            .unwrap();

        let tags: Vec<_> = window
            .tag_frequency
            .triggers
            .iter()
            .map(|t| t.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["t0", "t1", "t2"]);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let observations = vec![obs(1, 8, 5, 5), obs(3, 2, 5, 5), obs(1, 6, 5, 5)];
        let first = serde_json::to_string(&aggregate(&observations, 30, reference()).unwrap())
            .unwrap();
        let second = serde_json::to_string(&aggregate(&observations, 30, reference()).unwrap())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_summarize_covers_all() {
        let observations = vec![obs(100, 2, 2, 2), obs(1, 4, 4, 4)];
        let window = MetricAggregator::default().summarize(&observations);

        assert_eq!(window.observation_count, 2);
        assert_eq!(window.averages.mood, 3.0);
        assert_eq!(window.window_days, 99);
        assert_eq!(window.reference_time, observations[1].recorded_at);
    }
}
