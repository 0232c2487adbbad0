//! Observation history views
//!
//! Paging and scoping helpers over an observation list supplied by the
//! caller. Nothing here touches storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::window_start;
use crate::error::{Error, Result};
use crate::models::Observation;

/// Paging and window parameters for a history listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub days: i64,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            days: 30,
            page: 1,
            limit: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: usize,
}

/// One page of observations, newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub entries: Vec<Observation>,
    pub pagination: Pagination,
}

/// Keep only the observations owned by `user_id`
pub fn for_user(observations: &[Observation], user_id: i64) -> Vec<Observation> {
    observations
        .iter()
        .filter(|o| o.user_id == Some(user_id))
        .cloned()
        .collect()
}

/// The `n` most recently recorded observations, newest first
pub fn most_recent(observations: &[Observation], n: usize) -> Vec<Observation> {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    sorted.into_iter().take(n).cloned().collect()
}

/// List the observations recorded within `query.days` of `reference`, newest first
pub fn page(
    observations: &[Observation],
    query: HistoryQuery,
    reference: DateTime<Utc>,
) -> Result<HistoryPage> {
    if query.days <= 0 {
        return Err(Error::invalid(format!(
            "days must be a positive integer, got {}",
            query.days
        )));
    }
    if query.page == 0 || query.limit == 0 {
        return Err(Error::invalid("page and limit must be at least 1"));
    }

    let cutoff = window_start(reference, query.days);
    let mut in_window: Vec<&Observation> = observations
        .iter()
        .filter(|o| o.recorded_at >= cutoff && o.recorded_at <= reference)
        .collect();
    in_window.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

    let total = in_window.len();
    let limit = query.limit as usize;
    let offset = (query.page as usize - 1).saturating_mul(limit);
    let entries = in_window
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect();

    Ok(HistoryPage {
        entries,
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Emotion;
    use chrono::{Duration, TimeZone};

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 23, 0, 0).unwrap()
    }

    fn obs(days_ago: i64, mood: u8, user: i64) -> Observation {
        Observation {
            id: Some(days_ago),
            user_id: Some(user),
            mood_score: mood,
            energy_level: 5,
            stress_level: 5,
            anxiety_level: None,
            emotions: vec![Emotion::Content],
            notes: None,
            triggers: vec![],
            activities: vec![],
            recorded_at: reference() - Duration::days(days_ago),
            updated_at: None,
        }
    }

    #[test]
    fn test_page_newest_first() {
        let observations: Vec<_> = (0..7).map(|d| obs(d, 5, 1)).collect();
        let query = HistoryQuery {
            days: 30,
            page: 2,
            limit: 3,
        };
        let page = page(&observations, query, reference()).unwrap();

        let ids: Vec<_> = page.entries.iter().filter_map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(page.pagination.total, 7);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn test_page_respects_window() {
        let observations = vec![obs(1, 5, 1), obs(45, 5, 1)];
        let page = page(&observations, HistoryQuery::default(), reference()).unwrap();
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn test_page_huge_window() {
        let observations = vec![obs(1, 5, 1), obs(9_000, 5, 1)];
        let query = HistoryQuery {
            days: 1_000_000_000,
            ..Default::default()
        };
        let result = page(&observations, query, reference()).unwrap();
        assert_eq!(result.pagination.total, 2);

        let query = HistoryQuery {
            days: i64::MAX,
            ..Default::default()
        };
        assert!(page(&observations, query, reference()).is_ok());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let observations = vec![obs(1, 5, 1)];
        let query = HistoryQuery {
            page: 4,
            ..Default::default()
        };
        let page = page(&observations, query, reference()).unwrap();
        assert!(page.entries.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn test_page_invalid_parameters() {
        let bad = [
            HistoryQuery {
                days: 0,
                ..Default::default()
            },
            HistoryQuery {
                page: 0,
                ..Default::default()
            },
            HistoryQuery {
                limit: 0,
                ..Default::default()
            },
        ];
        for query in bad {
            assert!(matches!(
                page(&[], query, reference()),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_for_user_scopes() {
        let observations = vec![obs(1, 5, 1), obs(2, 5, 2), obs(3, 5, 1)];
        let mine = for_user(&observations, 1);
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.user_id == Some(1)));
    }

    #[test]
    fn test_most_recent() {
        let observations = vec![obs(9, 1, 1), obs(1, 2, 1), obs(5, 3, 1)];
        let recent = most_recent(&observations, 2);
        let moods: Vec<_> = recent.iter().map(|o| o.mood_score).collect();
        assert_eq!(moods, vec![2, 3]);
    }
}
