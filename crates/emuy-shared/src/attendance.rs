//! Attendance records as served by the attendance collaborator plus the small
//! aggregations the dashboard shows on top of them

use std::collections::HashSet;

use chrono::{DateTime, Utc};

pub type RecordId = i64;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub name: String,
    pub event: String,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// Body for creating or replacing a record
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Default)]
pub struct AttendanceDraft {
    pub name: String,
    pub event: String,
    pub time: Option<DateTime<Utc>>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total: usize,
    pub unique_names: usize,
    pub unique_events: usize,
}

/// Per person count as returned by the leaderboard endpoint
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct LeaderboardCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1 based position in the sorted list (ties still get distinct ranks)
    pub rank: usize,
    pub name: String,
    pub count: u64,
}

impl AttendanceDraft {
    /// Trimmed values, `None` if either required field is blank
    pub fn validated(&self) -> Option<Self> {
        let name = self.name.trim();
        let event = self.event.trim();
        if name.is_empty() || event.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            event: event.to_string(),
            time: self.time,
        })
    }
}

impl From<&AttendanceRecord> for AttendanceDraft {
    fn from(value: &AttendanceRecord) -> Self {
        Self {
            name: value.name.clone(),
            event: value.event.clone(),
            time: value.time,
        }
    }
}

impl AttendanceStats {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let unique_names: HashSet<&str> = records.iter().map(|r| r.name.as_str()).collect();
        let unique_events: HashSet<&str> = records.iter().map(|r| r.event.as_str()).collect();
        Self {
            total: records.len(),
            unique_names: unique_names.len(),
            unique_events: unique_events.len(),
        }
    }
}

/// Sorts by count descending. Equal counts keep their input order and every
/// entry gets the next rank, so `{A:5, B:5, C:3}` ranks as 1, 2, 3.
pub fn rank_leaderboard(mut counts: Vec<LeaderboardCount>) -> Vec<LeaderboardEntry> {
    // `sort_by` is stable which is what keeps ties in input order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
        .into_iter()
        .enumerate()
        .map(|(i, LeaderboardCount { name, count })| LeaderboardEntry {
            rank: i + 1,
            name,
            count,
        })
        .collect()
}

/// Case insensitive match on name or event. An empty query keeps everything.
pub fn filter_records<'a>(
    records: &'a [AttendanceRecord],
    query: &str,
) -> Vec<&'a AttendanceRecord> {
    let query = query.trim().to_lowercase();
    records
        .iter()
        .filter(|r| {
            query.is_empty()
                || r.name.to_lowercase().contains(&query)
                || r.event.to_lowercase().contains(&query)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record(id: RecordId, name: &str, event: &str) -> AttendanceRecord {
        AttendanceRecord {
            id,
            name: name.to_string(),
            event: event.to_string(),
            time: None,
        }
    }

    fn count(name: &str, count: u64) -> LeaderboardCount {
        LeaderboardCount {
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn stats_count_unique_names_and_events() {
        // Arrange
        let records = vec![record(1, "A", "E1"), record(2, "A", "E2"), record(3, "B", "E1")];

        // Act
        let actual = AttendanceStats::from_records(&records);

        // Assert
        assert_eq!(
            actual,
            AttendanceStats {
                total: 3,
                unique_names: 2,
                unique_events: 2
            }
        );
    }

    #[test]
    fn stats_of_nothing_is_zero() {
        assert_eq!(AttendanceStats::from_records(&[]), AttendanceStats::default());
    }

    #[test]
    fn ties_keep_input_order_and_get_sequential_ranks() {
        // Act
        let actual = rank_leaderboard(vec![count("A", 5), count("B", 5), count("C", 3)]);

        // Assert
        let ranked: Vec<(usize, &str, u64)> = actual
            .iter()
            .map(|e| (e.rank, e.name.as_str(), e.count))
            .collect();
        assert_eq!(ranked, [(1, "A", 5), (2, "B", 5), (3, "C", 3)]);
    }

    #[test]
    fn unsorted_counts_are_sorted_descending() {
        let actual = rank_leaderboard(vec![count("C", 3), count("B", 5), count("D", 9), count("A", 5)]);
        let names: Vec<&str> = actual.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["D", "B", "A", "C"]);
        assert_eq!(actual.last().unwrap().rank, 4);
    }

    #[rstest]
    #[case::empty_keeps_all("", 3)]
    #[case::by_name("alice", 2)]
    #[case::case_insensitive("ALICE", 2)]
    #[case::by_event("raid", 2)]
    #[case::no_match("zzz", 0)]
    fn filtering(#[case] query: &str, #[case] expected: usize) {
        let records = vec![
            record(1, "Alice", "Raid night"),
            record(2, "Bob", "Raid night"),
            record(3, "alice", "Skilling"),
        ];
        assert_eq!(filter_records(&records, query).len(), expected);
    }

    #[rstest]
    #[case::blank_name("  ", "E1", false)]
    #[case::blank_event("A", "", false)]
    #[case::ok(" A ", " E1", true)]
    fn draft_validation(#[case] name: &str, #[case] event: &str, #[case] is_valid: bool) {
        let draft = AttendanceDraft {
            name: name.to_string(),
            event: event.to_string(),
            time: None,
        };
        let actual = draft.validated();
        assert_eq!(actual.is_some(), is_valid);
        if let Some(valid) = actual {
            assert_eq!(valid.name, "A");
            assert_eq!(valid.event, "E1");
        }
    }
}
