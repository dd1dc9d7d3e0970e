//! Responses of the calendar sync worker

use chrono::{DateTime, Utc};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_result: Option<String>,
    #[serde(default)]
    pub events_synced: Option<u64>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    #[serde(default)]
    pub calendar_id: Option<String>,
    #[serde(default)]
    pub interval_minutes: Option<u64>,
    #[serde(default)]
    pub enabled: bool,
}

/// Returned by a manual sync
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn total_changes(&self) -> u64 {
        self.created + self.updated + self.deleted
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let actual: SyncStatus = serde_json::from_str("{}").unwrap();
        assert_eq!(actual, SyncStatus::default());
    }

    #[test]
    fn report_totals() {
        let report: SyncReport =
            serde_json::from_str(r#"{"created": 2, "updated": 1, "errors": ["bad event"]}"#)
                .unwrap();
        assert_eq!(report.total_changes(), 3);
        assert!(!report.is_clean());
    }
}
