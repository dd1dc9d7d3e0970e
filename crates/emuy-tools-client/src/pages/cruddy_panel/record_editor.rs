use chrono::{DateTime, NaiveDateTime, Utc};
use emuy_shared::attendance::{AttendanceDraft, AttendanceRecord, RecordId};

/// Format shown as the hint of the time field
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Form used both to create a record and to edit an existing one
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordEditor {
    /// `None` when creating
    pub editing: Option<RecordId>,
    pub name: String,
    pub event: String,
    /// Blank for no time, otherwise [`TIME_FORMAT`] (UTC) or RFC 3339
    pub time: String,
    /// Time of the record being edited. [`TIME_FORMAT`] drops the seconds so
    /// this is sent as is unless the time text was changed.
    loaded_time: Option<DateTime<Utc>>,
}

impl RecordEditor {
    pub fn new_record() -> Self {
        Self::default()
    }

    pub fn edit(record: &AttendanceRecord) -> Self {
        Self {
            editing: Some(record.id),
            name: record.name.clone(),
            event: record.event.clone(),
            time: format_time(record.time),
            loaded_time: record.time,
        }
    }

    pub fn heading(&self) -> String {
        match self.editing {
            Some(id) => format!("Edit record {id}"),
            None => "New record".to_string(),
        }
    }

    /// Fails with a message suitable for showing next to the form
    pub fn to_draft(&self) -> Result<AttendanceDraft, String> {
        let time = if self.time.trim() == format_time(self.loaded_time) {
            self.loaded_time
        } else {
            parse_time(&self.time)?
        };
        AttendanceDraft {
            name: self.name.clone(),
            event: self.event.clone(),
            time,
        }
        .validated()
        .ok_or_else(|| "Name and event are required".to_string())
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

fn parse_time(value: &str) -> Result<Option<DateTime<Utc>>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, TIME_FORMAT) {
        return Ok(Some(naive.and_utc()));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|_| "Time must look like 2024-05-01 18:30".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use rstest::rstest;

    fn editor(name: &str, event: &str, time: &str) -> RecordEditor {
        RecordEditor {
            editing: None,
            name: name.to_string(),
            event: event.to_string(),
            time: time.to_string(),
            loaded_time: None,
        }
    }

    fn record_at(time: Option<DateTime<Utc>>) -> AttendanceRecord {
        AttendanceRecord {
            id: 3,
            name: "Ana".to_string(),
            event: "Raid".to_string(),
            time,
        }
    }

    #[test]
    fn edit_prefills_from_record() {
        // Arrange
        let record = AttendanceRecord {
            id: 7,
            name: "Ana".to_string(),
            event: "Raid".to_string(),
            time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap()),
        };

        // Act
        let actual = RecordEditor::edit(&record);

        // Assert
        assert_eq!(actual.editing, Some(7));
        assert_eq!(actual.time, "2024-05-01 18:30");
        assert_eq!(actual.heading(), "Edit record 7");
        assert_eq!(actual.to_draft().unwrap(), AttendanceDraft::from(&record));
    }

    #[test]
    fn unedited_time_keeps_its_seconds() {
        // Arrange
        let loaded = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 45).unwrap();
        let mut editor = RecordEditor::edit(&record_at(Some(loaded)));
        editor.name = "Ana B".to_string();

        // Act
        let actual = editor.to_draft().unwrap();

        // Assert
        assert_eq!(editor.time, "2024-05-01 18:30");
        assert_eq!(actual.time, Some(loaded));
        assert_eq!(actual.name, "Ana B");
    }

    #[rstest]
    #[case::changed("2024-05-02 09:15", Some((2024, 5, 2, 9, 15)))]
    #[case::cleared("  ", None)]
    fn edited_time_replaces_the_loaded_one(
        #[case] time: &str,
        #[case] expected: Option<(i32, u32, u32, u32, u32)>,
    ) {
        // Arrange
        let loaded = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 45).unwrap();
        let mut editor = RecordEditor::edit(&record_at(Some(loaded)));
        editor.time = time.to_string();
        let expected =
            expected.map(|(y, mo, d, h, mi)| Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap());

        // Act
        let actual = editor.to_draft().unwrap();

        // Assert
        assert_eq!(actual.time, expected);
    }

    #[rstest]
    #[case::blank("", None)]
    #[case::short_format(" 2024-05-01 18:30 ", Some((2024, 5, 1, 18, 30)))]
    #[case::rfc3339("2024-05-01T20:30:00+02:00", Some((2024, 5, 1, 18, 30)))]
    fn accepted_times(#[case] time: &str, #[case] expected: Option<(i32, u32, u32, u32, u32)>) {
        // Arrange
        let expected =
            expected.map(|(y, mo, d, h, mi)| Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap());

        // Act
        let actual = editor("Ana", "Raid", time).to_draft().unwrap();

        // Assert
        assert_eq!(actual.time, expected);
    }

    #[rstest]
    #[case::blank_name(" ", "Raid", "")]
    #[case::blank_event("Ana", "", "")]
    #[case::bad_time("Ana", "Raid", "yesterday")]
    fn rejected_forms(#[case] name: &str, #[case] event: &str, #[case] time: &str) {
        assert!(editor(name, event, time).to_draft().is_err());
    }

    #[test]
    fn values_are_trimmed() {
        let actual = editor("  Ana ", " Raid", "").to_draft().unwrap();
        assert_eq!(actual.name, "Ana");
        assert_eq!(actual.event, "Raid");
    }
}
