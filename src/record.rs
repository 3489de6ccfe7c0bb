use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use std::fmt::Display;

// dd/mm/yyyy, HH.MM.SS, the layout of the id-ID locale
const CAPTURED_AT_FORMAT: &str = "%d/%m/%Y, %H.%M.%S";

/// One accepted scan.
///
/// Serialized with the column keys the export uses: `kehadiran` is the
/// capture timestamp and `nama` the decoded payload.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct ScanRecord {
    #[serde(rename = "kehadiran")]
    captured_at: String,
    #[serde(rename = "nama")]
    subject: String,
}

impl ScanRecord {
    pub fn new(subject: impl Into<String>, captured_at: impl Into<String>) -> Self {
        ScanRecord {
            subject: subject.into(),
            captured_at: captured_at.into(),
        }
    }

    /// Stamps `subject` with the current local wall-clock time.
    pub fn capture(subject: impl Into<String>) -> Self {
        Self::captured(subject, &Local::now())
    }

    pub fn captured<Tz: TimeZone>(subject: impl Into<String>, at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        Self::new(subject, format_captured_at(at))
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn captured_at(&self) -> &str {
        &self.captured_at
    }
}

pub fn format_captured_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format(CAPTURED_AT_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn timestamp_is_two_digit_except_year() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_captured_at(&at), "05/03/2024, 07.08.09");
    }

    #[test]
    fn timestamp_uses_the_given_offset() {
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        let at = Utc
            .with_ymd_and_hms(2024, 12, 31, 20, 0, 0)
            .unwrap()
            .with_timezone(&wib);
        assert_eq!(format_captured_at(&at), "01/01/2025, 03.00.00");
    }

    #[test]
    fn record_serializes_with_export_keys() {
        let record = ScanRecord::new("ABC123", "05/03/2024, 07.08.09");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["nama"], "ABC123");
        assert_eq!(json["kehadiran"], "05/03/2024, 07.08.09");
    }

    #[test]
    fn capture_keeps_subject_verbatim() {
        let record = ScanRecord::capture("  Siti Nurhaliza ");
        assert_eq!(record.subject(), "  Siti Nurhaliza ");
        assert!(!record.captured_at().is_empty());
    }
}
