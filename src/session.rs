use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::collections::HashSet;
use std::time::Instant;

use crate::error::SessionError;
use crate::notification::{NotificationCenter, Severity, TimerHandle};
use crate::record::ScanRecord;

pub const ACCEPTED_MESSAGE: &str = "QR code berhasil dipindai dan disimpan!";
pub const DUPLICATE_MESSAGE: &str = "QR code ini sudah pernah dipindai.";
pub const NO_DATA_MESSAGE: &str = "Tidak ada data untuk diekspor.";

/// Result of submitting one piece of decoded text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Novel subject, a record was appended.
    Accepted,
    /// Subject already recorded, nothing appended.
    Duplicate,
    /// Empty text, nothing happened at all.
    Ignored,
}

/// Accumulated attendance for one sitting.
///
/// Records are append-only and kept in scan order. A subject index sits
/// next to the list so duplicate checks do not walk every record.
#[derive(Debug, Default)]
pub struct ScanSession {
    records: Vec<ScanRecord>,
    subjects: HashSet<String>,
    scanning: bool,
    notifications: NotificationCenter,
    last_timer: Option<TimerHandle>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notifications(notifications: NotificationCenter) -> Self {
        ScanSession {
            notifications,
            ..Self::default()
        }
    }

    pub fn start_scanning(&mut self) {
        self.scanning = true;
    }

    pub fn stop_scanning(&mut self) {
        self.scanning = false;
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    /// Submit decoded text, stamped with the current time.
    pub fn submit_scan(&mut self, text: &str) -> Outcome {
        self.submit_scan_at(text, &Local::now(), Instant::now())
    }

    /// Submit decoded text with explicit clocks.
    ///
    /// `captured_at` stamps an accepted record; `now` starts the
    /// notification window. Empty text is ignored outright. Any other
    /// submission stops scanning, whether or not it was accepted.
    pub fn submit_scan_at(
        &mut self,
        text: &str,
        captured_at: &DateTime<Local>,
        now: Instant,
    ) -> Outcome {
        if text.is_empty() {
            return Outcome::Ignored;
        }

        let outcome = if self.subjects.contains(text) {
            warn!("duplicate scan: {}", text);
            self.raise(DUPLICATE_MESSAGE, Severity::Error, now);
            Outcome::Duplicate
        } else {
            let record = ScanRecord::captured(text, captured_at);
            info!("recorded {} at {}", record.subject(), record.captured_at());
            self.subjects.insert(text.to_string());
            self.records.push(record);
            self.raise(ACCEPTED_MESSAGE, Severity::Success, now);
            Outcome::Accepted
        };

        self.scanning = false;
        outcome
    }

    /// Log a decoder failure. Not shown to the user.
    pub fn report_decode_error(&self, err: &str) {
        error!("{}", SessionError::Decode(err.to_string()));
    }

    /// Records in scan order, ready for a serializer.
    ///
    /// # Errors
    /// * `SessionError::NoData` if nothing has been scanned yet
    pub fn export_records(&self) -> Result<&[ScanRecord], SessionError> {
        if self.records.is_empty() {
            return Err(SessionError::NoData);
        }
        Ok(&self.records)
    }

    /// Drop every record and stop scanning. The notification slot is left alone.
    pub fn reset(&mut self) {
        info!("session reset, {} records dropped", self.records.len());
        self.records.clear();
        self.subjects.clear();
        self.scanning = false;
    }

    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }

    pub fn can_export(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    /// Handle of the clear scheduled by the most recent notification.
    pub fn last_timer(&self) -> Option<TimerHandle> {
        self.last_timer
    }

    fn raise(&mut self, message: &str, severity: Severity, now: Instant) {
        self.last_timer = Some(self.notifications.notify_at(message, severity, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 8, 17, h, m, s).unwrap()
    }

    #[test]
    fn accepted_scan_appends_and_notifies() {
        let mut session = ScanSession::new();
        session.start_scanning();

        let outcome = session.submit_scan_at("ABC123", &at(8, 0, 1), Instant::now());

        assert_eq!(outcome, Outcome::Accepted);
        assert_eq!(session.len(), 1);
        assert_eq!(session.records()[0].subject(), "ABC123");
        assert_eq!(session.records()[0].captured_at(), "17/08/2024, 08.00.01");
        assert_eq!(session.notifications().current().message, ACCEPTED_MESSAGE);
        assert_eq!(
            session.notifications().current().severity,
            Some(Severity::Success)
        );
        assert!(!session.is_scanning());
    }

    #[test]
    fn duplicate_scan_leaves_records_untouched() {
        let mut session = ScanSession::new();
        session.submit_scan_at("ABC123", &at(8, 0, 1), Instant::now());
        session.start_scanning();

        let outcome = session.submit_scan_at("ABC123", &at(8, 5, 0), Instant::now());

        assert_eq!(outcome, Outcome::Duplicate);
        assert_eq!(session.len(), 1);
        assert_eq!(session.records()[0].captured_at(), "17/08/2024, 08.00.01");
        assert_eq!(session.notifications().current().message, DUPLICATE_MESSAGE);
        assert_eq!(
            session.notifications().current().severity,
            Some(Severity::Error)
        );
        assert!(!session.is_scanning());
    }

    #[test]
    fn dedup_is_case_sensitive_and_exact() {
        let mut session = ScanSession::new();
        assert_eq!(session.submit_scan("abc"), Outcome::Accepted);
        assert_eq!(session.submit_scan("ABC"), Outcome::Accepted);
        assert_eq!(session.submit_scan("abc "), Outcome::Accepted);
        assert_eq!(session.submit_scan("abc"), Outcome::Duplicate);
        assert_eq!(session.len(), 3);
    }

    #[test]
    fn empty_text_is_ignored() {
        let mut session = ScanSession::new();
        session.start_scanning();

        assert_eq!(session.submit_scan(""), Outcome::Ignored);
        assert!(session.is_empty());
        assert!(session.is_scanning());
        assert!(!session.notifications().is_visible());
        assert!(session.last_timer().is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut session = ScanSession::new();
        session.stop_scanning();
        session.stop_scanning();
        assert!(!session.is_scanning());
        session.start_scanning();
        assert!(session.is_scanning());
    }

    #[test]
    fn decode_error_keeps_scanning_state() {
        let mut session = ScanSession::new();
        session.start_scanning();
        session.report_decode_error("NotFoundException");
        assert!(session.is_scanning());
        assert!(!session.notifications().is_visible());
    }

    #[test]
    fn export_empty_session_is_no_data() {
        let session = ScanSession::new();
        assert_eq!(session.export_records(), Err(SessionError::NoData));
        assert!(!session.can_export());
    }

    #[test]
    fn export_returns_scan_order() {
        let mut session = ScanSession::new();
        session.submit_scan("B");
        session.submit_scan("A");
        session.submit_scan("C");

        let subjects: Vec<&str> = session
            .export_records()
            .unwrap()
            .iter()
            .map(|r| r.subject())
            .collect();
        assert_eq!(subjects, vec!["B", "A", "C"]);
    }

    #[test]
    fn reset_clears_index_too() {
        let mut session = ScanSession::new();
        session.submit_scan("A");
        session.start_scanning();
        session.reset();

        assert!(session.is_empty());
        assert!(!session.contains("A"));
        assert!(!session.is_scanning());
        assert_eq!(session.submit_scan("A"), Outcome::Accepted);
    }

    #[test]
    fn last_timer_tracks_latest_notification() {
        let t0 = Instant::now();
        let mut session = ScanSession::new();
        session.submit_scan_at("A", &at(9, 0, 0), t0);
        let first = session.last_timer().unwrap();
        session.submit_scan_at("A", &at(9, 0, 1), t0);
        let second = session.last_timer().unwrap();

        assert_ne!(first, second);
        assert!(!session.notifications_mut().fire(first));
        assert!(session.notifications_mut().fire(second));
        assert!(!session.notifications().is_visible());
    }
}
