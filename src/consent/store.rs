use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;

use super::record::{ConsentRecord, ConsentStatus};
use crate::services::ConsentService;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Consent collaborator backed by the signed-in user's consent record
pub struct ConsentStore {
    record: RwLock<ConsentRecord>,
    clock: Clock,
}

impl Default for ConsentStore {
    fn default() -> Self {
        Self::new(ConsentRecord::default())
    }
}

impl ConsentStore {
    pub fn new(record: ConsentRecord) -> Self {
        Self {
            record: RwLock::new(record),
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the wall clock, e.g. to pin "now" in the simulator
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn record(&self) -> ConsentRecord {
        self.record.read().clone()
    }

    pub fn replace(&self, record: ConsentRecord) {
        *self.record.write() = record;
    }

    /// Store a fresh signature dated `signed_at`
    pub fn record_consent(&self, signature: &str, signed_at: DateTime<Utc>) {
        info!("consent recorded at {}", signed_at.to_rfc3339());
        self.replace(ConsentRecord::signed(signed_at, signature));
    }

    pub fn revoke(&self) {
        info!("consent revoked");
        self.replace(ConsentRecord::default());
    }

    pub fn status(&self) -> ConsentStatus {
        self.record.read().status_at((self.clock)())
    }
}

impl ConsentService for ConsentStore {
    fn has_user_consented(&self) -> bool {
        self.status() == ConsentStatus::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_store_tracks_record_lifecycle() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let store = ConsentStore::default().with_clock(move || now);
        assert!(!store.has_user_consented());

        store.record_consent("Dr. Vega", now - Duration::days(30));
        assert!(store.has_user_consented());

        store.revoke();
        assert_eq!(store.status(), ConsentStatus::Missing);
    }

    #[test]
    fn test_stale_signature_does_not_count() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        let store = ConsentStore::default().with_clock(move || now);
        store.record_consent("Dr. Vega", now - Duration::days(365));
        assert_eq!(store.status(), ConsentStatus::Expired);
        assert!(!store.has_user_consented());
    }
}
