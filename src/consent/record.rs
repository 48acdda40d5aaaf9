use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::CONSENT_VALIDITY_DAYS;

/// A client's signed HIPAA consent, as stored by the account service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// ISO-8601 timestamp of the signature
    pub consent_date: Option<String>,
    pub consent_signature: Option<String>,
}

/// Where a consent record stands relative to its validity window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    Valid,
    Expired,
    Missing,
}

impl ConsentStatus {
    pub fn display_text(&self) -> &str {
        match self {
            Self::Valid => "Valid Consent",
            Self::Expired => "Expired Consent",
            Self::Missing => "No Consent",
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            Self::Valid => "checkmark.seal.fill",
            Self::Expired => "exclamationmark.triangle.fill",
            Self::Missing => "xmark.seal.fill",
        }
    }
}

/// Length of the window during which a signature counts as consent
pub fn consent_validity_period() -> Duration {
    Duration::days(CONSENT_VALIDITY_DAYS)
}

impl ConsentRecord {
    /// Record signed at `signed_at`
    pub fn signed(signed_at: DateTime<Utc>, signature: impl Into<String>) -> Self {
        Self {
            consent_date: Some(signed_at.to_rfc3339()),
            consent_signature: Some(signature.into()),
        }
    }

    fn signed_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.consent_date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|date| date.with_timezone(&Utc))
    }

    /// Signature date plus the validity period. Needs a parseable date, not a signature.
    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.signed_at()
            .and_then(|date| date.checked_add_signed(consent_validity_period()))
    }

    /// Expiry of a complete (dated and signed) record
    fn signed_expiry(&self) -> Option<DateTime<Utc>> {
        self.consent_signature.as_ref()?;
        self.expiration_date()
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.signed_expiry().is_some_and(|expiry| now < expiry)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.signed_expiry().is_some_and(|expiry| now >= expiry)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> ConsentStatus {
        if self.is_valid_at(now) {
            ConsentStatus::Valid
        } else if self.is_expired_at(now) {
            ConsentStatus::Expired
        } else {
            ConsentStatus::Missing
        }
    }

    pub fn status(&self) -> ConsentStatus {
        self.status_at(Utc::now())
    }
}
