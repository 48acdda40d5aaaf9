/// Constants module to avoid magic numbers in the codebase

// Consent
pub const CONSENT_VALIDITY_DAYS: i64 = 365;

// Session timeout
pub const SESSION_TIMEOUT_SECS: u64 = 15 * 60;
pub const SESSION_CHECK_INTERVAL_SECS: u64 = 60;

// Audit trail
pub const AUDIT_LOG_CAPACITY: usize = 1000;
pub const AUDIT_CSV_HEADER: [&str; 6] = [
    "Timestamp",
    "User ID",
    "Event Type",
    "Resource Type",
    "Resource ID",
    "Device Info",
];

// Runtime
pub const GATE_EVENT_QUEUE_CAPACITY: usize = 64;

// Biometric prompt copy
pub const APP_DISPLAY_NAME: &str = "SkinInsight Pro";
pub const BIOMETRIC_PROMPT_TITLE: &str = "Authentication Required";
pub const BIOMETRIC_PROMPT_REASON: &str = "Authenticate to access your patient data";
pub const BIOMETRIC_FAILURE_MESSAGE: &str = "Authentication failed. Please try again.";
pub const PASSCODE_FALLBACK_TITLE: &str = "Use Passcode";

// Session timeout overlay copy
pub const SESSION_EXPIRED_TITLE: &str = "Session Expired";
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired due to inactivity. Please log in again to continue.";

// Config locations
pub const CONFIG_DIR_NAME: &str = "skingate";
pub const LOCAL_CONFIG_PATH: &str = ".skingate/config.toml";
pub const ENV_PREFIX: &str = "SKINGATE_";
pub const PREFERENCES_FILE_NAME: &str = "preferences.toml";
