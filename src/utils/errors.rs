use thiserror::Error;

/// Main error type for SkinGate
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Biometric challenge failed: {0}")]
    BiometricChallengeFailed(String),

    #[error("Profile refresh failed for user {user_id}: {reason}")]
    ProfileRefreshFailed { user_id: String, reason: String },

    #[error("Simulation script error: {0}")]
    ScriptError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Export error: {0}")]
    ExportError(String),
}
