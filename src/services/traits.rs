use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::types::{AuthSnapshot, BiometricType};

/// Platform biometric authentication (Face ID / Touch ID / passcode)
#[async_trait]
pub trait BiometricService: Send + Sync {
    /// Whether the user turned biometric unlock on in settings
    fn is_enabled(&self) -> bool;

    /// Whether the device can evaluate a biometric policy right now
    fn is_hardware_available(&self) -> bool;

    /// Sensor kind, used for prompt copy
    fn biometric_type(&self) -> BiometricType {
        BiometricType::None
    }

    /// Run a biometric challenge. Failures are folded into `false`.
    async fn challenge(&self) -> bool;

    /// Run a challenge that allows the device passcode as fallback
    async fn challenge_with_fallback_passcode(&self) -> bool;
}

/// Account/session state owned by the auth layer
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    fn snapshot(&self) -> AuthSnapshot;

    /// Best-effort reload of the user's profile from the account service
    async fn refresh_profile(&self, user_id: &str) -> Result<()>;
}

/// HIPAA consent state for the signed-in user
#[cfg_attr(test, automock)]
pub trait ConsentService: Send + Sync {
    fn has_user_consented(&self) -> bool;
}

/// Idle-timer collaborator; the gate reads it and toggles monitoring
pub trait SessionTimeoutService: Send + Sync {
    fn is_session_expired(&self) -> bool;
    fn start_monitoring(&self);
    fn stop_monitoring(&self);
}
