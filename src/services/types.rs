use serde::{Deserialize, Serialize};

/// Point-in-time view of the auth service, read-only to the gate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub is_guest_mode: bool,
    pub needs_profile_completion: bool,
    pub needs_company_setup: bool,
    pub current_user_id: Option<String>,
}

impl AuthSnapshot {
    /// Snapshot while the stored session is still being restored
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    /// Fully onboarded, registered user
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            current_user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Authenticated-but-unregistered session
    pub fn guest(user_id: impl Into<String>) -> Self {
        Self {
            is_guest_mode: true,
            ..Self::signed_in(user_id)
        }
    }
}

/// Kind of biometric sensor the device offers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiometricType {
    FaceId,
    TouchId,
    OpticId,
    #[default]
    None,
}

impl BiometricType {
    pub fn display_name(&self) -> &str {
        match self {
            Self::FaceId => "Face ID",
            Self::TouchId => "Touch ID",
            Self::OpticId => "Optic ID",
            Self::None => "Biometric Authentication",
        }
    }

    pub fn icon(&self) -> &str {
        match self {
            Self::FaceId => "faceid",
            Self::TouchId => "touchid",
            Self::OpticId => "opticid",
            Self::None => "lock.fill",
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// How the user chose to clear the biometric gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeMethod {
    Biometric,
    Passcode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_constructors() {
        let guest = AuthSnapshot::guest("g-1");
        assert!(guest.is_authenticated);
        assert!(guest.is_guest_mode);
        assert_eq!(guest.current_user_id.as_deref(), Some("g-1"));

        let loading = AuthSnapshot::loading();
        assert!(loading.is_loading);
        assert!(!loading.is_authenticated);
    }

    #[test]
    fn test_biometric_type_names() {
        assert_eq!(BiometricType::FaceId.display_name(), "Face ID");
        assert_eq!(BiometricType::None.display_name(), "Biometric Authentication");
        assert!(BiometricType::TouchId.is_available());
        assert!(!BiometricType::None.is_available());
    }
}
