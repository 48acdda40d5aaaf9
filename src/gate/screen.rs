use serde::{Deserialize, Serialize};

/// Top-level screens, mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Splash while the stored session is restored
    Loading,
    Unauthenticated,
    BiometricGate,
    ConsentRequired,
    ProfileCompletion,
    CompanySetup,
    MainApplication,
}

impl Screen {
    pub const ALL: [Screen; 7] = [
        Screen::Loading,
        Screen::Unauthenticated,
        Screen::BiometricGate,
        Screen::ConsentRequired,
        Screen::ProfileCompletion,
        Screen::CompanySetup,
        Screen::MainApplication,
    ];

    pub fn display_name(&self) -> &str {
        match self {
            Self::Loading => "Splash",
            Self::Unauthenticated => "Sign In",
            Self::BiometricGate => "Biometric Unlock",
            Self::ConsentRequired => "HIPAA Consent",
            Self::ProfileCompletion => "Complete Profile",
            Self::CompanySetup => "Company Setup",
            Self::MainApplication => "Main",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Every input screen resolution depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateInputs {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub requires_biometric_auth: bool,
    pub biometric_auth_passed: bool,
    pub has_user_consented: bool,
    pub needs_profile_completion: bool,
    pub needs_company_setup: bool,
}

/// Map inputs to a screen; first matching rule wins
pub fn resolve_screen(inputs: &GateInputs) -> Screen {
    if inputs.is_loading {
        Screen::Loading
    } else if !inputs.is_authenticated {
        Screen::Unauthenticated
    } else if inputs.requires_biometric_auth && !inputs.biometric_auth_passed {
        Screen::BiometricGate
    } else if !inputs.has_user_consented {
        Screen::ConsentRequired
    } else if inputs.needs_profile_completion {
        Screen::ProfileCompletion
    } else if inputs.needs_company_setup {
        Screen::CompanySetup
    } else {
        Screen::MainApplication
    }
}

/// What the caller should render after a trigger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateView {
    pub screen: Screen,
    /// Session-timeout overlay, drawn over whatever screen is active
    pub session_expired: bool,
    /// Inline error under the retry controls after a failed challenge
    pub biometric_error: Option<String>,
    /// Start the biometric challenge now, without waiting for a tap
    pub prompt_biometric: bool,
}

impl GateView {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            session_expired: false,
            biometric_error: None,
            prompt_biometric: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_inputs() -> Vec<GateInputs> {
        (0u8..128)
            .map(|bits| GateInputs {
                is_loading: bits & 1 != 0,
                is_authenticated: bits & 2 != 0,
                requires_biometric_auth: bits & 4 != 0,
                biometric_auth_passed: bits & 8 != 0,
                has_user_consented: bits & 16 != 0,
                needs_profile_completion: bits & 32 != 0,
                needs_company_setup: bits & 64 != 0,
            })
            .collect()
    }

    /// Independent restatement of the rule table: the screen at index i
    /// wins iff rule i matches and no earlier rule does.
    fn rule_matches(screen: Screen, i: &GateInputs) -> bool {
        match screen {
            Screen::Loading => i.is_loading,
            Screen::Unauthenticated => !i.is_authenticated,
            Screen::BiometricGate => i.requires_biometric_auth && !i.biometric_auth_passed,
            Screen::ConsentRequired => !i.has_user_consented,
            Screen::ProfileCompletion => i.needs_profile_completion,
            Screen::CompanySetup => i.needs_company_setup,
            Screen::MainApplication => true,
        }
    }

    #[test]
    fn test_first_matching_rule_wins_for_every_combination() {
        for inputs in all_inputs() {
            let expected = Screen::ALL
                .iter()
                .copied()
                .find(|screen| rule_matches(*screen, &inputs))
                .unwrap();
            assert_eq!(resolve_screen(&inputs), expected, "inputs: {:?}", inputs);
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        for inputs in all_inputs() {
            assert_eq!(resolve_screen(&inputs), resolve_screen(&inputs));
        }
    }

    #[test]
    fn test_every_screen_is_reachable() {
        let reached: std::collections::HashSet<Screen> =
            all_inputs().iter().map(resolve_screen).collect();
        assert_eq!(reached.len(), Screen::ALL.len());
    }

    #[test]
    fn test_guest_style_inputs_fall_through_to_consent() {
        let inputs = GateInputs {
            is_authenticated: true,
            requires_biometric_auth: false,
            ..GateInputs::default()
        };
        assert_eq!(resolve_screen(&inputs), Screen::ConsentRequired);
    }

    #[test]
    fn test_fully_onboarded_reaches_main() {
        let inputs = GateInputs {
            is_authenticated: true,
            requires_biometric_auth: true,
            biometric_auth_passed: true,
            has_user_consented: true,
            ..GateInputs::default()
        };
        assert_eq!(resolve_screen(&inputs), Screen::MainApplication);
    }
}
