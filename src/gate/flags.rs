use serde::{Deserialize, Serialize};

/// Biometric session flags. Only the gate mutates these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    biometric_auth_passed: bool,
    requires_biometric_auth: bool,
}

impl SessionFlags {
    pub fn biometric_auth_passed(&self) -> bool {
        self.biometric_auth_passed
    }

    pub fn requires_biometric_auth(&self) -> bool {
        self.requires_biometric_auth
    }

    /// Recompute the requirement; when required, force a fresh challenge
    pub(crate) fn recompute_biometric_requirement(
        &mut self,
        biometric_enabled: bool,
        hardware_available: bool,
        is_guest_mode: bool,
    ) -> bool {
        self.requires_biometric_auth = biometric_enabled && hardware_available && !is_guest_mode;
        if self.requires_biometric_auth {
            self.biometric_auth_passed = false;
        }
        self.requires_biometric_auth
    }

    pub(crate) fn mark_passed(&mut self) {
        self.biometric_auth_passed = true;
    }

    /// Logged out: nothing left to protect
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_needs_all_three_inputs() {
        for bits in 0u8..8 {
            let (enabled, hardware, guest) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let mut flags = SessionFlags::default();
            let required = flags.recompute_biometric_requirement(enabled, hardware, guest);
            assert_eq!(required, enabled && hardware && !guest);
            assert_eq!(flags.requires_biometric_auth(), required);
        }
    }

    #[test]
    fn test_recompute_forces_rechallenge() {
        let mut flags = SessionFlags::default();
        flags.recompute_biometric_requirement(true, true, false);
        flags.mark_passed();
        assert!(flags.biometric_auth_passed());

        flags.recompute_biometric_requirement(true, true, false);
        assert!(!flags.biometric_auth_passed());
    }

    #[test]
    fn test_not_required_keeps_passed_flag() {
        let mut flags = SessionFlags::default();
        flags.mark_passed();
        flags.recompute_biometric_requirement(true, true, true);
        assert!(!flags.requires_biometric_auth());
        assert!(flags.biometric_auth_passed());
    }

    #[test]
    fn test_reset_clears_both() {
        let mut flags = SessionFlags::default();
        flags.recompute_biometric_requirement(true, true, false);
        flags.mark_passed();
        flags.reset();
        assert_eq!(flags, SessionFlags::default());
    }
}
