// Gateway module for services - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod memory;
mod traits;
mod types;

// Public re-exports - the ONLY way to access service functionality
pub use memory::{InMemoryAuth, ManualSessionTimeout, ScriptedBiometrics};
pub use traits::{AuthService, BiometricService, ConsentService, SessionTimeoutService};
pub use types::{AuthSnapshot, BiometricType, ChallengeMethod};

#[cfg(test)]
pub use traits::{MockAuthService, MockConsentService};
