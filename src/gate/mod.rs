// Gateway module for gate - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod access_gate;
mod flags;
mod screen;

// Public re-exports - the ONLY way to access gate functionality
pub use access_gate::{AppAccessGate, BiometricPrompt, ChallengeOutcome, ChallengeReport, GateServices};
pub use flags::SessionFlags;
pub use screen::{resolve_screen, GateInputs, GateView, Screen};
