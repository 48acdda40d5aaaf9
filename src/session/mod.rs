/// Session management module - Gateway

mod audit;
mod timeout;

pub use audit::{AuditEvent, AuditTrail, HipaaEventType};
pub use timeout::InactivityMonitor;
