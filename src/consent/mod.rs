// Gateway module for consent - follows the Train Station Pattern

mod record;
mod store;

pub use record::{consent_validity_period, ConsentRecord, ConsentStatus};
pub use store::ConsentStore;
