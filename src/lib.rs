pub mod app;
pub mod cli;
pub mod consent;
pub mod constants;
pub mod gate;
pub mod runtime;
pub mod services;
pub mod session;
pub mod utils;

pub use app::{load_config, Config};
pub use gate::{AppAccessGate, GateServices, GateView, Screen, SessionFlags};
pub use runtime::{GateEvent, GateRuntime};
pub use utils::GateError;
