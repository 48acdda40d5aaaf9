/// Runtime module - Gateway

mod console;
mod driver;
mod simulation;

pub use console::{Console, ConsoleBiometrics};
pub use driver::{GateEvent, GateHandle, GateRuntime};
pub use simulation::{
    SimStep, Simulation, SimulationReport, SimulationScript, SimulationSetup, StepRecord,
};
