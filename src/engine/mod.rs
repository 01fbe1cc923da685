pub mod backtest;
pub mod deployment;

pub use backtest::{SimulationConfig, SimulationEngine, SimulationResult};
pub use deployment::{AllocationDirective, AllocationEvent, DirectiveContext, SimulationError};
