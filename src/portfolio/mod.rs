pub mod state;
pub mod window;

pub use state::SimulationState;
pub use window::PriceWindow;
