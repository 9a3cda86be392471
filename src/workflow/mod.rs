pub mod commands;
pub mod controller;
pub mod state;

pub use controller::WorkflowController;
pub use state::{CustomerDetails, StepTiming, WorkflowState};
