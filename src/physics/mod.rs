pub mod error;
pub mod traits;

pub use error::{EvaluatorError, ModelError};
pub use traits::{ControlInput, DynamicsEvaluator, Evaluation, FlightOutputs, SimulationModel};
