//! Trim-point compiler and equilibrium solver for nonlinear aircraft models.
//!
//! A sparse set of named flight-condition targets is validated
//! ([`normalize_target`]), compiled into known/free flags over every state,
//! output and input ([`compile_problem`]), solved for equilibrium against a
//! black-box [`DynamicsEvaluator`] ([`solve_trim`]) and turned back into a
//! reusable initial-condition bundle ([`materialize`]). [`run_trim`] chains
//! the stages for one request.

pub mod components;
pub mod physics;
pub mod resources;
pub mod systems;
pub mod utils;

pub use components::{
    ActuatorLimit, ActuatorLimits, BlockKind, ControlSurface, FlightCondition, NormalizedTarget,
    OutputQuantity, TrimBundle, TrimProblem, TrimRequest, TrimResponse, TrimSolution,
    TrimSolverConfig, TrimTarget, Variant,
};
pub use physics::{
    ControlInput, DynamicsEvaluator, Evaluation, EvaluatorError, FlightOutputs, ModelError,
    SimulationModel,
};
pub use resources::{ModelHandle, ModelLease};
pub use systems::{
    compile_problem, materialize, normalize_target, run_trim, run_trim_batch, solve_trim,
};
pub use utils::{TrimError, TrimResult};
