mod config;
mod event;
mod problem;
mod spec;
mod state;
mod target;

pub use config::{ActuatorLimit, ActuatorLimits, TrimSolverConfig};
pub use event::{TrimRequest, TrimResponse};
pub use problem::{StateBlock, TrimProblem, TrimProblemBuilder};
pub use spec::{
    InputSpec, OutputCatalogue, OutputQuantity, OutputSpec, SurfaceSpec, VariableSpec,
    LEGACY_OUTPUT_INDEX,
};
pub use state::{BlockValues, SolverDiagnostics, TrimBundle, TrimSolution};
pub use target::{
    FlightCondition, NormalizedTarget, TargetEntry, TargetKey, TrimTarget, MOTOR_KEY,
};
