pub mod aircraft;
pub mod trim;

pub use aircraft::{
    AeroelasticLayout, AirframeLayout, BlockKind, BlockLayout, ControlSurface, InputSeed,
    RigidLayout, Variant,
};
pub use trim::{
    ActuatorLimit, ActuatorLimits, BlockValues, FlightCondition, InputSpec, NormalizedTarget,
    OutputCatalogue, OutputQuantity, OutputSpec, SolverDiagnostics, StateBlock, SurfaceSpec,
    TargetEntry, TargetKey, TrimBundle, TrimProblem, TrimProblemBuilder, TrimRequest,
    TrimResponse, TrimSolution, TrimSolverConfig, TrimTarget, VariableSpec, LEGACY_OUTPUT_INDEX,
    MOTOR_KEY,
};
