/// Default control-surface deflection limit, 25 degrees [rad].
pub const DEFAULT_SURFACE_LIMIT: f64 = 0.4363;

pub const MOTOR_RANGE: (f64, f64) = (0.0, 1.0);

/// Convergence threshold on the sum of squared residuals.
pub const DEFAULT_COST_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_STEP_TOLERANCE: f64 = 1e-12;
pub const DEFAULT_MAX_ITERATIONS: u64 = 400;
pub const DEFAULT_INITIAL_DAMPING: f64 = 1e-3;
pub const DEFAULT_FD_STEP: f64 = 1e-6;

/// Damping above which the solver treats the current point as stationary.
pub const MAX_DAMPING: f64 = 1e12;
pub const MIN_DAMPING: f64 = 1e-7;
