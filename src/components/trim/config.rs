use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::components::aircraft::ControlSurface;
use crate::utils::{
    DEFAULT_COST_TOLERANCE, DEFAULT_FD_STEP, DEFAULT_INITIAL_DAMPING, DEFAULT_MAX_ITERATIONS,
    DEFAULT_STEP_TOLERANCE, DEFAULT_SURFACE_LIMIT,
};

/// Configuration for the trim solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimSolverConfig {
    /// Maximum number of iterations
    pub max_iterations: u64,
    /// Convergence tolerance for the sum of squared residuals
    pub cost_tolerance: f64,
    /// Minimum step norm before the search is considered stationary
    pub step_tolerance: f64,
    /// Starting Levenberg-Marquardt damping
    pub initial_damping: f64,
    /// Relative step for finite-difference Jacobians
    pub finite_difference_step: f64,
    /// Solver logging: 0 = warnings only, 1 = end-of-solve summary, 2 = every iteration
    pub verbosity: u8,
}

impl Default for TrimSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            cost_tolerance: DEFAULT_COST_TOLERANCE,
            step_tolerance: DEFAULT_STEP_TOLERANCE,
            initial_damping: DEFAULT_INITIAL_DAMPING,
            finite_difference_step: DEFAULT_FD_STEP,
            verbosity: 0,
        }
    }
}

impl TrimSolverConfig {
    /// Whether the end-of-solve summary is logged at info level.
    pub fn reports_summary(&self) -> bool {
        self.verbosity >= 1
    }

    /// Whether every solver iteration is logged.
    pub fn traces_iterations(&self) -> bool {
        self.verbosity >= 2
    }
}

/// Deflection limits of one actuator, both as magnitudes [rad].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorLimit {
    pub positive: f64,
    pub negative: f64,
}

impl ActuatorLimit {
    pub fn symmetric(limit: f64) -> Self {
        Self {
            positive: limit,
            negative: limit,
        }
    }

    /// `(lower, upper)` bound pair, or `None` when the entry is unusable.
    fn bounds(&self) -> Option<(f64, f64)> {
        let lower = -self.negative.abs();
        let upper = self.positive.abs();
        (lower.is_finite() && upper.is_finite() && lower < upper).then_some((lower, upper))
    }
}

/// Per-surface actuator limits supplied by the caller, keyed by surface name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActuatorLimits {
    limits: BTreeMap<String, ActuatorLimit>,
}

impl ActuatorLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, surface: ControlSurface, limit: ActuatorLimit) -> Self {
        self.limits.insert(surface.name().to_string(), limit);
        self
    }

    pub fn get(&self, surface: ControlSurface) -> Option<&ActuatorLimit> {
        self.limits.get(surface.name())
    }

    /// Bounds applied to every surface when no limits were supplied.
    pub fn default_bounds() -> (f64, f64) {
        (-DEFAULT_SURFACE_LIMIT, DEFAULT_SURFACE_LIMIT)
    }

    /// Bounds for `surface` from an optional limits table.
    ///
    /// Without a table every surface takes the default ±25° quietly; a table
    /// that lacks the surface, or carries an unusable entry, is warned about.
    pub fn resolve(limits: Option<&Self>, surface: ControlSurface) -> (f64, f64) {
        match limits {
            Some(limits) => limits.bounds_for(surface),
            None => {
                debug!(
                    "No actuator limits supplied, {} uses ±{} rad",
                    surface, DEFAULT_SURFACE_LIMIT
                );
                Self::default_bounds()
            }
        }
    }

    /// Bounds for `surface`, falling back to the default ±25° when the entry
    /// is missing or unusable.
    pub fn bounds_for(&self, surface: ControlSurface) -> (f64, f64) {
        match self.get(surface).map(|limit| (limit, limit.bounds())) {
            Some((_, Some(bounds))) => bounds,
            Some((limit, None)) => {
                warn!(
                    "Ignoring invalid actuator limit for {}: {:?}, using ±{} rad",
                    surface, limit, DEFAULT_SURFACE_LIMIT
                );
                Self::default_bounds()
            }
            None => {
                warn!(
                    "No actuator limit for {}, using ±{} rad",
                    surface, DEFAULT_SURFACE_LIMIT
                );
                Self::default_bounds()
            }
        }
    }
}
