use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::components::aircraft::Variant;
use crate::components::trim::config::{ActuatorLimits, TrimSolverConfig};
use crate::components::trim::state::{TrimBundle, TrimSolution};
use crate::components::trim::target::{NormalizedTarget, TrimTarget};
use crate::utils::{TrimError, TrimResult};

/// One trim request: what to hold, which airframe, and where to start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimRequest {
    pub target: TrimTarget,
    pub variant: Variant,
    /// Seed state and inputs. Defaults to the layout's seeds when absent.
    #[serde(default)]
    pub prior: Option<TrimBundle>,
    #[serde(default)]
    pub actuator_limits: Option<ActuatorLimits>,
    #[serde(default)]
    pub solver: TrimSolverConfig,
    /// Destination for the persisted record.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Reject non-converged solutions instead of materializing them.
    #[serde(default)]
    pub strict: bool,
}

impl TrimRequest {
    pub fn new(variant: Variant, target: TrimTarget) -> Self {
        Self {
            target,
            variant,
            prior: None,
            actuator_limits: None,
            solver: TrimSolverConfig::default(),
            output: None,
            strict: false,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> TrimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| TrimError::io(path, e))?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn with_prior(mut self, prior: TrimBundle) -> Self {
        self.prior = Some(prior);
        self
    }

    pub fn with_actuator_limits(mut self, limits: ActuatorLimits) -> Self {
        self.actuator_limits = Some(limits);
        self
    }

    pub fn with_solver(mut self, solver: TrimSolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// The prior bundle, or the variant's default seeds.
    pub fn seed(&self) -> TrimBundle {
        self.prior
            .clone()
            .unwrap_or_else(|| TrimBundle::default_for(self.variant))
    }
}

/// Everything a completed request hands back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimResponse {
    pub solution: TrimSolution,
    /// The target after validation and defaulting, as actually solved.
    pub normalized_target: NormalizedTarget,
    pub bundle: TrimBundle,
    pub persisted_to: Option<PathBuf>,
}
