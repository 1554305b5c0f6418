use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::components::aircraft::{BlockKind, ControlSurface, Variant};
use crate::components::trim::problem::StateBlock;
use crate::components::trim::spec::{InputSpec, OutputCatalogue, OutputQuantity};
use crate::utils::{TrimError, TrimResult};

/// Values of one state block inside a [`TrimBundle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockValues {
    pub kind: BlockKind,
    pub values: Vec<f64>,
}

/// Named initial-condition bundle: seeds a trim request and is what a solved
/// trim is materialized back into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimBundle {
    pub variant: Variant,
    pub states: Vec<BlockValues>,
    pub motor: f64,
    pub surfaces: BTreeMap<ControlSurface, f64>,
}

impl TrimBundle {
    /// Bundle built from the layout's default seeds.
    pub fn default_for(variant: Variant) -> Self {
        let layout = variant.layout();
        let seeds = layout.default_seeds();
        Self {
            variant,
            states: layout
                .state_blocks()
                .into_iter()
                .map(|block| BlockValues {
                    kind: block.kind,
                    values: block.default_seed,
                })
                .collect(),
            motor: seeds.motor,
            surfaces: seeds.surfaces.into_iter().collect(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> TrimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| TrimError::io(path, e))?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn block(&self, kind: BlockKind) -> Option<&[f64]> {
        self.states
            .iter()
            .find(|block| block.kind == kind)
            .map(|block| block.values.as_slice())
    }

    pub fn block_mut(&mut self, kind: BlockKind) -> Option<&mut Vec<f64>> {
        self.states
            .iter_mut()
            .find(|block| block.kind == kind)
            .map(|block| &mut block.values)
    }

    pub fn surface(&self, surface: ControlSurface) -> Option<f64> {
        self.surfaces.get(&surface).copied()
    }
}

/// Solver outcome, reported whether or not the search converged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolverDiagnostics {
    pub converged: bool,
    pub iterations: u64,
    /// Euclidean norm of the final residual vector
    pub residual_norm: f64,
    /// Sum of squared residuals
    pub cost: f64,
    pub termination: String,
}

/// Results from the trim calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimSolution {
    variant: Variant,
    states: Vec<StateBlock>,
    outputs: OutputCatalogue,
    inputs: InputSpec,
    diagnostics: SolverDiagnostics,
}

impl TrimSolution {
    pub(crate) fn new(
        variant: Variant,
        states: Vec<StateBlock>,
        outputs: OutputCatalogue,
        inputs: InputSpec,
        diagnostics: SolverDiagnostics,
    ) -> Self {
        Self {
            variant,
            states,
            outputs,
            inputs,
            diagnostics,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn states(&self) -> &[StateBlock] {
        &self.states
    }

    pub fn state(&self, kind: BlockKind, index: usize) -> Option<f64> {
        self.states
            .iter()
            .find(|block| block.kind == kind)
            .and_then(|block| block.components.get(index))
            .map(|spec| spec.value)
    }

    pub fn outputs(&self) -> &OutputCatalogue {
        &self.outputs
    }

    /// Evaluated value of one output component at the solution.
    pub fn output(&self, quantity: OutputQuantity, index: usize) -> Option<f64> {
        self.outputs
            .get(quantity)
            .components
            .get(index)
            .map(|spec| spec.value)
    }

    pub fn inputs(&self) -> &InputSpec {
        &self.inputs
    }

    pub fn motor(&self) -> f64 {
        self.inputs.motor.value
    }

    pub fn surface(&self, surface: ControlSurface) -> Option<f64> {
        self.inputs.surface(surface).map(|spec| spec.value)
    }

    pub fn diagnostics(&self) -> &SolverDiagnostics {
        &self.diagnostics
    }

    pub fn converged(&self) -> bool {
        self.diagnostics.converged
    }
}
