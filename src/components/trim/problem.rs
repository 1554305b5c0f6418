use serde::Serialize;

use crate::components::aircraft::{BlockKind, ControlSurface, Variant};
use crate::components::trim::spec::{
    InputSpec, OutputCatalogue, OutputQuantity, OutputSpec, VariableSpec,
};

/// A named group of state components for one physical subsystem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateBlock {
    pub kind: BlockKind,
    pub components: Vec<VariableSpec>,
}

impl StateBlock {
    pub fn new(kind: BlockKind, components: Vec<VariableSpec>) -> Self {
        Self { kind, components }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.components.iter().map(|c| c.value).collect()
    }
}

/// Fully compiled trim problem: every state, output and input with its
/// known/free flags, targets and bounds.
///
/// Constructed only through [`TrimProblemBuilder`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimProblem {
    variant: Variant,
    states: Vec<StateBlock>,
    outputs: OutputCatalogue,
    inputs: InputSpec,
}

impl TrimProblem {
    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn states(&self) -> &[StateBlock] {
        &self.states
    }

    pub fn state_block(&self, kind: BlockKind) -> Option<&StateBlock> {
        self.states.iter().find(|block| block.kind == kind)
    }

    pub fn state(&self, kind: BlockKind, index: usize) -> Option<&VariableSpec> {
        self.state_block(kind)
            .and_then(|block| block.components.get(index))
    }

    pub fn outputs(&self) -> &OutputCatalogue {
        &self.outputs
    }

    pub fn output(&self, quantity: OutputQuantity) -> &OutputSpec {
        self.outputs.get(quantity)
    }

    pub fn inputs(&self) -> &InputSpec {
        &self.inputs
    }

    pub fn state_len(&self) -> usize {
        self.states.iter().map(StateBlock::len).sum()
    }

    /// Count of free states and inputs.
    pub fn free_count(&self) -> usize {
        let states = self
            .states
            .iter()
            .flat_map(|block| block.components.iter())
            .filter(|spec| spec.is_free())
            .count();
        let inputs = std::iter::once(&self.inputs.motor)
            .chain(self.inputs.surfaces.iter().map(|entry| &entry.spec))
            .filter(|spec| spec.is_free())
            .count();
        states + inputs
    }

    /// Count of scalar equations imposed: steady-state derivatives plus
    /// constrained outputs.
    pub fn constraint_count(&self) -> usize {
        let steady = self
            .states
            .iter()
            .flat_map(|block| block.components.iter())
            .filter(|spec| spec.steady_state)
            .count();
        steady + self.outputs.known_count()
    }
}

/// Consuming builder for [`TrimProblem`]. Setters addressing a block,
/// component or surface the layout does not have are ignored.
#[derive(Debug, Clone)]
pub struct TrimProblemBuilder {
    variant: Variant,
    states: Vec<StateBlock>,
    outputs: OutputCatalogue,
    inputs: InputSpec,
}

impl TrimProblemBuilder {
    pub fn new(variant: Variant, states: Vec<StateBlock>, inputs: InputSpec) -> Self {
        Self {
            variant,
            states,
            outputs: OutputCatalogue::default(),
            inputs,
        }
    }

    fn state_mut(&mut self, kind: BlockKind, index: usize) -> Option<&mut VariableSpec> {
        self.states
            .iter_mut()
            .find(|block| block.kind == kind)
            .and_then(|block| block.components.get_mut(index))
    }

    pub fn state_known(mut self, kind: BlockKind, index: usize, known: bool) -> Self {
        if let Some(spec) = self.state_mut(kind, index) {
            spec.known = known;
        }
        self
    }

    pub fn state_steady(mut self, kind: BlockKind, index: usize, steady: bool) -> Self {
        if let Some(spec) = self.state_mut(kind, index) {
            spec.steady_state = steady;
        }
        self
    }

    pub fn state_value(mut self, kind: BlockKind, index: usize, value: f64) -> Self {
        if let Some(spec) = self.state_mut(kind, index) {
            spec.value = value;
        }
        self
    }

    pub fn state_bounds(mut self, kind: BlockKind, index: usize, lower: f64, upper: f64) -> Self {
        if let Some(spec) = self.state_mut(kind, index) {
            spec.lower = lower;
            spec.upper = upper;
        }
        self
    }

    /// Constrain one component of an output to `value`.
    pub fn output_target(mut self, quantity: OutputQuantity, index: usize, value: f64) -> Self {
        if let Some(spec) = self.outputs.get_mut(quantity).components.get_mut(index) {
            *spec = VariableSpec::known(value);
        }
        self
    }

    pub fn motor(mut self, spec: VariableSpec) -> Self {
        self.inputs.motor = spec;
        self
    }

    pub fn surface(mut self, surface: ControlSurface, spec: VariableSpec) -> Self {
        if let Some(entry) = self
            .inputs
            .surfaces
            .iter_mut()
            .find(|entry| entry.surface == surface)
        {
            entry.spec = spec;
        }
        self
    }

    pub fn build(self) -> TrimProblem {
        TrimProblem {
            variant: self.variant,
            states: self.states,
            outputs: self.outputs,
            inputs: self.inputs,
        }
    }
}
