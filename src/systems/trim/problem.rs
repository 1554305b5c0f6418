use argmin::core::{CostFunction, Error as ArgminError, Jacobian, Operator};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::components::{OutputQuantity, TrimProblem, VariableSpec};
use crate::physics::{ControlInput, DynamicsEvaluator, Evaluation, EvaluatorError};
use crate::utils::sum_of_squares;

/// Where one free variable lives in the full state/input vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    State(usize),
    Motor,
    Surface(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OutputTarget {
    quantity: OutputQuantity,
    component: usize,
    value: f64,
}

/// Residual form of a compiled trim problem over its free variables.
///
/// The parameter vector holds only the free states and inputs, in state
/// order then motor then surfaces. Residuals are the derivatives of every
/// steady-state component followed by (evaluated - target) for every
/// constrained output component.
pub struct TrimObjective<'a, E> {
    evaluator: &'a E,
    slots: Vec<Slot>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    initial: Vec<f64>,
    base_state: DVector<f64>,
    base_input: ControlInput,
    steady: Vec<usize>,
    targets: Vec<OutputTarget>,
    fd_step: f64,
}

// Clones share the evaluator.
impl<E> Clone for TrimObjective<'_, E> {
    fn clone(&self) -> Self {
        Self {
            evaluator: self.evaluator,
            slots: self.slots.clone(),
            lower: self.lower.clone(),
            upper: self.upper.clone(),
            initial: self.initial.clone(),
            base_state: self.base_state.clone(),
            base_input: self.base_input.clone(),
            steady: self.steady.clone(),
            targets: self.targets.clone(),
            fd_step: self.fd_step,
        }
    }
}

impl<'a, E: DynamicsEvaluator + Sync> TrimObjective<'a, E> {
    pub fn new(
        problem: &TrimProblem,
        evaluator: &'a E,
        fd_step: f64,
    ) -> Result<Self, EvaluatorError> {
        let state_len = problem.state_len();
        if evaluator.state_len() != state_len {
            return Err(EvaluatorError::StateDimension {
                expected: state_len,
                found: evaluator.state_len(),
            });
        }
        let surfaces = &problem.inputs().surfaces;
        if evaluator.input_len() != surfaces.len() {
            return Err(EvaluatorError::InputDimension {
                expected: surfaces.len(),
                found: evaluator.input_len(),
            });
        }

        let states: Vec<&VariableSpec> = problem
            .states()
            .iter()
            .flat_map(|block| block.components.iter())
            .collect();

        let mut slots = Vec::new();
        let mut specs = Vec::new();
        let mut steady = Vec::new();
        for (index, spec) in states.iter().enumerate() {
            if spec.is_free() {
                slots.push(Slot::State(index));
                specs.push(**spec);
            }
            if spec.steady_state {
                steady.push(index);
            }
        }
        let motor = problem.inputs().motor;
        if motor.is_free() {
            slots.push(Slot::Motor);
            specs.push(motor);
        }
        for (index, entry) in surfaces.iter().enumerate() {
            if entry.spec.is_free() {
                slots.push(Slot::Surface(index));
                specs.push(entry.spec);
            }
        }

        let targets = problem
            .outputs()
            .iter()
            .flat_map(|output| {
                output
                    .components
                    .iter()
                    .enumerate()
                    .filter(|(_, spec)| spec.known)
                    .map(move |(component, spec)| OutputTarget {
                        quantity: output.quantity,
                        component,
                        value: spec.value,
                    })
            })
            .collect();

        Ok(Self {
            evaluator,
            slots,
            lower: specs.iter().map(|spec| spec.lower).collect(),
            upper: specs.iter().map(|spec| spec.upper).collect(),
            initial: specs.iter().map(|spec| spec.value).collect(),
            base_state: DVector::from_iterator(state_len, states.iter().map(|spec| spec.value)),
            base_input: ControlInput {
                motor: motor.value,
                surfaces: DVector::from_iterator(
                    surfaces.len(),
                    surfaces.iter().map(|entry| entry.spec.value),
                ),
            },
            steady,
            targets,
            fd_step,
        })
    }

    pub fn free_len(&self) -> usize {
        self.slots.len()
    }

    pub fn residual_len(&self) -> usize {
        self.steady.len() + self.targets.len()
    }

    pub fn lower_bounds(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper_bounds(&self) -> &[f64] {
        &self.upper
    }

    /// Seed values of the free variables, taken from the problem.
    pub fn initial_guess(&self) -> Vec<f64> {
        self.initial.clone()
    }

    /// Full state and input vectors with the free variables set to `param`.
    pub fn assemble(&self, param: &[f64]) -> (DVector<f64>, ControlInput) {
        let mut state = self.base_state.clone();
        let mut input = self.base_input.clone();
        for (slot, &value) in self.slots.iter().zip(param) {
            match *slot {
                Slot::State(index) => state[index] = value,
                Slot::Motor => input.motor = value,
                Slot::Surface(index) => input.surfaces[index] = value,
            }
        }
        (state, input)
    }

    pub fn evaluate(&self, param: &[f64]) -> Result<Evaluation, EvaluatorError> {
        let (state, input) = self.assemble(param);
        self.evaluator.evaluate(&state, &input)
    }

    pub fn residuals(&self, param: &[f64]) -> Result<Vec<f64>, EvaluatorError> {
        let evaluation = self.evaluate(param)?;
        self.residuals_of(&evaluation)
    }

    pub fn residuals_of(&self, evaluation: &Evaluation) -> Result<Vec<f64>, EvaluatorError> {
        let derivatives = &evaluation.derivatives;
        if derivatives.len() != self.base_state.len() {
            return Err(EvaluatorError::StateDimension {
                expected: self.base_state.len(),
                found: derivatives.len(),
            });
        }

        let residuals: Vec<f64> = self
            .steady
            .iter()
            .map(|&index| derivatives[index])
            .chain(self.targets.iter().map(|target| {
                evaluation.outputs.values(target.quantity)[target.component] - target.value
            }))
            .collect();

        match residuals.iter().position(|r| !r.is_finite()) {
            Some(index) => Err(EvaluatorError::NonFinite {
                what: "residual",
                index,
            }),
            None => Ok(residuals),
        }
    }

    /// One Jacobian column by central differences, one-sided at a bound or
    /// where one of the two probes cannot be evaluated.
    fn column(&self, param: &[f64], j: usize) -> Result<Vec<f64>, EvaluatorError> {
        let m = self.residual_len();
        let x = param[j];
        let h = self.fd_step * x.abs().max(1.0);
        let below = (x - h).max(self.lower[j]);
        let above = (x + h).min(self.upper[j]);
        if above - below <= 0.0 {
            return Ok(vec![0.0; m]);
        }

        let mut probe = param.to_vec();
        probe[j] = above;
        let r_above = self.residuals(&probe);
        probe[j] = below;
        let r_below = self.residuals(&probe);

        let (high, low, span) = match (r_above, r_below) {
            (Ok(high), Ok(low)) => (high, low, above - below),
            (Ok(high), Err(_)) if above > x => (high, self.residuals(param)?, above - x),
            (Err(_), Ok(low)) if x > below => (self.residuals(param)?, low, x - below),
            (Err(err), _) | (_, Err(err)) => return Err(err),
        };

        Ok(high
            .iter()
            .zip(&low)
            .map(|(a, b)| (a - b) / span)
            .collect())
    }
}

impl<E: DynamicsEvaluator + Sync> Operator for TrimObjective<'_, E> {
    type Param = Vec<f64>;
    type Output = Vec<f64>;

    fn apply(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok(self.residuals(param)?)
    }
}

impl<E: DynamicsEvaluator + Sync> CostFunction for TrimObjective<'_, E> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, param: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok(sum_of_squares(&self.residuals(param)?))
    }
}

impl<E: DynamicsEvaluator + Sync> Jacobian for TrimObjective<'_, E> {
    type Param = Vec<f64>;
    type Jacobian = DMatrix<f64>;

    fn jacobian(&self, param: &Self::Param) -> Result<Self::Jacobian, ArgminError> {
        let columns = (0..param.len())
            .into_par_iter()
            .map(|j| self.column(param, j))
            .collect::<Result<Vec<_>, _>>()?;

        let m = self.residual_len();
        Ok(DMatrix::from_fn(m, param.len(), |i, j| columns[j][i]))
    }
}
