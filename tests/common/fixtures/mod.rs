mod aeroelastic;
mod model;
mod rigid;

pub use aeroelastic::AeroelasticUav;
pub use model::CountingModel;
pub use rigid::{RigidUav, GRAVITY};

use flyer_trim::{ControlInput, DynamicsEvaluator, EvaluatorError, Variant};
use nalgebra::DVector;

/// Reject state or input vectors that do not match the evaluator.
fn check_dimensions<E: DynamicsEvaluator>(
    evaluator: &E,
    state: &DVector<f64>,
    input: &ControlInput,
) -> Result<(), EvaluatorError> {
    if state.len() != evaluator.state_len() {
        return Err(EvaluatorError::StateDimension {
            expected: evaluator.state_len(),
            found: state.len(),
        });
    }
    if input.surfaces.len() != evaluator.input_len() {
        return Err(EvaluatorError::InputDimension {
            expected: evaluator.input_len(),
            found: input.surfaces.len(),
        });
    }
    Ok(())
}

/// Either reference airframe, picked by variant.
#[derive(Debug, Clone)]
pub enum ReferenceUav {
    Rigid(RigidUav),
    Aeroelastic(AeroelasticUav),
}

impl ReferenceUav {
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Aeroelastic => ReferenceUav::Aeroelastic(AeroelasticUav::new()),
            rigid => ReferenceUav::Rigid(RigidUav::new(rigid)),
        }
    }
}

impl DynamicsEvaluator for ReferenceUav {
    fn state_len(&self) -> usize {
        match self {
            ReferenceUav::Rigid(uav) => uav.state_len(),
            ReferenceUav::Aeroelastic(uav) => uav.state_len(),
        }
    }

    fn input_len(&self) -> usize {
        match self {
            ReferenceUav::Rigid(uav) => uav.input_len(),
            ReferenceUav::Aeroelastic(uav) => uav.input_len(),
        }
    }

    fn evaluate(
        &self,
        state: &DVector<f64>,
        input: &ControlInput,
    ) -> Result<flyer_trim::Evaluation, EvaluatorError> {
        match self {
            ReferenceUav::Rigid(uav) => uav.evaluate(state, input),
            ReferenceUav::Aeroelastic(uav) => uav.evaluate(state, input),
        }
    }
}

/// Evaluator with the wrong state size, for dimension-error paths.
#[derive(Debug, Clone, Copy)]
pub struct TruncatedUav;

impl DynamicsEvaluator for TruncatedUav {
    fn state_len(&self) -> usize {
        12
    }

    fn input_len(&self) -> usize {
        5
    }

    fn evaluate(
        &self,
        state: &DVector<f64>,
        input: &ControlInput,
    ) -> Result<flyer_trim::Evaluation, EvaluatorError> {
        check_dimensions(self, state, input)?;
        Err(EvaluatorError::ComputationError("unreachable".to_string()))
    }
}
