use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::slice;

use crate::components::OutputQuantity;
use crate::physics::error::{EvaluatorError, ModelError};

/// Throttle plus surface deflections, surfaces ordered as the variant's
/// control list.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlInput {
    pub motor: f64,
    pub surfaces: DVector<f64>,
}

/// Derived flight-condition quantities produced alongside the derivatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightOutputs {
    pub airspeed: f64,
    pub sideslip: f64,
    pub alpha: f64,
    pub altitude: f64,
    pub phi: f64,
    pub theta: f64,
    pub psi: f64,
    pub p: f64,
    pub q: f64,
    pub r: f64,
    pub gamma: f64,
    /// Body-axis specific force [m/s^2]
    pub accel: [f64; 3],
    /// [phidot, thetadot, psidot]
    pub euler_rates: [f64; 3],
}

impl FlightOutputs {
    pub fn values(&self, quantity: OutputQuantity) -> &[f64] {
        match quantity {
            OutputQuantity::Airspeed => slice::from_ref(&self.airspeed),
            OutputQuantity::Sideslip => slice::from_ref(&self.sideslip),
            OutputQuantity::AngleOfAttack => slice::from_ref(&self.alpha),
            OutputQuantity::Altitude => slice::from_ref(&self.altitude),
            OutputQuantity::Roll => slice::from_ref(&self.phi),
            OutputQuantity::Pitch => slice::from_ref(&self.theta),
            OutputQuantity::Yaw => slice::from_ref(&self.psi),
            OutputQuantity::RollRate => slice::from_ref(&self.p),
            OutputQuantity::PitchRate => slice::from_ref(&self.q),
            OutputQuantity::YawRate => slice::from_ref(&self.r),
            OutputQuantity::FlightPathAngle => slice::from_ref(&self.gamma),
            OutputQuantity::AccelX => &self.accel[0..1],
            OutputQuantity::AccelY => &self.accel[1..2],
            OutputQuantity::AccelZ => &self.accel[2..3],
            OutputQuantity::EulerRates => &self.euler_rates,
        }
    }
}

/// Result of one evaluation of the equations of motion.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub derivatives: DVector<f64>,
    pub outputs: FlightOutputs,
}

/// Black-box equations of motion: state + input to state derivative and
/// named outputs.
pub trait DynamicsEvaluator {
    fn state_len(&self) -> usize;

    fn input_len(&self) -> usize;

    fn evaluate(
        &self,
        state: &DVector<f64>,
        input: &ControlInput,
    ) -> Result<Evaluation, EvaluatorError>;
}

impl<E: DynamicsEvaluator + ?Sized> DynamicsEvaluator for &E {
    fn state_len(&self) -> usize {
        (**self).state_len()
    }

    fn input_len(&self) -> usize {
        (**self).input_len()
    }

    fn evaluate(
        &self,
        state: &DVector<f64>,
        input: &ControlInput,
    ) -> Result<Evaluation, EvaluatorError> {
        (**self).evaluate(state, input)
    }
}

/// The loadable simulation model backing one or more evaluators.
pub trait SimulationModel: Send + Sync {
    fn name(&self) -> &str;

    fn is_loaded(&self) -> bool;

    fn load(&self) -> Result<(), ModelError>;

    fn unload(&self);
}
