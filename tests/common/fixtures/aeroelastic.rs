use flyer_trim::components::aircraft::{ACCEL_FILTER_STATES, AERO_LAG_STATES, FLEXIBLE_MODES};
use flyer_trim::{ControlInput, DynamicsEvaluator, Evaluation, EvaluatorError, Variant};
use nalgebra::DVector;

use super::check_dimensions;
use super::rigid::{rigid_dynamics, Deflections, UavParameters, AIR_DENSITY, CORE_STATES};

pub const MAX_THRUST: f64 = 6.0;
pub const FILTER_TIME_CONSTANT: f64 = 0.05;
pub const LAG_POLES: [f64; AERO_LAG_STATES] = [2.0, 4.0, 8.0, 16.0];
pub const MODE_FREQUENCIES: [f64; FLEXIBLE_MODES] = [12.0, 18.0, 25.0, 33.0, 41.0, 50.0];
pub const MODE_DAMPING: f64 = 0.02;
pub const MODE_GAIN: f64 = 0.01;
pub const FLUTTER_GAIN: f64 = 0.5;

/// Reference aeroelastic evaluator: the rigid UAV without rudder or engine
/// state, driving DT1 filters, aerodynamic lags and six flexible modes.
/// Coupling is one-way, so the rigid trim is unaffected by the extra states.
#[derive(Debug, Clone, Default)]
pub struct AeroelasticUav {
    params: UavParameters,
}

impl AeroelasticUav {
    pub fn new() -> Self {
        Self::default()
    }

    fn surface_count() -> usize {
        Variant::Aeroelastic.layout().control_names().len()
    }
}

impl DynamicsEvaluator for AeroelasticUav {
    fn state_len(&self) -> usize {
        Variant::Aeroelastic.layout().state_len()
    }

    fn input_len(&self) -> usize {
        Self::surface_count()
    }

    fn evaluate(
        &self,
        state: &DVector<f64>,
        input: &ControlInput,
    ) -> Result<Evaluation, EvaluatorError> {
        check_dimensions(self, state, input)?;

        let surfaces = input.surfaces.as_slice();
        let deflections = Deflections {
            elevator: surfaces[0],
            aileron: surfaces[1],
            ..Deflections::default()
        };
        let (core, outputs) = rigid_dynamics(
            &self.params,
            &state.as_slice()[..CORE_STATES],
            &deflections,
            MAX_THRUST * input.motor,
        )?;

        let x = state.as_slice();
        let mut derivatives = vec![0.0; x.len()];
        derivatives[..CORE_STATES].copy_from_slice(&core);

        let mut offset = CORE_STATES;
        for i in 0..ACCEL_FILTER_STATES {
            derivatives[offset + i] = (outputs.accel[i] - x[offset + i]) / FILTER_TIME_CONSTANT;
        }
        offset += ACCEL_FILTER_STATES;

        for (i, &deflection) in surfaces.iter().enumerate() {
            derivatives[offset + i] = (deflection - x[offset + i]) / FILTER_TIME_CONSTANT;
        }
        offset += Self::surface_count();

        for (i, pole) in LAG_POLES.iter().enumerate() {
            derivatives[offset + i] = -pole * x[offset + i] + outputs.alpha;
        }
        offset += AERO_LAG_STATES;

        let qbar = 0.5 * AIR_DENSITY * outputs.airspeed * outputs.airspeed;
        let displacement = offset;
        let rate = offset + FLEXIBLE_MODES;
        for (i, omega) in MODE_FREQUENCIES.iter().enumerate() {
            let flutter = surfaces.get(2 + i).copied().unwrap_or_default();
            let forcing = MODE_GAIN * qbar * outputs.alpha + FLUTTER_GAIN * flutter;
            derivatives[displacement + i] = x[rate + i];
            derivatives[rate + i] = -omega * omega * x[displacement + i]
                - 2.0 * MODE_DAMPING * omega * x[rate + i]
                + forcing;
        }

        Ok(Evaluation {
            derivatives: DVector::from_vec(derivatives),
            outputs,
        })
    }
}
