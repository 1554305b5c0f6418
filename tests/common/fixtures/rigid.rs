use flyer_trim::{ControlInput, DynamicsEvaluator, Evaluation, EvaluatorError, FlightOutputs, Variant};
use nalgebra::DVector;

use super::check_dimensions;

pub const GRAVITY: f64 = 9.81;
pub const AIR_DENSITY: f64 = 1.225;

pub const MAX_ENGINE_SPEED: f64 = 1000.0;
pub const ENGINE_TIME_CONSTANT: f64 = 0.5;
pub const THRUST_COEFFICIENT: f64 = 1.5e-5;

/// Core states: attitude, body rates, body velocity, NED position.
pub const CORE_STATES: usize = 12;

/// Mass, geometry and stability derivatives of a small fixed-wing UAV.
#[derive(Debug, Clone, Copy)]
pub struct UavParameters {
    pub mass: f64,
    pub wing_area: f64,
    pub chord: f64,
    pub span: f64,
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,

    pub c_l_0: f64,
    pub c_l_alpha: f64,
    pub c_l_q: f64,
    pub c_l_de: f64,
    pub c_l_flap: f64,
    pub c_d_0: f64,
    pub c_d_k: f64,
    pub c_y_beta: f64,
    pub c_y_dr: f64,
    pub c_roll_beta: f64,
    pub c_roll_p: f64,
    pub c_roll_r: f64,
    pub c_roll_da: f64,
    pub c_m_0: f64,
    pub c_m_alpha: f64,
    pub c_m_q: f64,
    pub c_m_de: f64,
    pub c_n_beta: f64,
    pub c_n_p: f64,
    pub c_n_r: f64,
    pub c_n_dr: f64,
}

impl Default for UavParameters {
    fn default() -> Self {
        Self {
            mass: 2.0,
            wing_area: 0.55,
            chord: 0.19,
            span: 2.9,
            ixx: 0.2,
            iyy: 0.3,
            izz: 0.45,

            c_l_0: 0.1,
            c_l_alpha: 5.0,
            c_l_q: 4.0,
            c_l_de: 0.3,
            c_l_flap: 0.4,
            c_d_0: 0.03,
            c_d_k: 0.05,
            c_y_beta: -0.5,
            c_y_dr: 0.15,
            c_roll_beta: -0.1,
            c_roll_p: -0.5,
            c_roll_r: 0.1,
            c_roll_da: 0.15,
            c_m_0: 0.02,
            c_m_alpha: -0.8,
            c_m_q: -10.0,
            c_m_de: -1.0,
            c_n_beta: 0.08,
            c_n_p: -0.05,
            c_n_r: -0.15,
            c_n_dr: -0.06,
        }
    }
}

/// Effective surface deflections seen by the aerodynamic model [rad].
#[derive(Debug, Clone, Copy, Default)]
pub struct Deflections {
    pub elevator: f64,
    pub aileron: f64,
    pub rudder: f64,
    pub flap: f64,
}

/// Six-degree-of-freedom rigid-body equations for the twelve core states.
///
/// Returns the core derivatives and the derived flight outputs. `thrust`
/// acts along the body x axis.
pub fn rigid_dynamics(
    params: &UavParameters,
    core: &[f64],
    deflections: &Deflections,
    thrust: f64,
) -> Result<([f64; CORE_STATES], FlightOutputs), EvaluatorError> {
    let (phi, theta, psi) = (core[0], core[1], core[2]);
    let (p, q, r) = (core[3], core[4], core[5]);
    let (u, v, w) = (core[6], core[7], core[8]);
    let z = core[11];

    let airspeed = (u * u + v * v + w * w).sqrt();
    if airspeed < 1e-6 {
        return Err(EvaluatorError::ComputationError(
            "airspeed is zero".to_string(),
        ));
    }
    let alpha = w.atan2(u);
    let beta = (v / airspeed).clamp(-1.0, 1.0).asin();
    let qbar_s = 0.5 * AIR_DENSITY * airspeed * airspeed * params.wing_area;

    let p_hat = p * params.span / (2.0 * airspeed);
    let q_hat = q * params.chord / (2.0 * airspeed);
    let r_hat = r * params.span / (2.0 * airspeed);

    let c_l = params.c_l_0
        + params.c_l_alpha * alpha
        + params.c_l_q * q_hat
        + params.c_l_de * deflections.elevator
        + params.c_l_flap * deflections.flap;
    let c_d = params.c_d_0 + params.c_d_k * c_l * c_l;
    let c_y = params.c_y_beta * beta + params.c_y_dr * deflections.rudder;
    let c_roll = params.c_roll_beta * beta
        + params.c_roll_p * p_hat
        + params.c_roll_r * r_hat
        + params.c_roll_da * deflections.aileron;
    let c_m = params.c_m_0
        + params.c_m_alpha * alpha
        + params.c_m_q * q_hat
        + params.c_m_de * deflections.elevator;
    let c_n = params.c_n_beta * beta
        + params.c_n_p * p_hat
        + params.c_n_r * r_hat
        + params.c_n_dr * deflections.rudder;

    let (sin_alpha, cos_alpha) = alpha.sin_cos();
    let fx = qbar_s * (-c_d * cos_alpha + c_l * sin_alpha) + thrust;
    let fy = qbar_s * c_y;
    let fz = qbar_s * (-c_d * sin_alpha - c_l * cos_alpha);
    let roll_moment = qbar_s * params.span * c_roll;
    let pitch_moment = qbar_s * params.chord * c_m;
    let yaw_moment = qbar_s * params.span * c_n;

    // Specific force, what an accelerometer at the CG reads.
    let accel = [fx / params.mass, fy / params.mass, fz / params.mass];

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_psi, cos_psi) = psi.sin_cos();

    let u_dot = r * v - q * w - GRAVITY * sin_theta + accel[0];
    let v_dot = p * w - r * u + GRAVITY * cos_theta * sin_phi + accel[1];
    let w_dot = q * u - p * v + GRAVITY * cos_theta * cos_phi + accel[2];

    let p_dot = (roll_moment + (params.iyy - params.izz) * q * r) / params.ixx;
    let q_dot = (pitch_moment + (params.izz - params.ixx) * p * r) / params.iyy;
    let r_dot = (yaw_moment + (params.ixx - params.iyy) * p * q) / params.izz;

    let phi_dot = p + sin_theta / cos_theta * (q * sin_phi + r * cos_phi);
    let theta_dot = q * cos_phi - r * sin_phi;
    let psi_dot = (q * sin_phi + r * cos_phi) / cos_theta;

    let x_dot = u * cos_theta * cos_psi
        + v * (sin_phi * sin_theta * cos_psi - cos_phi * sin_psi)
        + w * (cos_phi * sin_theta * cos_psi + sin_phi * sin_psi);
    let y_dot = u * cos_theta * sin_psi
        + v * (sin_phi * sin_theta * sin_psi + cos_phi * cos_psi)
        + w * (cos_phi * sin_theta * sin_psi - sin_phi * cos_psi);
    let z_dot = -u * sin_theta + v * sin_phi * cos_theta + w * cos_phi * cos_theta;

    let gamma = (-z_dot / airspeed).clamp(-1.0, 1.0).asin();

    let derivatives = [
        phi_dot, theta_dot, psi_dot, p_dot, q_dot, r_dot, u_dot, v_dot, w_dot, x_dot, y_dot,
        z_dot,
    ];
    let outputs = FlightOutputs {
        airspeed,
        sideslip: beta,
        alpha,
        altitude: -z,
        phi,
        theta,
        psi,
        p,
        q,
        r,
        gamma,
        accel,
        euler_rates: [phi_dot, theta_dot, psi_dot],
    };
    Ok((derivatives, outputs))
}

/// Reference evaluator for both rigid variants: rigid-body core plus a
/// first-order engine whose speed sets the thrust.
#[derive(Debug, Clone)]
pub struct RigidUav {
    params: UavParameters,
    variant: Variant,
}

impl RigidUav {
    pub fn new(variant: Variant) -> Self {
        assert!(
            matches!(variant, Variant::RigidA | Variant::RigidB),
            "RigidUav models rigid variants only"
        );
        Self {
            params: UavParameters::default(),
            variant,
        }
    }

    fn deflections(&self, surfaces: &[f64]) -> Deflections {
        match self.variant {
            Variant::RigidA => Deflections {
                elevator: surfaces[0],
                aileron: surfaces[1],
                rudder: surfaces[2],
                flap: 0.5 * (surfaces[3] + surfaces[4]),
            },
            _ => Deflections {
                elevator: surfaces[0],
                aileron: 0.5 * (surfaces[1] - surfaces[2]),
                rudder: surfaces[3],
                flap: 0.5 * (surfaces[4] + surfaces[5]),
            },
        }
    }
}

impl DynamicsEvaluator for RigidUav {
    fn state_len(&self) -> usize {
        CORE_STATES + 1
    }

    fn input_len(&self) -> usize {
        self.variant.layout().control_names().len()
    }

    fn evaluate(
        &self,
        state: &DVector<f64>,
        input: &ControlInput,
    ) -> Result<Evaluation, EvaluatorError> {
        check_dimensions(self, state, input)?;

        let omega = state[CORE_STATES];
        let thrust = THRUST_COEFFICIENT * omega * omega;
        let deflections = self.deflections(input.surfaces.as_slice());
        let (core, outputs) = rigid_dynamics(
            &self.params,
            &state.as_slice()[..CORE_STATES],
            &deflections,
            thrust,
        )?;

        let mut derivatives = DVector::zeros(CORE_STATES + 1);
        derivatives.as_mut_slice()[..CORE_STATES].copy_from_slice(&core);
        derivatives[CORE_STATES] = (MAX_ENGINE_SPEED * input.motor - omega) / ENGINE_TIME_CONSTANT;

        Ok(Evaluation {
            derivatives,
            outputs,
        })
    }
}
