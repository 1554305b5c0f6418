use tracing::{debug, info};

use crate::components::{
    ActuatorLimits, AirframeLayout, BlockKind, FlightCondition, InputSpec, NormalizedTarget,
    OutputQuantity, StateBlock, SurfaceSpec, TargetKey, TrimBundle, TrimProblem,
    TrimProblemBuilder, VariableSpec, Variant,
};
use crate::utils::{rad_to_deg, TrimError, TrimResult, MOTOR_RANGE};

// Component indices within the core blocks.
const PHI: usize = 0;
const THETA: usize = 1;
const P: usize = 0;
const Q: usize = 1;
const R: usize = 2;
const U: usize = 0;
const Z: usize = 2;

/// Flight conditions that constrain a single scalar output and relax
/// nothing.
const DIRECT_OUTPUTS: [(FlightCondition, OutputQuantity); 5] = [
    (FlightCondition::Airspeed, OutputQuantity::Airspeed),
    (FlightCondition::Alpha, OutputQuantity::AngleOfAttack),
    (FlightCondition::Theta, OutputQuantity::Pitch),
    (FlightCondition::Psi, OutputQuantity::Yaw),
    (FlightCondition::Gamma, OutputQuantity::FlightPathAngle),
];

/// Body-rate targets: the output they constrain and the rate whose
/// steady-state equation they replace.
const RATE_OUTPUTS: [(FlightCondition, OutputQuantity, usize); 3] = [
    (FlightCondition::P, OutputQuantity::RollRate, P),
    (FlightCondition::Q, OutputQuantity::PitchRate, Q),
    (FlightCondition::R, OutputQuantity::YawRate, R),
];

const EULER_RATES: [FlightCondition; 3] = [
    FlightCondition::PhiDot,
    FlightCondition::ThetaDot,
    FlightCondition::PsiDot,
];

/// Compile a normalized target into a fully flagged trim problem for
/// `variant`, seeded from `prior`.
///
/// The rule table is applied in a fixed order so that the same target and
/// seed always produce the same problem.
pub fn compile_problem(
    target: &NormalizedTarget,
    variant: Variant,
    prior: &TrimBundle,
    limits: Option<&ActuatorLimits>,
) -> TrimResult<TrimProblem> {
    let layout = variant.layout();
    check_seed(variant, layout, prior)?;

    let states = baseline_states(layout, prior);
    let inputs = compile_inputs(target, layout, prior, limits);
    let mut builder = TrimProblemBuilder::new(variant, states, inputs);

    for (condition, quantity) in DIRECT_OUTPUTS {
        if let Some(value) = target.flight(condition) {
            builder = builder.output_target(quantity, 0, value);
        }
    }

    if let Some(beta) = target.flight(FlightCondition::Beta) {
        builder = builder.output_target(OutputQuantity::Sideslip, 0, beta);
        if beta != 0.0 {
            // Sideslip is held by bank angle.
            builder = builder.state_known(BlockKind::Attitude, PHI, false);
        }
    }

    if let Some(altitude) = target.flight(FlightCondition::Altitude) {
        builder = builder
            .output_target(OutputQuantity::Altitude, 0, altitude)
            .state_known(BlockKind::Position, Z, false)
            .state_value(BlockKind::Position, Z, -altitude);
    }

    if let Some(phi) = target.flight(FlightCondition::Phi) {
        builder = builder
            .output_target(OutputQuantity::Roll, 0, phi)
            .state_known(BlockKind::Attitude, PHI, false)
            .state_steady(BlockKind::BodyRates, R, false);
    }

    for (condition, quantity, rate) in RATE_OUTPUTS {
        if let Some(value) = target.flight(condition) {
            builder = builder
                .output_target(quantity, 0, value)
                .state_steady(BlockKind::BodyRates, rate, false);
        }
    }

    for (index, condition) in EULER_RATES.into_iter().enumerate() {
        let Some(value) = target.flight(condition) else {
            continue;
        };
        builder = builder.output_target(OutputQuantity::EulerRates, index, value);
        if value == 0.0 {
            continue;
        }
        builder = match condition {
            FlightCondition::PhiDot => builder.state_steady(BlockKind::Attitude, PHI, false),
            FlightCondition::ThetaDot => builder.state_steady(BlockKind::Attitude, THETA, false),
            // A sustained turn rate is only reachable with bank, so phi is freed too.
            _ => builder
                .state_steady(BlockKind::BodyRates, P, false)
                .state_steady(BlockKind::BodyRates, Q, false)
                .state_known(BlockKind::Attitude, PHI, false),
        };
    }

    let problem = builder.build();
    info!(
        "Compiled {} trim problem: {} free variables, {} equations",
        variant,
        problem.free_count(),
        problem.constraint_count()
    );
    Ok(problem)
}

/// Reject a prior bundle whose blocks or surfaces do not match the layout.
fn check_seed(variant: Variant, layout: &dyn AirframeLayout, prior: &TrimBundle) -> TrimResult<()> {
    let mismatch = |what: String| TrimError::SeedMismatch { variant, what };

    if prior.variant != variant {
        return Err(mismatch(format!("bundle is for {}", prior.variant)));
    }

    let blocks = layout.state_blocks();
    for block in &blocks {
        match prior.block(block.kind) {
            None => return Err(mismatch(format!("missing state block '{}'", block.kind.name()))),
            Some(values) if values.len() != block.size => {
                return Err(mismatch(format!(
                    "state block '{}' has {} values, expected {}",
                    block.kind.name(),
                    values.len(),
                    block.size
                )))
            }
            Some(_) => {}
        }
    }
    if let Some(extra) = prior
        .states
        .iter()
        .find(|values| !blocks.iter().any(|block| block.kind == values.kind))
    {
        return Err(mismatch(format!("unexpected state block '{}'", extra.kind.name())));
    }

    let controls = layout.control_names();
    if let Some(missing) = controls.iter().find(|s| prior.surface(**s).is_none()) {
        return Err(mismatch(format!("missing seed for surface '{}'", missing)));
    }
    if let Some(extra) = prior.surfaces.keys().find(|s| !controls.contains(*s)) {
        return Err(mismatch(format!("unexpected surface '{}'", extra)));
    }

    Ok(())
}

/// Topology defaults, before any target is applied.
///
/// Attitude: roll held, pitch and heading free, roll and pitch steady.
/// Rates and velocities: free and steady, forward speed non-negative.
/// Position: only the vertical component held, down axis non-positive.
/// Engine and aeroelastic blocks: free and steady.
fn baseline_states(layout: &dyn AirframeLayout, prior: &TrimBundle) -> Vec<StateBlock> {
    layout
        .state_blocks()
        .into_iter()
        .map(|block| {
            let seed = prior
                .block(block.kind)
                .unwrap_or(block.default_seed.as_slice());
            let components = seed
                .iter()
                .enumerate()
                .map(|(index, &value)| baseline_component(block.kind, index, value))
                .collect();
            StateBlock::new(block.kind, components)
        })
        .collect()
}

fn baseline_component(kind: BlockKind, index: usize, value: f64) -> VariableSpec {
    match (kind, index) {
        (BlockKind::Attitude, PHI) => VariableSpec::known(value).steady(true),
        // Pitch stays free so airspeed, gamma and alpha can all be met by the solve.
        (BlockKind::Attitude, THETA) => VariableSpec::free(value).steady(true),
        (BlockKind::Attitude, _) => VariableSpec::free(value),
        (BlockKind::BodyVelocity, U) => VariableSpec::free(value)
            .steady(true)
            .with_bounds(0.0, f64::INFINITY),
        (BlockKind::Position, Z) => {
            VariableSpec::known(value).with_bounds(f64::NEG_INFINITY, 0.0)
        }
        (BlockKind::Position, _) => VariableSpec::free(value),
        _ => VariableSpec::free(value).steady(true),
    }
}

fn compile_inputs(
    target: &NormalizedTarget,
    layout: &dyn AirframeLayout,
    prior: &TrimBundle,
    limits: Option<&ActuatorLimits>,
) -> InputSpec {
    let (motor_lower, motor_upper) = MOTOR_RANGE;
    let motor = match target.get(TargetKey::Motor) {
        Some(value) => VariableSpec::known(value),
        None => VariableSpec::free(prior.motor),
    }
    .with_bounds(motor_lower, motor_upper);

    let surfaces = layout
        .control_names()
        .iter()
        .map(|&surface| {
            let (lower, upper) = ActuatorLimits::resolve(limits, surface);
            let spec = match target.get(TargetKey::Surface(surface)) {
                Some(value) => VariableSpec::known(value),
                None => VariableSpec::free(prior.surface(surface).unwrap_or_default()),
            };
            debug!(
                "Surface {} bounded to [{:.1}, {:.1}] deg",
                surface,
                rad_to_deg(lower),
                rad_to_deg(upper)
            );
            SurfaceSpec {
                surface,
                spec: spec.with_bounds(lower, upper),
            }
        })
        .collect();

    InputSpec { motor, surfaces }
}
