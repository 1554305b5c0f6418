use crate::components::aircraft::variant::{
    core_blocks, AirframeLayout, BlockKind, BlockLayout, ControlSurface, InputSeed,
};

const SINGLE_AILERON_CONTROLS: [ControlSurface; 5] = [
    ControlSurface::Elevator,
    ControlSurface::Aileron,
    ControlSurface::Rudder,
    ControlSurface::LeftFlap,
    ControlSurface::RightFlap,
];

const SPLIT_AILERON_CONTROLS: [ControlSurface; 6] = [
    ControlSurface::Elevator,
    ControlSurface::LeftAileron,
    ControlSurface::RightAileron,
    ControlSurface::Rudder,
    ControlSurface::LeftFlap,
    ControlSurface::RightFlap,
];

const FLAPS: [ControlSurface; 2] = [ControlSurface::LeftFlap, ControlSurface::RightFlap];

/// Engine speed seed [rad/s] matching the default throttle setting.
const ENGINE_SPEED_SEED: f64 = 450.0;
const MOTOR_SEED: f64 = 0.45;

/// Rigid airframe: four core blocks plus a single engine-speed state.
///
/// The two rigid sub-configurations share this state layout and differ only
/// in whether the ailerons are commanded together or split left/right.
#[derive(Debug, Clone, Copy)]
pub struct RigidLayout {
    controls: &'static [ControlSurface],
}

impl RigidLayout {
    pub const fn single_aileron() -> Self {
        Self {
            controls: &SINGLE_AILERON_CONTROLS,
        }
    }

    pub const fn split_aileron() -> Self {
        Self {
            controls: &SPLIT_AILERON_CONTROLS,
        }
    }
}

impl AirframeLayout for RigidLayout {
    fn state_blocks(&self) -> Vec<BlockLayout> {
        let mut blocks = core_blocks();
        blocks.push(BlockLayout::new(
            BlockKind::EngineSpeed,
            vec![ENGINE_SPEED_SEED],
        ));
        blocks
    }

    fn control_names(&self) -> &'static [ControlSurface] {
        self.controls
    }

    fn secondary_controls(&self) -> &'static [ControlSurface] {
        &FLAPS
    }

    fn default_seeds(&self) -> InputSeed {
        InputSeed {
            motor: MOTOR_SEED,
            surfaces: self.controls.iter().map(|&s| (s, 0.0)).collect(),
        }
    }
}
