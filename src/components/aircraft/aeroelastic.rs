use crate::components::aircraft::variant::{
    core_blocks, AirframeLayout, BlockKind, BlockLayout, ControlSurface, InputSeed,
};

const CONTROLS: [ControlSurface; 6] = [
    ControlSurface::Elevator,
    ControlSurface::Aileron,
    ControlSurface::Flutter1,
    ControlSurface::Flutter2,
    ControlSurface::Flutter3,
    ControlSurface::Flutter4,
];

const FLUTTER_SURFACES: [ControlSurface; 4] = [
    ControlSurface::Flutter1,
    ControlSurface::Flutter2,
    ControlSurface::Flutter3,
    ControlSurface::Flutter4,
];

pub const ACCEL_FILTER_STATES: usize = 3;
pub const AERO_LAG_STATES: usize = 4;
pub const FLEXIBLE_MODES: usize = 6;

/// Aeroelastic airframe: four core blocks followed by the filter, lag and
/// structural blocks, in legacy order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AeroelasticLayout;

impl AeroelasticLayout {
    pub const fn new() -> Self {
        Self
    }
}

impl AirframeLayout for AeroelasticLayout {
    fn state_blocks(&self) -> Vec<BlockLayout> {
        let mut blocks = core_blocks();
        blocks.extend([
            // Filtered accelerations settle on the 1 g specific force.
            BlockLayout::new(BlockKind::AccelFilter, vec![0.0, 0.0, -9.81]),
            BlockLayout::zeros(BlockKind::SurfaceRateFilter, CONTROLS.len()),
            BlockLayout::zeros(BlockKind::AeroLag, AERO_LAG_STATES),
            BlockLayout::zeros(BlockKind::ModeDisplacement, FLEXIBLE_MODES),
            BlockLayout::zeros(BlockKind::ModeRate, FLEXIBLE_MODES),
        ]);
        blocks
    }

    fn control_names(&self) -> &'static [ControlSurface] {
        &CONTROLS
    }

    fn secondary_controls(&self) -> &'static [ControlSurface] {
        &FLUTTER_SURFACES
    }

    fn default_seeds(&self) -> InputSeed {
        InputSeed {
            motor: 0.45,
            surfaces: CONTROLS.iter().map(|&s| (s, 0.0)).collect(),
        }
    }
}
