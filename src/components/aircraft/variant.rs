use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::components::aircraft::{AeroelasticLayout, RigidLayout};
use crate::utils::TrimError;

/// Airframe topology a trim request is compiled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    RigidA,
    RigidB,
    Aeroelastic,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::RigidA, Variant::RigidB, Variant::Aeroelastic];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::RigidA => "Rigid-A",
            Variant::RigidB => "Rigid-B",
            Variant::Aeroelastic => "Aeroelastic",
        }
    }

    /// Returns the state partition and control set for this airframe.
    pub fn layout(&self) -> &'static dyn AirframeLayout {
        static RIGID_A: RigidLayout = RigidLayout::single_aileron();
        static RIGID_B: RigidLayout = RigidLayout::split_aileron();
        static AEROELASTIC: AeroelasticLayout = AeroelasticLayout::new();

        match self {
            Variant::RigidA => &RIGID_A,
            Variant::RigidB => &RIGID_B,
            Variant::Aeroelastic => &AEROELASTIC,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = TrimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TrimError::UnknownVariant(s.to_string()))
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

/// Named control surfaces across all supported airframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ControlSurface {
    #[serde(rename = "elevator")]
    Elevator,
    #[serde(rename = "aileron")]
    Aileron,
    #[serde(rename = "l_aileron")]
    LeftAileron,
    #[serde(rename = "r_aileron")]
    RightAileron,
    #[serde(rename = "rudder")]
    Rudder,
    #[serde(rename = "l_flap")]
    LeftFlap,
    #[serde(rename = "r_flap")]
    RightFlap,
    #[serde(rename = "flutter_1")]
    Flutter1,
    #[serde(rename = "flutter_2")]
    Flutter2,
    #[serde(rename = "flutter_3")]
    Flutter3,
    #[serde(rename = "flutter_4")]
    Flutter4,
}

impl ControlSurface {
    pub const ALL: [ControlSurface; 11] = [
        ControlSurface::Elevator,
        ControlSurface::Aileron,
        ControlSurface::LeftAileron,
        ControlSurface::RightAileron,
        ControlSurface::Rudder,
        ControlSurface::LeftFlap,
        ControlSurface::RightFlap,
        ControlSurface::Flutter1,
        ControlSurface::Flutter2,
        ControlSurface::Flutter3,
        ControlSurface::Flutter4,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ControlSurface::Elevator => "elevator",
            ControlSurface::Aileron => "aileron",
            ControlSurface::LeftAileron => "l_aileron",
            ControlSurface::RightAileron => "r_aileron",
            ControlSurface::Rudder => "rudder",
            ControlSurface::LeftFlap => "l_flap",
            ControlSurface::RightFlap => "r_flap",
            ControlSurface::Flutter1 => "flutter_1",
            ControlSurface::Flutter2 => "flutter_2",
            ControlSurface::Flutter3 => "flutter_3",
            ControlSurface::Flutter4 => "flutter_4",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ControlSurface::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for ControlSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physical subsystem a state block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Euler angles [phi, theta, psi]
    Attitude,
    /// Body rates [p, q, r]
    BodyRates,
    /// Body velocities [u, v, w]
    BodyVelocity,
    /// Inertial position, north-east-down
    Position,
    EngineSpeed,
    /// DT1-filtered body accelerations
    AccelFilter,
    /// DT1-filtered control-surface rates
    SurfaceRateFilter,
    /// Unsteady aerodynamic lag states
    AeroLag,
    ModeDisplacement,
    ModeRate,
}

impl BlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Attitude => "attitude",
            BlockKind::BodyRates => "body_rates",
            BlockKind::BodyVelocity => "body_velocity",
            BlockKind::Position => "position",
            BlockKind::EngineSpeed => "engine_speed",
            BlockKind::AccelFilter => "accel_filter",
            BlockKind::SurfaceRateFilter => "surface_rate_filter",
            BlockKind::AeroLag => "aero_lag",
            BlockKind::ModeDisplacement => "mode_displacement",
            BlockKind::ModeRate => "mode_rate",
        }
    }
}

/// Size and seed values of one state block within a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockLayout {
    pub kind: BlockKind,
    pub size: usize,
    pub default_seed: Vec<f64>,
}

impl BlockLayout {
    pub fn new(kind: BlockKind, default_seed: Vec<f64>) -> Self {
        Self {
            kind,
            size: default_seed.len(),
            default_seed,
        }
    }

    pub fn zeros(kind: BlockKind, size: usize) -> Self {
        Self::new(kind, vec![0.0; size])
    }
}

/// Default throttle and surface seeds for a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct InputSeed {
    pub motor: f64,
    pub surfaces: Vec<(ControlSurface, f64)>,
}

/// One airframe topology: the ordered state partition and its control set.
///
/// Adding a new airframe means adding an implementation of this trait and a
/// [`Variant`] entry that returns it.
pub trait AirframeLayout: Send + Sync {
    /// Ordered state blocks. The first four are always attitude, body rates,
    /// body velocity and position.
    fn state_blocks(&self) -> Vec<BlockLayout>;

    /// Control surfaces in the order the evaluator expects them.
    fn control_names(&self) -> &'static [ControlSurface];

    /// Surfaces that are not normally trimmed and default to zero deflection.
    fn secondary_controls(&self) -> &'static [ControlSurface];

    fn default_seeds(&self) -> InputSeed;

    fn state_len(&self) -> usize {
        self.state_blocks().iter().map(|block| block.size).sum()
    }

    /// Position of a block in the legacy 1-based state numbering.
    fn legacy_block_index(&self, kind: BlockKind) -> Option<usize> {
        self.state_blocks()
            .iter()
            .position(|block| block.kind == kind)
            .map(|index| index + 1)
    }
}

/// Core blocks shared by every airframe, seeded for cruise at 17 m/s and
/// 100 m altitude.
pub(crate) fn core_blocks() -> Vec<BlockLayout> {
    vec![
        BlockLayout::new(BlockKind::Attitude, vec![0.0, 0.03, 0.0]),
        BlockLayout::zeros(BlockKind::BodyRates, 3),
        BlockLayout::new(BlockKind::BodyVelocity, vec![17.0, 0.0, 0.5]),
        BlockLayout::new(BlockKind::Position, vec![0.0, 0.0, -100.0]),
    ]
}
