use serde::{Deserialize, Serialize};

use crate::components::aircraft::ControlSurface;

/// One scalar quantity of a trim problem: state component, output component
/// or control input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub value: f64,
    /// Held fixed at `value` (state/input) or constrained to it (output).
    pub known: bool,
    /// Time derivative driven to zero. Only meaningful for states.
    pub steady_state: bool,
    /// Written as `null` when unbounded.
    #[serde(with = "bound::lower")]
    pub lower: f64,
    #[serde(with = "bound::upper")]
    pub upper: f64,
}

/// Infinite bounds as `null`, so JSON records read back unchanged.
mod bound {
    use serde::Serializer;

    fn encode<S: Serializer>(value: f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(&value)
        }
    }

    pub mod lower {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
            super::encode(*value, serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
            Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NEG_INFINITY))
        }
    }

    pub mod upper {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
            super::encode(*value, serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
            Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
        }
    }
}

impl VariableSpec {
    pub fn free(value: f64) -> Self {
        Self {
            value,
            known: false,
            steady_state: false,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    pub fn known(value: f64) -> Self {
        Self {
            known: true,
            ..Self::free(value)
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn steady(mut self, steady_state: bool) -> Self {
        self.steady_state = steady_state;
        self
    }

    pub fn is_free(&self) -> bool {
        !self.known
    }
}

/// Derived flight-condition quantities, in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputQuantity {
    Airspeed,
    Sideslip,
    AngleOfAttack,
    Altitude,
    Roll,
    Pitch,
    Yaw,
    RollRate,
    PitchRate,
    YawRate,
    FlightPathAngle,
    AccelX,
    AccelY,
    AccelZ,
    /// [phidot, thetadot, psidot]
    EulerRates,
}

/// Legacy 1-based output numbering. Wind-axis quantities are stored as
/// airspeed, angle of attack, sideslip; not in catalogue order.
pub const LEGACY_OUTPUT_INDEX: [OutputQuantity; 15] = [
    OutputQuantity::Airspeed,
    OutputQuantity::AngleOfAttack,
    OutputQuantity::Sideslip,
    OutputQuantity::Altitude,
    OutputQuantity::Roll,
    OutputQuantity::Pitch,
    OutputQuantity::Yaw,
    OutputQuantity::RollRate,
    OutputQuantity::PitchRate,
    OutputQuantity::YawRate,
    OutputQuantity::FlightPathAngle,
    OutputQuantity::AccelX,
    OutputQuantity::AccelY,
    OutputQuantity::AccelZ,
    OutputQuantity::EulerRates,
];

impl OutputQuantity {
    pub const ALL: [OutputQuantity; 15] = [
        OutputQuantity::Airspeed,
        OutputQuantity::Sideslip,
        OutputQuantity::AngleOfAttack,
        OutputQuantity::Altitude,
        OutputQuantity::Roll,
        OutputQuantity::Pitch,
        OutputQuantity::Yaw,
        OutputQuantity::RollRate,
        OutputQuantity::PitchRate,
        OutputQuantity::YawRate,
        OutputQuantity::FlightPathAngle,
        OutputQuantity::AccelX,
        OutputQuantity::AccelY,
        OutputQuantity::AccelZ,
        OutputQuantity::EulerRates,
    ];

    /// Number of scalar components.
    pub fn width(&self) -> usize {
        match self {
            OutputQuantity::EulerRates => 3,
            _ => 1,
        }
    }

    pub fn legacy_index(&self) -> usize {
        LEGACY_OUTPUT_INDEX
            .iter()
            .position(|q| q == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    pub fn from_legacy_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| LEGACY_OUTPUT_INDEX.get(i))
            .copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub quantity: OutputQuantity,
    pub components: Vec<VariableSpec>,
}

/// Every output quantity with its constraint state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputCatalogue {
    entries: Vec<OutputSpec>,
}

impl Default for OutputCatalogue {
    /// All outputs free: nothing constrained.
    fn default() -> Self {
        Self {
            entries: OutputQuantity::ALL
                .iter()
                .map(|&quantity| OutputSpec {
                    quantity,
                    components: vec![VariableSpec::free(0.0); quantity.width()],
                })
                .collect(),
        }
    }
}

impl OutputCatalogue {
    pub fn get(&self, quantity: OutputQuantity) -> &OutputSpec {
        // Catalogue always holds every quantity in `ALL` order.
        &self.entries[quantity as usize]
    }

    pub(crate) fn get_mut(&mut self, quantity: OutputQuantity) -> &mut OutputSpec {
        &mut self.entries[quantity as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputSpec> {
        self.entries.iter()
    }

    /// Number of constrained output components.
    pub fn known_count(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|entry| entry.components.iter())
            .filter(|spec| spec.known)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub surface: ControlSurface,
    pub spec: VariableSpec,
}

/// Throttle plus the variant's control surfaces, in evaluator order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub motor: VariableSpec,
    pub surfaces: Vec<SurfaceSpec>,
}

impl InputSpec {
    pub fn surface(&self, surface: ControlSurface) -> Option<&VariableSpec> {
        self.surfaces
            .iter()
            .find(|entry| entry.surface == surface)
            .map(|entry| &entry.spec)
    }
}
