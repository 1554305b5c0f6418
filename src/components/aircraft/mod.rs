mod aeroelastic;
mod rigid;
mod variant;

pub use aeroelastic::{AeroelasticLayout, ACCEL_FILTER_STATES, AERO_LAG_STATES, FLEXIBLE_MODES};
pub use rigid::RigidLayout;
pub use variant::{AirframeLayout, BlockKind, BlockLayout, ControlSurface, InputSeed, Variant};
