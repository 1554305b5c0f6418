mod assertions;
mod fixtures;

// Re-export
pub use assertions::{assert_converged, assert_matches_layout, assert_within_bounds};

pub use helpers::*;

pub use fixtures::*;
