mod compile;
mod handle_request;
mod materialize;
mod normalize;
mod problem;
mod solver;

pub use compile::compile_problem;
pub use handle_request::{run_trim, run_trim_batch};
pub use materialize::materialize;
pub use normalize::normalize_target;
pub use problem::TrimObjective;
pub use solver::{solve_trim, BoundedLevenbergMarquardt};
