pub mod trim;

pub use trim::{
    compile_problem, materialize, normalize_target, run_trim, run_trim_batch, solve_trim,
    BoundedLevenbergMarquardt, TrimObjective,
};
