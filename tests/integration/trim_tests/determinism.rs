use flyer_trim::{compile_problem, normalize_target, run_trim, ModelHandle, TrimBundle, Variant};
use pretty_assertions::assert_eq;

use crate::common::{turn_request, turn_target, CountingModel, RigidUav};

#[test]
fn test_compiled_problem_is_deterministic() {
    let variant = Variant::RigidB;
    let normalized = normalize_target(&turn_target(), variant).unwrap();
    let prior = TrimBundle::default_for(variant);

    let first = compile_problem(&normalized, variant, &prior, None).unwrap();
    let second = compile_problem(&normalized, variant, &prior, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_repeated_solves_are_identical() {
    let request = turn_request(Variant::RigidA);
    let evaluator = RigidUav::new(Variant::RigidA);
    let model = ModelHandle::new(CountingModel::new());

    let first = run_trim(&request, &model, &evaluator).unwrap();
    let second = run_trim(&request, &model, &evaluator).unwrap();

    assert_eq!(first.solution, second.solution);
    assert_eq!(first.bundle, second.bundle);
}

#[test]
fn test_solution_reseeds_to_same_trim() {
    let evaluator = RigidUav::new(Variant::RigidA);
    let model = ModelHandle::new(CountingModel::new());

    let first = run_trim(&turn_request(Variant::RigidA), &model, &evaluator).unwrap();
    let reseeded = turn_request(Variant::RigidA).with_prior(first.bundle.clone());
    let second = run_trim(&reseeded, &model, &evaluator).unwrap();

    assert!(second.solution.converged());
    assert!(second.solution.diagnostics().iterations <= first.solution.diagnostics().iterations);
}
