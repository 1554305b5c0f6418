use flyer_trim::{TrimBundle, TrimSolution, Variant};

/// Assert that the solver reported convergence, with the diagnostics on
/// failure.
#[track_caller]
pub fn assert_converged(solution: &TrimSolution) {
    let diagnostics = solution.diagnostics();
    assert!(
        diagnostics.converged,
        "Trim did not converge: cost {:.3e}, residual norm {:.3e} after {} iterations ({})",
        diagnostics.cost, diagnostics.residual_norm, diagnostics.iterations, diagnostics.termination
    );
    assert!(diagnostics.residual_norm.is_finite());
}

/// Assert that every state and input value lies within its bounds
#[track_caller]
pub fn assert_within_bounds(solution: &TrimSolution) {
    for block in solution.states() {
        for (index, spec) in block.components.iter().enumerate() {
            assert!(
                spec.value.is_finite(),
                "{}[{}] is not finite",
                block.kind.name(),
                index
            );
            assert!(
                spec.lower <= spec.value && spec.value <= spec.upper,
                "{}[{}] = {} outside [{}, {}]",
                block.kind.name(),
                index,
                spec.value,
                spec.lower,
                spec.upper
            );
        }
    }

    let inputs = solution.inputs();
    assert!(
        (0.0..=1.0).contains(&inputs.motor.value),
        "Motor {} outside [0, 1]",
        inputs.motor.value
    );
    for entry in &inputs.surfaces {
        assert!(
            entry.spec.lower <= entry.spec.value && entry.spec.value <= entry.spec.upper,
            "{} = {} outside [{}, {}]",
            entry.surface,
            entry.spec.value,
            entry.spec.lower,
            entry.spec.upper
        );
    }
}

/// Assert that a bundle has the block structure and surface set of the
/// variant's default seed.
#[track_caller]
pub fn assert_matches_layout(bundle: &TrimBundle, variant: Variant) {
    let reference = TrimBundle::default_for(variant);
    assert_eq!(bundle.variant, variant);

    let shape = |b: &TrimBundle| {
        b.states
            .iter()
            .map(|block| (block.kind, block.values.len()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(bundle), shape(&reference));
    assert!(
        bundle.surfaces.keys().eq(reference.surfaces.keys()),
        "Surface set differs from {} layout",
        variant
    );
}
