use crate::components::{BlockValues, TrimBundle, TrimSolution};
use crate::utils::{TrimError, TrimResult};

/// Convert a solution back into the bundle shape used to seed simulations
/// and later trims.
///
/// In strict mode a non-converged solution is rejected as a whole.
pub fn materialize(solution: &TrimSolution, strict: bool) -> TrimResult<TrimBundle> {
    let diagnostics = solution.diagnostics();
    if strict && !diagnostics.converged {
        return Err(TrimError::NotConverged {
            residual_norm: diagnostics.residual_norm,
            iterations: diagnostics.iterations,
        });
    }

    Ok(TrimBundle {
        variant: solution.variant(),
        states: solution
            .states()
            .iter()
            .map(|block| BlockValues {
                kind: block.kind,
                values: block.values(),
            })
            .collect(),
        motor: solution.motor(),
        surfaces: solution
            .inputs()
            .surfaces
            .iter()
            .map(|entry| (entry.surface, entry.spec.value))
            .collect(),
    })
}
