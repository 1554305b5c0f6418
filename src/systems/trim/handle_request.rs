use rayon::prelude::*;
use tracing::info;

use crate::components::{TrimRequest, TrimResponse};
use crate::physics::{DynamicsEvaluator, SimulationModel};
use crate::resources::{persist_trim, ModelHandle};
use crate::systems::trim::{compile_problem, materialize, normalize_target, solve_trim};
use crate::utils::TrimResult;

/// Run one trim request end to end: normalize, compile, solve, materialize
/// and optionally persist.
///
/// The model lease is taken first and released on every return path.
pub fn run_trim<M, E>(
    request: &TrimRequest,
    model: &ModelHandle<M>,
    evaluator: &E,
) -> TrimResult<TrimResponse>
where
    M: SimulationModel,
    E: DynamicsEvaluator + Sync,
{
    let _lease = model.acquire()?;
    info!(
        "Trimming {} with {} target field(s)",
        request.variant,
        request.target.len()
    );

    let normalized_target = normalize_target(&request.target, request.variant)?;
    let prior = request.seed();
    let problem = compile_problem(
        &normalized_target,
        request.variant,
        &prior,
        request.actuator_limits.as_ref(),
    )?;
    let solution = solve_trim(&problem, evaluator, &request.solver)?;
    let bundle = materialize(&solution, request.strict)?;

    let persisted_to = request
        .output
        .as_deref()
        .map(|path| persist_trim(path, &normalized_target, &problem, &solution))
        .transpose()?;

    let diagnostics = solution.diagnostics();
    info!(
        "Trim finished for {}: converged={}, cost={:.3e}, iterations={}",
        request.variant, diagnostics.converged, diagnostics.cost, diagnostics.iterations
    );

    Ok(TrimResponse {
        solution,
        normalized_target,
        bundle,
        persisted_to,
    })
}

/// Run independent requests in parallel, each against its own evaluator.
///
/// One lease is held for the whole batch so the model is loaded at most
/// once. Per-request failures are returned in place; only a failure to
/// acquire the model fails the batch.
pub fn run_trim_batch<M, E, F>(
    requests: &[TrimRequest],
    model: &ModelHandle<M>,
    make_evaluator: F,
) -> TrimResult<Vec<TrimResult<TrimResponse>>>
where
    M: SimulationModel,
    E: DynamicsEvaluator + Sync,
    F: Fn(&TrimRequest) -> E + Sync,
{
    let _lease = model.acquire()?;
    info!("Running trim batch of {} request(s)", requests.len());

    Ok(requests
        .par_iter()
        .map(|request| {
            let evaluator = make_evaluator(request);
            run_trim(request, model, &evaluator)
        })
        .collect())
}
