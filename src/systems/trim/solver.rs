use argmin::core::observers::ObserverMode;
use argmin::core::{
    Error as ArgminError, Executor, IterState, Jacobian, Operator, Problem, Solver, State,
    TerminationReason, TerminationStatus, KV,
};
use argmin_math::ArgminL2Norm;
use argmin_observer_slog::SlogLogger;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::components::{
    OutputQuantity, SolverDiagnostics, StateBlock, TrimProblem, TrimSolution, TrimSolverConfig,
};
use crate::physics::{DynamicsEvaluator, EvaluatorError};
use crate::systems::trim::problem::TrimObjective;
use crate::utils::{
    project_onto_bounds, sum_of_squares, TrimError, TrimResult, DEFAULT_INITIAL_DAMPING,
    DEFAULT_STEP_TOLERANCE, MAX_DAMPING, MIN_DAMPING,
};

type LmState = IterState<Vec<f64>, (), (), (), (), f64>;

const DAMPING_DECREASE: f64 = 0.3;
const DAMPING_INCREASE: f64 = 10.0;
/// Lower limit on the Marquardt scaling of a column.
const DIAGONAL_FLOOR: f64 = 1e-9;

/// Box-constrained Levenberg-Marquardt.
///
/// Each iteration linearises the residuals, holds variables that sit on a
/// bound with the gradient pushing outward, solves the Marquardt-damped
/// normal equations for the rest and projects the step back into the box.
/// An iteration only returns once a step lowers the cost, or the search is
/// found to be stationary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundedLevenbergMarquardt {
    lower: Vec<f64>,
    upper: Vec<f64>,
    damping: f64,
    step_tolerance: f64,
    exit: Option<String>,
}

impl BoundedLevenbergMarquardt {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self {
            lower,
            upper,
            damping: DEFAULT_INITIAL_DAMPING,
            step_tolerance: DEFAULT_STEP_TOLERANCE,
            exit: None,
        }
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.clamp(MIN_DAMPING, MAX_DAMPING);
        self
    }

    pub fn with_step_tolerance(mut self, step_tolerance: f64) -> Self {
        self.step_tolerance = step_tolerance;
        self
    }

    /// Indices that may move: not pinned on a bound by the gradient and not
    /// absent from every residual.
    fn free_set(&self, x: &[f64], gradient: &DVector<f64>, jtj: &DMatrix<f64>) -> Vec<usize> {
        (0..x.len())
            .filter(|&i| {
                let pinned_low = x[i] <= self.lower[i] && gradient[i] > 0.0;
                let pinned_high = x[i] >= self.upper[i] && gradient[i] < 0.0;
                !pinned_low && !pinned_high && jtj[(i, i)] > 0.0
            })
            .collect()
    }

    /// Solve `(JᵀJ + λ diag(JᵀJ)) δ = -Jᵀr` over the free indices.
    fn damped_step(
        &self,
        jtj: &DMatrix<f64>,
        gradient: &DVector<f64>,
        free: &[usize],
    ) -> Option<DVector<f64>> {
        let n = free.len();
        let system = DMatrix::from_fn(n, n, |a, b| {
            let value = jtj[(free[a], free[b])];
            if a == b {
                value + self.damping * value.max(DIAGONAL_FLOOR)
            } else {
                value
            }
        });
        let rhs = DVector::from_fn(n, |a, _| -gradient[free[a]]);

        match system.clone().cholesky() {
            Some(cholesky) => Some(cholesky.solve(&rhs)),
            None => system.lu().solve(&rhs),
        }
    }

    fn stop(&mut self, reason: &str, state: LmState, x: Vec<f64>, cost: f64) -> LmState {
        self.exit = Some(reason.to_string());
        state.param(x).cost(cost)
    }
}

impl<O> Solver<O, LmState> for BoundedLevenbergMarquardt
where
    O: Operator<Param = Vec<f64>, Output = Vec<f64>>
        + Jacobian<Param = Vec<f64>, Jacobian = DMatrix<f64>>,
{
    const NAME: &'static str = "Bounded Levenberg-Marquardt";

    fn init(
        &mut self,
        problem: &mut Problem<O>,
        mut state: LmState,
    ) -> Result<(LmState, Option<KV>), ArgminError> {
        let mut param = state
            .take_param()
            .ok_or_else(|| ArgminError::msg("initial parameter vector required"))?;
        if param.len() != self.lower.len() || param.len() != self.upper.len() {
            return Err(ArgminError::msg(format!(
                "parameter length {} does not match bounds ({}, {})",
                param.len(),
                self.lower.len(),
                self.upper.len()
            )));
        }

        project_onto_bounds(&mut param, &self.lower, &self.upper);
        let cost = sum_of_squares(&problem.apply(&param)?);
        Ok((state.param(param).cost(cost), None))
    }

    fn next_iter(
        &mut self,
        problem: &mut Problem<O>,
        mut state: LmState,
    ) -> Result<(LmState, Option<KV>), ArgminError> {
        let x = state
            .take_param()
            .ok_or_else(|| ArgminError::msg("parameter vector missing from state"))?;

        // A failure here ends the search at the last accepted iterate.
        let residuals = match problem.apply(&x) {
            Ok(residuals) => residuals,
            Err(err) => {
                let cost = state.get_cost();
                let reason = format!("evaluation failed at current point: {err}");
                return Ok((self.stop(&reason, state, x, cost), None));
            }
        };
        let cost = sum_of_squares(&residuals);
        let jacobian = match problem.jacobian(&x) {
            Ok(jacobian) => jacobian,
            Err(err) => {
                let reason = format!("evaluation failed while linearising: {err}");
                return Ok((self.stop(&reason, state, x, cost), None));
            }
        };
        let jt = jacobian.transpose();
        let jtj = &jt * &jacobian;
        let gradient = jt * DVector::from_vec(residuals);

        let free = self.free_set(&x, &gradient, &jtj);
        if free.is_empty() {
            return Ok((self.stop("no free descent direction", state, x, cost), None));
        }

        let x_norm = x.l2_norm();
        loop {
            if let Some(step) = self.damped_step(&jtj, &gradient, &free) {
                let mut candidate = x.clone();
                for (k, &i) in free.iter().enumerate() {
                    candidate[i] += step[k];
                }
                project_onto_bounds(&mut candidate, &self.lower, &self.upper);

                let step_norm = candidate
                    .iter()
                    .zip(&x)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt();
                if step_norm <= self.step_tolerance * (x_norm + self.step_tolerance) {
                    return Ok((self.stop("step below tolerance", state, x, cost), None));
                }

                // A candidate the evaluator cannot handle counts as a rejected step.
                if let Ok(trial) = problem.apply(&candidate) {
                    let trial_cost = sum_of_squares(&trial);
                    if trial_cost < cost {
                        debug!(
                            "LM step accepted: cost {:.3e} -> {:.3e}, lambda {:.1e}, |step| {:.3e}",
                            cost, trial_cost, self.damping, step_norm
                        );
                        self.damping = (self.damping * DAMPING_DECREASE).max(MIN_DAMPING);
                        return Ok((state.param(candidate).cost(trial_cost), None));
                    }
                }
            }

            self.damping *= DAMPING_INCREASE;
            if self.damping > MAX_DAMPING {
                return Ok((self.stop("damping limit reached", state, x, cost), None));
            }
        }
    }

    fn terminate(&mut self, _state: &LmState) -> TerminationStatus {
        match &self.exit {
            Some(reason) => {
                TerminationStatus::Terminated(TerminationReason::SolverExit(reason.clone()))
            }
            None => TerminationStatus::NotTerminated,
        }
    }
}

fn describe(reason: Option<&TerminationReason>) -> String {
    match reason {
        Some(TerminationReason::SolverExit(message)) => message.clone(),
        Some(TerminationReason::TargetCostReached) => "target cost reached".to_string(),
        Some(TerminationReason::MaxItersReached) => "maximum iterations reached".to_string(),
        Some(other) => format!("{:?}", other),
        None => "not terminated".to_string(),
    }
}

fn solver_error(err: ArgminError) -> TrimError {
    match err.downcast::<EvaluatorError>() {
        Ok(evaluator) => TrimError::Evaluator(evaluator),
        Err(err) => TrimError::Solver(err.to_string()),
    }
}

/// Solve a compiled trim problem against `evaluator`.
///
/// Non-convergence is not an error: the best point found is returned with
/// `converged == false` in its diagnostics.
pub fn solve_trim<E>(
    problem: &TrimProblem,
    evaluator: &E,
    config: &TrimSolverConfig,
) -> TrimResult<TrimSolution>
where
    E: DynamicsEvaluator + Sync,
{
    let objective = TrimObjective::new(problem, evaluator, config.finite_difference_step)?;
    let initial = objective.initial_guess();

    let (best, iterations, termination) =
        if objective.free_len() == 0 || objective.residual_len() == 0 {
            (initial, 0, "nothing to solve".to_string())
        } else {
            let solver = BoundedLevenbergMarquardt::new(
                objective.lower_bounds().to_vec(),
                objective.upper_bounds().to_vec(),
            )
            .with_damping(config.initial_damping)
            .with_step_tolerance(config.step_tolerance);

            let mut executor = Executor::new(objective.clone(), solver).configure(|state| {
                state
                    .param(initial.clone())
                    .max_iters(config.max_iterations)
                    .target_cost(config.cost_tolerance)
            });
            if config.traces_iterations() {
                executor = executor.add_observer(SlogLogger::term(), ObserverMode::Always);
            }

            let result = executor.run().map_err(solver_error)?;
            let state = result.state;
            let best = state.get_best_param().cloned().unwrap_or(initial);
            (
                best,
                state.get_iter(),
                describe(state.get_termination_reason()),
            )
        };

    let mut best = best;
    project_onto_bounds(&mut best, objective.lower_bounds(), objective.upper_bounds());
    let evaluation = objective.evaluate(&best)?;
    let residuals = objective.residuals_of(&evaluation)?;
    let cost = sum_of_squares(&residuals);
    let diagnostics = SolverDiagnostics {
        converged: cost <= config.cost_tolerance,
        iterations,
        residual_norm: residuals.l2_norm(),
        cost,
        termination,
    };

    if diagnostics.converged && config.reports_summary() {
        info!(
            "{} trim converged: cost {:.3e} after {} iterations",
            problem.variant(),
            cost,
            iterations
        );
    } else if diagnostics.converged {
        debug!(
            "{} trim converged: cost {:.3e} after {} iterations",
            problem.variant(),
            cost,
            iterations
        );
    } else {
        warn!(
            "{} trim did not converge: residual norm {:.3e} after {} iterations ({})",
            problem.variant(),
            diagnostics.residual_norm,
            iterations,
            diagnostics.termination
        );
    }

    let (state, input) = objective.assemble(&best);
    let mut offset = 0;
    let states = problem
        .states()
        .iter()
        .map(|block| {
            let mut solved = block.clone();
            for (index, spec) in solved.components.iter_mut().enumerate() {
                spec.value = state[offset + index];
            }
            offset += block.len();
            solved
        })
        .collect::<Vec<StateBlock>>();

    let mut outputs = problem.outputs().clone();
    for quantity in OutputQuantity::ALL {
        let values = evaluation.outputs.values(quantity);
        for (spec, &value) in outputs.get_mut(quantity).components.iter_mut().zip(values) {
            spec.value = value;
        }
    }

    let mut inputs = problem.inputs().clone();
    inputs.motor.value = input.motor;
    for (entry, &value) in inputs.surfaces.iter_mut().zip(input.surfaces.iter()) {
        entry.spec.value = value;
    }

    Ok(TrimSolution::new(
        problem.variant(),
        states,
        outputs,
        inputs,
        diagnostics,
    ))
}
