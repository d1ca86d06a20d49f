use crate::data::Instance;
use crate::encoding::ResourceOrder;
use crate::schedule::{simulate, ScheduleError};
use crate::solver::greedy::construct_complete;
use crate::solver::neighborhood;
use crate::solver::priority::PriorityRule;
use crate::solver::{deadline_passed, ExitReason, SolveResult, Solver};
use log::{debug, info, trace};
use std::time::Instant;

/// Steepest descent over the block swap neighborhood, seeded with EST_LRPT.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescentSolver;

impl Solver for DescentSolver {
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Result<SolveResult<'a>, ScheduleError> {
    let seed = construct_complete(inst, PriorityRule::EstLrpt);
    return improve(inst, seed, deadline);
  }
}

/// Descends from `seed` until a full pass finds no improving swap.
///
/// The swaps of a pass come from the blocks of the order the pass started
/// with. Each one is applied to the best order found so far, so an early
/// improvement changes what later swaps in the same pass act on.
pub fn improve<'a>(
  inst: &'a Instance,
  seed: ResourceOrder,
  deadline: Instant,
) -> Result<SolveResult<'a>, ScheduleError> {
  let mut best_schedule = simulate(inst, &seed)?;
  let mut best = seed;

  trace!("Starting with {}", best_schedule.makespan());
  let mut pass = 0;
  loop {
    if deadline_passed(deadline) {
      info!(
        "Stopping due to timeout at {} (pass {})",
        best_schedule.makespan(),
        pass
      );
      return Ok(SolveResult {
        order: best,
        schedule: best_schedule,
        exit_reason: ExitReason::Timeout,
      });
    }

    let mut improved = false;
    for swap in neighborhood::generate_moves(inst, &best, &best_schedule) {
      if let Some(candidate) = neighborhood::evaluate(inst, &best, swap) {
        if candidate.makespan() < best_schedule.makespan() {
          debug!(
            "Found improvement to {} with {} (pass {})",
            candidate.makespan(),
            swap,
            pass
          );
          best = candidate.order;
          best_schedule = candidate.schedule;
          improved = true;
        }
      }
    }

    if !improved {
      info!(
        "Stopping at local optimum {} (pass {})",
        best_schedule.makespan(),
        pass
      );
      return Ok(SolveResult {
        order: best,
        schedule: best_schedule,
        exit_reason: ExitReason::Completed,
      });
    }

    pass += 1;
  }
}
