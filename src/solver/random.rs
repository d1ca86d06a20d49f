use crate::data::Instance;
use crate::schedule::ScheduleError;
use crate::solver::greedy::Construction;
use crate::solver::{deadline_passed, ExitReason, SolveResult, Solver};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
  pub seed: u64,
}

/// Dispatches a uniformly random realizable operation at every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSolver {
  pub config: Config,
}

impl RandomSolver {
  pub fn new(config: Config) -> Self {
    return Self { config: config };
  }
}

impl Solver for RandomSolver {
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Result<SolveResult<'a>, ScheduleError> {
    let mut rng = rand_chacha::ChaChaRng::seed_from_u64(self.config.seed);
    let mut construction = Construction::new(inst);
    let mut exit_reason = ExitReason::Completed;

    while !construction.is_complete() {
      if exit_reason == ExitReason::Completed && deadline_passed(deadline) {
        debug!("Deadline passed, finishing the random build anyway");
        exit_reason = ExitReason::Timeout;
      }
      let chosen_idx = rng.gen_range(0, construction.ready().len());
      construction.place(chosen_idx);
    }

    return SolveResult::new(inst, construction.into_order(), exit_reason);
  }
}
