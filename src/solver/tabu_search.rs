use crate::data::{Instance, Task};
use crate::encoding::ResourceOrder;
use crate::schedule::{simulate, ScheduleError};
use crate::solver::greedy::construct_complete;
use crate::solver::neighborhood::{self, EvaluatedMove};
use crate::solver::priority::PriorityRule;
use crate::solver::{deadline_passed, ExitReason, SolveResult, Solver};
use log::{debug, info, trace};
use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  pub max_iterations: usize,
  /// Iterations during which undoing a move stays forbidden
  pub tenure: usize,
}

impl Default for Config {
  fn default() -> Self {
    return Self {
      max_iterations: 2000,
      tenure: 10,
    };
  }
}

/// The two operations a swap exchanges, in machine order before the swap.
pub type TabuKey = (Task, Task);

#[derive(Debug, Clone, Copy, Default)]
pub struct TabuSolver {
  pub config: Config,
}

impl TabuSolver {
  pub fn new(config: Config) -> Self {
    return Self { config: config };
  }
}

impl Solver for TabuSolver {
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Result<SolveResult<'a>, ScheduleError> {
    let seed = construct_complete(inst, PriorityRule::EstLrpt);
    return improve(inst, seed, deadline, &self.config);
  }
}

/// Tabu search over the block swap neighborhood starting from `seed`.
///
/// Every iteration moves to the best non-tabu neighbor, even a worse one,
/// and forbids undoing that move for `tenure` iterations. Tabu moves are
/// never admitted, not even when they would beat the incumbent. An
/// iteration where every move is tabu leaves the current order unchanged.
pub fn improve<'a>(
  inst: &'a Instance,
  seed: ResourceOrder,
  deadline: Instant,
  config: &Config,
) -> Result<SolveResult<'a>, ScheduleError> {
  let mut current_schedule = simulate(inst, &seed)?;
  let mut current = seed;
  let mut best = current.clone();
  let mut best_schedule = current_schedule.clone();

  // Entry k forbids the move until iteration k inclusive
  let mut tabu_until: HashMap<TabuKey, usize> = HashMap::new();

  trace!("Starting with {}", best_schedule.makespan());
  let mut iteration = 0;
  let exit_reason = loop {
    if deadline_passed(deadline) {
      break ExitReason::Timeout;
    }
    if iteration >= config.max_iterations {
      break ExitReason::IterationBudgetExhausted;
    }
    iteration += 1;

    let moves = neighborhood::generate_moves(inst, &current, &current_schedule);
    if moves.is_empty() {
      debug!("Generated neighborhood is empty ({})", iteration);
      break ExitReason::Completed;
    }

    let mut best_of_iteration: Option<EvaluatedMove> = None;
    for swap in moves {
      let key = swap.tasks(&current);
      if let Some(&until) = tabu_until.get(&key) {
        if iteration <= until {
          trace!("Skipping move {} because it is tabu until {}", swap, until);
          continue;
        }
      }

      if let Some(candidate) = neighborhood::evaluate(inst, &current, swap) {
        let is_better = match &best_of_iteration {
          Some(chosen) => candidate.makespan() < chosen.makespan(),
          None => true,
        };
        if is_better {
          best_of_iteration = Some(candidate);
        }
      }
    }

    match best_of_iteration {
      Some(chosen) => {
        let (a, b) = chosen.swap.tasks(&current);
        tabu_until.insert((b, a), iteration + config.tenure);
        trace!(
          "Found move {} to {} ({})",
          chosen.swap,
          chosen.makespan(),
          iteration
        );

        if chosen.makespan() < best_schedule.makespan() {
          best = chosen.order.clone();
          best_schedule = chosen.schedule.clone();
          debug!("Improved best to {} ({})", best_schedule.makespan(), iteration);
        }

        current = chosen.order;
        current_schedule = chosen.schedule;
      }
      None => {
        debug!("Every move is tabu ({})", iteration);
      }
    }
  };

  info!(
    "Stopping with {} at {} ({})",
    exit_reason,
    best_schedule.makespan(),
    iteration
  );

  return Ok(SolveResult {
    order: best,
    schedule: best_schedule,
    exit_reason: exit_reason,
  });
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::solver::descent;
  use std::time::Duration;

  fn two_by_two() -> Instance {
    Instance::from_jobs(2, &[vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]])
  }

  fn poor_order() -> ResourceOrder {
    ResourceOrder::from_sequences(vec![
      vec![Task::new(1, 1), Task::new(0, 0)],
      vec![Task::new(1, 0), Task::new(0, 1)],
    ])
  }

  fn later() -> Instant {
    Instant::now() + Duration::from_secs(60)
  }

  fn config(max_iterations: usize, tenure: usize) -> Config {
    Config {
      max_iterations: max_iterations,
      tenure: tenure,
    }
  }

  #[test]
  fn improves_poor_seed_and_exhausts_budget() {
    let inst = two_by_two();
    let result = improve(&inst, poor_order(), later(), &config(10, 2)).unwrap();

    assert_eq!(result.makespan(), 7);
    assert_eq!(result.exit_reason, ExitReason::IterationBudgetExhausted);
    assert!(result.schedule.is_valid());
  }

  #[test]
  fn blocked_iterations_count_towards_budget() {
    let inst = two_by_two();
    // After the first move its reversal is the only neighbor and stays tabu
    let result = improve(&inst, poor_order(), later(), &config(3, 5)).unwrap();

    assert_eq!(result.makespan(), 7);
    assert_eq!(result.exit_reason, ExitReason::IterationBudgetExhausted);
  }

  #[test]
  fn zero_tenure_matches_descent_on_unique_path() {
    let inst = two_by_two();
    assert_eq!(simulate(&inst, &poor_order()).unwrap().makespan(), 11);

    let tabu = improve(&inst, poor_order(), later(), &config(20, 0)).unwrap();
    let descent = descent::improve(&inst, poor_order(), later()).unwrap();

    assert_eq!(tabu.order, descent.order);
    assert_eq!(tabu.makespan(), descent.makespan());
  }

  #[test]
  fn past_deadline_keeps_seed() {
    let inst = two_by_two();
    let result = improve(&inst, poor_order(), Instant::now(), &Config::default()).unwrap();

    assert_eq!(result.exit_reason, ExitReason::Timeout);
    assert_eq!(result.order, poor_order());
  }

  #[test]
  fn empty_neighborhood_completes() {
    let inst = Instance::from_jobs(1, &[vec![(0, 5)]]);
    let result = TabuSolver::default().solve(&inst, later()).unwrap();

    assert_eq!(result.makespan(), 5);
    assert_eq!(result.exit_reason, ExitReason::Completed);
  }

  #[test]
  fn zero_budget_returns_seed() {
    let inst = two_by_two();
    let result = improve(&inst, poor_order(), later(), &config(0, 10)).unwrap();

    assert_eq!(result.exit_reason, ExitReason::IterationBudgetExhausted);
    assert_eq!(result.makespan(), 11);
  }
}
