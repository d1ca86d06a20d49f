pub mod basic;
pub mod descent;
pub mod greedy;
pub mod neighborhood;
pub mod priority;
pub mod random;
pub mod tabu_search;

use crate::data::{Instance, Time};
use crate::encoding::ResourceOrder;
use crate::schedule::{simulate, Schedule, ScheduleError};
use priority::PriorityRule;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

/// Why a solver stopped.
///
/// `Completed` means the strategy reached its own stopping condition (a
/// finished construction or a local optimum of the swap neighborhood). It
/// never implies the schedule is globally optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
  Completed,
  Timeout,
  IterationBudgetExhausted,
}

impl fmt::Display for ExitReason {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let name = match self {
      ExitReason::Completed => "completed",
      ExitReason::Timeout => "timeout",
      ExitReason::IterationBudgetExhausted => "iteration budget exhausted",
    };
    write!(f, "{}", name)
  }
}

#[derive(Debug, Clone)]
pub struct SolveResult<'a> {
  pub order: ResourceOrder,
  pub schedule: Schedule<'a>,
  pub exit_reason: ExitReason,
}

impl<'a> SolveResult<'a> {
  /// Simulates `order`; fails if it is not a valid encoding.
  pub fn new(
    inst: &'a Instance,
    order: ResourceOrder,
    exit_reason: ExitReason,
  ) -> Result<Self, ScheduleError> {
    let schedule = simulate(inst, &order)?;
    return Ok(Self {
      order: order,
      schedule: schedule,
      exit_reason: exit_reason,
    });
  }

  pub fn instance(&self) -> &'a Instance {
    return self.schedule.instance();
  }

  pub fn makespan(&self) -> Time {
    return self.schedule.makespan();
  }
}

pub trait Solver {
  /// Runs until the strategy stops on its own or `deadline` passes.
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Result<SolveResult<'a>, ScheduleError>;
}

pub fn deadline_passed(deadline: Instant) -> bool {
  return Instant::now() >= deadline;
}

pub type Registry = BTreeMap<String, Box<dyn Solver>>;

/// All available solvers by name. `seed` drives the random baseline.
pub fn registry(seed: u64) -> Registry {
  let mut solvers: Registry = BTreeMap::new();
  solvers.insert("basic".to_string(), Box::new(basic::BasicSolver));
  solvers.insert(
    "random".to_string(),
    Box::new(random::RandomSolver::new(random::Config { seed: seed })),
  );

  for &rule in PriorityRule::ALL.iter() {
    let name = format!("greedy-{}", rule.name().to_lowercase().replace('_', "-"));
    solvers.insert(name, Box::new(greedy::GreedySolver::new(rule)));
  }

  solvers.insert("descent".to_string(), Box::new(descent::DescentSolver));

  for &(max_iterations, tenure) in &[
    (1000, 50),
    (10, 10),
    (10, 4),
    (2000, 10),
    (1000, 750),
    (2000, 1500),
  ] {
    let config = tabu_search::Config {
      max_iterations: max_iterations,
      tenure: tenure,
    };
    solvers.insert(
      format!("tabu-{}-{}", max_iterations, tenure),
      Box::new(tabu_search::TabuSolver::new(config)),
    );
  }

  return solvers;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn registry_names() {
    let solvers = registry(0);
    for name in &[
      "basic",
      "random",
      "greedy-spt",
      "greedy-est-lrpt",
      "descent",
      "tabu-2000-10",
      "tabu-10-4",
    ] {
      assert!(solvers.contains_key(*name), "missing {}", name);
    }
    assert!(!solvers.contains_key("greedyESTLRPT"));
    assert_eq!(solvers.len(), 2 + 8 + 1 + 6);
  }

  #[test]
  fn solve_result_rejects_incomplete_order() {
    let inst = Instance::from_jobs(1, &[vec![(0, 5)]]);
    let order = ResourceOrder::new(&inst);
    assert!(SolveResult::new(&inst, order, ExitReason::Timeout).is_err());
  }
}
