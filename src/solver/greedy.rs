use crate::data::{Instance, Task, Time};
use crate::encoding::ResourceOrder;
use crate::schedule::ScheduleError;
use crate::solver::priority::PriorityRule;
use crate::solver::{deadline_passed, ExitReason, SolveResult, Solver};
use log::{debug, info, trace};
use ndarray::Array1;
use std::cmp;
use std::time::Instant;

/// State of a list-scheduling build: the operations placed so far, the
/// realizable operations (next unplaced one of every job) and the time each
/// machine and job becomes free.
#[derive(Debug, Clone)]
pub struct Construction<'a> {
  inst: &'a Instance,
  order: ResourceOrder,
  ready: Vec<Task>,
  machine_next_release: Array1<Time>,
  job_next_release: Array1<Time>,
}

impl<'a> Construction<'a> {
  pub fn new(inst: &'a Instance) -> Self {
    let mut ready = Vec::new();
    if inst.n_tasks() > 0 {
      for j in 0..inst.n_jobs {
        ready.push(Task::new(j, 0));
      }
    }

    return Self {
      inst: inst,
      order: ResourceOrder::new(inst),
      ready: ready,
      machine_next_release: Array1::<Time>::from_elem(inst.n_machines, 0),
      job_next_release: Array1::<Time>::from_elem(inst.n_jobs, 0),
    };
  }

  pub fn ready(&self) -> &[Task] {
    return &self.ready;
  }

  pub fn is_complete(&self) -> bool {
    return self.ready.is_empty();
  }

  pub fn order(&self) -> &ResourceOrder {
    return &self.order;
  }

  pub fn into_order(self) -> ResourceOrder {
    return self.order;
  }

  pub fn earliest_start(&self, task: Task) -> Time {
    return cmp::max(
      self.job_next_release[task.job],
      self.machine_next_release[self.inst.machine(task)],
    );
  }

  /// Places the realizable operation chosen by `rule`.
  pub fn place_next(&mut self, rule: PriorityRule) {
    let chosen = rule.choose(self.inst, &self.ready, &|t| self.earliest_start(t));
    if let Some(idx) = chosen {
      self.place(idx);
    }
  }

  /// Places `ready()[idx]` at the end of its machine's sequence.
  pub fn place(&mut self, idx: usize) {
    let chosen = self.ready.remove(idx);
    let m = self.inst.machine(chosen);
    let release_time = self.earliest_start(chosen);
    let finish_time = release_time + self.inst.duration(chosen);

    self.order.push(m, chosen);
    self.machine_next_release[m] = finish_time;
    self.job_next_release[chosen.job] = finish_time;
    trace!("Placed {} on {} at {}", chosen, m, release_time);

    if chosen.index + 1 < self.inst.n_tasks() {
      self.ready.push(Task::new(chosen.job, chosen.index + 1));
    }
  }
}

/// Builds a resource order with `rule`, checking `deadline` before every placement.
///
/// On `Timeout` the returned order may be incomplete and is only meaningful
/// for the operations it contains.
pub fn construct(inst: &Instance, rule: PriorityRule, deadline: Instant) -> (ResourceOrder, ExitReason) {
  let mut construction = Construction::new(inst);
  while !construction.is_complete() {
    if deadline_passed(deadline) {
      debug!(
        "Construction with {} interrupted after {} of {} operations",
        rule,
        construction.order().len(),
        inst.n_ops()
      );
      return (construction.into_order(), ExitReason::Timeout);
    }
    construction.place_next(rule);
  }

  return (construction.into_order(), ExitReason::Completed);
}

/// Builds a complete resource order with `rule`.
pub fn construct_complete(inst: &Instance, rule: PriorityRule) -> ResourceOrder {
  let mut construction = Construction::new(inst);
  while !construction.is_complete() {
    construction.place_next(rule);
  }
  return construction.into_order();
}

#[derive(Debug, Clone, Copy)]
pub struct GreedySolver {
  pub rule: PriorityRule,
}

impl GreedySolver {
  pub fn new(rule: PriorityRule) -> Self {
    return Self { rule: rule };
  }
}

impl Solver for GreedySolver {
  /// A build interrupted by the deadline is finished with the same rule
  /// and reported as `Timeout`, so the result is always a complete order.
  fn solve<'a>(&self, inst: &'a Instance, deadline: Instant) -> Result<SolveResult<'a>, ScheduleError> {
    let mut construction = Construction::new(inst);
    let mut exit_reason = ExitReason::Completed;
    while !construction.is_complete() {
      if exit_reason == ExitReason::Completed && deadline_passed(deadline) {
        exit_reason = ExitReason::Timeout;
      }
      construction.place_next(self.rule);
    }

    let result = SolveResult::new(inst, construction.into_order(), exit_reason)?;
    info!(
      "Greedy {} finished at {} ({})",
      self.rule,
      result.makespan(),
      result.exit_reason
    );

    return Ok(result);
  }
}
