use crate::data::{Instance, Time};
use crate::encoding::ResourceOrder;
use crate::schedule::ScheduleError;
use crate::solver::{ExitReason, SolveResult, Solver};
use ndarray::Array1;
use std::time::Instant;

/// Runs the jobs one after another; every machine serves the jobs in index order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicSolver;

impl Solver for BasicSolver {
  fn solve<'a>(&self, inst: &'a Instance, _deadline: Instant) -> Result<SolveResult<'a>, ScheduleError> {
    let mut op_start_times = Array1::<Time>::from_elem(inst.n_ops(), 0);

    let mut next_start_time = 0;
    for task in inst.tasks() {
      op_start_times[inst.task_to_id(task)] = next_start_time;
      next_start_time += inst.duration(task);
    }

    let order = ResourceOrder::from_start_times(inst, &op_start_times);
    return SolveResult::new(inst, order, ExitReason::Completed);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::Task;
  use std::time::Duration;

  #[test]
  fn machines_serve_jobs_in_order() {
    let inst = Instance::from_jobs(2, &[vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]]);
    let result = BasicSolver
      .solve(&inst, Instant::now() + Duration::from_secs(1))
      .unwrap();

    assert_eq!(result.order.sequence(0), &[Task::new(0, 0), Task::new(1, 1)]);
    assert_eq!(result.order.sequence(1), &[Task::new(0, 1), Task::new(1, 0)]);
    assert_eq!(result.exit_reason, ExitReason::Completed);
    assert!(result.schedule.is_valid());
    assert_eq!(result.makespan(), 11);
  }
}
