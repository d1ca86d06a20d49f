use ndarray::Array1;
use std::fmt;

pub type Machine = usize;
pub type Duration = u32;
pub type Time = u32;

pub type OpId = usize;

/// The `index`-th operation of job `job`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Task {
  pub job: usize,
  pub index: usize,
}

impl Task {
  pub fn new(job: usize, index: usize) -> Self {
    return Task {
      job: job,
      index: index,
    };
  }
}

impl fmt::Display for Task {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "({},{})", self.job, self.index)
  }
}

/// Every job visits every machine exactly once, so a job has `n_machines` operations.
#[derive(Debug, Clone)]
pub struct Instance {
  pub n_machines: usize,
  pub n_jobs: usize,

  pub durations: Array1<Duration>,
  pub machines: Array1<Machine>,
}

impl Instance {
  /// Builds an instance from per-job `(machine, duration)` lists.
  pub fn from_jobs(n_machines: usize, jobs: &[Vec<(Machine, Duration)>]) -> Self {
    let n_jobs = jobs.len();
    let mut instance = Instance {
      n_jobs: n_jobs,
      n_machines: n_machines,
      durations: Array1::<Duration>::from_elem(n_jobs * n_machines, 0),
      machines: Array1::<Machine>::from_elem(n_jobs * n_machines, 0),
    };

    for (job, ops) in jobs.iter().enumerate() {
      for (index, &(machine, duration)) in ops.iter().enumerate() {
        let op = instance.task_to_id(Task::new(job, index));
        instance.machines[op] = machine;
        instance.durations[op] = duration;
      }
    }

    return instance;
  }

  pub fn n_tasks(&self) -> usize {
    return self.n_machines;
  }

  pub fn tasks(&self) -> Vec<Task> {
    let mut tasks = Vec::new();

    for j in 0..self.n_jobs {
      for o in 0..self.n_tasks() {
        tasks.push(Task::new(j, o));
      }
    }

    return tasks;
  }

  pub fn task_to_id(&self, task: Task) -> OpId {
    return task.job * self.n_tasks() + task.index;
  }

  pub fn task_from_id(&self, id: OpId) -> Task {
    return Task::new(id / self.n_tasks(), id % self.n_tasks());
  }

  pub fn machine(&self, task: Task) -> Machine {
    return self.machines[self.task_to_id(task)];
  }

  pub fn duration(&self, task: Task) -> Duration {
    return self.durations[self.task_to_id(task)];
  }

  /// Sum of the durations of `task` and every later operation of its job.
  pub fn remaining_work(&self, task: Task) -> Duration {
    return (task.index..self.n_tasks())
      .map(|o| self.duration(Task::new(task.job, o)))
      .sum();
  }

  pub fn shape(&self) -> (usize, usize) {
    return (self.n_jobs, self.n_machines);
  }

  pub fn n_ops(&self) -> usize {
    return self.n_jobs * self.n_tasks();
  }

  /// Trivial lower bound on the makespan: the longest job or the most loaded machine.
  pub fn lower_bound(&self) -> Time {
    let mut machine_load = Array1::<Time>::from_elem(self.n_machines, 0);
    let mut longest_job = 0;
    for j in 0..self.n_jobs {
      let mut job_length = 0;
      for o in 0..self.n_tasks() {
        let task = Task::new(j, o);
        job_length += self.duration(task);
        machine_load[self.machine(task)] += self.duration(task);
      }
      longest_job = longest_job.max(job_length);
    }

    return machine_load.iter().copied().fold(longest_job, Time::max);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn two_by_two() -> Instance {
    Instance::from_jobs(2, &[vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]])
  }

  #[test]
  fn ids_round_trip_in_job_major_order() {
    let inst = two_by_two();
    let ids: Vec<OpId> = inst.tasks().into_iter().map(|t| inst.task_to_id(t)).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert_eq!(inst.task_from_id(3), Task::new(1, 1));
  }

  #[test]
  fn remaining_work_sums_later_operations() {
    let inst = two_by_two();
    assert_eq!(inst.remaining_work(Task::new(0, 0)), 5);
    assert_eq!(inst.remaining_work(Task::new(1, 0)), 6);
    assert_eq!(inst.remaining_work(Task::new(1, 1)), 4);
  }

  #[test]
  fn lower_bound_uses_busiest_machine() {
    assert_eq!(two_by_two().lower_bound(), 7);
  }
}
