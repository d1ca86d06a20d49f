use crate::data::{Instance, OpId, Task, Time};
use crate::encoding::ResourceOrder;
use itertools::Itertools;
use log::trace;
use ndarray::Array1;
use std::cmp;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;

/// A resource order that cannot be turned into start times.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
  #[error("resource order is cyclic: only {scheduled} of {total} operations could be scheduled")]
  Cycle { scheduled: usize, total: usize },
  #[error("operation {0} is missing from the resource order")]
  MissingTask(Task),
  #[error("operation {0} appears more than once in the resource order")]
  DuplicateTask(Task),
  #[error("operation {0} does not exist in the instance")]
  UnknownTask(Task),
  #[error("operation {task} is ordered on machine {found} but runs on machine {expected}")]
  WrongMachine {
    task: Task,
    found: usize,
    expected: usize,
  },
}

/// Start times derived from a resource order.
#[derive(Debug, Clone)]
pub struct Schedule<'a> {
  inst: &'a Instance,
  start_times: Array1<Time>,
  pre_machine: Array1<Option<OpId>>,
  makespan: Time,
}

/// Computes the earliest start time of every operation of a complete resource order.
pub fn simulate<'a>(inst: &'a Instance, order: &ResourceOrder) -> Result<Schedule<'a>, ScheduleError> {
  let (pre_machine, succ_machine) = get_machine_relations(inst, order)?;

  let mut missing_preds = Array1::<u8>::from_elem(inst.n_ops(), 0);
  let mut open = VecDeque::new();
  for op in 0..inst.n_ops() {
    let task = inst.task_from_id(op);
    missing_preds[op] = (task.index > 0) as u8 + pre_machine[op].is_some() as u8;
    if missing_preds[op] == 0 {
      open.push_back(op);
    }
  }

  let mut start_times = Array1::<Time>::from_elem(inst.n_ops(), 0);
  let mut scheduled = 0;
  while let Some(node) = open.pop_front() {
    let task = inst.task_from_id(node);

    let pre_job_end = if task.index > 0 {
      let pre_job_node = node - 1;
      start_times[pre_job_node] + inst.durations[pre_job_node]
    } else {
      0
    };

    let pre_machine_end = if let Some(pre_machine_node) = pre_machine[node] {
      start_times[pre_machine_node] + inst.durations[pre_machine_node]
    } else {
      0
    };

    start_times[node] = cmp::max(pre_job_end, pre_machine_end);
    scheduled += 1;

    let succ_job = if task.index + 1 < inst.n_tasks() {
      Some(node + 1)
    } else {
      None
    };
    for succ in succ_job.into_iter().chain(succ_machine[node]) {
      missing_preds[succ] -= 1;
      if missing_preds[succ] == 0 {
        open.push_back(succ);
      }
    }
  }

  if scheduled < inst.n_ops() {
    trace!("cyclic order:\n{}", order);
    return Err(ScheduleError::Cycle {
      scheduled: scheduled,
      total: inst.n_ops(),
    });
  }

  let makespan = (0..inst.n_ops())
    .map(|op| start_times[op] + inst.durations[op])
    .max()
    .unwrap_or(0);

  Ok(Schedule {
    inst: inst,
    start_times: start_times,
    pre_machine: pre_machine,
    makespan: makespan,
  })
}

/// Checks that `order` is a per-machine permutation and links every
/// operation to its neighbours on the same machine.
fn get_machine_relations(
  inst: &Instance,
  order: &ResourceOrder,
) -> Result<(Array1<Option<OpId>>, Array1<Option<OpId>>), ScheduleError> {
  let mut seen = Array1::<bool>::from_elem(inst.n_ops(), false);
  let mut pre = Array1::<Option<OpId>>::from_elem(inst.n_ops(), None);
  let mut succ = Array1::<Option<OpId>>::from_elem(inst.n_ops(), None);

  for (m, tasks) in order.sequences() {
    for &task in tasks {
      if task.job >= inst.n_jobs || task.index >= inst.n_tasks() {
        return Err(ScheduleError::UnknownTask(task));
      }
      let expected = inst.machine(task);
      if expected != m {
        return Err(ScheduleError::WrongMachine {
          task: task,
          found: m,
          expected: expected,
        });
      }
      let op = inst.task_to_id(task);
      if seen[op] {
        return Err(ScheduleError::DuplicateTask(task));
      }
      seen[op] = true;
    }

    for (&a, &b) in tasks.iter().tuple_windows() {
      let (v, w) = (inst.task_to_id(a), inst.task_to_id(b));
      pre[w] = Some(v);
      succ[v] = Some(w);
    }
  }

  if let Some(op) = seen.iter().position(|&s| !s) {
    return Err(ScheduleError::MissingTask(inst.task_from_id(op)));
  }

  return Ok((pre, succ));
}

impl<'a> Schedule<'a> {
  pub fn instance(&self) -> &'a Instance {
    return self.inst;
  }

  pub fn makespan(&self) -> Time {
    return self.makespan;
  }

  pub fn start_times(&self) -> &Array1<Time> {
    return &self.start_times;
  }

  pub fn start_time(&self, task: Task) -> Time {
    return self.start_times[self.inst.task_to_id(task)];
  }

  pub fn finish_time(&self, task: Task) -> Time {
    return self.start_time(task) + self.inst.duration(task);
  }

  fn end(&self, op: OpId) -> Time {
    return self.start_times[op] + self.inst.durations[op];
  }

  /// Chain of zero-slack precedences ending in the operation that finishes last.
  ///
  /// Walking backwards, a machine predecessor is preferred over a job
  /// predecessor when both are tight, so runs on one machine stay together.
  pub fn critical_path(&self) -> Vec<Task> {
    let n_tasks = self.inst.n_tasks();
    let mut current = match (0..self.inst.n_ops()).fold(None, |best: Option<OpId>, op| match best {
      Some(b) if self.end(b) >= self.end(op) => Some(b),
      _ => Some(op),
    }) {
      Some(op) => op,
      None => return Vec::new(),
    };

    let mut path = vec![current];
    loop {
      let start = self.start_times[current];
      let critical_pre_machine = self.pre_machine[current].filter(|&op| self.end(op) == start);
      let critical_pre_job = Some(current)
        .filter(|&op| op % n_tasks > 0)
        .map(|op| op - 1)
        .filter(|&op| self.end(op) == start);

      match critical_pre_machine.or(critical_pre_job) {
        Some(pre) => {
          path.push(pre);
          current = pre;
        }
        None => break,
      }
    }

    path.reverse();
    return path.into_iter().map(|op| self.inst.task_from_id(op)).collect();
  }

  /// Checks job precedences and that no two operations overlap on a machine.
  pub fn verify(&self) -> Result<(), Box<dyn Error>> {
    let inst = self.inst;

    for job in 0..inst.n_jobs {
      for (a, b) in (0..inst.n_tasks()).map(|o| Task::new(job, o)).tuple_windows() {
        if self.finish_time(a) > self.start_time(b) {
          Err(format!(
            "Precedence violation in job {} - {}:[{}, {}] should be before {}:[{}, {}]",
            job,
            a,
            self.start_time(a),
            self.finish_time(a),
            b,
            self.start_time(b),
            self.finish_time(b)
          ))?;
        }
      }
    }

    let mut by_machine = Array1::from_elem(inst.n_machines, Vec::new());
    for task in inst.tasks() {
      by_machine[inst.machine(task)].push(task);
    }
    for (machine, tasks) in by_machine.iter_mut().enumerate() {
      tasks.sort_by_key(|&t| (self.start_time(t), self.finish_time(t)));
      for (&a, &b) in tasks.iter().tuple_windows() {
        if self.finish_time(a) > self.start_time(b) {
          Err(format!(
            "Overlap in machine {} - {}:[{}, {}] overlaps with {}:[{}, {}]",
            machine,
            a,
            self.start_time(a),
            self.finish_time(a),
            b,
            self.start_time(b),
            self.finish_time(b)
          ))?;
        }
      }
    }

    Ok(())
  }

  pub fn is_valid(&self) -> bool {
    return self.verify().is_ok();
  }
}

/// One line of start times per job.
impl<'a> fmt::Display for Schedule<'a> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for job in 0..self.inst.n_jobs {
      let line = (0..self.inst.n_tasks())
        .map(|o| self.start_time(Task::new(job, o)))
        .join(" ");
      writeln!(f, "{}", line)?;
    }
    Ok(())
  }
}
