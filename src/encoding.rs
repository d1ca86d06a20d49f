use crate::data::{Duration, Instance, Machine, Task, Time};
use itertools::Itertools;
use ndarray::Array1;
use std::cmp;
use std::fmt;

/// For every machine, the order in which it processes its operations.
///
/// Cloning produces independent per-machine sequences, so a clone can be
/// perturbed while the original is still held as an incumbent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceOrder {
  tasks_by_machine: Array1<Vec<Task>>,
}

/// Exchanges the operations at positions `first` and `second` of one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
  pub machine: Machine,
  pub first: usize,
  pub second: usize,
}

impl ResourceOrder {
  /// An order with no operations placed yet.
  pub fn new(inst: &Instance) -> Self {
    return Self {
      tasks_by_machine: Array1::from_elem(inst.n_machines, Vec::with_capacity(inst.n_jobs)),
    };
  }

  pub fn from_sequences(sequences: Vec<Vec<Task>>) -> Self {
    return Self {
      tasks_by_machine: Array1::from(sequences),
    };
  }

  /// Orders each machine's operations by start time.
  pub fn from_start_times(inst: &Instance, start_times: &Array1<Time>) -> Self {
    let mut order = Self::new(inst);
    for task in inst.tasks() {
      order.push(inst.machine(task), task);
    }

    for tasks in order.tasks_by_machine.iter_mut() {
      tasks.sort_by(|&a, &b| {
        task_ordering(
          (a, start_times[inst.task_to_id(a)], inst.duration(a)),
          (b, start_times[inst.task_to_id(b)], inst.duration(b)),
        )
      });
    }

    return order;
  }

  pub fn n_machines(&self) -> usize {
    return self.tasks_by_machine.len();
  }

  pub fn sequence(&self, machine: Machine) -> &[Task] {
    return &self.tasks_by_machine[machine];
  }

  pub fn sequences(&self) -> impl Iterator<Item = (Machine, &Vec<Task>)> {
    return self.tasks_by_machine.iter().enumerate();
  }

  /// Appends `task` to the end of `machine`'s sequence.
  pub fn push(&mut self, machine: Machine, task: Task) {
    self.tasks_by_machine[machine].push(task);
  }

  /// Number of operations placed over all machines.
  pub fn len(&self) -> usize {
    return self.tasks_by_machine.iter().map(|s| s.len()).sum();
  }

  pub fn is_empty(&self) -> bool {
    return self.len() == 0;
  }

  pub fn is_complete(&self, inst: &Instance) -> bool {
    return self.len() == inst.n_ops();
  }

  pub fn task_at(&self, machine: Machine, position: usize) -> Task {
    return self.tasks_by_machine[machine][position];
  }

  /// Copies this order and applies `swap` to the copy.
  pub fn with_swap(&self, swap: &Swap) -> ResourceOrder {
    let mut order = self.clone();
    swap.apply_on(&mut order);
    return order;
  }
}

impl Swap {
  pub fn new(machine: Machine, first: usize, second: usize) -> Self {
    return Self {
      machine: machine,
      first: first,
      second: second,
    };
  }

  pub fn apply_on(&self, order: &mut ResourceOrder) {
    order.tasks_by_machine[self.machine].swap(self.first, self.second);
  }

  /// The pair of operations this swap would exchange in `order`, in position order.
  pub fn tasks(&self, order: &ResourceOrder) -> (Task, Task) {
    return (
      order.task_at(self.machine, self.first),
      order.task_at(self.machine, self.second),
    );
  }
}

impl fmt::Display for Swap {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "Swap(m={}; {} <-> {})",
      self.machine, self.first, self.second
    )
  }
}

impl fmt::Display for ResourceOrder {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (m, tasks) in self.sequences() {
      writeln!(f, "machine {}: {}", m, tasks.iter().join(" "))?;
    }
    Ok(())
  }
}

fn task_ordering(a: (Task, Time, Duration), b: (Task, Time, Duration)) -> cmp::Ordering {
  let (task_a, r_a, d_a) = a;
  let (task_b, r_b, d_b) = b;

  // A zero-length operation starting together with another one goes first
  return r_a
    .cmp(&r_b)
    .then_with(|| (d_a != 0).cmp(&(d_b != 0)))
    .then_with(|| task_a.cmp(&task_b));
}
