// Nowicki and Smutnicki, "A Fast Taboo Search Algorithm for the Job Shop Problem"
use crate::data::{Instance, Machine, Time};
use crate::encoding::{ResourceOrder, Swap};
use crate::schedule::{simulate, Schedule};
use itertools::Itertools;
use log::trace;
use ndarray::Array1;

/// A maximal run of critical operations processed back to back on one
/// machine, given by positions in that machine's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
  pub machine: Machine,
  pub first: usize,
  pub last: usize,
}

impl Block {
  pub fn len(&self) -> usize {
    return self.last - self.first + 1;
  }
}

/// Blocks of the critical path of `schedule`, sorted by machine then position.
///
/// Consecutive critical operations on the same machine are always linked by
/// a machine edge, since a job never visits a machine twice.
pub fn blocks(inst: &Instance, order: &ResourceOrder, schedule: &Schedule) -> Vec<Block> {
  let mut positions = Array1::<usize>::from_elem(inst.n_ops(), 0);
  for (_, tasks) in order.sequences() {
    for (p, &task) in tasks.iter().enumerate() {
      positions[inst.task_to_id(task)] = p;
    }
  }

  let critical_path = schedule.critical_path();
  let runs = critical_path.iter().group_by(|&&task| inst.machine(task));

  let mut blocks = Vec::new();
  for (machine, run) in &runs {
    let run: Vec<_> = run.collect();
    if run.len() < 2 {
      continue;
    }
    blocks.push(Block {
      machine: machine,
      first: positions[inst.task_to_id(*run[0])],
      last: positions[inst.task_to_id(*run[run.len() - 1])],
    });
  }

  blocks.sort_by_key(|b| (b.machine, b.first));
  trace!("blocks={:?}", blocks);

  return blocks;
}

/// Swaps of the first two and the last two operations of `block`.
pub fn neighbors(block: &Block) -> Vec<Swap> {
  if block.first + 1 == block.last {
    return vec![Swap::new(block.machine, block.first, block.last)];
  }

  return vec![
    Swap::new(block.machine, block.first, block.first + 1),
    Swap::new(block.machine, block.last - 1, block.last),
  ];
}

/// All swaps of all blocks, in block order.
pub fn generate_moves(inst: &Instance, order: &ResourceOrder, schedule: &Schedule) -> Vec<Swap> {
  return blocks(inst, order, schedule)
    .iter()
    .flat_map(|block| neighbors(block))
    .collect();
}

/// A neighbor of some order: the swap applied to a copy of it, already simulated.
#[derive(Debug, Clone)]
pub struct EvaluatedMove<'a> {
  pub swap: Swap,
  pub order: ResourceOrder,
  pub schedule: Schedule<'a>,
}

impl<'a> EvaluatedMove<'a> {
  pub fn makespan(&self) -> Time {
    return self.schedule.makespan();
  }
}

/// Applies `swap` to a copy of `order` and simulates it. Returns `None`
/// when the swap closes a cycle.
pub fn evaluate<'a>(inst: &'a Instance, order: &ResourceOrder, swap: Swap) -> Option<EvaluatedMove<'a>> {
  let candidate = order.with_swap(&swap);
  return match simulate(inst, &candidate) {
    Ok(schedule) => {
      trace!("Trying move {} -> {}", swap, schedule.makespan());
      Some(EvaluatedMove {
        swap: swap,
        order: candidate,
        schedule: schedule,
      })
    }
    Err(e) => {
      trace!("Skipping move {}: {}", swap, e);
      None
    }
  };
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::Task;

  #[test]
  fn two_position_block_has_one_swap() {
    let block = Block {
      machine: 2,
      first: 3,
      last: 4,
    };
    assert_eq!(neighbors(&block), vec![Swap::new(2, 3, 4)]);
  }

  #[test]
  fn long_block_swaps_only_its_ends() {
    let block = Block {
      machine: 1,
      first: 0,
      last: 3,
    };
    assert_eq!(block.len(), 4);
    assert_eq!(
      neighbors(&block),
      vec![Swap::new(1, 0, 1), Swap::new(1, 2, 3)]
    );
  }

  #[test]
  fn three_position_block_swaps_overlap() {
    let block = Block {
      machine: 0,
      first: 1,
      last: 3,
    };
    assert_eq!(
      neighbors(&block),
      vec![Swap::new(0, 1, 2), Swap::new(0, 2, 3)]
    );
  }

  #[test]
  fn finds_block_on_shared_machine() {
    let inst = Instance::from_jobs(2, &[vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]]);
    let order = ResourceOrder::from_sequences(vec![
      vec![Task::new(0, 0), Task::new(1, 1)],
      vec![Task::new(1, 0), Task::new(0, 1)],
    ]);
    let schedule = simulate(&inst, &order).unwrap();

    assert_eq!(
      blocks(&inst, &order, &schedule),
      vec![Block {
        machine: 0,
        first: 0,
        last: 1
      }]
    );
    assert_eq!(generate_moves(&inst, &order, &schedule), vec![Swap::new(0, 0, 1)]);
  }

  #[test]
  fn blocks_are_sorted_by_machine() {
    // Critical path runs (0,0),(1,0) on m1 then (1,1),(2,1),(0,1) on m0
    let inst = Instance::from_jobs(
      2,
      &[
        vec![(1, 5), (0, 1)],
        vec![(1, 5), (0, 5)],
        vec![(1, 1), (0, 5)],
      ],
    );
    let order = ResourceOrder::from_sequences(vec![
      vec![Task::new(1, 1), Task::new(2, 1), Task::new(0, 1)],
      vec![Task::new(0, 0), Task::new(1, 0), Task::new(2, 0)],
    ]);
    let schedule = simulate(&inst, &order).unwrap();

    assert_eq!(
      schedule.critical_path(),
      vec![
        Task::new(0, 0),
        Task::new(1, 0),
        Task::new(1, 1),
        Task::new(2, 1),
        Task::new(0, 1)
      ]
    );
    assert_eq!(
      blocks(&inst, &order, &schedule),
      vec![
        Block {
          machine: 0,
          first: 0,
          last: 2
        },
        Block {
          machine: 1,
          first: 0,
          last: 1
        }
      ]
    );
  }

  #[test]
  fn evaluate_rejects_cycle() {
    let inst = Instance::from_jobs(2, &[vec![(0, 3), (1, 2)], vec![(1, 2), (0, 4)]]);
    let order = ResourceOrder::from_sequences(vec![
      vec![Task::new(1, 1), Task::new(0, 0)],
      vec![Task::new(1, 0), Task::new(0, 1)],
    ]);

    assert!(evaluate(&inst, &order, Swap::new(1, 0, 1)).is_none());
    let back = evaluate(&inst, &order, Swap::new(0, 0, 1)).unwrap();
    assert_eq!(back.makespan(), 7);
  }
}
