use crate::data::{Instance, Task, Time};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Dispatch rules for the greedy constructor.
///
/// Every rule breaks ties by list order: the first candidate wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityRule {
  /// Shortest processing time
  Spt,
  /// Longest processing time
  Lpt,
  /// Shortest remaining processing time of the job
  Srpt,
  /// Longest remaining processing time of the job
  Lrpt,
  EstSpt,
  EstLpt,
  EstSrpt,
  EstLrpt,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority rule {0:?}")]
pub struct UnknownRuleError(pub String);

impl PriorityRule {
  pub const ALL: [PriorityRule; 8] = [
    PriorityRule::Spt,
    PriorityRule::Lpt,
    PriorityRule::Srpt,
    PriorityRule::Lrpt,
    PriorityRule::EstSpt,
    PriorityRule::EstLpt,
    PriorityRule::EstSrpt,
    PriorityRule::EstLrpt,
  ];

  pub fn name(&self) -> &'static str {
    return match self {
      PriorityRule::Spt => "SPT",
      PriorityRule::Lpt => "LPT",
      PriorityRule::Srpt => "SRPT",
      PriorityRule::Lrpt => "LRPT",
      PriorityRule::EstSpt => "EST_SPT",
      PriorityRule::EstLpt => "EST_LPT",
      PriorityRule::EstSrpt => "EST_SRPT",
      PriorityRule::EstLrpt => "EST_LRPT",
    };
  }

  /// Whether candidates are first restricted to those with the earliest start.
  pub fn uses_earliest_start(&self) -> bool {
    return match self {
      PriorityRule::EstSpt | PriorityRule::EstLpt | PriorityRule::EstSrpt | PriorityRule::EstLrpt => {
        true
      }
      _ => false,
    };
  }

  fn base(&self) -> PriorityRule {
    return match self {
      PriorityRule::EstSpt => PriorityRule::Spt,
      PriorityRule::EstLpt => PriorityRule::Lpt,
      PriorityRule::EstSrpt => PriorityRule::Srpt,
      PriorityRule::EstLrpt => PriorityRule::Lrpt,
      rule => *rule,
    };
  }

  /// Picks the index of the next operation among the realizable `candidates`.
  ///
  /// `earliest_start` gives the time a candidate could start given the
  /// current machine and job clocks. Returns `None` for an empty list.
  pub fn choose(
    &self,
    inst: &Instance,
    candidates: &[Task],
    earliest_start: &dyn Fn(Task) -> Time,
  ) -> Option<usize> {
    let mut pool: Vec<usize> = (0..candidates.len()).collect();

    if self.uses_earliest_start() {
      let est = candidates.iter().map(|&t| earliest_start(t)).min()?;
      pool.retain(|&i| earliest_start(candidates[i]) == est);
    }

    let pool = pool.into_iter();
    return match self.base() {
      PriorityRule::Spt => pool.min_by_key(|&i| inst.duration(candidates[i])),
      PriorityRule::Lpt => pool.min_by_key(|&i| Reverse(inst.duration(candidates[i]))),
      PriorityRule::Srpt => pool.min_by_key(|&i| inst.remaining_work(candidates[i])),
      PriorityRule::Lrpt => pool.min_by_key(|&i| Reverse(inst.remaining_work(candidates[i]))),
      _ => unreachable!("base rules are never EST variants"),
    };
  }
}

impl fmt::Display for PriorityRule {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

impl FromStr for PriorityRule {
  type Err = UnknownRuleError;

  /// Accepts `EST_LRPT`, `est-lrpt` and `estlrpt` alike.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let normalized: String = s
      .chars()
      .filter(|c| c.is_ascii_alphanumeric())
      .map(|c| c.to_ascii_uppercase())
      .collect();

    return PriorityRule::ALL
      .iter()
      .copied()
      .find(|rule| rule.name().replace('_', "") == normalized)
      .ok_or_else(|| UnknownRuleError(s.to_string()));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn three_jobs() -> Instance {
    // durations of first ops: 4, 2, 4; remaining work: 5, 9, 9
    Instance::from_jobs(
      2,
      &[
        vec![(0, 4), (1, 1)],
        vec![(1, 2), (0, 7)],
        vec![(0, 4), (1, 5)],
      ],
    )
  }

  fn firsts() -> Vec<Task> {
    vec![Task::new(0, 0), Task::new(1, 0), Task::new(2, 0)]
  }

  #[test]
  fn base_rules_break_ties_by_list_order() {
    let inst = three_jobs();
    let zero = |_: Task| -> Time { 0 };

    assert_eq!(PriorityRule::Spt.choose(&inst, &firsts(), &zero), Some(1));
    assert_eq!(PriorityRule::Lpt.choose(&inst, &firsts(), &zero), Some(0));
    assert_eq!(PriorityRule::Srpt.choose(&inst, &firsts(), &zero), Some(0));
    assert_eq!(PriorityRule::Lrpt.choose(&inst, &firsts(), &zero), Some(1));
  }

  #[test]
  fn earliest_start_filters_before_base_rule() {
    let inst = three_jobs();
    // job 1 can only start later, so it drops out of the pool
    let start = |t: Task| -> Time { if t.job == 1 { 3 } else { 0 } };

    assert_eq!(PriorityRule::EstSpt.choose(&inst, &firsts(), &start), Some(0));
    assert_eq!(PriorityRule::EstLrpt.choose(&inst, &firsts(), &start), Some(2));
    assert_eq!(PriorityRule::EstSrpt.choose(&inst, &firsts(), &start), Some(0));
    assert_eq!(PriorityRule::EstLpt.choose(&inst, &firsts(), &start), Some(0));
  }

  #[test]
  fn empty_candidates() {
    let inst = three_jobs();
    assert_eq!(PriorityRule::EstLrpt.choose(&inst, &[], &|_: Task| -> Time { 0 }), None);
    assert_eq!(PriorityRule::Spt.choose(&inst, &[], &|_: Task| -> Time { 0 }), None);
  }

  #[test]
  fn parses_rule_names() {
    assert_eq!("EST_LRPT".parse::<PriorityRule>(), Ok(PriorityRule::EstLrpt));
    assert_eq!("est-spt".parse::<PriorityRule>(), Ok(PriorityRule::EstSpt));
    assert_eq!("lpt".parse::<PriorityRule>(), Ok(PriorityRule::Lpt));
    assert_eq!(
      "FIFO".parse::<PriorityRule>(),
      Err(UnknownRuleError("FIFO".to_string()))
    );
  }
}
