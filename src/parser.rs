use crate::data::{Duration, Instance, Machine};
use std::error::Error;

/// Reads the `n_jobs n_machines` header followed by one line of
/// `machine duration` pairs per job. Blank lines and `#` comments are skipped.
pub fn parse_instance(instance: &str) -> Result<Instance, Box<dyn Error>> {
  let mut lines = instance
    .lines()
    .map(|l| l.trim())
    .filter(|l| !l.is_empty() && !l.starts_with('#'));

  let prelude = lines.next().ok_or("Prelude missing")?;
  let prelude_items: Vec<&str> = prelude.split_whitespace().collect();
  let n_jobs: usize = prelude_items.get(0).ok_or("n_jobs missing")?.parse()?;
  let n_machines: usize = prelude_items.get(1).ok_or("n_machines missing")?.parse()?;

  let mut jobs = Vec::with_capacity(n_jobs);
  for (job, line) in lines.take(n_jobs).enumerate() {
    let items: Vec<&str> = line.split_whitespace().collect();
    let mut ops: Vec<(Machine, Duration)> = Vec::new();
    let mut visited = vec![false; n_machines];
    for i in (0..items.len()).step_by(2) {
      let machine: Machine = items.get(i).ok_or("Machine missing")?.parse()?;
      let duration: Duration = items.get(i + 1).ok_or("Duration missing")?.parse()?;

      if machine >= n_machines {
        Err(format!(
          "Job {} uses machine {} but the instance only has {} machines",
          job, machine, n_machines
        ))?;
      }
      if visited[machine] {
        Err(format!("Job {} visits machine {} more than once", job, machine))?;
      }
      visited[machine] = true;
      ops.push((machine, duration));
    }

    if ops.len() != n_machines {
      Err(format!(
        "Job {} has {} operations, expected {}",
        job,
        ops.len(),
        n_machines
      ))?;
    }
    jobs.push(ops);
  }

  if jobs.len() != n_jobs {
    Err(format!("Expected {} jobs, found {}", n_jobs, jobs.len()))?;
  }

  Ok(Instance::from_jobs(n_machines, &jobs))
}
