#[macro_use]
extern crate log;

use clap::{App, Arg};
use jobshop::best_known::{best_known, instances_matching};
use jobshop::parser::parse_instance;
use jobshop::solver::registry;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

fn main() {
  env_logger::init();

  let matches = App::new("jobshop")
    .version("1.0")
    .about("Greedy, descent and tabu search solvers for the job shop scheduling problem")
    .arg(
      Arg::with_name("instance")
        .long("instance")
        .help("Instance files, or name prefixes of benchmark instances in --instance-dir")
        .takes_value(true)
        .multiple(true)
        .required(true),
    )
    .arg(
      Arg::with_name("instance-dir")
        .long("instance-dir")
        .help("Directory holding the benchmark instance files")
        .takes_value(true)
        .default_value("instances"),
    )
    .arg(
      Arg::with_name("solver")
        .long("solver")
        .help("Solvers to run on every instance")
        .takes_value(true)
        .multiple(true)
        .required(true),
    )
    .arg(
      Arg::with_name("timeout")
        .short("t")
        .long("timeout")
        .help("Timeout (in s) for each solver on each instance")
        .takes_value(true)
        .default_value("1"),
    )
    .arg(
      Arg::with_name("seed")
        .long("seed")
        .help("Seed for the random baseline")
        .takes_value(true)
        .default_value("0"),
    )
    .get_matches();

  let timeout = Duration::from_secs(
    matches
      .value_of("timeout")
      .and_then(|m| m.parse().ok())
      .expect("Invalid timeout"),
  );
  let seed: u64 = matches
    .value_of("seed")
    .and_then(|m| m.parse().ok())
    .expect("Invalid seed");
  let instance_dir = Path::new(matches.value_of("instance-dir").expect("Missing instance dir"));

  let solvers = registry(seed);
  let solver_names: Vec<&str> = matches.values_of("solver").expect("Missing solver").collect();
  for name in &solver_names {
    if !solvers.contains_key(*name) {
      eprintln!("ERROR: Solver \"{}\" is not available.", name);
      eprintln!(
        "       Available solvers: {}",
        solvers.keys().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
      );
      process::exit(1);
    }
  }

  let mut instance_files: Vec<(String, PathBuf)> = Vec::new();
  for arg in matches.values_of("instance").expect("Missing instance") {
    let path = Path::new(arg);
    if path.is_file() {
      let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg.to_string());
      instance_files.push((name, path.to_path_buf()));
      continue;
    }

    let names = instances_matching(arg);
    if names.is_empty() {
      eprintln!("ERROR: \"{}\" is neither a file nor a known instance prefix.", arg);
      process::exit(1);
    }
    for name in names {
      instance_files.push((name.to_string(), instance_dir.join(name)));
    }
  }

  println!("Completed means the solver reached its own stopping rule, not a proven optimum.");
  print!("{:25}", "");
  for name in &solver_names {
    print!("{:<30}", name);
  }
  println!();
  print!("instance size  best      ");
  for _ in &solver_names {
    print!("runtime makespan gap          ");
  }
  println!();

  let mut runtimes = vec![0.0f32; solver_names.len()];
  let mut gaps = vec![0.0f32; solver_names.len()];
  let mut n_gaps = vec![0usize; solver_names.len()];

  for (instance_name, file) in &instance_files {
    let contents = fs::read_to_string(file).expect("Error reading file");
    let instance = parse_instance(&contents).expect("Error parsing file");
    let best = best_known(instance_name);

    print!(
      "{:<8} {:<5} {:>4}      ",
      instance_name,
      format!("{}x{}", instance.n_jobs, instance.n_machines),
      best.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string())
    );

    for (solver_id, name) in solver_names.iter().enumerate() {
      let solver = &solvers[*name];
      let start = Instant::now();
      let result = match solver.solve(&instance, start + timeout) {
        Ok(result) => result,
        Err(e) => {
          eprintln!("ERROR: solver {} produced an invalid encoding: {}", name, e);
          process::exit(1);
        }
      };
      let runtime = start.elapsed().as_millis();

      if let Err(e) = result.schedule.verify() {
        eprintln!("ERROR: solver {} returned an invalid schedule: {}", name, e);
        process::exit(1);
      }
      info!(
        "{} on {}: {} ({})",
        name,
        instance_name,
        result.makespan(),
        result.exit_reason
      );
      debug!("Start times:\n{}", result.schedule);

      let makespan = result.makespan();
      runtimes[solver_id] += runtime as f32 / instance_files.len() as f32;
      let gap = match best {
        Some(b) => {
          let gap = 100.0 * (makespan as f32 - b as f32) / b as f32;
          gaps[solver_id] += gap;
          n_gaps[solver_id] += 1;
          format!("{:5.1}", gap)
        }
        None => format!("{:>5}", "-"),
      };

      print!("{:7} {:8} {}        ", runtime, makespan, gap);
    }
    println!();
  }

  print!("{:<8} {:<5} {:>4}      ", "AVG", "-", "-");
  for solver_id in 0..solver_names.len() {
    let gap = if n_gaps[solver_id] > 0 {
      format!("{:5.1}", gaps[solver_id] / n_gaps[solver_id] as f32)
    } else {
      format!("{:>5}", "-")
    };
    print!("{:7.1} {:>8} {}        ", runtimes[solver_id], "-", gap);
  }
  println!();
}
