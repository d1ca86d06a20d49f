use crate::data::Time;

// Fisher and Thompson (ft), Lawrence (la)
const BEST_KNOWN: &[(&str, Time)] = &[
  ("ft06", 55),
  ("ft10", 930),
  ("ft20", 1165),
  ("la01", 666),
  ("la02", 655),
  ("la03", 597),
  ("la04", 590),
  ("la05", 593),
  ("la06", 926),
  ("la07", 890),
  ("la08", 863),
  ("la09", 951),
  ("la10", 958),
  ("la11", 1222),
  ("la12", 1039),
  ("la13", 1150),
  ("la14", 1292),
  ("la15", 1207),
];

/// Published best-known makespan of a benchmark instance, for reporting only.
pub fn best_known(instance: &str) -> Option<Time> {
  return BEST_KNOWN
    .iter()
    .find(|&&(name, _)| name == instance)
    .map(|&(_, makespan)| makespan);
}

/// Names of all instances with a known makespan starting with `prefix`.
pub fn instances_matching(prefix: &str) -> Vec<&'static str> {
  return BEST_KNOWN
    .iter()
    .map(|&(name, _)| name)
    .filter(|name| name.starts_with(prefix))
    .collect();
}
