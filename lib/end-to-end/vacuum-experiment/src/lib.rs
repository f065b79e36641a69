/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;
use vacuum_cleaner::{clean_world, Grid, PolicyKind, Rng, RunSummary, VacuumWorldError};

pub mod config;

pub use config::ExperimentConfig;

/// Experiment error.
#[derive(Debug, thiserror::Error)]
pub enum ExperimentError {
    /// Config is well formed but describes an experiment that cannot run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    World(#[from] VacuumWorldError),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Mean score of one policy over all attempts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyAggregate {
    pub policy: PolicyKind,
    pub trials: usize,
    pub score_global: f64,
}

/// Every run of an experiment, attempt by attempt and policy by policy, followed by one
/// aggregate per policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub runs: Vec<RunSummary>,
    pub aggregates: Vec<PolicyAggregate>,
}

impl ExperimentReport {
    pub fn aggregate(&self, policy: PolicyKind) -> Option<&PolicyAggregate> {
        self.aggregates.iter().find(|a| a.policy == policy)
    }

    pub fn to_json(&self) -> Result<String, ExperimentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExperimentError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| ExperimentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

// Every (attempt, policy) pair gets its own generator, so a trial's result does not depend on
// which trials ran before it or on which thread it ran.
fn trial_rng(seed: u64, attempt: usize, policy: PolicyKind) -> Rng {
    let trial_seed = seed ^ (attempt as u64).rotate_left(32) ^ (policy as u64 + 1);
    Rng::seed_from_u64(trial_seed)
}

fn aggregate(runs: &[RunSummary], policy: PolicyKind) -> PolicyAggregate {
    let scores: Vec<f64> = runs
        .iter()
        .filter(|run| run.policy == policy)
        .map(|run| run.score as f64)
        .collect();
    let score_global = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    PolicyAggregate {
        policy,
        trials: scores.len(),
        score_global,
    }
}

/// Generates one world from the config's seed and runs every configured policy on it once per
/// attempt, each run on its own copy of the world.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentReport, ExperimentError> {
    config.validate()?;

    let mut world_rng = Rng::seed_from_u64(config.seed);
    let world = Grid::generate(config.world_rows, config.world_columns, &mut world_rng)?;
    let start = config.initial_location();
    tracing::info!(
        rows = world.rows(),
        columns = world.columns(),
        dirty = world.dirty_count(),
        attempts = config.attempts,
        "generated world\n{}",
        world
    );

    let trials: Vec<(usize, PolicyKind)> = (1..=config.attempts)
        .flat_map(|attempt| config.policies.iter().map(move |&policy| (attempt, policy)))
        .collect();

    let run_trial = |&(attempt, policy): &(usize, PolicyKind)| {
        let mut rng = trial_rng(config.seed, attempt, policy);
        clean_world(attempt, policy, &world, start, config.step_limit, &mut rng)
    };
    let runs: Vec<RunSummary> = if config.parallel {
        trials
            .par_iter()
            .map(run_trial)
            .collect::<Result<_, _>>()?
    } else {
        trials.iter().map(run_trial).collect::<Result<_, _>>()?
    };

    let aggregates: Vec<PolicyAggregate> = config
        .policies
        .iter()
        .map(|&policy| aggregate(&runs, policy))
        .collect();
    for aggregate in &aggregates {
        tracing::info!(
            policy = %aggregate.policy,
            trials = aggregate.trials,
            score_global = aggregate.score_global,
            "policy finished all attempts"
        );
    }

    Ok(ExperimentReport { runs, aggregates })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            attempts: 6,
            world_rows: 3,
            world_columns: 4,
            x_initial: 1,
            y_initial: 2,
            seed: 1234,
            step_limit: Some(1_000_000),
            ..ExperimentConfig::default()
        }
    }

    #[test]
    fn test_report_lists_every_attempt_and_policy_in_order() {
        let config = small_config();
        let report = run_experiment(&config).unwrap();
        assert_eq!(report.runs.len(), 12);
        for (index, run) in report.runs.iter().enumerate() {
            assert_eq!(run.attempt, index / 2 + 1);
            let expected_policy = if index % 2 == 0 {
                PolicyKind::Reflex
            } else {
                PolicyKind::Heuristic
            };
            assert_eq!(run.policy, expected_policy);
            assert_eq!(run.initial_position, config.initial_location());
            assert_eq!(run.rooms_cleaned, run.rooms_dirty);
        }
    }

    #[test]
    fn test_every_run_starts_from_the_same_world() {
        let report = run_experiment(&small_config()).unwrap();
        let first = &report.runs[0].initial_layout;
        assert!(report.runs.iter().all(|run| &run.initial_layout == first));
    }

    #[test]
    fn test_aggregates_are_means_of_run_scores() {
        let report = run_experiment(&small_config()).unwrap();
        assert_eq!(report.aggregates.len(), 2);
        for policy in [PolicyKind::Reflex, PolicyKind::Heuristic] {
            let scores: Vec<f64> = report
                .runs
                .iter()
                .filter(|run| run.policy == policy)
                .map(|run| run.score as f64)
                .collect();
            let expected = scores.iter().sum::<f64>() / scores.len() as f64;
            let aggregate = report.aggregate(policy).unwrap();
            assert_eq!(aggregate.trials, 6);
            assert!((aggregate.score_global - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_same_seed_same_report() {
        let first = run_experiment(&small_config()).unwrap();
        let second = run_experiment(&small_config()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = run_experiment(&small_config()).unwrap();
        let parallel = run_experiment(&ExperimentConfig {
            parallel: true,
            ..small_config()
        })
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_single_policy_experiment() {
        let config = ExperimentConfig {
            policies: vec![PolicyKind::Heuristic],
            ..small_config()
        };
        let report = run_experiment(&config).unwrap();
        assert_eq!(report.runs.len(), 6);
        assert!(report.aggregate(PolicyKind::Reflex).is_none());
    }

    #[test]
    fn test_invalid_config_runs_nothing() {
        let config = ExperimentConfig {
            x_initial: 4,
            ..small_config()
        };
        assert!(matches!(
            run_experiment(&config),
            Err(ExperimentError::World(
                VacuumWorldError::LocationOutOfBounds { .. }
            ))
        ));
    }

    #[test]
    fn test_heuristic_scores_at_least_as_well_as_reflex() {
        for (rows, columns, seed) in [(3, 3, 1), (4, 5, 2), (6, 6, 3)] {
            let config = ExperimentConfig {
                attempts: 40,
                world_rows: rows,
                world_columns: columns,
                seed,
                ..small_config()
            };
            let report = run_experiment(&config).unwrap();
            let reflex = report.aggregate(PolicyKind::Reflex).unwrap().score_global;
            let heuristic = report.aggregate(PolicyKind::Heuristic).unwrap().score_global;
            assert!(
                heuristic >= reflex,
                "{}x{}: heuristic {} < reflex {}",
                rows,
                columns,
                heuristic,
                reflex
            );
        }
    }

    #[test]
    fn test_report_json_shape() {
        let config = ExperimentConfig {
            attempts: 1,
            policies: vec![PolicyKind::Reflex],
            ..small_config()
        };
        let report = run_experiment(&config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        let run = &value["runs"][0];
        assert_eq!(run["attempt"], 1);
        assert_eq!(run["policy"], "reflex");
        assert_eq!(run["initial_position"]["x"], 1);
        assert_eq!(run["initial_position"]["y"], 2);
        assert_eq!(run["initial_layout"].as_array().unwrap().len(), 3);
        let process = run["process"].as_array().unwrap();
        assert_eq!(process.len(), report.runs[0].process.len());
        assert!(process
            .iter()
            .all(|step| step.as_str().unwrap().contains(" to ")
                || step.as_str().unwrap().starts_with("clean at ")));
        assert_eq!(value["aggregates"][0]["policy"], "reflex");
        assert_eq!(value["aggregates"][0]["trials"], 1);
    }

    #[test]
    fn test_write_to_creates_report_file() {
        let report = run_experiment(&small_config()).unwrap();
        let path = std::env::temp_dir().join(format!(
            "vacuum-experiment-report-{}.json",
            std::process::id()
        ));
        report.write_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, report.to_json().unwrap());
    }
}
