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

use std::path::Path;

use serde::{Deserialize, Serialize};
use vacuum_cleaner::{Location, PolicyKind, VacuumWorldError};

use crate::ExperimentError;

pub const DEFAULT_SEED: u64 = 42;

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_policies() -> Vec<PolicyKind> {
    vec![PolicyKind::Reflex, PolicyKind::Heuristic]
}

/// Parameters of one experiment, as read from a `constants.json` file.
///
/// Only `attempts`, `world_rows`, `world_columns`, `x_initial` and `y_initial` are required. Negative
/// numbers are rejected while parsing; the remaining constraints are checked by `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub attempts: usize,
    pub world_rows: usize,
    pub world_columns: usize,
    pub x_initial: usize,
    pub y_initial: usize,

    /// Seed for the world layout and, derived from it, for every trial.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Abort a trial after this many steps. Unlimited when absent.
    #[serde(default)]
    pub step_limit: Option<usize>,

    /// Policies run on every attempt, in report order.
    #[serde(default = "default_policies")]
    pub policies: Vec<PolicyKind>,

    /// Run trials on the rayon thread pool. Results are identical either way.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            attempts: 10,
            world_rows: 4,
            world_columns: 4,
            x_initial: 0,
            y_initial: 0,
            seed: DEFAULT_SEED,
            step_limit: None,
            policies: default_policies(),
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ExperimentError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExperimentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ExperimentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), ?config, "loaded experiment config");
        Ok(config)
    }

    pub fn initial_location(&self) -> Location {
        Location::new(self.x_initial, self.y_initial)
    }

    pub fn validate(&self) -> Result<(), ExperimentError> {
        if self.attempts == 0 {
            return Err(ExperimentError::InvalidConfig(
                "attempts must be positive".to_string(),
            ));
        }
        if self.policies.is_empty() {
            return Err(ExperimentError::InvalidConfig(
                "at least one policy is required".to_string(),
            ));
        }
        let room_count = self.world_rows.checked_mul(self.world_columns);
        if matches!(room_count, None | Some(0)) {
            return Err(VacuumWorldError::InvalidDimensions {
                rows: self.world_rows,
                columns: self.world_columns,
            }
            .into());
        }
        if self.x_initial >= self.world_columns || self.y_initial >= self.world_rows {
            return Err(VacuumWorldError::LocationOutOfBounds {
                location: self.initial_location(),
                rows: self.world_rows,
                columns: self.world_columns,
            }
            .into());
        }
        Ok(())
    }
}
