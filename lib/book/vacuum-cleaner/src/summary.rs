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

use serde::{Serialize, Serializer};

use crate::grid::{Location, SquareState};
use crate::policy::PolicyKind;
use crate::vacuum_world::VacuumWorldEnvironment;
use crate::{Environment, Score};

/// One entry of a run's trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Clean { at: Location },
    Move { from: Location, to: Location },
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Clean { at } => write!(f, "clean at {}", at),
            Step::Move { from, to } => write!(f, "{} to {}", from, to),
        }
    }
}

impl Serialize for Step {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Everything recorded about a single run of one policy, from the initial layout to the final
/// score. Built once the run is over and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// 1-based attempt number within an experiment.
    pub attempt: usize,
    pub policy: PolicyKind,
    pub initial_position: Location,
    pub initial_layout: Vec<Vec<SquareState>>,
    pub process: Vec<Step>,
    pub final_position: Location,
    pub final_layout: Vec<Vec<SquareState>>,
    pub rooms_total: usize,
    /// Number of moves, counting a room again every time it is re-entered.
    pub rooms_visited: usize,
    pub distinct_rooms_visited: usize,
    pub rooms_cleaned: usize,
    pub rooms_dirty: usize,
    pub score: Score,
}

impl RunSummary {
    pub(crate) fn new(
        attempt: usize,
        policy: PolicyKind,
        initial_position: Location,
        initial_layout: Vec<Vec<SquareState>>,
        environment: VacuumWorldEnvironment,
    ) -> Self {
        let score = environment.score();
        let grid = environment.grid();
        Self {
            attempt,
            policy,
            initial_position,
            initial_layout,
            final_position: environment.location(),
            final_layout: grid.snapshot(),
            rooms_total: grid.room_count(),
            rooms_visited: environment.moves_count(),
            distinct_rooms_visited: environment.visited().len(),
            rooms_cleaned: environment.cleans_count(),
            rooms_dirty: environment.dirty_target(),
            score,
            process: environment.into_trace(),
        }
    }

    pub fn steps(&self) -> usize {
        self.process.len()
    }
}
