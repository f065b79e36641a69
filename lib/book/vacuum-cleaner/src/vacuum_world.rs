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

use serde::Serialize;

use crate::grid::{Direction, Grid, Location, SquareState};
use crate::policy::{HeuristicVacuumAgent, PolicyKind, ReflexVacuumAgent};
use crate::summary::{RunSummary, Step};
use crate::{Agent, Environment, HashSet, Rng, Score, Simulation, VacuumWorldError};

pub const CLEAN_REWARD: Score = 10;
pub const MOVE_COST: Score = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VacuumWorldAction {
    Clean,
    Up,
    Down,
    Left,
    Right,
    /// Never legal. Agents return it only when the percept offers nothing to do.
    NoOp,
}

impl VacuumWorldAction {
    pub fn direction(self) -> Option<Direction> {
        match self {
            VacuumWorldAction::Up => Some(Direction::Up),
            VacuumWorldAction::Down => Some(Direction::Down),
            VacuumWorldAction::Left => Some(Direction::Left),
            VacuumWorldAction::Right => Some(Direction::Right),
            VacuumWorldAction::Clean | VacuumWorldAction::NoOp => None,
        }
    }
}

impl From<Direction> for VacuumWorldAction {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => VacuumWorldAction::Up,
            Direction::Down => VacuumWorldAction::Down,
            Direction::Left => VacuumWorldAction::Left,
            Direction::Right => VacuumWorldAction::Right,
        }
    }
}

/// Legal actions from `location`, always in the order Clean, Up, Down, Left, Right.
///
/// Clean is only legal on a dirty room, and a move is only legal when it stays inside the grid.
pub fn legal_actions(grid: &Grid, location: Location) -> Vec<VacuumWorldAction> {
    let mut actions = Vec::with_capacity(5);
    if grid.get(location) == SquareState::Dirty {
        actions.push(VacuumWorldAction::Clean);
    }
    actions.extend(
        Direction::ALL
            .iter()
            .filter(|&&direction| grid.neighbor(location, direction).is_some())
            .map(|&direction| VacuumWorldAction::from(direction)),
    );
    actions
}

/// What the vacuum senses about a room it could move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeighborPercept {
    pub action: VacuumWorldAction,
    pub location: Location,
    pub square_state: SquareState,
    pub visited: bool,
}

/// VacuumWorldPercept is what the Agent receives each step: the room it is in, the legal actions
/// from there, and one NeighborPercept per legal move. Whether a neighbor was visited comes from
/// the vacuum's own memory, not from the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacuumWorldPercept {
    pub location: Location,
    pub square_state: SquareState,
    pub legal_actions: Vec<VacuumWorldAction>,
    pub neighbors: Vec<NeighborPercept>,
}

impl VacuumWorldPercept {
    pub fn can_clean(&self) -> bool {
        self.legal_actions.contains(&VacuumWorldAction::Clean)
    }
}

/// A single vacuum cleaner together with its private copy of the rooms.
///
/// The vacuum is done once it has cleaned as many rooms as were dirty when it was created.
#[derive(Debug, Clone)]
pub struct VacuumWorldEnvironment {
    grid: Grid,
    agent_location: Location,
    visited: HashSet<Location>,
    score: Score,
    moves_count: usize,
    cleans_count: usize,
    dirty_target: usize,
    trace: Vec<Step>,
}

impl VacuumWorldEnvironment {
    /// Copies `grid`, so the caller's grid is never changed by the vacuum.
    pub fn new(grid: &Grid, agent_location: Location) -> Result<Self, VacuumWorldError> {
        if !grid.contains(agent_location) {
            return Err(VacuumWorldError::LocationOutOfBounds {
                location: agent_location,
                rows: grid.rows(),
                columns: grid.columns(),
            });
        }
        let mut visited = HashSet::default();
        visited.insert(agent_location);
        Ok(Self {
            grid: grid.clone(),
            agent_location,
            visited,
            score: 0,
            moves_count: 0,
            cleans_count: 0,
            dirty_target: grid.dirty_count(),
            trace: Vec::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn location(&self) -> Location {
        self.agent_location
    }

    pub fn visited(&self) -> &HashSet<Location> {
        &self.visited
    }

    pub fn moves_count(&self) -> usize {
        self.moves_count
    }

    pub fn cleans_count(&self) -> usize {
        self.cleans_count
    }

    pub fn dirty_target(&self) -> usize {
        self.dirty_target
    }

    pub fn trace(&self) -> &[Step] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<Step> {
        self.trace
    }

    pub fn legal_actions(&self) -> Vec<VacuumWorldAction> {
        legal_actions(&self.grid, self.agent_location)
    }

    /// Apply one action and record it in the trace. Cleaning earns `CLEAN_REWARD`, every move
    /// costs `MOVE_COST`.
    pub fn perform_action(&mut self, action: VacuumWorldAction) -> Result<(), VacuumWorldError> {
        let from = self.agent_location;
        let illegal = VacuumWorldError::IllegalAction {
            action,
            location: from,
        };
        let step = match action.direction() {
            Some(direction) => {
                let to = self.grid.neighbor(from, direction).ok_or(illegal)?;
                self.agent_location = to;
                self.score -= MOVE_COST;
                self.moves_count += 1;
                Step::Move { from, to }
            }
            None if action == VacuumWorldAction::Clean && self.grid.clean(from) => {
                self.score += CLEAN_REWARD;
                self.cleans_count += 1;
                Step::Clean { at: from }
            }
            None => return Err(illegal),
        };
        self.visited.insert(self.agent_location);
        self.trace.push(step);
        Ok(())
    }
}

impl Environment for VacuumWorldEnvironment {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldPercept;
    type Score = Score;

    fn percept(&self) -> Self::Percept {
        let location = self.agent_location;
        let neighbors = Direction::ALL
            .iter()
            .filter_map(|&direction| {
                let neighbor = self.grid.neighbor(location, direction)?;
                Some(NeighborPercept {
                    action: direction.into(),
                    location: neighbor,
                    square_state: self.grid.get(neighbor),
                    visited: self.visited.contains(&neighbor),
                })
            })
            .collect();
        VacuumWorldPercept {
            location,
            square_state: self.grid.get(location),
            legal_actions: self.legal_actions(),
            neighbors,
        }
    }

    fn execute_action(&mut self, action: &Self::Action) -> Result<(), VacuumWorldError> {
        self.perform_action(*action)
    }

    fn score(&self) -> Self::Score {
        self.score
    }

    fn is_done(&self) -> bool {
        self.cleans_count == self.dirty_target
    }
}

fn run_to_completion<_Agent>(
    environment: VacuumWorldEnvironment,
    agent: _Agent,
    step_limit: Option<usize>,
    rng: &mut Rng,
) -> Result<VacuumWorldEnvironment, VacuumWorldError>
where
    _Agent: Agent<Action = VacuumWorldAction, Percept = VacuumWorldPercept>,
{
    let mut simulation = Simulation::new(environment, agent, step_limit);
    simulation.run(rng)?;
    Ok(simulation.into_environment())
}

/// Runs one vacuum driven by `policy` from `start` until every room that was dirty in `grid` is
/// clean, and summarizes the run. `grid` itself is left untouched.
pub fn clean_world(
    attempt: usize,
    policy: PolicyKind,
    grid: &Grid,
    start: Location,
    step_limit: Option<usize>,
    rng: &mut Rng,
) -> Result<RunSummary, VacuumWorldError> {
    let environment = VacuumWorldEnvironment::new(grid, start)?;
    let initial_layout = environment.grid().snapshot();

    let environment = match policy {
        PolicyKind::Reflex => {
            run_to_completion(environment, ReflexVacuumAgent::new(), step_limit, rng)?
        }
        PolicyKind::Heuristic => {
            run_to_completion(environment, HeuristicVacuumAgent::new(), step_limit, rng)?
        }
    };

    let summary = RunSummary::new(attempt, policy, start, initial_layout, environment);
    tracing::info!(
        attempt,
        %policy,
        steps = summary.steps(),
        score = summary.score,
        "vacuum finished cleaning"
    );
    Ok(summary)
}
