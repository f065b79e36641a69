/*
 * Copyright 2023 Asim Ihsan
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

// PEAS - Performance, Environment, Action, Sensing
//
// See:
// -  Chapter 2: Intelligent Agents, page 40

use std::fmt::Debug;

pub mod error;
pub mod grid;
pub mod policy;
pub mod summary;
pub mod vacuum_world;

pub use error::VacuumWorldError;
pub use grid::{Direction, Grid, Location, SquareState};
pub use policy::{HeuristicVacuumAgent, PolicyKind, ReflexVacuumAgent};
pub use summary::{RunSummary, Step};
pub use vacuum_world::{
    clean_world, legal_actions, NeighborPercept, VacuumWorldAction, VacuumWorldEnvironment,
    VacuumWorldPercept,
};

pub type Rng = rand_pcg::Pcg64;
pub type HashSet<T> = rustc_hash::FxHashSet<T>;
pub type Score = i64;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Perception, the Agent will return an Action.
///
/// Any randomness the Agent needs comes from the injected `rng`, never from a global generator,
/// so that a seeded run is reproducible.
///
/// Notice that the Agent is not aware of an Environment, it's only interface
/// is the Perception coming in then the Action going out.
pub trait Agent {
    type Action;
    type Percept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Self::Action;
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    type Action: Debug;
    type Percept;
    type Score: num_traits::NumAssign + Copy + Debug;

    fn percept(&self) -> Self::Percept;
    fn execute_action(&mut self, action: &Self::Action) -> Result<(), VacuumWorldError>;

    /// Returns the performance measure of the Environment so far.
    fn score(&self) -> Self::Score;

    /// True once the Environment has reached its goal and the cycle should stop.
    fn is_done(&self) -> bool;
}

/// A Simulation runs a single Agent in Performance, Environment, Action, Sensing (PEAS) cycles
/// until the Environment reports that it is done.
///
/// The Simulation is aware of both the Environment and the single Agent. Notice that the Agent's
/// generic Action and Percept come from the Environment. The Agent still does not need to know that
/// the Environment exists, but the Agent definitely needs the Environment's Action and Percept
/// types.
pub struct Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    environment: _Environment,
    agent: _Agent,
    step_limit: Option<usize>,
    steps: usize,
}

impl<_Environment, _Agent> Simulation<_Environment, _Agent>
where
    _Environment: Environment,
    _Agent: Agent<Action = _Environment::Action, Percept = _Environment::Percept>,
{
    /// `step_limit` of `None` lets the cycle run until the Environment is done, however long that
    /// takes.
    pub fn new(environment: _Environment, agent: _Agent, step_limit: Option<usize>) -> Self {
        Self {
            environment,
            agent,
            step_limit,
            steps: 0,
        }
    }

    /// Runs the cycle to completion and returns the number of steps taken.
    pub fn run(&mut self, rng: &mut Rng) -> Result<usize, VacuumWorldError> {
        while !self.environment.is_done() {
            if let Some(limit) = self.step_limit {
                if self.steps >= limit {
                    tracing::warn!(limit, "simulation hit its step limit before finishing");
                    return Err(VacuumWorldError::StepLimitExceeded { limit });
                }
            }
            let percept = self.environment.percept();
            let action = self.agent.act(&percept, rng);
            self.environment.execute_action(&action)?;
            self.steps += 1;
            tracing::debug!(
                step = self.steps,
                ?action,
                score = ?self.environment.score(),
                "executed action"
            );
        }
        Ok(self.steps)
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn score(&self) -> <_Environment as Environment>::Score {
        self.environment.score()
    }

    pub fn environment(&self) -> &_Environment {
        &self.environment
    }

    pub fn into_environment(self) -> _Environment {
        self.environment
    }
}
