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

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::grid::SquareState;
use crate::vacuum_world::{NeighborPercept, VacuumWorldAction, VacuumWorldPercept};
use crate::{Agent, Rng};

/// Which policy drives a vacuum cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Reflex,
    Heuristic,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Reflex => write!(f, "reflex"),
            PolicyKind::Heuristic => write!(f, "heuristic"),
        }
    }
}

fn choose_move(candidates: &[&NeighborPercept], rng: &mut Rng) -> VacuumWorldAction {
    candidates
        .choose(rng)
        .map(|neighbor| neighbor.action)
        .unwrap_or(VacuumWorldAction::NoOp)
}

/// Cleans when the room is dirty, otherwise wanders to a random neighbor. Keeps no memory, so it
/// can bounce between the same rooms for a long time.
#[derive(Default)]
pub struct ReflexVacuumAgent {}

impl ReflexVacuumAgent {
    pub fn new() -> Self {
        Self {}
    }
}

impl Agent for ReflexVacuumAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldPercept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Self::Action {
        if percept.can_clean() {
            return VacuumWorldAction::Clean;
        }
        let moves: Vec<&NeighborPercept> = percept.neighbors.iter().collect();
        choose_move(&moves, rng)
    }
}

/// Cleans when the room is dirty. Otherwise prefers unvisited dirty neighbors, then any unvisited
/// neighbor, then any neighbor at all. Ties are broken uniformly at random.
///
/// Only immediate neighbors are considered; there is no lookahead.
#[derive(Default)]
pub struct HeuristicVacuumAgent {}

impl HeuristicVacuumAgent {
    pub fn new() -> Self {
        Self {}
    }

    /// The tier of neighbors the next move is drawn from.
    pub fn best_moves<'a>(&self, percept: &'a VacuumWorldPercept) -> Vec<&'a NeighborPercept> {
        let unvisited: Vec<&NeighborPercept> =
            percept.neighbors.iter().filter(|n| !n.visited).collect();
        let unvisited_dirty: Vec<&NeighborPercept> = unvisited
            .iter()
            .copied()
            .filter(|n| n.square_state == SquareState::Dirty)
            .collect();

        if !unvisited_dirty.is_empty() {
            unvisited_dirty
        } else if !unvisited.is_empty() {
            unvisited
        } else {
            percept.neighbors.iter().collect()
        }
    }
}

impl Agent for HeuristicVacuumAgent {
    type Action = VacuumWorldAction;
    type Percept = VacuumWorldPercept;

    fn act(&mut self, percept: &Self::Percept, rng: &mut Rng) -> Self::Action {
        if percept.can_clean() {
            return VacuumWorldAction::Clean;
        }
        choose_move(&self.best_moves(percept), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Location;
    use crate::HashSet;
    use rand::SeedableRng;

    fn neighbor(
        action: VacuumWorldAction,
        x: usize,
        y: usize,
        square_state: SquareState,
        visited: bool,
    ) -> NeighborPercept {
        NeighborPercept {
            action,
            location: Location::new(x, y),
            square_state,
            visited,
        }
    }

    // Agent at (1, 1) in the middle of a 3x3 grid.
    fn percept(square_state: SquareState, neighbors: Vec<NeighborPercept>) -> VacuumWorldPercept {
        let mut legal_actions = Vec::new();
        if square_state == SquareState::Dirty {
            legal_actions.push(VacuumWorldAction::Clean);
        }
        legal_actions.extend(neighbors.iter().map(|n| n.action));
        VacuumWorldPercept {
            location: Location::new(1, 1),
            square_state,
            legal_actions,
            neighbors,
        }
    }

    fn all_neighbors(visited: [bool; 4], dirty: [bool; 4]) -> Vec<NeighborPercept> {
        let state = |d: bool| {
            if d {
                SquareState::Dirty
            } else {
                SquareState::Clean
            }
        };
        vec![
            neighbor(VacuumWorldAction::Up, 1, 0, state(dirty[0]), visited[0]),
            neighbor(VacuumWorldAction::Down, 1, 2, state(dirty[1]), visited[1]),
            neighbor(VacuumWorldAction::Left, 0, 1, state(dirty[2]), visited[2]),
            neighbor(VacuumWorldAction::Right, 2, 1, state(dirty[3]), visited[3]),
        ]
    }

    #[test]
    fn test_reflex_cleans_dirty_room() {
        let mut rng = Rng::seed_from_u64(42);
        let mut agent = ReflexVacuumAgent::new();
        let percept = percept(SquareState::Dirty, all_neighbors([false; 4], [true; 4]));
        for _ in 0..20 {
            assert_eq!(agent.act(&percept, &mut rng), VacuumWorldAction::Clean);
        }
    }

    #[test]
    fn test_reflex_moves_to_every_neighbor_eventually() {
        let mut rng = Rng::seed_from_u64(42);
        let mut agent = ReflexVacuumAgent::new();
        let percept = percept(SquareState::Clean, all_neighbors([true; 4], [false; 4]));
        let chosen: HashSet<VacuumWorldAction> =
            (0..200).map(|_| agent.act(&percept, &mut rng)).collect();
        assert_eq!(chosen.len(), 4);
        assert!(!chosen.contains(&VacuumWorldAction::Clean));
    }

    #[test]
    fn test_heuristic_cleans_dirty_room() {
        let mut rng = Rng::seed_from_u64(42);
        let mut agent = HeuristicVacuumAgent::new();
        let percept = percept(SquareState::Dirty, all_neighbors([false; 4], [true; 4]));
        assert_eq!(agent.act(&percept, &mut rng), VacuumWorldAction::Clean);
    }

    #[test]
    fn test_heuristic_prefers_unvisited_dirty() {
        let mut rng = Rng::seed_from_u64(42);
        let mut agent = HeuristicVacuumAgent::new();
        // Up is visited and dirty, Down is unvisited and clean, Right is unvisited and dirty.
        let percept = percept(
            SquareState::Clean,
            all_neighbors([true, false, true, false], [true, false, false, true]),
        );
        for _ in 0..50 {
            assert_eq!(agent.act(&percept, &mut rng), VacuumWorldAction::Right);
        }
    }

    #[test]
    fn test_heuristic_prefers_unvisited_over_visited() {
        let mut rng = Rng::seed_from_u64(42);
        let mut agent = HeuristicVacuumAgent::new();
        let percept = percept(
            SquareState::Clean,
            all_neighbors([true, false, false, true], [true, false, false, true]),
        );
        let chosen: HashSet<VacuumWorldAction> =
            (0..100).map(|_| agent.act(&percept, &mut rng)).collect();
        let expected: HashSet<VacuumWorldAction> =
            [VacuumWorldAction::Down, VacuumWorldAction::Left]
                .into_iter()
                .collect();
        assert_eq!(chosen, expected);
    }

    #[test]
    fn test_heuristic_falls_back_to_all_moves() {
        let mut rng = Rng::seed_from_u64(42);
        let mut agent = HeuristicVacuumAgent::new();
        let percept = percept(SquareState::Clean, all_neighbors([true; 4], [false; 4]));
        assert_eq!(agent.best_moves(&percept).len(), 4);
        let chosen: HashSet<VacuumWorldAction> =
            (0..200).map(|_| agent.act(&percept, &mut rng)).collect();
        assert_eq!(chosen.len(), 4);
    }

    #[test]
    fn test_no_moves_means_noop() {
        let mut rng = Rng::seed_from_u64(42);
        let percept = percept(SquareState::Clean, vec![]);
        assert_eq!(
            ReflexVacuumAgent::new().act(&percept, &mut rng),
            VacuumWorldAction::NoOp
        );
        assert_eq!(
            HeuristicVacuumAgent::new().act(&percept, &mut rng),
            VacuumWorldAction::NoOp
        );
    }

    #[test]
    fn test_policy_kind_display() {
        assert_eq!(PolicyKind::Reflex.to_string(), "reflex");
        assert_eq!(PolicyKind::Heuristic.to_string(), "heuristic");
    }
}
