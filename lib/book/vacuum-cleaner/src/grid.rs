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

use std::str::FromStr;

use rand::Rng as _;
use serde::{Serialize, Serializer};

use crate::{Rng, VacuumWorldError};

const DIRTY_SYMBOL: char = '#';
const CLEAN_SYMBOL: char = '.';

/// A room's location. `x` is the column and `y` is the row, both starting at 0 in the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub x: usize,
    pub y: usize,
}

impl Location {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareState {
    Clean,
    Dirty,
}

// Layout snapshots are written as 0 (clean) and 1 (dirty).
impl Serialize for SquareState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            SquareState::Clean => serializer.serialize_u8(0),
            SquareState::Dirty => serializer.serialize_u8(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order legal moves are offered.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Rectangular grid of rooms. Rooms are stored row by row.
///
/// The number of dirty rooms is tracked alongside the rooms and is kept consistent by every
/// mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    squares: Vec<SquareState>,
    rows: usize,
    columns: usize,
    dirty_count: usize,
}

impl Grid {
    /// Creates a grid where every room is independently dirty with probability one half.
    pub fn generate(rows: usize, columns: usize, rng: &mut Rng) -> Result<Self, VacuumWorldError> {
        let room_count = rows
            .checked_mul(columns)
            .filter(|&count| count > 0)
            .ok_or(VacuumWorldError::InvalidDimensions { rows, columns })?;
        let squares = (0..room_count)
            .map(|_| {
                if rng.gen_bool(0.5) {
                    SquareState::Dirty
                } else {
                    SquareState::Clean
                }
            })
            .collect();
        Ok(Self::from_squares(squares, rows, columns))
    }

    /// Creates a grid from an explicit layout, one `Vec` per row.
    pub fn from_layout(layout: &[Vec<SquareState>]) -> Result<Self, VacuumWorldError> {
        let columns = match layout.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(VacuumWorldError::EmptyLayout),
        };
        for (row, squares) in layout.iter().enumerate() {
            if squares.len() != columns {
                return Err(VacuumWorldError::RaggedLayout {
                    row,
                    expected: columns,
                    found: squares.len(),
                });
            }
        }
        let squares = layout.iter().flatten().copied().collect();
        Ok(Self::from_squares(squares, layout.len(), columns))
    }

    fn from_squares(squares: Vec<SquareState>, rows: usize, columns: usize) -> Self {
        let dirty_count = squares
            .iter()
            .filter(|&s| *s == SquareState::Dirty)
            .count();
        Self {
            squares,
            rows,
            columns,
            dirty_count,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn room_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty_count
    }

    pub fn contains(&self, location: Location) -> bool {
        location.x < self.columns && location.y < self.rows
    }

    /// Get a room's state.
    ///
    /// Panics if `location` is outside the grid.
    pub fn get(&self, location: Location) -> SquareState {
        self.squares[location.y * self.columns + location.x]
    }

    /// Clean a room. Returns whether the room was dirty before.
    ///
    /// Panics if `location` is outside the grid.
    pub fn clean(&mut self, location: Location) -> bool {
        let square = &mut self.squares[location.y * self.columns + location.x];
        if *square == SquareState::Dirty {
            *square = SquareState::Clean;
            self.dirty_count -= 1;
            true
        } else {
            false
        }
    }

    /// The room one step away in `direction`, if it is inside the grid.
    pub fn neighbor(&self, location: Location, direction: Direction) -> Option<Location> {
        let neighbor = match direction {
            Direction::Up => Location::new(location.x, location.y.checked_sub(1)?),
            Direction::Down => Location::new(location.x, location.y + 1),
            Direction::Left => Location::new(location.x.checked_sub(1)?, location.y),
            Direction::Right => Location::new(location.x + 1, location.y),
        };
        self.contains(neighbor).then_some(neighbor)
    }

    /// Deep copy of the rooms, one `Vec` per row.
    pub fn snapshot(&self) -> Vec<Vec<SquareState>> {
        self.squares
            .chunks(self.columns)
            .map(|row| row.to_vec())
            .collect()
    }
}

// One line per row, '#' for dirty and '.' for clean.
impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::with_capacity((self.columns + 1) * self.rows);
        for (index, row) in self.squares.chunks(self.columns).enumerate() {
            if index > 0 {
                s.push('\n');
            }
            s.extend(row.iter().map(|square| match square {
                SquareState::Dirty => DIRTY_SYMBOL,
                SquareState::Clean => CLEAN_SYMBOL,
            }));
        }
        write!(f, "{}", s)
    }
}

impl FromStr for Grid {
    type Err = VacuumWorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let layout = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .map(|symbol| match symbol {
                        DIRTY_SYMBOL => Ok(SquareState::Dirty),
                        CLEAN_SYMBOL => Ok(SquareState::Clean),
                        _ => Err(VacuumWorldError::InvalidSymbol { symbol, row }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_layout(&layout)
    }
}
