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

use crate::grid::Location;
use crate::vacuum_world::VacuumWorldAction;

/// Vacuum world error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VacuumWorldError {
    /// A grid needs at least one row and one column.
    #[error("invalid grid dimensions: {rows} rows by {columns} columns")]
    InvalidDimensions { rows: usize, columns: usize },

    /// Location is not inside the grid.
    #[error("location {location} is outside a grid of {rows} rows by {columns} columns")]
    LocationOutOfBounds {
        location: Location,
        rows: usize,
        columns: usize,
    },

    /// Layout has no rooms at all.
    #[error("layout is empty")]
    EmptyLayout,

    /// Layout rows have different lengths.
    #[error("layout row {row} has {found} rooms, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Layout text contains a character that is neither a clean nor a dirty room.
    #[error("unknown room symbol {symbol:?} in layout row {row}")]
    InvalidSymbol { symbol: char, row: usize },

    /// Action is not legal from the current location.
    #[error("illegal action {action:?} at {location}")]
    IllegalAction {
        action: VacuumWorldAction,
        location: Location,
    },

    /// Run did not finish within its configured number of steps.
    #[error("run exceeded its step limit of {limit}")]
    StepLimitExceeded { limit: usize },
}
