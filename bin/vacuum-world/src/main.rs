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

#![warn(missing_docs)]

//! Chapter 2, vacuum world: compare a reflex agent against an agent that remembers where it has
//! been.
//!
//! Usage: `vacuum-world [CONFIG] [OUTPUT]`. Reads the experiment from `CONFIG` (default
//! `constants.json`) and writes every run plus the mean score per agent to `OUTPUT` (default
//! `summary.json`). Set `RUST_LOG=debug` to log every step.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vacuum_experiment::{run_experiment, ExperimentConfig, ExperimentError};

const DEFAULT_CONFIG_PATH: &str = "constants.json";
const DEFAULT_OUTPUT_PATH: &str = "summary.json";

fn run(config_path: &Path, output_path: &Path) -> Result<(), ExperimentError> {
    let config = ExperimentConfig::from_path(config_path)?;
    let report = run_experiment(&config)?;
    report.write_to(output_path)?;
    tracing::info!(
        path = %output_path.display(),
        runs = report.runs.len(),
        "wrote summary"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let mut args = std::env::args_os().skip(1);
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let output_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));

    match run(&config_path, &output_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "vacuum world experiment failed");
            ExitCode::FAILURE
        }
    }
}
