// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tc-bridge: report test runs and lint results to TeamCity
//!
//! This binary reads newline-delimited JSON events or diagnostics and writes
//! TeamCity service messages. Logs go to stderr; stdout carries only the
//! service message stream.

use anyhow::{Context, Result};
use clap::Parser;
use teamcity_cli::config::Config;
use teamcity_cli::run;
use tracing::debug;

fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    config.validate().context("Invalid configuration")?;
    debug!(
        command = ?config.resolved_command(),
        enabled = config.reporting_enabled(),
        "Starting tc-bridge"
    );

    run::run(&config).context("Reporting failed")?;
    Ok(())
}
