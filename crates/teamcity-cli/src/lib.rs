// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! tc-bridge library
//!
//! This module exports the command-line configuration and the reporting run
//! for use in integration tests and as a library.

pub mod config;
pub mod run;
