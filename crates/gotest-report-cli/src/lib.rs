// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gotest-report-cli library
//!
//! This module exports the configuration and conversion logic of the
//! `gotest-report` binary for use in integration tests.

pub mod config;
pub mod convert;
