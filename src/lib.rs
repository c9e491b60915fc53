// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod aligner;
pub mod alignment;
pub mod colors;
pub mod config;
pub mod controls;
pub mod diff;
pub mod errors;
pub mod loader;
pub mod render;
pub mod seq;
pub mod viewer;
mod runner;

use crate::errors::SeqViewError;

pub fn run() -> Result<(), SeqViewError> {
    runner::run()
}
