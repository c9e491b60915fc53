// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::io;

use thiserror::Error;

use crate::{
    aligner::ToolInvocationError, alignment::AlignmentError, colors::ColorError,
    config::ConfigError, controls::ControlError, diff::DiffError, render::RenderError,
    seq::file::FormatError,
};

// Umbrella error, so that main() can return Result<()> and '?' works across modules.

#[derive(Debug, Error)]
pub enum SeqViewError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),
    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),
    #[error("Color error: {0}")]
    Color(#[from] ColorError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("External tool error: {0}")]
    Tool(#[from] ToolInvocationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Option error: {0}")]
    Control(#[from] ControlError),
    #[error("Malformed regex: {0}")]
    Regex(#[from] regex::Error),
    #[error("No sequences loaded")]
    NoRecords,
    #[error("No alignment available")]
    NoAlignment,
    #[error("{0}")]
    Usage(String),
}
