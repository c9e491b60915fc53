// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use itertools::Itertools;

use crate::render::{chunks::Chunk, RenderError};

pub const DEFAULT_STRIDE: usize = 10;

/// Column numbering above each chunk. Labels are 1-based, placed every `stride` columns from the
/// start of the chunk, and shifted down by `offset` (which may be negative).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ruler {
    stride: usize,
    offset: i64,
}

impl Ruler {
    pub fn new(stride: usize, offset: i64) -> Result<Self, RenderError> {
        if stride == 0 {
            return Err(RenderError::ZeroStride);
        }
        Ok(Ruler { stride, offset })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn labels(&self, chunk: Chunk) -> Vec<i64> {
        (chunk.start + 1..chunk.end + 1)
            .step_by(self.stride)
            .map(|pos| pos as i64 - self.offset)
            .collect()
    }

    // Each label is left-justified in a field one stride wide, so that it sits above the column
    // it numbers. Labels wider than the stride are not truncated.
    pub fn header(&self, chunk: Chunk) -> String {
        self.labels(chunk)
            .iter()
            .map(|l| format!("{:<width$}", l, width = self.stride))
            .join("")
            .trim_end()
            .to_string()
    }
}
