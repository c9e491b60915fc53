// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::ops::Range;

pub const DEFAULT_CHUNK_WIDTH: usize = 60;

/// Half-open column window [start, end).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

// Lazy iterator over the column windows of an alignment. A width of 0 means a single window
// covering the whole alignment; an empty alignment has no windows at all.
#[derive(Clone, Debug)]
pub struct Chunks {
    aln_len: usize,
    width: usize,
    next_start: usize,
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.next_start >= self.aln_len {
            return None;
        }
        let start = self.next_start;
        let end = if self.width == 0 {
            self.aln_len
        } else {
            (start + self.width).min(self.aln_len)
        };
        self.next_start = end;
        Some(Chunk { start, end })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.aln_len.saturating_sub(self.next_start);
        let n = match (remaining, self.width) {
            (0, _) => 0,
            (_, 0) => 1,
            (r, w) => r.div_ceil(w),
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Chunks {}

pub fn chunks(aln_len: usize, width: usize) -> Chunks {
    Chunks {
        aln_len,
        width,
        next_start: 0,
    }
}
