// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

//! Difference encoding of a row against the reference row: residues identical to the reference
//! become a placeholder, the others are kept verbatim.
//!
//! Both rows must have the same length. Rows of different lengths are rejected rather than
//! silently truncated to the shorter one.

use thiserror::Error;

use crate::render::chunks::Chunk;

pub const DEFAULT_PLACEHOLDER: char = '-';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    #[error("Reference has length {reference}, but target has length {target}")]
    LengthMismatch { reference: usize, target: usize },
    #[error("Columns {start}..{end} are out of range for sequences of length {len}")]
    WindowOutOfRange { start: usize, end: usize, len: usize },
}

pub fn encode_diff(reference: &str, target: &str, placeholder: char) -> Result<String, DiffError> {
    let len = check_lengths(reference, target)?;
    let mut result = String::with_capacity(len);
    result.extend(
        reference
            .chars()
            .zip(target.chars())
            .map(|(r, t)| if r == t { placeholder } else { t }),
    );
    Ok(result)
}

/// Same as `encode_diff()`, restricted to the columns of `chunk`.
pub fn encode_diff_window(
    reference: &str,
    target: &str,
    chunk: Chunk,
    placeholder: char,
) -> Result<String, DiffError> {
    let len = check_lengths(reference, target)?;
    if chunk.end > len || chunk.start > chunk.end {
        return Err(DiffError::WindowOutOfRange {
            start: chunk.start,
            end: chunk.end,
            len,
        });
    }
    Ok(reference
        .chars()
        .zip(target.chars())
        .skip(chunk.start)
        .take(chunk.len())
        .map(|(r, t)| if r == t { placeholder } else { t })
        .collect())
}

fn check_lengths(reference: &str, target: &str) -> Result<usize, DiffError> {
    let ref_len = reference.chars().count();
    let tgt_len = target.chars().count();
    if ref_len != tgt_len {
        return Err(DiffError::LengthMismatch {
            reference: ref_len,
            target: tgt_len,
        });
    }
    Ok(ref_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_diff_single_change() {
        assert_eq!("---A", encode_diff("ACGT", "ACGA", '-').unwrap());
    }

    #[test]
    fn test_encode_diff_against_self() {
        let seq = "MKVLAAGIVG-ALLW";
        let diff = encode_diff(seq, seq, '.').unwrap();
        assert_eq!(diff.len(), seq.len());
        assert!(diff.chars().all(|c| c == '.'));
    }

    #[test]
    fn test_encode_diff_keeps_gaps_and_case() {
        // A gap in the target where the reference has a residue is a difference.
        assert_eq!(".-a.", encode_diff("ACGT", "A-aT", '.').unwrap());
    }

    #[test]
    fn test_encode_diff_empty() {
        assert_eq!("", encode_diff("", "", '-').unwrap());
    }

    #[test]
    fn test_encode_diff_rejects_unequal_lengths() {
        assert_eq!(
            encode_diff("ACGT", "ACG", '-').unwrap_err(),
            DiffError::LengthMismatch {
                reference: 4,
                target: 3
            }
        );
        assert_eq!(
            encode_diff("AC", "ACGT", '-').unwrap_err(),
            DiffError::LengthMismatch {
                reference: 2,
                target: 4
            }
        );
    }

    #[test]
    fn test_encode_diff_window() {
        let chunk = Chunk { start: 2, end: 6 };
        assert_eq!("T--G", encode_diff_window("ACGTACGT", "ACTTAGGT", chunk, '-').unwrap());
    }

    #[test]
    fn test_encode_diff_window_out_of_range() {
        let chunk = Chunk { start: 2, end: 10 };
        assert_eq!(
            encode_diff_window("ACGT", "ACGT", chunk, '-').unwrap_err(),
            DiffError::WindowOutOfRange {
                start: 2,
                end: 10,
                len: 4
            }
        );
    }
}
