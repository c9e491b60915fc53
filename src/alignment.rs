// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{collections::HashSet, fmt};

use regex::Regex;
use thiserror::Error;

use crate::seq::{file::SeqFile, record::SeqRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Alignment has no sequences")]
    Empty,
    #[error("Sequence '{id}' has length {len}, expected {expected}")]
    Ragged {
        id: String,
        len: usize,
        expected: usize,
    },
    #[error("Duplicate sequence id '{0}'")]
    DuplicateId(String),
    #[error("Sequence '{0}' contains non-ASCII characters")]
    NonAscii(String),
    #[error("No sequence with id '{0}'")]
    UnknownId(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alphabet {
    Nucleotide,
    Protein,
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Alphabet::Nucleotide => "nucleotide",
            Alphabet::Protein => "protein",
        };
        write!(f, "{}", s)
    }
}

impl Alphabet {
    /// Nucleotide iff every residue is one of A, C, G, T or a gap (case-insensitive).
    pub fn detect<'a>(sequences: impl IntoIterator<Item = &'a str>) -> Alphabet {
        let all_nt = sequences.into_iter().all(|s| {
            s.bytes().all(|b| {
                matches!(
                    b.to_ascii_uppercase(),
                    b'A' | b'C' | b'G' | b'T' | b'-' | b'.'
                )
            })
        });
        if all_nt {
            Alphabet::Nucleotide
        } else {
            Alphabet::Protein
        }
    }
}

pub fn is_gap(residue: u8) -> bool {
    residue == b'-' || residue == b'.'
}

// True IFF the records are not all of the same length, i.e. they have to go through an aligner
// before they can be shown as an alignment.
pub fn needs_alignment(records: &[SeqRecord]) -> bool {
    let mut iter = records.iter();
    let Some(first) = iter.next() else {
        return false;
    };
    let first_len = first.sequence.len();
    iter.any(|rec| rec.sequence.len() != first_len)
}

/// An ordered set of equal-length records. The first record is the reference: rows are diffed
/// against it, and it is always shown first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    records: Vec<SeqRecord>,
    alphabet: Alphabet,
}

impl Alignment {
    pub fn new(records: SeqFile) -> Result<Self, AlignmentError> {
        let first = records.first().ok_or(AlignmentError::Empty)?;
        let expected = first.sequence.len();
        let mut seen: HashSet<&str> = HashSet::new();
        for rec in &records {
            if !rec.sequence.is_ascii() {
                return Err(AlignmentError::NonAscii(rec.id.clone()));
            }
            if rec.sequence.len() != expected {
                return Err(AlignmentError::Ragged {
                    id: rec.id.clone(),
                    len: rec.sequence.len(),
                    expected,
                });
            }
            if !seen.insert(rec.id.as_str()) {
                return Err(AlignmentError::DuplicateId(rec.id.clone()));
            }
        }
        let alphabet = Alphabet::detect(records.iter().map(|r| r.sequence.as_str()));
        Ok(Alignment { records, alphabet })
    }

    pub fn from_vecs(headers: Vec<String>, sequences: Vec<String>) -> Result<Self, AlignmentError> {
        let records = headers
            .into_iter()
            .zip(sequences)
            .map(|(h, s)| SeqRecord::from_header(&h, s))
            .collect();
        Alignment::new(records)
    }

    pub fn num_seq(&self) -> usize {
        self.records.len()
    }

    pub fn aln_len(&self) -> usize {
        self.records[0].sequence.len()
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn records(&self) -> &[SeqRecord] {
        &self.records
    }

    pub fn into_records(self) -> SeqFile {
        self.records
    }

    pub fn reference(&self) -> &SeqRecord {
        &self.records[0]
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Moves the record named `id` to the front, making it the reference. The relative order of
    /// the others is kept.
    pub fn with_reference(mut self, id: &str) -> Result<Self, AlignmentError> {
        let idx = self
            .position(id)
            .ok_or_else(|| AlignmentError::UnknownId(id.to_string()))?;
        let rec = self.records.remove(idx);
        self.records.insert(0, rec);
        Ok(self)
    }

    /// Keeps the reference plus every record whose header matches `re`.
    pub fn select(&self, re: &Regex) -> Alignment {
        let records = self
            .records
            .iter()
            .enumerate()
            .filter(|(i, rec)| *i == 0 || re.is_match(&rec.header()))
            .map(|(_, rec)| rec.clone())
            .collect();
        Alignment {
            records,
            alphabet: self.alphabet,
        }
    }

    /// Percent identity of each record with respect to the reference, over the columns where at
    /// least one of the two has a residue. Columns where both are gapped do not count.
    pub fn pct_id_wrt_reference(&self) -> Vec<f64> {
        let reference = self.reference().sequence.as_bytes();
        self.records
            .iter()
            .map(|rec| {
                let (same, total) = reference
                    .iter()
                    .zip(rec.sequence.as_bytes())
                    .filter(|(r, s)| !(is_gap(**r) && is_gap(**s)))
                    .fold((0usize, 0usize), |(same, total), (r, s)| {
                        let id = r.eq_ignore_ascii_case(s) && !is_gap(*r);
                        (same + id as usize, total + 1)
                    });
                if total == 0 {
                    100.0
                } else {
                    100.0 * same as f64 / total as f64
                }
            })
            .collect()
    }
}
