// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::seq::file::{numbered_lines, FormatError, InterleavedRecords, SeqFile};

pub fn read_stockholm_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, FormatError> {
    let file = File::open(path)?;
    parse_stockholm(BufReader::new(file))
}

pub fn parse_stockholm<R: BufRead>(reader: R) -> Result<SeqFile, FormatError> {
    let mut records = InterleavedRecords::default();

    for (linenum, line) in numbered_lines(reader) {
        let l = line?;
        let l = l.trim();
        if l.is_empty() || l.starts_with('#') {
            // Annotation -> ignore.
            continue;
        }
        if l.starts_with("//") {
            break;
        }
        let mut fields = l.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(seqname), Some(aln_seq), None) => records.push_fragment(seqname, aln_seq),
            _ => {
                return Err(FormatError::Malformed {
                    line: linenum,
                    message: String::from("Expected exactly two fields"),
                })
            }
        }
    }

    records.into_seq_file()
}
