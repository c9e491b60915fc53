// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::render::chunks::chunks;
use crate::seq::file::{numbered_lines, FormatError, InterleavedRecords, SeqFile};
use crate::seq::record::SeqRecord;

const BLOCK_WIDTH: usize = 50;
const ID_FIELD_WIDTH: usize = 36;
const MAX_ID_LEN: usize = 30;

pub fn read_clustal_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, FormatError> {
    let file = File::open(path)?;
    parse_clustal(BufReader::new(file))
}

pub fn parse_clustal<R: BufRead>(reader: R) -> Result<SeqFile, FormatError> {
    let mut records = InterleavedRecords::default();

    for (linenum, line) in numbered_lines(reader) {
        let l = line?;
        let trimmed = l.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with("CLUSTAL") || trimmed.starts_with("MUSCLE") {
            continue;
        }
        if trimmed.starts_with('#') {
            continue;
        }
        // Conservation lines start with blanks
        if trimmed
            .chars()
            .next()
            .map(|c| c.is_whitespace())
            .unwrap_or(false)
        {
            continue;
        }
        let mut fields = trimmed.split_whitespace();
        let name = fields.next().ok_or_else(|| FormatError::Malformed {
            line: linenum,
            message: String::from("Missing sequence id"),
        })?;
        let fragment = fields.next().ok_or_else(|| FormatError::Malformed {
            line: linenum,
            message: format!("Missing sequence fragment for '{}'", name),
        })?;
        // An optional third field is the running residue count.
        records.push_fragment(name, fragment);
    }

    records.into_seq_file()
}

/// Writes records in Clustal format, in blocks of 50 columns, each followed by a conservation
/// line ('*' where all records share the same non-gap residue).
///
/// Ids are cut to 30 characters and blanks become underscores. Fails with `InvalidInput`, before
/// writing anything, if two ids end up the same.
pub fn write_clustal<W: Write>(records: &[SeqRecord], mut out: W) -> io::Result<()> {
    let ids = clustal_ids(records)?;
    writeln!(out, "CLUSTAL W multiple sequence alignment")?;
    writeln!(out)?;
    writeln!(out)?;

    let aln_len = records.iter().map(SeqRecord::len).max().unwrap_or(0);
    for chunk in chunks(aln_len, BLOCK_WIDTH) {
        for (rec, id) in records.iter().zip(&ids) {
            let end = chunk.end.min(rec.sequence.len());
            let fragment = rec.sequence.get(chunk.start.min(end)..end).unwrap_or("");
            writeln!(out, "{:<width$}{}", id, fragment, width = ID_FIELD_WIDTH)?;
        }
        let conservation: String = chunk.range().map(|j| conservation_mark(records, j)).collect();
        writeln!(out, "{:<width$}{}", "", conservation, width = ID_FIELD_WIDTH)?;
        writeln!(out)?;
    }
    out.flush()
}

pub fn write_clustal_file<P: AsRef<Path>>(records: &[SeqRecord], path: P) -> io::Result<()> {
    let file = File::create(path)?;
    write_clustal(records, io::BufWriter::new(file))
}

fn clustal_ids(records: &[SeqRecord]) -> io::Result<Vec<String>> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut ids = Vec::with_capacity(records.len());
    for rec in records {
        let id: String = rec
            .id
            .chars()
            .take(MAX_ID_LEN)
            .map(|c| if c == ' ' { '_' } else { c })
            .collect();
        if let Some(other) = seen.insert(id.clone(), &rec.id) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "Ids '{}' and '{}' are both written as '{}' in Clustal format",
                    other, rec.id, id
                ),
            ));
        }
        ids.push(id);
    }
    Ok(ids)
}

fn conservation_mark(records: &[SeqRecord], col: usize) -> char {
    let mut residues = records.iter().map(|r| r.sequence.as_bytes().get(col).copied());
    match residues.next() {
        Some(Some(first)) if first != b'-' && first != b'.' => {
            let first = first.to_ascii_uppercase();
            if residues.all(|r| r.map(|b| b.to_ascii_uppercase()) == Some(first)) {
                '*'
            } else {
                ' '
            }
        }
        _ => ' ',
    }
}
