// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use itertools::Itertools;

use crate::seq::file::{numbered_lines, FormatError, SeqFile};
use crate::seq::record::SeqRecord;

pub const FASTA_LINE_WIDTH: usize = 60;

pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, FormatError> {
    let file = File::open(path)?;
    parse_fasta(BufReader::new(file))
}

pub fn parse_fasta<R: BufRead>(reader: R) -> Result<SeqFile, FormatError> {
    let mut result: SeqFile = Vec::new();
    let mut current_record: Option<SeqRecord> = None;

    for (linenum, line) in numbered_lines(reader) {
        let l = line?;
        let l = l.trim();
        if let Some(hdr) = l.strip_prefix('>') {
            if let Some(rec) = current_record.take() {
                result.push(rec);
            }
            current_record = Some(SeqRecord::from_header(hdr, String::new()));
        } else if l.is_empty() {
            continue;
        } else {
            // append line to current record's sequence
            match current_record.as_mut() {
                Some(rec) => rec.sequence.push_str(l),
                None => return Err(FormatError::MissingHeader(linenum)),
            }
        }
    }
    if let Some(rec) = current_record {
        result.push(rec);
    }
    if result.is_empty() {
        return Err(FormatError::Empty);
    }
    Ok(result)
}

/// Writes records as FastA, wrapping sequences at `line_width` columns (0: no wrapping).
pub fn write_fasta<W: Write>(records: &[SeqRecord], line_width: usize, mut out: W) -> io::Result<()> {
    for rec in records {
        writeln!(out, ">{}", rec.header())?;
        if line_width == 0 || rec.sequence.chars().count() <= line_width {
            writeln!(out, "{}", rec.sequence)?;
            continue;
        }
        // Lines are cut on characters, not bytes.
        for line in &rec.sequence.chars().chunks(line_width) {
            writeln!(out, "{}", line.collect::<String>())?;
        }
    }
    out.flush()
}

pub fn write_fasta_file<P: AsRef<Path>>(records: &[SeqRecord], path: P) -> io::Result<()> {
    let file = File::create(path)?;
    write_fasta(records, FASTA_LINE_WIDTH, io::BufWriter::new(file))
}
