// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{
    collections::HashMap,
    ffi::OsStr,
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::seq::{
    clustal::parse_clustal, fasta::parse_fasta, record::SeqRecord, stockholm::parse_stockholm,
};

// For our purposes, a sequence file is just a Vec of sequence records.
//

pub type SeqFile = Vec<SeqRecord>;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("No sequences found")]
    Empty,
    #[error("Sequence data before the first header (line {0})")]
    MissingHeader(usize),
    #[error("Line {line}: {message}")]
    Malformed { line: usize, message: String },
    #[error("Could not determine the format of {0}; use --format")]
    UnknownFormat(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeqFileFormat {
    #[clap(name = "fasta")]
    #[clap(alias = "f")]
    FastA,
    #[clap(name = "clustal")]
    #[clap(alias = "c")]
    Clustal,
    #[clap(name = "stockholm")]
    #[clap(alias = "s")]
    Stockholm,
}

impl fmt::Display for SeqFileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeqFileFormat::FastA => "fasta",
            SeqFileFormat::Clustal => "clustal",
            SeqFileFormat::Stockholm => "stockholm",
        };
        write!(f, "{}", s)
    }
}

impl SeqFileFormat {
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Option<SeqFileFormat> {
        let ext = path.as_ref().extension().and_then(OsStr::to_str)?;
        match ext.to_lowercase().as_str() {
            "fa" | "fas" | "fasta" | "fna" | "faa" | "ffn" | "pep" | "msa" => {
                Some(SeqFileFormat::FastA)
            }
            "aln" | "clustal" | "clw" => Some(SeqFileFormat::Clustal),
            "sto" | "sth" | "stk" | "stockholm" => Some(SeqFileFormat::Stockholm),
            _ => None,
        }
    }

    /// Looks at the first non-blank line only.
    pub fn from_content(content: &str) -> Option<SeqFileFormat> {
        let first = content.lines().map(str::trim).find(|l| !l.is_empty())?;
        if first.starts_with('>') {
            Some(SeqFileFormat::FastA)
        } else if first.starts_with("# STOCKHOLM") {
            Some(SeqFileFormat::Stockholm)
        } else if first.starts_with("CLUSTAL") || first.starts_with("MUSCLE") {
            Some(SeqFileFormat::Clustal)
        } else {
            None
        }
    }
}

/// Reads a sequence file, detecting its format (extension first, then content) unless one is
/// given.
pub fn read_seq_file<P: AsRef<Path>>(
    path: P,
    format: Option<SeqFileFormat>,
) -> Result<SeqFile, FormatError> {
    let path = path.as_ref();
    let format = match format.or_else(|| SeqFileFormat::from_extension(path)) {
        Some(fmt) => fmt,
        None => {
            let content = std::fs::read_to_string(path)?;
            SeqFileFormat::from_content(&content)
                .ok_or_else(|| FormatError::UnknownFormat(path.display().to_string()))?
        }
    };
    debug!("Reading {} as {}", path.display(), format);
    let reader = BufReader::new(File::open(path)?);
    match format {
        SeqFileFormat::FastA => parse_fasta(reader),
        SeqFileFormat::Clustal => parse_clustal(reader),
        SeqFileFormat::Stockholm => parse_stockholm(reader),
    }
}

// Interleaved formats (Clustal, Stockholm) spread each sequence over several blocks; fragments
// are concatenated per name, in order of first appearance.

#[derive(Default)]
pub(crate) struct InterleavedRecords {
    order: Vec<String>,
    sequences: HashMap<String, String>,
}

impl InterleavedRecords {
    pub fn push_fragment(&mut self, name: &str, fragment: &str) {
        let entry = self.sequences.entry(name.to_string()).or_insert_with(|| {
            self.order.push(name.to_string());
            String::new()
        });
        entry.push_str(fragment);
    }

    pub fn into_seq_file(mut self) -> Result<SeqFile, FormatError> {
        if self.order.is_empty() {
            return Err(FormatError::Empty);
        }
        let result = self
            .order
            .into_iter()
            .map(|name| {
                let sequence = self.sequences.remove(&name).unwrap_or_default();
                SeqRecord::new(name, sequence)
            })
            .collect();
        Ok(result)
    }
}

pub(crate) fn numbered_lines<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = (usize, io::Result<String>)> {
    reader.lines().enumerate().map(|(i, l)| (i + 1, l))
}
