// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::path::PathBuf;

use log::info;

use crate::{
    aligner::ExternalAligner,
    alignment::{needs_alignment, Alignment},
    errors::SeqViewError,
    seq::file::{read_seq_file, SeqFile, SeqFileFormat},
};

/// Where the sequences come from.
#[derive(Clone, Debug)]
pub enum AlignmentSource {
    // No format: detect from extension, then content
    File {
        path: PathBuf,
        format: Option<SeqFileFormat>,
    },
    // Always aligned
    Records(SeqFile),
}

/// Reads the records and turns them into an alignment. File records go through the aligner only
/// if their lengths differ, or if `force` is set.
pub fn load_alignment(
    source: AlignmentSource,
    aligner: &dyn ExternalAligner,
    force: bool,
) -> Result<Alignment, SeqViewError> {
    let (records, must_align) = match source {
        AlignmentSource::File { path, format } => {
            info!("Loading {}", path.display());
            let records = read_seq_file(&path, format)?;
            let must_align = force || needs_alignment(&records);
            (records, must_align)
        }
        AlignmentSource::Records(records) => (records, true),
    };
    if records.is_empty() {
        return Err(SeqViewError::NoRecords);
    }

    if must_align {
        info!("Aligning {} records with {}", records.len(), aligner.name());
        Ok(aligner.align(&records)?)
    } else {
        Ok(Alignment::new(records)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aligner::ToolInvocationError, seq::record::SeqRecord};
    use std::{cell::Cell, path::PathBuf};

    // Pads every record with trailing gaps to the longest length.
    struct PadAligner {
        calls: Cell<usize>,
    }

    impl PadAligner {
        fn new() -> Self {
            PadAligner {
                calls: Cell::new(0),
            }
        }
    }

    impl ExternalAligner for PadAligner {
        fn name(&self) -> &'static str {
            "pad"
        }

        fn tool_path(&self, name: &str) -> Result<PathBuf, ToolInvocationError> {
            Ok(PathBuf::from(name))
        }

        fn align(&self, records: &[SeqRecord]) -> Result<Alignment, ToolInvocationError> {
            self.calls.set(self.calls.get() + 1);
            let width = records.iter().map(SeqRecord::len).max().unwrap_or(0);
            let padded = records
                .iter()
                .map(|r| {
                    let mut r = r.clone();
                    r.sequence = format!("{:-<width$}", r.sequence);
                    r
                })
                .collect();
            Alignment::new(padded).map_err(|source| ToolInvocationError::Invalid {
                tool: String::from("pad"),
                source,
            })
        }
    }

    fn file(path: &str) -> AlignmentSource {
        AlignmentSource::File {
            path: PathBuf::from(path),
            format: None,
        }
    }

    #[test]
    fn test_load_aligned_file_skips_aligner() {
        let aligner = PadAligner::new();
        let aln = load_alignment(file("data/test2.fas"), &aligner, false).unwrap();
        assert_eq!(aln.num_seq(), 3);
        assert_eq!(aln.aln_len(), 10);
        assert_eq!(aligner.calls.get(), 0);
    }

    #[test]
    fn test_load_unaligned_file_uses_aligner() {
        let aligner = PadAligner::new();
        let aln = load_alignment(file("data/unaligned.fas"), &aligner, false).unwrap();
        assert_eq!(aligner.calls.get(), 1);
        assert_eq!(aln.aln_len(), 10);
        assert_eq!(aln.records()[1].sequence, "MKVLAGIVG-");
        assert_eq!(aln.records()[0].description, "first");
    }

    #[test]
    fn test_force_alignment() {
        let aligner = PadAligner::new();
        load_alignment(file("data/test-clustal.aln"), &aligner, true).unwrap();
        assert_eq!(aligner.calls.get(), 1);
    }

    #[test]
    fn test_records_are_always_aligned() {
        let aligner = PadAligner::new();
        let records = vec![SeqRecord::new("a", "ACGT"), SeqRecord::new("b", "ACGT")];
        load_alignment(AlignmentSource::Records(records), &aligner, false).unwrap();
        assert_eq!(aligner.calls.get(), 1);
    }

    #[test]
    fn test_load_errors() {
        let aligner = PadAligner::new();
        assert!(matches!(
            load_alignment(AlignmentSource::Records(vec![]), &aligner, false),
            Err(SeqViewError::NoRecords)
        ));
        assert!(matches!(
            load_alignment(file("data/no-such-file.fas"), &aligner, false),
            Err(SeqViewError::Format(_))
        ));
    }
}
