// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

//! External multiple aligners.
//!
//! Records are written to a temporary FastA file under neutral ids (`s0`, `s1`, ...), the tool is
//! run on it, and its output is read back and mapped onto the original records, in input order.
//! Aligners truncate or mangle ids, hence the renaming.

use std::{
    env, fmt, io,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    alignment::{Alignment, AlignmentError},
    config::ToolsConfig,
    seq::{
        clustal::read_clustal_file,
        fasta::{read_fasta_file, write_fasta_file},
        file::{FormatError, SeqFile},
        record::SeqRecord,
    },
};

pub const CLUSTALW: &str = "clustalw";
pub const MUSCLE: &str = "muscle";

const TMP_ID_PREFIX: &str = "s";

#[derive(Debug, Error)]
pub enum ToolInvocationError {
    #[error("{tool} not found (searched {} location(s))", .searched.len())]
    NotFound { tool: String, searched: Vec<PathBuf> },
    #[error("Failed to run {tool}: {source}")]
    Spawn { tool: String, source: io::Error },
    #[error("{tool} failed ({status}): {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },
    #[error("Temporary file error: {0}")]
    TempFile(io::Error),
    #[error("Could not read {tool} output: {source}")]
    Output { tool: String, source: FormatError },
    #[error("Invalid {tool} output: {source}")]
    Invalid { tool: String, source: AlignmentError },
}

/// A program that turns unaligned records into an alignment.
pub trait ExternalAligner {
    fn name(&self) -> &'static str;

    /// Location of the executable called `name`.
    fn tool_path(&self, name: &str) -> Result<PathBuf, ToolInvocationError>;

    fn align(&self, records: &[SeqRecord]) -> Result<Alignment, ToolInvocationError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignerKind {
    #[default]
    Clustalw,
    Muscle,
}

impl fmt::Display for AlignerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlignerKind::Clustalw => CLUSTALW,
            AlignerKind::Muscle => MUSCLE,
        };
        write!(f, "{}", s)
    }
}

pub fn aligner_for(kind: AlignerKind, tools: &ToolsConfig) -> Box<dyn ExternalAligner> {
    match kind {
        AlignerKind::Clustalw => Box::new(ClustalW::new(ToolLocator::new(
            tools.clustalw.clone(),
            tools.bin_dir.clone(),
            tools.search_path,
        ))),
        AlignerKind::Muscle => Box::new(Muscle::new(ToolLocator::new(
            tools.muscle.clone(),
            tools.bin_dir.clone(),
            tools.search_path,
        ))),
    }
}

// Looks for an executable: explicit path, then <bin_dir>/<name>, then $PATH (unless disabled).
#[derive(Clone, Debug, Default)]
pub struct ToolLocator {
    explicit: Option<PathBuf>,
    bin_dir: Option<PathBuf>,
    search_path: bool,
}

impl ToolLocator {
    pub fn new(explicit: Option<PathBuf>, bin_dir: Option<PathBuf>, search_path: bool) -> Self {
        ToolLocator {
            explicit,
            bin_dir,
            search_path,
        }
    }

    pub fn locate(&self, name: &str) -> Result<PathBuf, ToolInvocationError> {
        let exe_name = format!("{}{}", name, env::consts::EXE_SUFFIX);
        let mut searched: Vec<PathBuf> = Vec::new();

        if let Some(path) = &self.explicit {
            if path.is_file() {
                return Ok(path.clone());
            }
            searched.push(path.clone());
        }
        if let Some(dir) = &self.bin_dir {
            let candidate = dir.join(&exe_name);
            if candidate.is_file() {
                return Ok(candidate);
            }
            searched.push(candidate);
        }
        if self.search_path {
            if let Some(paths) = env::var_os("PATH") {
                for dir in env::split_paths(&paths) {
                    let candidate = dir.join(&exe_name);
                    if candidate.is_file() {
                        return Ok(candidate);
                    }
                    searched.push(candidate);
                }
            }
        }

        Err(ToolInvocationError::NotFound {
            tool: name.to_string(),
            searched,
        })
    }
}

pub struct ClustalW {
    locator: ToolLocator,
}

impl ClustalW {
    pub fn new(locator: ToolLocator) -> Self {
        ClustalW { locator }
    }
}

impl ExternalAligner for ClustalW {
    fn name(&self) -> &'static str {
        CLUSTALW
    }

    fn tool_path(&self, name: &str) -> Result<PathBuf, ToolInvocationError> {
        self.locator.locate(name)
    }

    fn align(&self, records: &[SeqRecord]) -> Result<Alignment, ToolInvocationError> {
        check_input(CLUSTALW, records)?;
        let tool = self.tool_path(CLUSTALW)?;
        let tmp_dir = tempfile::tempdir().map_err(ToolInvocationError::TempFile)?;
        let infile = tmp_dir.path().join("input.fa");
        let outfile = tmp_dir.path().join("input.aln");
        write_renamed(records, &infile)?;

        let args = vec![
            format!("-INFILE={}", infile.display()),
            format!("-OUTFILE={}", outfile.display()),
            String::from("-OUTORDER=INPUT"),
        ];
        run_tool(CLUSTALW, &tool, &args)?;
        let aligned = read_clustal_file(&outfile).map_err(|source| ToolInvocationError::Output {
            tool: CLUSTALW.to_string(),
            source,
        })?;
        restore_records(CLUSTALW, records, aligned)
    }
}

pub struct Muscle {
    locator: ToolLocator,
}

impl Muscle {
    pub fn new(locator: ToolLocator) -> Self {
        Muscle { locator }
    }
}

impl ExternalAligner for Muscle {
    fn name(&self) -> &'static str {
        MUSCLE
    }

    fn tool_path(&self, name: &str) -> Result<PathBuf, ToolInvocationError> {
        self.locator.locate(name)
    }

    fn align(&self, records: &[SeqRecord]) -> Result<Alignment, ToolInvocationError> {
        check_input(MUSCLE, records)?;
        let tool = self.tool_path(MUSCLE)?;
        let tmp_dir = tempfile::tempdir().map_err(ToolInvocationError::TempFile)?;
        let infile = tmp_dir.path().join("input.fa");
        let outfile = tmp_dir.path().join("input.out");
        write_renamed(records, &infile)?;

        let args = vec![
            String::from("-in"),
            infile.display().to_string(),
            String::from("-out"),
            outfile.display().to_string(),
        ];
        run_tool(MUSCLE, &tool, &args)?;
        let aligned = read_fasta_file(&outfile).map_err(|source| ToolInvocationError::Output {
            tool: MUSCLE.to_string(),
            source,
        })?;
        restore_records(MUSCLE, records, aligned)
    }
}

fn check_input(tool: &str, records: &[SeqRecord]) -> Result<(), ToolInvocationError> {
    if records.is_empty() {
        return Err(ToolInvocationError::Invalid {
            tool: tool.to_string(),
            source: AlignmentError::Empty,
        });
    }
    Ok(())
}

fn write_renamed(records: &[SeqRecord], path: &Path) -> Result<(), ToolInvocationError> {
    let renamed: Vec<SeqRecord> = records
        .iter()
        .enumerate()
        .map(|(i, rec)| SeqRecord::new(format!("{}{}", TMP_ID_PREFIX, i), rec.sequence.clone()))
        .collect();
    debug!("Writing {} records to {}", renamed.len(), path.display());
    write_fasta_file(&renamed, path).map_err(ToolInvocationError::TempFile)
}

fn run_tool(tool: &str, path: &Path, args: &[String]) -> Result<Output, ToolInvocationError> {
    info!("Running {} {}", path.display(), args.join(" "));
    let output = Command::new(path)
        .args(args)
        .output()
        .map_err(|source| ToolInvocationError::Spawn {
            tool: tool.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(ToolInvocationError::Failed {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    debug!("{} done", tool);
    Ok(output)
}

// Maps the tool's output (renamed ids, any order) back onto the input records.
fn restore_records(
    tool: &str,
    records: &[SeqRecord],
    aligned: SeqFile,
) -> Result<Alignment, ToolInvocationError> {
    let invalid = |source: AlignmentError| ToolInvocationError::Invalid {
        tool: tool.to_string(),
        source,
    };
    let mut slots: Vec<Option<String>> = vec![None; records.len()];
    for rec in aligned {
        let idx = rec
            .id
            .strip_prefix(TMP_ID_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&i| i < records.len())
            .ok_or_else(|| invalid(AlignmentError::UnknownId(rec.id.clone())))?;
        if slots[idx].is_some() {
            return Err(invalid(AlignmentError::DuplicateId(records[idx].id.clone())));
        }
        slots[idx] = Some(rec.sequence);
    }
    let restored = records
        .iter()
        .zip(slots)
        .map(|(orig, sequence)| {
            let sequence =
                sequence.ok_or_else(|| invalid(AlignmentError::UnknownId(orig.id.clone())))?;
            Ok(SeqRecord {
                id: orig.id.clone(),
                description: orig.description.clone(),
                sequence,
            })
        })
        .collect::<Result<SeqFile, ToolInvocationError>>()?;
    Alignment::new(restored).map_err(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn records() -> Vec<SeqRecord> {
        vec![
            SeqRecord::new("p1", "MKVLAAGIVG").with_description("first"),
            SeqRecord::new("p2", "MKVLAGIVG"),
        ]
    }

    #[test]
    fn test_locate_in_bin_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir
            .path()
            .join(format!("{}{}", CLUSTALW, env::consts::EXE_SUFFIX));
        fs::write(&exe, "").unwrap();
        let locator = ToolLocator::new(None, Some(dir.path().to_path_buf()), false);
        assert_eq!(locator.locate(CLUSTALW).unwrap(), exe);
    }

    #[test]
    fn test_explicit_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("my-muscle");
        fs::write(&explicit, "").unwrap();
        let bin_dir = Some(dir.path().to_path_buf());
        let locator = ToolLocator::new(Some(explicit.clone()), bin_dir, false);
        assert_eq!(locator.locate(MUSCLE).unwrap(), explicit);
    }

    #[test]
    fn test_not_found_lists_searched_locations() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let bin_dir = Some(dir.path().to_path_buf());
        let locator = ToolLocator::new(Some(missing.clone()), bin_dir, false);
        match locator.locate(CLUSTALW) {
            Err(ToolInvocationError::NotFound { tool, searched }) => {
                assert_eq!(tool, CLUSTALW);
                assert_eq!(searched.len(), 2);
                assert_eq!(searched[0], missing);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_align_without_binary() {
        let dir = tempfile::tempdir().unwrap();
        let tools = ToolsConfig {
            bin_dir: Some(dir.path().to_path_buf()),
            search_path: false,
            ..ToolsConfig::default()
        };
        for kind in [AlignerKind::Clustalw, AlignerKind::Muscle] {
            let aligner = aligner_for(kind, &tools);
            assert_eq!(aligner.name(), kind.to_string());
            assert!(matches!(
                aligner.align(&records()),
                Err(ToolInvocationError::NotFound { .. })
            ));
        }
    }

    #[test]
    fn test_align_no_records() {
        let aligner = ClustalW::new(ToolLocator::default());
        assert!(matches!(
            aligner.align(&[]),
            Err(ToolInvocationError::Invalid {
                source: AlignmentError::Empty,
                ..
            })
        ));
    }

    #[test]
    fn test_restore_records_reorders() {
        let aligned = vec![
            SeqRecord::new("s1", "MKVL-AGIVG"),
            SeqRecord::new("s0", "MKVLAAGIVG"),
        ];
        let aln = restore_records(CLUSTALW, &records(), aligned).unwrap();
        assert_eq!(aln.ids().collect::<Vec<_>>(), vec!["p1", "p2"]);
        assert_eq!(aln.records()[0].description, "first");
        assert_eq!(aln.records()[1].sequence, "MKVL-AGIVG");
    }

    #[test]
    fn test_restore_records_unknown_or_missing() {
        let aligned = vec![SeqRecord::new("s0", "MKVLAAGIVG"), SeqRecord::new("zz", "X")];
        assert!(matches!(
            restore_records(MUSCLE, &records(), aligned),
            Err(ToolInvocationError::Invalid {
                source: AlignmentError::UnknownId(_),
                ..
            })
        ));
        let aligned = vec![SeqRecord::new("s0", "MKVLAAGIVG")];
        match restore_records(MUSCLE, &records(), aligned) {
            Err(ToolInvocationError::Invalid {
                source: AlignmentError::UnknownId(id),
                ..
            }) => assert_eq!(id, "p2"),
            other => panic!("expected missing record, got {:?}", other),
        }
    }

    #[test]
    fn test_restore_records_repeated_id() {
        let aligned = vec![
            SeqRecord::new("s0", "MKVLAAGIVG"),
            SeqRecord::new("s1", "MKVL-AGIVG"),
            SeqRecord::new("s0", "MKVLAAGIV-"),
        ];
        match restore_records(CLUSTALW, &records(), aligned) {
            Err(ToolInvocationError::Invalid {
                source: AlignmentError::DuplicateId(id),
                ..
            }) => assert_eq!(id, "p1"),
            other => panic!("expected duplicate id, got {:?}", other),
        }
    }
}
