// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton


use std::{fmt::Write as _, path::Path};

use log::{info, warn};
use ratatui::text::Text;
use regex::Regex;

use crate::{
    aligner::ExternalAligner,
    alignment::{needs_alignment, Alignment, AlignmentError},
    colors::Palettes,
    controls::{apply_render_controls, render_controls, ControlSet},
    errors::SeqViewError,
    loader::{load_alignment, AlignmentSource},
    render::{self, html::render_html, svg::render_svg, RenderOptions},
    seq::{
        clustal::write_clustal_file,
        fasta::write_fasta_file,
        file::{read_seq_file, SeqFile, SeqFileFormat},
        record::SeqRecord,
    },
};

/// What is loaded and how it is shown. The alignment is unset until the records have been
/// successfully aligned (or were already aligned when loaded).
pub struct Viewer {
    pub filename: String,
    records: Option<SeqFile>,
    alignment: Option<Alignment>,
    reference: Option<String>,
    selection: Option<Regex>,
    pub options: RenderOptions,
    palettes: Palettes,
}

impl Viewer {
    pub fn new(options: RenderOptions, palettes: Palettes) -> Self {
        Viewer {
            filename: String::new(),
            records: None,
            alignment: None,
            reference: None,
            selection: None,
            options,
            palettes,
        }
    }

    pub fn records(&self) -> Option<&[SeqRecord]> {
        self.records.as_deref()
    }

    pub fn alignment(&self) -> Option<&Alignment> {
        self.alignment.as_ref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn palettes(&self) -> &Palettes {
        &self.palettes
    }

    /// Reads a sequence file. Nothing changes if it cannot be read. Records that are already
    /// aligned become the alignment right away.
    pub fn load_file(
        &mut self,
        path: &Path,
        format: Option<SeqFileFormat>,
    ) -> Result<(), SeqViewError> {
        let records = read_seq_file(path, format)?;
        info!("Read {} records from {}", records.len(), path.display());
        let alignment = if needs_alignment(&records) {
            None
        } else {
            Some(Alignment::new(records.clone())?)
        };
        self.filename = path.display().to_string();
        self.records = Some(records);
        self.alignment = alignment;
        Ok(())
    }

    pub fn load_records(&mut self, name: &str, records: SeqFile) -> Result<(), SeqViewError> {
        if records.is_empty() {
            return Err(SeqViewError::NoRecords);
        }
        self.filename = name.to_string();
        self.records = Some(records);
        self.alignment = None;
        Ok(())
    }

    /// Runs the aligner on the loaded records, unless they are already aligned and `force` is
    /// not set. On failure the alignment is left as it was.
    pub fn align(
        &mut self,
        aligner: &dyn ExternalAligner,
        force: bool,
    ) -> Result<(), SeqViewError> {
        let records = self.records.as_ref().ok_or(SeqViewError::NoRecords)?;
        if self.alignment.is_some() && !force {
            return Ok(());
        }
        match load_alignment(AlignmentSource::Records(records.clone()), aligner, force) {
            Ok(aln) => {
                self.alignment = Some(aln);
                Ok(())
            }
            Err(e) => {
                warn!("Alignment with {} failed: {}", aligner.name(), e);
                Err(e)
            }
        }
    }

    // None: first record
    pub fn set_reference(&mut self, id: Option<&str>) -> Result<(), SeqViewError> {
        if let (Some(id), Some(records)) = (id, &self.records) {
            if !records.iter().any(|r| r.id == id) {
                return Err(AlignmentError::UnknownId(id.to_string()).into());
            }
        }
        self.reference = id.map(str::to_string);
        Ok(())
    }

    // None: all records
    pub fn set_selection(&mut self, pattern: Option<&str>) -> Result<(), SeqViewError> {
        self.selection = pattern.map(Regex::new).transpose()?;
        Ok(())
    }

    /// The alignment as shown: reference first, other records filtered by the selection.
    pub fn view(&self) -> Result<Alignment, SeqViewError> {
        let mut aln = self.alignment.clone().ok_or(SeqViewError::NoAlignment)?;
        if let Some(id) = &self.reference {
            aln = aln.with_reference(id)?;
        }
        if let Some(re) = &self.selection {
            aln = aln.select(re);
        }
        Ok(aln)
    }

    pub fn render_plain(&self) -> Result<String, SeqViewError> {
        Ok(render::render_plain(&self.view()?, &self.options)?)
    }

    pub fn render_text(&self) -> Result<Text<'static>, SeqViewError> {
        Ok(render::render_text(
            &self.view()?,
            &self.options,
            &self.palettes,
        )?)
    }

    pub fn render_html(&self) -> Result<String, SeqViewError> {
        Ok(render_html(&self.view()?, &self.options, &self.palettes)?)
    }

    pub fn render_svg(&self) -> Result<String, SeqViewError> {
        Ok(render_svg(&self.view()?, &self.options, &self.palettes)?)
    }

    /// Writes the shown alignment as Clustal if the extension says so, else as FastA.
    pub fn save_alignment(&self, path: &Path) -> Result<(), SeqViewError> {
        let aln = self.view()?;
        match SeqFileFormat::from_extension(path) {
            Some(SeqFileFormat::Clustal) => write_clustal_file(aln.records(), path)?,
            _ => write_fasta_file(aln.records(), path)?,
        }
        info!("Saved alignment to {}", path.display());
        Ok(())
    }

    pub fn info(&self) -> Result<String, SeqViewError> {
        let aln = self.view()?;
        let mut out = String::new();
        let _ = writeln!(out, "name: {}", self.filename);
        let _ = writeln!(out, "nb_sequences: {}", aln.num_seq());
        let _ = writeln!(out, "nb_columns: {}", aln.aln_len());
        let _ = writeln!(out, "alphabet: {}", aln.alphabet());
        let _ = writeln!(out, "reference: {}", aln.reference().id);
        for (id, pct) in aln.ids().zip(aln.pct_id_wrt_reference()) {
            let _ = writeln!(out, "{}\t{:.1}%", id, pct);
        }
        Ok(out)
    }

    pub fn controls(&self) -> ControlSet {
        render_controls(&self.options, self.palettes.names())
    }

    pub fn apply_controls(&mut self, controls: &ControlSet) -> Result<(), SeqViewError> {
        let mut options = self.options.clone();
        apply_render_controls(&mut options, controls)?;
        self.palettes.get(&options.palette)?;
        self.options = options;
        Ok(())
    }
}
