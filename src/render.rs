// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod chunks;
pub mod html;
pub mod ruler;
mod style;
pub mod svg;
pub mod terminal;

use std::fmt;

use clap::ValueEnum;
use itertools::Itertools;
use log::debug;
use ratatui::{
    style::Style,
    text::{Line, Span, Text},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    alignment::Alignment,
    colors::{ColorError, Colorizer, Palettes, DEFAULT_PALETTE},
    diff::{encode_diff_window, DiffError, DEFAULT_PLACEHOLDER},
    render::{
        chunks::{chunks, Chunk, DEFAULT_CHUNK_WIDTH},
        ruler::{Ruler, DEFAULT_STRIDE},
        style::get_residue_style,
    },
};

pub const DEFAULT_LABEL_WIDTH: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Ruler stride must be greater than zero")]
    ZeroStride,
    #[error(transparent)]
    Diff(#[from] DiffError),
    #[error(transparent)]
    Color(#[from] ColorError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// No colour
    Plain,
    /// Colour by residue
    #[default]
    Residue,
    /// Rows other than the reference show only their differences to it
    #[clap(alias = "diff")]
    #[serde(alias = "diff")]
    Difference,
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DisplayMode::Plain => "no color",
            DisplayMode::Residue => "color by residue",
            DisplayMode::Difference => "color by difference",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoMode {
    /// Coloured letters
    Direct,
    /// Coloured background, dark letters
    #[default]
    Inverse,
}

impl fmt::Display for VideoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VideoMode::Direct => "Dir",
            VideoMode::Inverse => "Inv",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    // 0: a single chunk, as wide as the alignment
    pub chunk_width: usize,
    pub stride: usize,
    pub offset: i64,
    pub label_width: usize,
    pub placeholder: char,
    pub palette: String,
    pub mode: DisplayMode,
    pub video_mode: VideoMode,
    pub monochrome: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            chunk_width: DEFAULT_CHUNK_WIDTH,
            stride: DEFAULT_STRIDE,
            offset: 0,
            label_width: DEFAULT_LABEL_WIDTH,
            placeholder: DEFAULT_PLACEHOLDER,
            palette: String::from(DEFAULT_PALETTE),
            mode: DisplayMode::default(),
            video_mode: VideoMode::default(),
            monochrome: false,
        }
    }
}

impl RenderOptions {
    pub fn colored(&self) -> bool {
        self.mode != DisplayMode::Plain && !self.monochrome
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedRow {
    pub label: String,
    pub residues: String,
    pub is_reference: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedChunk {
    pub chunk: Chunk,
    pub header: String,
    pub rows: Vec<RenderedRow>,
}

/// Splits the alignment into chunks, with the ruler header and the (possibly diff-encoded) rows of
/// each. The reference row is never diff-encoded.
pub fn layout(aln: &Alignment, opts: &RenderOptions) -> Result<Vec<RenderedChunk>, RenderError> {
    let ruler = Ruler::new(opts.stride, opts.offset)?;
    let reference = &aln.reference().sequence;
    chunks(aln.aln_len(), opts.chunk_width)
        .map(|chunk| {
            debug!("Laying out columns {}..{}", chunk.start, chunk.end);
            let rows = aln
                .records()
                .iter()
                .enumerate()
                .map(|(i, rec)| {
                    let is_reference = i == 0;
                    let residues = if !is_reference && opts.mode == DisplayMode::Difference {
                        encode_diff_window(reference, &rec.sequence, chunk, opts.placeholder)?
                    } else {
                        rec.sequence[chunk.range()].to_string()
                    };
                    Ok(RenderedRow {
                        label: rec.id.chars().take(opts.label_width).collect(),
                        residues,
                        is_reference,
                    })
                })
                .collect::<Result<Vec<_>, RenderError>>()?;
            Ok(RenderedChunk {
                chunk,
                header: ruler.header(chunk),
                rows,
            })
        })
        .collect()
}

pub fn render_plain(aln: &Alignment, opts: &RenderOptions) -> Result<String, RenderError> {
    let width = opts.label_width + 1;
    let mut lines: Vec<String> = Vec::new();
    for rc in layout(aln, opts)? {
        lines.push(format!("{:width$} {}", "", rc.header));
        for row in &rc.rows {
            lines.push(format!("{:>width$} {}", row.label, row.residues));
        }
    }
    Ok(lines.join("\n"))
}

/// Same layout as `render_plain()`, with one styled span per run of identically coloured
/// residues.
pub fn render_text(
    aln: &Alignment,
    opts: &RenderOptions,
    palettes: &Palettes,
) -> Result<Text<'static>, RenderError> {
    let colorizer = Colorizer::from_palette_name(&opts.palette, palettes)?;
    let alphabet = aln.alphabet();
    let width = opts.label_width + 1;
    let mut lines: Vec<Line<'static>> = Vec::new();

    for rc in layout(aln, opts)? {
        lines.push(Line::raw(format!("{:width$} {}", "", rc.header)));
        for row in rc.rows {
            let mut spans = vec![Span::raw(format!("{:>width$} ", row.label))];
            let style_of = |c: char| -> Style {
                let is_placeholder = opts.mode == DisplayMode::Difference
                    && !row.is_reference
                    && c == opts.placeholder;
                if !opts.colored() || is_placeholder {
                    Style::default()
                } else {
                    get_residue_style(opts.video_mode, colorizer.color(c, alphabet))
                }
            };
            let runs = row.residues.chars().chunk_by(|&c| style_of(c));
            for (style, run) in &runs {
                spans.push(Span::styled(run.collect::<String>(), style));
            }
            lines.push(Line::from(spans));
        }
    }

    Ok(Text::from(lines))
}
