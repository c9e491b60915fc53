// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    fs,
    io::{stdout, Write},
    path::PathBuf,
};

use log::info;

use clap::Parser;

use crate::{
    aligner::{aligner_for, AlignerKind},
    config::Config,
    errors::SeqViewError,
    render::{terminal::print_text, DisplayMode},
    seq::file::SeqFileFormat,
    viewer::Viewer,
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Sequence or alignment file
    aln_fname: Option<PathBuf>,

    /// Sequence or alignment file (same as the positional argument)
    #[arg(short = 'f', long = "fasta", conflicts_with = "aln_fname")]
    fasta: Option<PathBuf>,

    /// Sequence file format
    #[arg(short = 'F', long = "format",
        help = "Sequence file format [fasta|clustal|stockholm] (or just f|c|s); default: guessed",
        hide_possible_values = true,
    )]
    format: Option<SeqFileFormat>,

    /// Align the sequences even if they all have the same length
    #[arg(short, long)]
    align: bool,

    /// External aligner
    #[arg(long)]
    aligner: Option<AlignerKind>,

    /// Columns per block (0: a single block)
    #[arg(short = 'w', long = "chunk-width")]
    chunk_width: Option<usize>,

    /// Distance between ruler labels
    #[arg(short, long)]
    stride: Option<usize>,

    /// Subtracted from ruler positions
    #[arg(short, long, allow_hyphen_values = true)]
    offset: Option<i64>,

    /// Display mode
    #[arg(short, long)]
    mode: Option<DisplayMode>,

    /// Palette for amino acids
    #[arg(short, long)]
    palette: Option<String>,

    /// Id of the reference sequence (default: the first one)
    #[arg(short, long)]
    reference: Option<String>,

    /// Only show sequences whose header matches this regex (plus the reference)
    #[arg(long)]
    select: Option<String>,

    /// Symbol for residues identical to the reference, in diff mode
    #[arg(long)]
    placeholder: Option<char>,

    /// Disable color
    #[arg(short = 'C', long = "no-color")]
    no_color: bool,

    /// Info mode (print a summary of the alignment and exit)
    #[arg(short, long)]
    info: bool,

    /// Configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Save the alignment (Clustal if the extension is .aln, else FastA)
    #[arg(long = "save-alignment")]
    save_alignment: Option<PathBuf>,

    /// Export the alignment as HTML
    #[arg(long)]
    html: Option<PathBuf>,

    /// Export the alignment as SVG
    #[arg(long)]
    svg: Option<PathBuf>,
}

pub fn run() -> Result<(), SeqViewError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let palettes = config.palettes()?;

    let mut options = config.display.clone();
    if let Some(width) = cli.chunk_width {
        options.chunk_width = width;
    }
    if let Some(stride) = cli.stride {
        options.stride = stride;
    }
    if let Some(offset) = cli.offset {
        options.offset = offset;
    }
    if let Some(mode) = cli.mode {
        options.mode = mode;
    }
    if let Some(palette) = &cli.palette {
        options.palette = palette.clone();
    }
    if let Some(placeholder) = cli.placeholder {
        options.placeholder = placeholder;
    }
    if cli.no_color {
        options.monochrome = true;
    }
    // Unknown palettes are reported before any file is read.
    palettes.get(&options.palette)?;

    let seq_filename = cli
        .aln_fname
        .as_ref()
        .or(cli.fasta.as_ref())
        .ok_or_else(|| SeqViewError::Usage(String::from("Expected a sequence file argument")))?;

    let mut viewer = Viewer::new(options, palettes);
    viewer.load_file(seq_filename, cli.format)?;

    let aligner = aligner_for(cli.aligner.unwrap_or(config.tools.aligner), &config.tools);
    if cli.align || viewer.alignment().is_none() {
        viewer.align(aligner.as_ref(), cli.align)?;
    }
    viewer.set_reference(cli.reference.as_deref())?;
    viewer.set_selection(cli.select.as_deref())?;

    if cli.info {
        info!("Running in info mode.");
        print!("{}", viewer.info()?);
        return Ok(());
    }

    let mut exported = false;
    if let Some(path) = &cli.save_alignment {
        viewer.save_alignment(path)?;
        exported = true;
    }
    if let Some(path) = &cli.html {
        fs::write(path, viewer.render_html()?)?;
        info!("Wrote {}", path.display());
        exported = true;
    }
    if let Some(path) = &cli.svg {
        fs::write(path, viewer.render_svg()?)?;
        info!("Wrote {}", path.display());
        exported = true;
    }
    if exported {
        return Ok(());
    }

    let mut out = stdout().lock();
    if viewer.options.colored() {
        print_text(&mut out, &viewer.render_text()?)?;
    } else {
        writeln!(out, "{}", viewer.render_plain()?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_options() {
        let cli = Cli::try_parse_from([
            "seqviewer",
            "data/test2.fas",
            "--mode",
            "diff",
            "--offset",
            "-12",
            "-w",
            "30",
            "--aligner",
            "muscle",
            "--placeholder",
            ".",
        ])
        .unwrap();
        assert_eq!(cli.aln_fname, Some(PathBuf::from("data/test2.fas")));
        assert_eq!(cli.mode, Some(DisplayMode::Difference));
        assert_eq!(cli.offset, Some(-12));
        assert_eq!(cli.chunk_width, Some(30));
        assert_eq!(cli.aligner, Some(AlignerKind::Muscle));
        assert_eq!(cli.placeholder, Some('.'));
    }

    #[test]
    fn test_cli_fasta_flag_and_format_alias() {
        let cli = Cli::try_parse_from(["seqviewer", "-f", "x.txt", "-F", "c"]).unwrap();
        assert_eq!(cli.fasta, Some(PathBuf::from("x.txt")));
        assert_eq!(cli.format, Some(SeqFileFormat::Clustal));
        assert!(Cli::try_parse_from(["seqviewer", "a.fas", "-f", "b.fas"]).is_err());
    }
}
