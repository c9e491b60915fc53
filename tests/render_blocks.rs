// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

mod common;

use crate::common::utils;

use seqviewer::{
    colors::Palettes,
    diff::encode_diff,
    render::{
        chunks::{chunks, Chunk},
        render_plain, render_text,
        svg::text_to_buffer,
        DisplayMode, RenderOptions,
    },
};

#[test]
fn three_by_120_gives_two_blocks() {
    let aln = utils::load("data/three-120.fas");
    assert_eq!(aln.num_seq(), 3);
    assert_eq!(aln.aln_len(), 120);
    let blocks: Vec<Chunk> = chunks(aln.aln_len(), 60).collect();
    assert_eq!(
        blocks,
        vec![Chunk { start: 0, end: 60 }, Chunk { start: 60, end: 120 }]
    );

    let text = render_plain(&aln, &utils::narrow_labels(4)).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(
        lines[0],
        "      1         11        21        31        41        51"
    );
    assert_eq!(
        lines[4],
        "      61        71        81        91        101       111"
    );
    assert!(lines[1].starts_with("  ref ACGTACGT"));
    assert!(!text.ends_with('\n'));
}

#[test]
fn difference_mode_shows_only_changes() {
    let aln = utils::load("data/three-120.fas");
    let opts = RenderOptions {
        mode: DisplayMode::Difference,
        placeholder: '.',
        ..utils::narrow_labels(4)
    };
    let text = render_plain(&aln, &opts).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    let dots = |n: usize| ".".repeat(n);
    // Reference rows are shown in full
    assert_eq!(lines[1], format!("  ref {}", "ACGT".repeat(15)));
    assert_eq!(lines[2], format!(" var1 ....T{}", dots(55)));
    assert_eq!(lines[3], format!(" var2 G{}", dots(59)));
    assert_eq!(lines[6], format!(" var1 {}-{}", dots(10), dots(49)));
    assert_eq!(lines[7], format!(" var2 {}A", dots(59)));
}

#[test]
fn self_diff_is_all_placeholders() {
    let aln = utils::load("data/three-120.fas");
    for rec in aln.records() {
        let diff = encode_diff(&rec.sequence, &rec.sequence, '-').unwrap();
        assert_eq!(diff, "-".repeat(120));
    }
}

#[test]
fn coloured_text_has_the_plain_layout() {
    let aln = utils::load("data/small.sto");
    let opts = RenderOptions {
        chunk_width: 20,
        ..utils::narrow_labels(10)
    };
    let plain = render_plain(&aln, &opts).unwrap();
    let text = render_text(&aln, &opts, &Palettes::builtin()).unwrap();
    let drawn = utils::buffer_text(&text_to_buffer(&text));
    let expected: Vec<&str> = plain.lines().map(str::trim_end).collect();
    assert_eq!(drawn, expected.join("\n"));
}
