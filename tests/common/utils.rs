// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::path::{Path, PathBuf};

use ratatui::{buffer::Buffer, prelude::Position};

use seqviewer::{
    alignment::Alignment,
    render::RenderOptions,
    seq::file::read_seq_file,
};

#[allow(dead_code)]
pub fn load(path: &str) -> Alignment {
    let records = read_seq_file(path, None).expect("Test file not found");
    Alignment::new(records).expect("Test file is not aligned")
}

#[allow(dead_code)]
pub fn narrow_labels(label_width: usize) -> RenderOptions {
    RenderOptions {
        label_width,
        ..RenderOptions::default()
    }
}

// One line per buffer row, trailing blanks removed.
#[allow(dead_code)]
pub fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut lines: Vec<String> = Vec::new();
    for y in 0..area.height {
        let mut line = String::new();
        for x in 0..area.width {
            line.push(
                buf.cell(Position::from((x, y)))
                    .expect("Wrong position")
                    .symbol()
                    .chars()
                    .next()
                    .unwrap_or(' '),
            );
        }
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

#[cfg(unix)]
#[allow(dead_code)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}
