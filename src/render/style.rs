// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use ratatui::style::{Color, Style};

use crate::{colors::ColorToken, render::VideoMode};

pub fn get_residue_style(video_mode: VideoMode, color: ColorToken) -> Style {
    let color = Color::from(color);
    match video_mode {
        VideoMode::Direct => Style::default().fg(color),
        VideoMode::Inverse => Style::default().fg(Color::Black).bg(color),
    }
}
