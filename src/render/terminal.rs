// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{self as ct, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use ratatui::{style::Color, text::Text};

/// Prints styled text with ANSI escapes, one line per `Line`. Unstyled spans are printed as-is.
pub fn print_text<W: Write>(out: &mut W, text: &Text<'_>) -> io::Result<()> {
    for line in &text.lines {
        for span in &line.spans {
            let fg = span.style.fg.and_then(to_crossterm);
            let bg = span.style.bg.and_then(to_crossterm);
            if let Some(fg) = fg {
                queue!(out, SetForegroundColor(fg))?;
            }
            if let Some(bg) = bg {
                queue!(out, SetBackgroundColor(bg))?;
            }
            queue!(out, Print(&span.content))?;
            if fg.is_some() || bg.is_some() {
                queue!(out, ResetColor)?;
            }
        }
        queue!(out, Print("\n"))?;
    }
    out.flush()
}

pub fn to_crossterm(color: Color) -> Option<ct::Color> {
    let c = match color {
        Color::Reset => return None,
        Color::Rgb(r, g, b) => ct::Color::Rgb { r, g, b },
        Color::Indexed(i) => ct::Color::AnsiValue(i),
        Color::Black => ct::Color::Black,
        Color::Red => ct::Color::DarkRed,
        Color::Green => ct::Color::DarkGreen,
        Color::Yellow => ct::Color::DarkYellow,
        Color::Blue => ct::Color::DarkBlue,
        Color::Magenta => ct::Color::DarkMagenta,
        Color::Cyan => ct::Color::DarkCyan,
        Color::Gray => ct::Color::Grey,
        Color::DarkGray => ct::Color::DarkGrey,
        Color::LightRed => ct::Color::Red,
        Color::LightGreen => ct::Color::Green,
        Color::LightYellow => ct::Color::Yellow,
        Color::LightBlue => ct::Color::Blue,
        Color::LightMagenta => ct::Color::Magenta,
        Color::LightCyan => ct::Color::Cyan,
        Color::White => ct::Color::White,
    };
    Some(c)
}
