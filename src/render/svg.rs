// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use ratatui::{
    buffer::{Buffer, Cell},
    prelude::{Position, Rect},
    style::Color,
    text::Text,
    widgets::{Paragraph, Widget},
};

use crate::{
    alignment::Alignment,
    colors::Palettes,
    render::{render_text, RenderError, RenderOptions},
};

const FONT_SIZE: u16 = 14;
const CELL_WIDTH: u32 = 8;
const CELL_HEIGHT: u32 = 16;

pub fn render_svg(
    aln: &Alignment,
    opts: &RenderOptions,
    palettes: &Palettes,
) -> Result<String, RenderError> {
    let text = render_text(aln, opts, palettes)?;
    Ok(buffer_to_svg(&text_to_buffer(&text)))
}

/// Draws the text into a buffer just large enough to hold it.
pub fn text_to_buffer(text: &Text<'static>) -> Buffer {
    let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
    let height = u16::try_from(text.height()).unwrap_or(u16::MAX);
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    Paragraph::new(text.clone()).render(area, &mut buf);
    buf
}

pub fn buffer_to_svg(buf: &Buffer) -> String {
    let area = buf.area;
    let width_px = area.width as u32 * CELL_WIDTH;
    let height_px = area.height as u32 * CELL_HEIGHT;
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n",
        width_px, height_px, width_px, height_px
    ));
    out.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    out.push_str(&format!(
        "<g font-family=\"monospace\" font-size=\"{}\" dominant-baseline=\"hanging\">\n",
        FONT_SIZE
    ));

    for y in 0..area.height {
        for x in 0..area.width {
            let Some(cell) = buf.cell(Position::from((x, y))) else {
                continue;
            };
            let x_px = x as u32 * CELL_WIDTH;
            let y_px = y as u32 * CELL_HEIGHT;
            if let Some(bg) = color_to_rgb(cell.bg) {
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
                    x_px,
                    y_px,
                    CELL_WIDTH,
                    CELL_HEIGHT,
                    css_hex(bg)
                ));
            }
            let ch = cell.symbol().chars().next().unwrap_or(' ');
            if ch == ' ' {
                continue;
            }
            out.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" fill=\"{}\">{}</text>\n",
                x_px,
                y_px,
                css_hex(text_color(cell)),
                escape_svg_char(ch)
            ));
        }
    }

    out.push_str("</g>\n</svg>\n");
    out
}

// Unstyled cells are black on the white page.
fn text_color(cell: &Cell) -> (u8, u8, u8) {
    color_to_rgb(cell.fg).unwrap_or((0, 0, 0))
}

fn css_hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::Black => Some((0, 0, 0)),
        Color::White => Some((255, 255, 255)),
        Color::Gray => Some((128, 128, 128)),
        Color::DarkGray => Some((64, 64, 64)),
        Color::Red => Some((255, 0, 0)),
        Color::Green => Some((0, 255, 0)),
        Color::Blue => Some((0, 0, 255)),
        Color::Yellow => Some((255, 255, 0)),
        _ => None,
    }
}

fn escape_svg_char(ch: char) -> String {
    match ch {
        '&' => String::from("&amp;"),
        '<' => String::from("&lt;"),
        '>' => String::from("&gt;"),
        '"' => String::from("&quot;"),
        '\'' => String::from("&#39;"),
        _ => ch.to_string(),
    }
}
