// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use crate::{
    alignment::Alignment,
    colors::{Colorizer, Palettes},
    render::{layout, DisplayMode, RenderError, RenderOptions},
};

/// Renders the alignment as a `<pre>` block, each coloured residue wrapped in a span with a
/// background colour.
pub fn render_html(
    aln: &Alignment,
    opts: &RenderOptions,
    palettes: &Palettes,
) -> Result<String, RenderError> {
    let colorizer = Colorizer::from_palette_name(&opts.palette, palettes)?;
    let alphabet = aln.alphabet();
    let width = opts.label_width + 1;
    let mut out = String::from("<pre style=\"font-family: monospace;\">\n");

    for rc in layout(aln, opts)? {
        out.push_str(&format!("{:width$} {}\n", "", rc.header));
        for row in &rc.rows {
            out.push_str(&escape_html(&format!("{:>width$} ", row.label)));
            for c in row.residues.chars() {
                let is_placeholder = opts.mode == DisplayMode::Difference
                    && !row.is_reference
                    && c == opts.placeholder;
                if opts.colored() && !is_placeholder {
                    out.push_str(&format!(
                        "<span style=\"background-color:{};\">{}</span>",
                        colorizer.color(c, alphabet),
                        escape_html(&c.to_string())
                    ));
                } else {
                    out.push_str(&escape_html(&c.to_string()));
                }
            }
            out.push('\n');
        }
    }

    out.push_str("</pre>\n");
    Ok(out)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
