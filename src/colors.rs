// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

//! Residue colours.
//!
//! Nucleotides use a fixed map (A, T, G, C and the gap). Amino acids get colours sampled evenly
//! from a named palette, in the fixed order of `AMINO_ACIDS`; the gap and the unknown residue are
//! white. The same residue and palette always yield the same colour.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use hex_color::HexColor;
use ratatui::style::Color;
use thiserror::Error;

use crate::alignment::Alphabet;

pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";
pub const GAP: char = '-';
pub const UNKNOWN_RESIDUE: char = 'X';
pub const DEFAULT_PALETTE: &str = "tab20";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Unknown palette '{0}'")]
    UnknownPalette(String),
    #[error("Palette '{0}' has no colours")]
    EmptyPalette(String),
    #[error("Palette '{palette}': invalid colour '{value}'")]
    InvalidColor { palette: String, value: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NamedColor {
    Red,
    Green,
    Orange,
    Blue,
    White,
}

impl NamedColor {
    pub fn name(&self) -> &'static str {
        match self {
            NamedColor::Red => "red",
            NamedColor::Green => "green",
            NamedColor::Orange => "orange",
            NamedColor::Blue => "blue",
            NamedColor::White => "white",
        }
    }

    // CSS values
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            NamedColor::Red => (255, 0, 0),
            NamedColor::Green => (0, 128, 0),
            NamedColor::Orange => (255, 165, 0),
            NamedColor::Blue => (0, 0, 255),
            NamedColor::White => (255, 255, 255),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorToken {
    Named(NamedColor),
    Hex(HexColor),
}

impl ColorToken {
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            ColorToken::Named(named) => named.rgb(),
            ColorToken::Hex(hex) => (hex.r, hex.g, hex.b),
        }
    }
}

// CSS form: the colour name, or #rrggbb.
impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorToken::Named(named) => write!(f, "{}", named.name()),
            ColorToken::Hex(hex) => write!(f, "#{:02x}{:02x}{:02x}", hex.r, hex.g, hex.b),
        }
    }
}

impl From<ColorToken> for Color {
    fn from(token: ColorToken) -> Self {
        let (r, g, b) = token.rgb();
        Color::Rgb(r, g, b)
    }
}

const WHITE: ColorToken = ColorToken::Named(NamedColor::White);

pub fn nucleotide_color(residue: char) -> Option<ColorToken> {
    let named = match residue.to_ascii_uppercase() {
        'A' => NamedColor::Red,
        'T' => NamedColor::Green,
        'G' => NamedColor::Orange,
        'C' => NamedColor::Blue,
        GAP => NamedColor::White,
        _ => return None,
    };
    Some(ColorToken::Named(named))
}

// Qualitative palettes, as 0xRRGGBB.
const BUILTIN_PALETTES: &[(&str, &[u32])] = &[
    (
        "tab20",
        &[
            0x1f77b4, 0xaec7e8, 0xff7f0e, 0xffbb78, 0x2ca02c, 0x98df8a, 0xd62728, 0xff9896,
            0x9467bd, 0xc5b0d5, 0x8c564b, 0xc49c94, 0xe377c2, 0xf7b6d2, 0x7f7f7f, 0xc7c7c7,
            0xbcbd22, 0xdbdb8d, 0x17becf, 0x9edae5,
        ],
    ),
    (
        "tab10",
        &[
            0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f,
            0xbcbd22, 0x17becf,
        ],
    ),
    (
        "Set3",
        &[
            0x8dd3c7, 0xffffb3, 0xbebada, 0xfb8072, 0x80b1d3, 0xfdb462, 0xb3de69, 0xfccde5,
            0xd9d9d9, 0xbc80bd, 0xccebc5, 0xffed6f,
        ],
    ),
    (
        "Paired",
        &[
            0xa6cee3, 0x1f78b4, 0xb2df8a, 0x33a02c, 0xfb9a99, 0xe31a1c, 0xfdbf6f, 0xff7f00,
            0xcab2d6, 0x6a3d9a, 0xffff99, 0xb15928,
        ],
    ),
    (
        "Dark2",
        &[
            0x1b9e77, 0xd95f02, 0x7570b3, 0xe7298a, 0x66a61e, 0xe6ab02, 0xa6761d, 0x666666,
        ],
    ),
    (
        "Pastel1",
        &[
            0xfbb4ae, 0xb3cde3, 0xccebc5, 0xdecbe4, 0xfed9a6, 0xffffcc, 0xe5d8bd, 0xfddaec,
            0xf2f2f2,
        ],
    ),
];

fn hex_from_u32(rgb: u32) -> HexColor {
    HexColor::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<HexColor>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<HexColor>) -> Result<Self, ColorError> {
        let name = name.into();
        if colors.is_empty() {
            return Err(ColorError::EmptyPalette(name));
        }
        Ok(Palette { name, colors })
    }

    pub fn from_hex_strings(name: &str, values: &[String]) -> Result<Self, ColorError> {
        let colors = values
            .iter()
            .map(|v| {
                HexColor::parse(v.trim()).map_err(|_| ColorError::InvalidColor {
                    palette: name.to_string(),
                    value: v.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Palette::new(name, colors)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[HexColor] {
        &self.colors
    }

    /// `n` colours taken at evenly spaced positions over the palette, first and last included.
    pub fn sample(&self, n: usize) -> Vec<HexColor> {
        let m = self.colors.len();
        (0..n)
            .map(|i| {
                let idx = if n <= 1 { 0 } else { (i * m / (n - 1)).min(m - 1) };
                self.colors[idx]
            })
            .collect()
    }
}

/// Named palettes: the built-in ones, plus any defined by the user.
#[derive(Clone, Debug)]
pub struct Palettes {
    palettes: BTreeMap<String, Palette>,
}

impl Default for Palettes {
    fn default() -> Self {
        Palettes::builtin()
    }
}

impl Palettes {
    pub fn builtin() -> Self {
        let palettes = BUILTIN_PALETTES
            .iter()
            .map(|(name, values)| {
                let palette = Palette {
                    name: name.to_string(),
                    colors: values.iter().copied().map(hex_from_u32).collect(),
                };
                (name.to_string(), palette)
            })
            .collect();
        Palettes { palettes }
    }

    // User palettes shadow built-in ones of the same name.
    pub fn with_user(user: &BTreeMap<String, Vec<String>>) -> Result<Self, ColorError> {
        let mut palettes = Palettes::builtin();
        for (name, values) in user {
            palettes.add(Palette::from_hex_strings(name, values)?);
        }
        Ok(palettes)
    }

    pub fn add(&mut self, palette: Palette) {
        self.palettes.insert(palette.name.clone(), palette);
    }

    pub fn get(&self, name: &str) -> Result<&Palette, ColorError> {
        self.palettes
            .get(name)
            .ok_or_else(|| ColorError::UnknownPalette(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.palettes.keys().map(String::as_str)
    }
}

/// Maps residues to colours for one palette. Build once per render.
#[derive(Clone, Debug)]
pub struct Colorizer {
    amino: HashMap<char, ColorToken>,
}

impl Colorizer {
    pub fn new(palette: &Palette) -> Self {
        let mut amino: HashMap<char, ColorToken> = AMINO_ACIDS
            .chars()
            .zip(palette.sample(AMINO_ACIDS.len()))
            .map(|(aa, color)| (aa, ColorToken::Hex(color)))
            .collect();
        amino.insert(GAP, WHITE);
        amino.insert(UNKNOWN_RESIDUE, WHITE);
        Colorizer { amino }
    }

    pub fn from_palette_name(name: &str, palettes: &Palettes) -> Result<Self, ColorError> {
        Ok(Colorizer::new(palettes.get(name)?))
    }

    // Nucleotide map first (for nucleotide alignments), then the amino-acid map; anything else
    // gets the unknown-residue colour.
    pub fn color(&self, residue: char, alphabet: Alphabet) -> ColorToken {
        let residue = residue.to_ascii_uppercase();
        if alphabet == Alphabet::Nucleotide {
            if let Some(color) = nucleotide_color(residue) {
                return color;
            }
        }
        self.amino
            .get(&residue)
            .or_else(|| self.amino.get(&UNKNOWN_RESIDUE))
            .copied()
            .unwrap_or(WHITE)
    }

    pub fn amino_acid_colors(&self) -> &HashMap<char, ColorToken> {
        &self.amino
    }
}

pub fn residue_color(
    residue: char,
    palette: &str,
    alphabet: Alphabet,
    palettes: &Palettes,
) -> Result<ColorToken, ColorError> {
    Ok(Colorizer::from_palette_name(palette, palettes)?.color(residue, alphabet))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> ColorToken {
        ColorToken::Hex(HexColor::parse(s).unwrap())
    }

    #[test]
    fn test_nucleotide_map() {
        let palettes = Palettes::builtin();
        let c = Colorizer::from_palette_name("tab20", &palettes).unwrap();
        assert_eq!(c.color('A', Alphabet::Nucleotide).to_string(), "red");
        assert_eq!(c.color('t', Alphabet::Nucleotide).to_string(), "green");
        assert_eq!(c.color('G', Alphabet::Nucleotide).to_string(), "orange");
        assert_eq!(c.color('C', Alphabet::Nucleotide).to_string(), "blue");
        assert_eq!(c.color('-', Alphabet::Nucleotide).to_string(), "white");
    }

    #[test]
    fn test_amino_acid_map_tab20() {
        let palettes = Palettes::builtin();
        let c = Colorizer::from_palette_name("tab20", &palettes).unwrap();
        assert_eq!(c.color('A', Alphabet::Protein), hex("#1f77b4"));
        assert_eq!(c.color('C', Alphabet::Protein), hex("#aec7e8"));
        assert_eq!(c.color('Y', Alphabet::Protein), hex("#9edae5"));
        assert_eq!(c.color('-', Alphabet::Protein).to_string(), "white");
        assert_eq!(c.color('X', Alphabet::Protein).to_string(), "white");
        // Residues outside the alphabet get the unknown-residue colour
        assert_eq!(c.color('B', Alphabet::Protein).to_string(), "white");
        assert_eq!(c.amino_acid_colors().len(), 22);
    }

    #[test]
    fn test_nucleotide_alphabet_falls_back_to_amino_map() {
        let palettes = Palettes::builtin();
        let c = Colorizer::from_palette_name("tab20", &palettes).unwrap();
        // 'N' is not in the nucleotide map; amino-acid 'N' is the 12th symbol
        assert_eq!(c.color('N', Alphabet::Nucleotide), hex("#c49c94"));
        // In a protein alignment, 'A' is alanine
        assert_ne!(c.color('A', Alphabet::Protein).to_string(), "red");
    }

    #[test]
    fn test_colors_are_deterministic() {
        let palettes = Palettes::builtin();
        for name in ["tab20", "tab10", "Set3", "Dark2"] {
            for aa in AMINO_ACIDS.chars() {
                let first = residue_color(aa, name, Alphabet::Protein, &palettes).unwrap();
                let second = residue_color(aa, name, Alphabet::Protein, &palettes).unwrap();
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_sample_small_palette() {
        let palettes = Palettes::builtin();
        let tab10 = palettes.get("tab10").unwrap();
        let sampled = tab10.sample(20);
        assert_eq!(sampled.len(), 20);
        assert_eq!(sampled[0], tab10.colors()[0]);
        assert_eq!(sampled[19], tab10.colors()[9]);
        let tab20 = palettes.get("tab20").unwrap();
        assert_eq!(tab20.sample(20), tab20.colors());
        assert_eq!(tab20.sample(1), vec![tab20.colors()[0]]);
    }

    #[test]
    fn test_unknown_palette() {
        let palettes = Palettes::builtin();
        assert_eq!(
            residue_color('A', "viridian", Alphabet::Protein, &palettes).unwrap_err(),
            ColorError::UnknownPalette(String::from("viridian"))
        );
    }

    #[test]
    fn test_user_palettes() {
        let mut user = BTreeMap::new();
        user.insert(String::from("mono"), vec![String::from("#000000")]);
        let palettes = Palettes::with_user(&user).unwrap();
        assert!(palettes.names().any(|n| n == "mono"));
        let c = Colorizer::from_palette_name("mono", &palettes).unwrap();
        assert_eq!(c.color('W', Alphabet::Protein), hex("#000000"));

        user.insert(String::from("bad"), vec![String::from("not-a-colour")]);
        assert!(matches!(
            Palettes::with_user(&user),
            Err(ColorError::InvalidColor { .. })
        ));

        user.remove("bad");
        user.insert(String::from("empty"), vec![]);
        assert_eq!(
            Palettes::with_user(&user).unwrap_err(),
            ColorError::EmptyPalette(String::from("empty"))
        );
    }

    #[test]
    fn test_token_to_ratatui_color() {
        assert_eq!(Color::from(hex("#1f77b4")), Color::Rgb(0x1f, 0x77, 0xb4));
        assert_eq!(
            Color::from(ColorToken::Named(NamedColor::Orange)),
            Color::Rgb(255, 165, 0)
        );
    }
}
