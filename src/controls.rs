// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

//! User-adjustable options.
//!
//! Each control carries its own typed value, so reading or writing one never needs to inspect
//! what kind of input it is backed by.

use std::fmt;

use thiserror::Error;

use crate::render::{DisplayMode, RenderOptions, VideoMode};

pub const FORMAT: &str = "format";
pub const CHUNK_WIDTH: &str = "chunk_width";
pub const OFFSET: &str = "offset";
pub const STRIDE: &str = "stride";
pub const PALETTE: &str = "palette";
pub const PLACEHOLDER: &str = "placeholder";
pub const INVERSE: &str = "inverse";

const MAX_CHUNK_WIDTH: i64 = 1000;
const MAX_STRIDE: i64 = 100;

const DISPLAY_MODES: [DisplayMode; 3] = [
    DisplayMode::Plain,
    DisplayMode::Residue,
    DisplayMode::Difference,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlError {
    #[error("No option named '{0}'")]
    UnknownKey(String),
    #[error("Option '{key}' expects a {expected} value")]
    TypeMismatch { key: String, expected: &'static str },
    #[error("Invalid value '{value}' for option '{key}'")]
    Invalid { key: String, value: String },
    #[error("Value {value} for option '{key}' is outside [{min}, {max}]")]
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlValue {
    Text(String),
    Boolean(bool),
    Number(i64),
}

impl fmt::Display for ControlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlValue::Text(s) => write!(f, "{}", s),
            ControlValue::Boolean(b) => write!(f, "{}", b),
            ControlValue::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Control {
    Text(String),
    Choice { options: Vec<String>, selected: usize },
    Boolean(bool),
    Numeric(i64),
    Slider { min: i64, max: i64, value: i64 },
}

impl Control {
    pub fn choice(options: &[&str], selected: &str) -> Control {
        let options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
        let selected = options.iter().position(|o| o == selected).unwrap_or(0);
        Control::Choice { options, selected }
    }

    pub fn value(&self) -> ControlValue {
        match self {
            Control::Text(s) => ControlValue::Text(s.clone()),
            Control::Choice { options, selected } => {
                ControlValue::Text(options.get(*selected).cloned().unwrap_or_default())
            }
            Control::Boolean(b) => ControlValue::Boolean(*b),
            Control::Numeric(n) => ControlValue::Number(*n),
            Control::Slider { value, .. } => ControlValue::Number(*value),
        }
    }

    fn set(&mut self, key: &str, value: ControlValue) -> Result<(), ControlError> {
        let mismatch = |expected| ControlError::TypeMismatch {
            key: key.to_string(),
            expected,
        };
        match (self, value) {
            (Control::Text(s), ControlValue::Text(v)) => *s = v,
            (Control::Choice { options, selected }, ControlValue::Text(v)) => {
                *selected = options
                    .iter()
                    .position(|o| *o == v)
                    .ok_or_else(|| ControlError::Invalid {
                        key: key.to_string(),
                        value: v.clone(),
                    })?;
            }
            (Control::Boolean(b), ControlValue::Boolean(v)) => *b = v,
            (Control::Numeric(n), ControlValue::Number(v)) => *n = v,
            (Control::Slider { min, max, value }, ControlValue::Number(v)) => {
                if v < *min || v > *max {
                    return Err(ControlError::OutOfRange {
                        key: key.to_string(),
                        value: v,
                        min: *min,
                        max: *max,
                    });
                }
                *value = v;
            }
            (Control::Text(_) | Control::Choice { .. }, _) => return Err(mismatch("text")),
            (Control::Boolean(_), _) => return Err(mismatch("boolean")),
            (Control::Numeric(_) | Control::Slider { .. }, _) => return Err(mismatch("numeric")),
        }
        Ok(())
    }
}

/// Controls in insertion order, addressed by key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlSet {
    controls: Vec<(String, Control)>,
}

impl ControlSet {
    pub fn new() -> Self {
        ControlSet::default()
    }

    // Replaces any control with the same key, keeping its position.
    pub fn insert(&mut self, key: &str, control: Control) {
        match self.controls.iter_mut().find(|(k, _)| k == key) {
            Some((_, c)) => *c = control,
            None => self.controls.push((key.to_string(), control)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Control> {
        self.controls.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn value(&self, key: &str) -> Result<ControlValue, ControlError> {
        self.get(key)
            .map(Control::value)
            .ok_or_else(|| ControlError::UnknownKey(key.to_string()))
    }

    pub fn set(&mut self, key: &str, value: ControlValue) -> Result<(), ControlError> {
        let (_, control) = self
            .controls
            .iter_mut()
            .find(|(k, _)| k == key)
            .ok_or_else(|| ControlError::UnknownKey(key.to_string()))?;
        control.set(key, value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.controls.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> Vec<(String, ControlValue)> {
        self.controls
            .iter()
            .map(|(k, c)| (k.clone(), c.value()))
            .collect()
    }

    /// Sets several values at once. If any of them is rejected, none is applied.
    pub fn set_values<I>(&mut self, values: I) -> Result<(), ControlError>
    where
        I: IntoIterator<Item = (String, ControlValue)>,
    {
        let mut updated = self.clone();
        for (key, value) in values {
            updated.set(&key, value)?;
        }
        *self = updated;
        Ok(())
    }
}

/// The display options as controls.
pub fn render_controls<'a>(
    opts: &RenderOptions,
    palette_names: impl IntoIterator<Item = &'a str>,
) -> ControlSet {
    let modes: Vec<String> = DISPLAY_MODES.iter().map(|m| m.to_string()).collect();
    let mode_refs: Vec<&str> = modes.iter().map(String::as_str).collect();
    let palettes: Vec<&str> = palette_names.into_iter().collect();
    // Options from the command line or config may lie outside the usual slider range.
    let chunk_width = i64::try_from(opts.chunk_width).unwrap_or(i64::MAX);
    let stride = i64::try_from(opts.stride).unwrap_or(i64::MAX);

    let mut set = ControlSet::new();
    set.insert(FORMAT, Control::choice(&mode_refs, &opts.mode.to_string()));
    set.insert(
        CHUNK_WIDTH,
        Control::Slider {
            min: 0,
            max: chunk_width.max(MAX_CHUNK_WIDTH),
            value: chunk_width,
        },
    );
    set.insert(OFFSET, Control::Numeric(opts.offset));
    set.insert(
        STRIDE,
        Control::Slider {
            min: stride.min(1),
            max: stride.max(MAX_STRIDE),
            value: stride,
        },
    );
    set.insert(PALETTE, Control::choice(&palettes, &opts.palette));
    set.insert(PLACEHOLDER, Control::Text(opts.placeholder.to_string()));
    set.insert(INVERSE, Control::Boolean(opts.video_mode == VideoMode::Inverse));
    set
}

/// Copies control values back into the options. Keys absent from the set are left alone.
pub fn apply_render_controls(
    opts: &mut RenderOptions,
    set: &ControlSet,
) -> Result<(), ControlError> {
    let mut updated = opts.clone();
    for (key, value) in set.values() {
        match (key.as_str(), value) {
            (FORMAT, ControlValue::Text(v)) => {
                updated.mode = DISPLAY_MODES
                    .iter()
                    .copied()
                    .find(|m| m.to_string() == v)
                    .ok_or(ControlError::Invalid {
                        key: key.clone(),
                        value: v,
                    })?;
            }
            (CHUNK_WIDTH, ControlValue::Number(n)) => {
                updated.chunk_width = non_negative(&key, n)?;
            }
            (OFFSET, ControlValue::Number(n)) => updated.offset = n,
            (STRIDE, ControlValue::Number(n)) => {
                updated.stride = non_negative(&key, n)?;
            }
            (PALETTE, ControlValue::Text(v)) => updated.palette = v,
            (PLACEHOLDER, ControlValue::Text(v)) => {
                let mut chars = v.chars();
                updated.placeholder = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => return Err(ControlError::Invalid {
                        key: key.clone(),
                        value: v,
                    }),
                };
            }
            (INVERSE, ControlValue::Boolean(b)) => {
                updated.video_mode = if b {
                    VideoMode::Inverse
                } else {
                    VideoMode::Direct
                };
            }
            (FORMAT | PALETTE | PLACEHOLDER, _) => {
                return Err(ControlError::TypeMismatch {
                    key: key.clone(),
                    expected: "text",
                })
            }
            (CHUNK_WIDTH | OFFSET | STRIDE, _) => {
                return Err(ControlError::TypeMismatch {
                    key: key.clone(),
                    expected: "numeric",
                })
            }
            (INVERSE, _) => {
                return Err(ControlError::TypeMismatch {
                    key: key.clone(),
                    expected: "boolean",
                })
            }
            _ => return Err(ControlError::UnknownKey(key.clone())),
        }
    }
    *opts = updated;
    Ok(())
}

fn non_negative(key: &str, n: i64) -> Result<usize, ControlError> {
    usize::try_from(n).map_err(|_| ControlError::OutOfRange {
        key: key.to_string(),
        value: n,
        min: 0,
        max: i64::MAX,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palettes() -> Vec<&'static str> {
        vec!["tab20", "tab10", "Set3"]
    }

    #[test]
    fn test_render_controls_reflect_options() {
        let set = render_controls(&RenderOptions::default(), palettes());
        assert_eq!(
            set.keys().collect::<Vec<_>>(),
            vec![FORMAT, CHUNK_WIDTH, OFFSET, STRIDE, PALETTE, PLACEHOLDER, INVERSE]
        );
        assert_eq!(
            set.value(FORMAT).unwrap(),
            ControlValue::Text(String::from("color by residue"))
        );
        assert_eq!(set.value(CHUNK_WIDTH).unwrap(), ControlValue::Number(60));
        assert_eq!(set.value(PALETTE).unwrap(), ControlValue::Text(String::from("tab20")));
        assert_eq!(set.value(INVERSE).unwrap(), ControlValue::Boolean(true));
    }

    #[test]
    fn test_set_and_apply() {
        let mut opts = RenderOptions::default();
        let mut set = render_controls(&opts, palettes());
        set.set(FORMAT, ControlValue::Text(String::from("color by difference")))
            .unwrap();
        set.set(OFFSET, ControlValue::Number(-5)).unwrap();
        set.set(PALETTE, ControlValue::Text(String::from("Set3")))
            .unwrap();
        set.set(PLACEHOLDER, ControlValue::Text(String::from(".")))
            .unwrap();
        set.set(INVERSE, ControlValue::Boolean(false)).unwrap();
        apply_render_controls(&mut opts, &set).unwrap();
        assert_eq!(opts.mode, DisplayMode::Difference);
        assert_eq!(opts.offset, -5);
        assert_eq!(opts.palette, "Set3");
        assert_eq!(opts.placeholder, '.');
        assert_eq!(opts.video_mode, VideoMode::Direct);
        assert_eq!(opts.chunk_width, 60);
    }

    #[test]
    fn test_set_rejections() {
        let mut set = render_controls(&RenderOptions::default(), palettes());
        assert_eq!(
            set.set("zoom", ControlValue::Number(2)).unwrap_err(),
            ControlError::UnknownKey(String::from("zoom"))
        );
        assert_eq!(
            set.set(STRIDE, ControlValue::Boolean(true)).unwrap_err(),
            ControlError::TypeMismatch {
                key: String::from(STRIDE),
                expected: "numeric"
            }
        );
        assert!(matches!(
            set.set(STRIDE, ControlValue::Number(0)),
            Err(ControlError::OutOfRange { min: 1, .. })
        ));
        assert!(matches!(
            set.set(PALETTE, ControlValue::Text(String::from("viridis"))),
            Err(ControlError::Invalid { .. })
        ));
    }

    #[test]
    fn test_set_values_is_all_or_nothing() {
        let mut set = render_controls(&RenderOptions::default(), palettes());
        let before = set.clone();
        let res = set.set_values(vec![
            (String::from(OFFSET), ControlValue::Number(3)),
            (String::from(INVERSE), ControlValue::Number(1)),
        ]);
        assert!(res.is_err());
        assert_eq!(set, before);

        set.set_values(vec![(String::from(OFFSET), ControlValue::Number(3))])
            .unwrap();
        assert_eq!(set.value(OFFSET).unwrap(), ControlValue::Number(3));
    }

    #[test]
    fn test_unchanged_controls_keep_large_options() {
        let mut opts = RenderOptions {
            chunk_width: 2000,
            stride: 250,
            ..RenderOptions::default()
        };
        let set = render_controls(&opts, palettes());
        assert_eq!(set.value(CHUNK_WIDTH).unwrap(), ControlValue::Number(2000));
        assert_eq!(set.value(STRIDE).unwrap(), ControlValue::Number(250));
        let before = opts.clone();
        apply_render_controls(&mut opts, &set).unwrap();
        assert_eq!(opts, before);

        let mut set = set;
        assert!(matches!(
            set.set(CHUNK_WIDTH, ControlValue::Number(2001)),
            Err(ControlError::OutOfRange { max: 2000, .. })
        ));
    }

    #[test]
    fn test_apply_rejects_long_placeholder() {
        let mut opts = RenderOptions::default();
        let mut set = render_controls(&opts, palettes());
        set.set(PLACEHOLDER, ControlValue::Text(String::from("..")))
            .unwrap();
        assert!(matches!(
            apply_render_controls(&mut opts, &set),
            Err(ControlError::Invalid { .. })
        ));
        assert_eq!(opts.placeholder, '-');
    }
}
