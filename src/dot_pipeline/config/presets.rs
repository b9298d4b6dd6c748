//! Named presets
//!
//! Presets are stored in the units the controls use: percent integers for the
//! multiplicative factors and dot size, pixels for blur, percent for zoom.
//! They convert into a [`ProcessConfig`] plus a dot size fraction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dot_pipeline::common::error::{PipelineError, Result};
use crate::dot_pipeline::config::types::{GridConfig, ProcessConfig, DEFAULT_COLS, DEFAULT_ROWS};
use crate::dot_pipeline::quantize::OutputMode;

const CUSTOM_ID_PREFIX: &str = "custom_";
const MAX_SLUG_LEN: usize = 30;
const MAX_NAME_LEN: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSnapshot {
    pub output_mode: OutputMode,
    pub threshold: i32,
    pub brightness: i32,
    pub contrast: i32,
    pub gamma: i32,
    pub saturation: i32,
    pub blur: i32,
    pub sharpen: i32,
    pub noise: i32,
    pub zoom: i32,
    pub cols: i32,
    pub rows: i32,
    pub dot_size: i32,
    pub dither: bool,
    pub invert: bool,
    pub color_mode: bool,
    #[serde(rename = "flipH")]
    pub flip_h: bool,
    #[serde(rename = "flipV")]
    pub flip_v: bool,
    pub smooth: i32,
    pub post_contrast: i32,
}

const BASE: PresetSnapshot = PresetSnapshot {
    output_mode: OutputMode::Levels(8),
    threshold: 128,
    brightness: 0,
    contrast: 100,
    gamma: 100,
    saturation: 100,
    blur: 0,
    sharpen: 0,
    noise: 0,
    zoom: 100,
    cols: DEFAULT_COLS as i32,
    rows: DEFAULT_ROWS as i32,
    dot_size: 45,
    dither: false,
    invert: false,
    color_mode: false,
    flip_h: false,
    flip_v: false,
    smooth: 0,
    post_contrast: 100,
};

impl Default for PresetSnapshot {
    fn default() -> Self {
        BASE
    }
}

fn percent(value: i32) -> f64 {
    f64::from(value) / 100.0
}

fn to_percent(value: f64) -> i32 {
    (value * 100.0).round() as i32
}

fn int_field(object: Option<&Map<String, Value>>, key: &str) -> Option<i32> {
    let value = object?.get(key)?;
    let number = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    }?;
    i32::try_from(number).ok()
}

fn bool_field(object: Option<&Map<String, Value>>, key: &str) -> Option<bool> {
    object?.get(key)?.as_bool()
}

fn output_mode_field(object: Option<&Map<String, Value>>, key: &str) -> Option<OutputMode> {
    match object?.get(key)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n
            .as_u64()
            .and_then(|levels| u32::try_from(levels).ok())
            .and_then(OutputMode::from_levels),
        _ => None,
    }
}

impl PresetSnapshot {
    /// Reads a snapshot from loosely typed JSON. Missing or malformed fields take their default.
    pub fn from_value(value: &Value) -> Self {
        let object = value.as_object();
        let int = |key: &str, default: i32| int_field(object, key).unwrap_or(default);
        let flag = |key: &str, default: bool| bool_field(object, key).unwrap_or(default);

        Self {
            output_mode: output_mode_field(object, "outputMode").unwrap_or(BASE.output_mode),
            threshold: int("threshold", BASE.threshold),
            brightness: int("brightness", BASE.brightness),
            contrast: int("contrast", BASE.contrast),
            gamma: int("gamma", BASE.gamma),
            saturation: int("saturation", BASE.saturation),
            blur: int("blur", BASE.blur),
            sharpen: int("sharpen", BASE.sharpen),
            noise: int("noise", BASE.noise),
            zoom: int("zoom", BASE.zoom),
            cols: int("cols", BASE.cols),
            rows: int("rows", BASE.rows),
            dot_size: int("dotSize", BASE.dot_size),
            dither: flag("dither", BASE.dither),
            invert: flag("invert", BASE.invert),
            color_mode: flag("colorMode", BASE.color_mode),
            flip_h: flag("flipH", BASE.flip_h),
            flip_v: flag("flipV", BASE.flip_v),
            smooth: int("smooth", BASE.smooth),
            post_contrast: int("postContrast", BASE.post_contrast),
        }
    }

    /// Captures a config back into control units.
    pub fn from_config(config: &ProcessConfig, dot_size: f64) -> Self {
        Self {
            output_mode: config.output_mode,
            threshold: i32::from(config.threshold),
            brightness: config.brightness,
            contrast: to_percent(config.contrast),
            gamma: to_percent(config.gamma),
            saturation: to_percent(config.saturation),
            blur: i32::try_from(config.blur_radius).unwrap_or(i32::MAX),
            sharpen: to_percent(config.sharpen),
            noise: to_percent(config.noise),
            zoom: config.zoom.round() as i32,
            cols: i32::try_from(config.grid.cols()).unwrap_or(i32::MAX),
            rows: i32::try_from(config.grid.rows()).unwrap_or(i32::MAX),
            dot_size: to_percent(dot_size),
            dither: config.dither,
            invert: config.invert,
            color_mode: config.color_mode,
            flip_h: config.flip_h,
            flip_v: config.flip_v,
            smooth: i32::try_from(config.smooth_passes).unwrap_or(i32::MAX),
            post_contrast: to_percent(config.post_contrast),
        }
    }

    pub fn grid(&self) -> GridConfig {
        let dimension = |value: i32| usize::try_from(value).ok();
        GridConfig::or_default(dimension(self.cols), dimension(self.rows))
    }

    pub fn process_config(&self) -> ProcessConfig {
        let unsigned = |value: i32| u32::try_from(value).unwrap_or(0);
        ProcessConfig::builder()
            .grid(self.grid())
            .output_mode(self.output_mode)
            .threshold(self.threshold.clamp(0, 255) as u8)
            .brightness(self.brightness)
            .contrast(percent(self.contrast))
            .gamma(percent(self.gamma))
            .saturation(percent(self.saturation))
            .blur_radius(unsigned(self.blur))
            .sharpen(percent(self.sharpen))
            .noise(percent(self.noise))
            .zoom(f64::from(self.zoom))
            .dither(self.dither)
            .invert(self.invert)
            .color_mode(self.color_mode)
            .flip_h(self.flip_h)
            .flip_v(self.flip_v)
            .smooth_passes(unsigned(self.smooth))
            .post_contrast(percent(self.post_contrast))
            .build()
    }

    /// Dot diameter as a fraction of the cell size.
    pub fn dot_size(&self) -> f64 {
        percent(self.dot_size).clamp(0.0, 1.0)
    }
}

/// A built-in preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub id: &'static str,
    pub label: &'static str,
    pub snapshot: PresetSnapshot,
}

const fn preset(id: &'static str, label: &'static str, snapshot: PresetSnapshot) -> Preset {
    Preset { id, label, snapshot }
}

static BUILTIN_PRESETS: [Preset; 14] = [
    preset("8level", "8-level (default)", BASE),
    preset(
        "1bit",
        "1-bit high contrast",
        PresetSnapshot { output_mode: OutputMode::Binary, contrast: 120, dither: true, ..BASE },
    ),
    preset(
        "led",
        "LED punchy",
        PresetSnapshot {
            output_mode: OutputMode::Levels(4),
            brightness: 10,
            contrast: 110,
            gamma: 90,
            cols: 32,
            rows: 24,
            dot_size: 50,
            ..BASE
        },
    ),
    preset("smooth", "Smooth continuous", PresetSnapshot { output_mode: OutputMode::Full, ..BASE }),
    preset(
        "minimal",
        "Minimal sparse",
        PresetSnapshot {
            output_mode: OutputMode::Binary,
            threshold: 160,
            brightness: 20,
            cols: 24,
            rows: 18,
            dot_size: 55,
            ..BASE
        },
    ),
    preset(
        "grain",
        "Film grain",
        PresetSnapshot {
            output_mode: OutputMode::Levels(16),
            brightness: -5,
            contrast: 95,
            gamma: 110,
            cols: 48,
            rows: 36,
            dot_size: 40,
            dither: true,
            ..BASE
        },
    ),
    preset(
        "colorVivid",
        "Color vivid",
        PresetSnapshot {
            brightness: 5,
            contrast: 110,
            gamma: 95,
            saturation: 140,
            sharpen: 15,
            color_mode: true,
            ..BASE
        },
    ),
    preset(
        "colorPastel",
        "Color pastel",
        PresetSnapshot {
            output_mode: OutputMode::Levels(16),
            brightness: 15,
            contrast: 90,
            gamma: 105,
            saturation: 70,
            blur: 1,
            cols: 36,
            rows: 27,
            dot_size: 48,
            color_mode: true,
            smooth: 1,
            post_contrast: 95,
            ..BASE
        },
    ),
    preset(
        "colorMono",
        "Color (desat)",
        PresetSnapshot { output_mode: OutputMode::Full, saturation: 0, color_mode: true, ..BASE },
    ),
    preset(
        "bwSoft",
        "B&W soft",
        PresetSnapshot {
            contrast: 90,
            gamma: 110,
            blur: 2,
            dot_size: 50,
            dither: true,
            smooth: 1,
            post_contrast: 95,
            ..BASE
        },
    ),
    preset(
        "bwPunchy",
        "B&W punchy",
        PresetSnapshot {
            output_mode: OutputMode::Binary,
            contrast: 130,
            gamma: 85,
            sharpen: 25,
            dither: true,
            post_contrast: 110,
            ..BASE
        },
    ),
    preset("noisy", "Noisy", PresetSnapshot { noise: 15, ..BASE }),
    preset("mirror", "Mirror (flip H)", PresetSnapshot { flip_h: true, ..BASE }),
    preset(
        "softDots",
        "Soft dots",
        PresetSnapshot { blur: 1, dot_size: 50, smooth: 2, post_contrast: 95, ..BASE },
    ),
];

pub fn builtin_presets() -> &'static [Preset] {
    &BUILTIN_PRESETS
}

pub fn find_preset(id: &str) -> Result<&'static Preset> {
    BUILTIN_PRESETS
        .iter()
        .find(|preset| preset.id == id)
        .ok_or_else(|| PipelineError::UnknownPreset(id.to_string()))
}

/// Resolves `id` against the user's presets first, then the built-ins.
pub fn resolve_preset(id: &str, custom: &[CustomPreset]) -> Result<PresetSnapshot> {
    if let Some(preset) = custom.iter().find(|preset| preset.id == id) {
        return Ok(preset.snapshot);
    }
    find_preset(id).map(|preset| preset.snapshot)
}

/// Lowercases, turns whitespace runs into `_`, and drops anything outside `[a-z0-9_]`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut in_whitespace = false;
    for ch in name.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            slug.push(ch);
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    if slug.is_empty() {
        slug.push_str("preset");
    }
    slug
}

pub fn custom_preset_id(name: &str) -> String {
    format!("{CUSTOM_ID_PREFIX}{}", slugify(name))
}

/// A user-saved preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomPreset {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub snapshot: PresetSnapshot,
}

impl CustomPreset {
    /// Returns `None` for a blank name.
    pub fn new(name: &str, snapshot: PresetSnapshot) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            id: custom_preset_id(name),
            name: name.chars().take(MAX_NAME_LEN).collect(),
            snapshot,
        })
    }

    /// Reads a saved preset list. Entries without a string `id` are skipped;
    /// everything else is parsed leniently.
    pub fn list_from_value(value: &Value) -> Vec<Self> {
        let Some(entries) = value.as_array() else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| {
                let id = entry.get("id")?.as_str()?.to_string();
                let name = entry
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(id.as_str())
                    .to_string();
                Some(Self {
                    id,
                    name,
                    snapshot: PresetSnapshot::from_value(entry),
                })
            })
            .collect()
    }

    /// Replaces the entry with the same id, or appends.
    pub fn upsert(list: &mut Vec<CustomPreset>, entry: CustomPreset) {
        match list.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry,
            None => list.push(entry),
        }
    }
}
