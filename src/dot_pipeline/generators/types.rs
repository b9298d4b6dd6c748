//! Generator kinds and parameters

use std::fmt;
use std::str::FromStr;

use crate::dot_pipeline::generators::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    /// Fractal value noise
    Perlin,
    /// Two crossed sine waves
    Waves,
    /// Sine height field with directional shading
    Waves3d,
    /// Vertex-style summed sinusoid depth
    Vertex,
    Plasma,
    /// Two-octave noise height field with oblique lighting
    Terrain,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 6] = [
        GeneratorKind::Perlin,
        GeneratorKind::Waves,
        GeneratorKind::Waves3d,
        GeneratorKind::Vertex,
        GeneratorKind::Plasma,
        GeneratorKind::Terrain,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GeneratorKind::Perlin => "perlin",
            GeneratorKind::Waves => "waves",
            GeneratorKind::Waves3d => "waves3d",
            GeneratorKind::Vertex => "vertex",
            GeneratorKind::Plasma => "plasma",
            GeneratorKind::Terrain => "terrain",
        }
    }

    /// Whether the kind can colorize its output (procedurally or through a palette).
    pub fn supports_color(self) -> bool {
        matches!(
            self,
            GeneratorKind::Perlin | GeneratorKind::Vertex | GeneratorKind::Plasma
        )
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        GeneratorKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown generator '{s}'"))
    }
}

/// Numeric parameters shared by all generators. Each kind reads the subset it needs:
///
/// | kind    | speed | scale | octaves | frequency  | amplitude | light_deg |
/// |---------|-------|-------|---------|------------|-----------|-----------|
/// | perlin  | x     | x     | x       |            |           |           |
/// | waves   | x     |       |         | x          | x         |           |
/// | waves3d | x     |       |         | x          | x         | x         |
/// | vertex  | x     |       |         | wavelength | depth     |           |
/// | plasma  | x     | x     |         |            |           |           |
/// | terrain | x     | x     |         |            |           | x         |
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    pub speed: f64,
    pub scale: f64,
    pub octaves: u32,
    pub frequency: f64,
    pub amplitude: f64,
    pub light_deg: f64,
    /// Colorize output for kinds that support it.
    pub color: bool,
    /// Remaps colorized output through a palette instead of the procedural coloring.
    pub palette: Option<Palette>,
}

impl GeneratorParams {
    pub fn defaults_for(kind: GeneratorKind) -> Self {
        let base = Self {
            speed: 0.5,
            scale: 1.0,
            octaves: 1,
            frequency: 1.0,
            amplitude: 1.0,
            light_deg: 0.0,
            color: false,
            palette: None,
        };
        match kind {
            GeneratorKind::Perlin => Self {
                speed: 0.06,
                scale: 2.5,
                octaves: 2,
                ..base
            },
            GeneratorKind::Waves => Self {
                speed: 0.5,
                frequency: 4.0,
                amplitude: 0.5,
                ..base
            },
            GeneratorKind::Waves3d => Self {
                speed: 0.4,
                frequency: 3.0,
                amplitude: 0.7,
                light_deg: 315.0,
                ..base
            },
            GeneratorKind::Vertex => Self {
                speed: 0.6,
                frequency: 5.0,
                amplitude: 0.6,
                ..base
            },
            GeneratorKind::Plasma => Self {
                speed: 0.5,
                scale: 2.0,
                ..base
            },
            GeneratorKind::Terrain => Self {
                speed: 0.03,
                scale: 1.8,
                light_deg: 45.0,
                ..base
            },
        }
    }

    /// Replaces out-of-domain values with the kind's defaults.
    ///
    /// Non-positive or non-finite numbers fall back to the default (the light
    /// azimuth only needs to be finite). Octaves and the vertex wavelength
    /// never drop below 1.
    pub fn normalized(mut self, kind: GeneratorKind) -> Self {
        let defaults = Self::defaults_for(kind);
        let fix = |value: f64, default: f64| {
            if value.is_finite() && value > 0.0 { value } else { default }
        };
        self.speed = fix(self.speed, defaults.speed);
        self.scale = fix(self.scale, defaults.scale);
        self.frequency = fix(self.frequency, defaults.frequency);
        self.amplitude = fix(self.amplitude, defaults.amplitude);
        if !self.light_deg.is_finite() {
            self.light_deg = defaults.light_deg;
        }
        self.octaves = self.octaves.max(1);
        if kind == GeneratorKind::Vertex {
            self.frequency = self.frequency.max(1.0);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_id() {
        for kind in GeneratorKind::ALL {
            assert_eq!(kind.id().parse::<GeneratorKind>(), Ok(kind));
        }
        assert_eq!("WAVES3D".parse::<GeneratorKind>(), Ok(GeneratorKind::Waves3d));
        assert!("video".parse::<GeneratorKind>().is_err());
    }

    #[test]
    fn test_normalize_clamps_octaves_and_bad_values() {
        let params = GeneratorParams {
            octaves: 0,
            speed: -1.0,
            scale: f64::NAN,
            ..GeneratorParams::defaults_for(GeneratorKind::Perlin)
        }
        .normalized(GeneratorKind::Perlin);
        assert_eq!(params.octaves, 1);
        assert_eq!(params.speed, 0.06);
        assert_eq!(params.scale, 2.5);
    }

    #[test]
    fn test_vertex_wavelength_floor() {
        let params = GeneratorParams {
            frequency: 0.25,
            ..GeneratorParams::defaults_for(GeneratorKind::Vertex)
        }
        .normalized(GeneratorKind::Vertex);
        assert_eq!(params.frequency, 1.0);
    }
}
