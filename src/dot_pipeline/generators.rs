//! Procedural generators module
//!
//! Synthetic RGBA rasters computed from normalized cell coordinates and a
//! time value. Generators are pure functions of their arguments; the only
//! shared input is a read-only [`PermutationTable`] passed by reference.

pub mod fields;
pub mod palette;
pub mod permutation;
pub mod types;

pub use palette::{builtin_palette_ids, Palette};
pub use permutation::PermutationTable;
pub use types::{GeneratorKind, GeneratorParams};

use tracing::{debug, instrument};

use crate::dot_pipeline::common::error::Result;
use crate::dot_pipeline::common::Raster;

use fields::{light_direction, NOISE_CHANNEL_OFFSETS};

/// A configured generator bound to a permutation table.
#[derive(Debug, Clone)]
pub struct Generator<'t> {
    kind: GeneratorKind,
    params: GeneratorParams,
    table: &'t PermutationTable,
}

impl<'t> Generator<'t> {
    pub fn new(kind: GeneratorKind, params: GeneratorParams, table: &'t PermutationTable) -> Self {
        Self {
            kind,
            params: params.normalized(kind),
            table,
        }
    }

    pub fn with_defaults(kind: GeneratorKind, table: &'t PermutationTable) -> Self {
        Self::new(kind, GeneratorParams::defaults_for(kind), table)
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    pub fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Renders a `cols × rows` raster at `time` seconds.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub fn render(&self, cols: usize, rows: usize, time: f64) -> Result<Raster> {
        let mut raster = Raster::new(cols, rows)?;
        let t = time * self.params.speed;
        let step = 1.0 / cols.max(rows) as f64;
        debug!(t, "Rendering generator frame");

        for y in 0..rows {
            for x in 0..cols {
                let nx = x as f64 / cols as f64;
                let ny = y as f64 / rows as f64;
                let [r, g, b] = self.sample(nx, ny, t, step);
                raster.set_pixel(x, y, [r, g, b, 255]);
            }
        }
        Ok(raster)
    }

    fn sample(&self, nx: f64, ny: f64, t: f64, step: f64) -> [u8; 3] {
        let p = &self.params;
        match self.kind {
            GeneratorKind::Perlin => {
                let (sx, sy) = (nx * p.scale, ny * p.scale);
                if !p.color {
                    return gray(self.table.fbm(sx, sy, t, p.octaves));
                }
                let [r, g, b] = NOISE_CHANNEL_OFFSETS
                    .map(|offset| self.table.fbm_shifted(sx, sy, t, offset, p.octaves));
                match &p.palette {
                    Some(palette) => palette.color_at((r + g + b) / 3.0),
                    None => [unit_to_byte(r), unit_to_byte(g), unit_to_byte(b)],
                }
            }
            GeneratorKind::Waves => gray(fields::waves(nx, ny, t, p.frequency, p.amplitude)),
            GeneratorKind::Waves3d => gray(fields::shaded_waves(
                nx,
                ny,
                t,
                p.frequency,
                p.amplitude,
                light_direction(p.light_deg),
                step,
            )),
            GeneratorKind::Vertex => {
                let v = fields::vertex_depth(nx, ny, t, p.frequency, p.amplitude);
                self.colorize(v, || {
                    [
                        unit_to_byte(v * 0.9 + nx * 0.1),
                        unit_to_byte(v * 0.7 + ny * 0.3),
                        unit_to_byte(v * 0.5 + (1.0 - nx) * 0.5),
                    ]
                })
            }
            GeneratorKind::Plasma => {
                let v = fields::plasma(nx, ny, t, p.scale);
                self.colorize(v, || {
                    [
                        unit_to_byte(v),
                        to_byte((1.0 - v) * 200.0 + 55.0),
                        unit_to_byte(v * 0.5 + 0.5),
                    ]
                })
            }
            GeneratorKind::Terrain => {
                let light = light_direction(p.light_deg);
                gray(fields::terrain(self.table, nx * p.scale, ny * p.scale, t, light))
            }
        }
    }

    fn colorize(&self, v: f64, procedural: impl FnOnce() -> [u8; 3]) -> [u8; 3] {
        if !self.params.color {
            return gray(v);
        }
        match &self.params.palette {
            Some(palette) => palette.color_at(v),
            None => procedural(),
        }
    }
}

fn to_byte(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

fn unit_to_byte(value: f64) -> u8 {
    to_byte(value * 255.0)
}

fn gray(value: f64) -> [u8; 3] {
    let v = unit_to_byte(value);
    [v, v, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PermutationTable {
        PermutationTable::new(1234)
    }

    #[test]
    fn test_every_kind_renders_requested_size() {
        let table = table();
        for kind in GeneratorKind::ALL {
            let raster = Generator::with_defaults(kind, &table).render(12, 9, 1.5).unwrap();
            assert_eq!((raster.width(), raster.height()), (12, 9));
            assert!(raster.pixels().all(|p| p[3] == 255), "{kind}");
        }
    }

    #[test]
    fn test_render_is_pure() {
        let table = table();
        for kind in GeneratorKind::ALL {
            let generator = Generator::with_defaults(kind, &table);
            assert_eq!(
                generator.render(10, 8, 3.25).unwrap(),
                generator.render(10, 8, 3.25).unwrap(),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_time_animates_output() {
        let table = table();
        for kind in [GeneratorKind::Waves, GeneratorKind::Plasma, GeneratorKind::Vertex] {
            let generator = Generator::with_defaults(kind, &table);
            assert_ne!(
                generator.render(16, 16, 0.0).unwrap(),
                generator.render(16, 16, 2.0).unwrap(),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_grayscale_output_has_equal_channels() {
        let table = table();
        for kind in GeneratorKind::ALL {
            let raster = Generator::with_defaults(kind, &table).render(8, 8, 0.7).unwrap();
            assert!(raster.pixels().all(|[r, g, b, _]| r == g && g == b), "{kind}");
        }
    }

    #[test]
    fn test_palette_constrains_colors() {
        let table = table();
        let palette = Palette::new("duo", vec![[255, 0, 0], [255, 0, 0]]).unwrap();
        let params = GeneratorParams {
            color: true,
            palette: Some(palette),
            ..GeneratorParams::defaults_for(GeneratorKind::Plasma)
        };
        let raster = Generator::new(GeneratorKind::Plasma, params, &table)
            .render(8, 8, 0.0)
            .unwrap();
        assert!(raster.pixels().all(|p| p == [255, 0, 0, 255]));
    }

    #[test]
    fn test_procedural_color_differs_across_channels() {
        let table = table();
        let params = GeneratorParams {
            color: true,
            ..GeneratorParams::defaults_for(GeneratorKind::Perlin)
        };
        let raster = Generator::new(GeneratorKind::Perlin, params, &table)
            .render(16, 16, 0.4)
            .unwrap();
        assert!(raster.pixels().any(|[r, g, b, _]| r != g || g != b));
    }

    #[test]
    fn test_zero_sized_render_rejected() {
        let table = table();
        assert!(Generator::with_defaults(GeneratorKind::Waves, &table)
            .render(0, 4, 0.0)
            .is_err());
    }
}
