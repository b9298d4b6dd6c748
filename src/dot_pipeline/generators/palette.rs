//! Color palettes: piecewise-linear RGB gradients addressed by a value in [0, 1].

use crate::dot_pipeline::common::error::{PipelineError, Result};

/// Ordered RGB control colors. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<[u8; 3]>,
}

impl Palette {
    pub fn new(name: impl Into<String>, colors: Vec<[u8; 3]>) -> Result<Self> {
        let name = name.into();
        if colors.is_empty() {
            return Err(PipelineError::InvalidPalette(format!(
                "palette '{name}' has no control colors"
            )));
        }
        Ok(Self { name, colors })
    }

    /// Looks up one of the built-in palettes by id. `default` and unknown ids give `None`.
    pub fn builtin(id: &str) -> Option<Self> {
        BUILTIN_PALETTES
            .iter()
            .find(|(pid, _, _)| *pid == id)
            .map(|(_, name, colors)| Self {
                name: (*name).to_string(),
                colors: colors.to_vec(),
            })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Interpolates between the two control colors nearest to `t * (N - 1)`.
    ///
    /// `t` is clamped to [0, 1]; a single-color palette always returns that color.
    pub fn color_at(&self, t: f64) -> [u8; 3] {
        let last = self.colors.len() - 1;
        if last == 0 {
            return self.colors[0];
        }
        let pos = t.clamp(0.0, 1.0) * last as f64;
        let i0 = pos.floor() as usize;
        let i1 = (i0 + 1).min(last);
        let f = pos - i0 as f64;
        let (c0, c1) = (self.colors[i0], self.colors[i1]);
        std::array::from_fn(|c| {
            let a = f64::from(c0[c]);
            let b = f64::from(c1[c]);
            (a + (b - a) * f).round().clamp(0.0, 255.0) as u8
        })
    }
}

/// Ids of every built-in palette, in catalog order.
pub fn builtin_palette_ids() -> impl Iterator<Item = &'static str> {
    BUILTIN_PALETTES.iter().map(|(id, _, _)| *id)
}

type PaletteEntry = (&'static str, &'static str, &'static [[u8; 3]]);

const BUILTIN_PALETTES: &[PaletteEntry] = &[
    ("sunset", "Sunset", &[[20, 0, 40], [180, 40, 80], [255, 120, 60], [255, 220, 160]]),
    ("ocean", "Ocean", &[[0, 20, 50], [0, 80, 120], [50, 160, 200], [180, 220, 255]]),
    ("forest", "Forest", &[[10, 30, 15], [30, 90, 40], [80, 140, 60], [180, 200, 120]]),
    ("fire", "Fire", &[[0, 0, 0], [128, 0, 0], [255, 100, 0], [255, 255, 150]]),
    ("ice", "Ice", &[[0, 20, 40], [80, 160, 220], [180, 220, 255], [230, 245, 255]]),
    ("magma", "Magma", &[[0, 0, 4], [80, 20, 100], [200, 60, 120], [255, 200, 180]]),
    ("viridis", "Viridis", &[[68, 1, 84], [59, 82, 139], [33, 145, 140], [94, 201, 98], [253, 231, 37]]),
    ("plasma", "Plasma", &[[13, 8, 135], [126, 3, 168], [204, 71, 120], [248, 149, 64], [240, 249, 33]]),
    ("inferno", "Inferno", &[[0, 0, 4], [80, 20, 100], [180, 50, 80], [250, 180, 80], [255, 255, 204]]),
    ("cividis", "Cividis", &[[0, 32, 76], [65, 90, 140], [120, 170, 185], [230, 210, 120], [253, 231, 37]]),
    ("turbo", "Turbo", &[[49, 18, 60], [0, 180, 220], [0, 255, 160], [230, 220, 0], [255, 80, 0]]),
    ("neon", "Neon", &[[255, 0, 255], [0, 255, 255], [255, 255, 0], [255, 0, 128]]),
    ("candy", "Candy", &[[255, 180, 200], [255, 220, 120], [200, 255, 220], [180, 200, 255]]),
    ("midnight", "Midnight", &[[10, 5, 30], [40, 20, 80], [80, 60, 140], [140, 120, 200]]),
    ("autumn", "Autumn", &[[60, 30, 10], [140, 80, 30], [200, 140, 60], [255, 200, 120]]),
    ("mint", "Mint", &[[220, 255, 240], [160, 240, 200], [80, 200, 160], [20, 120, 100]]),
    ("rose", "Rose", &[[255, 240, 245], [255, 180, 200], [220, 100, 140], [160, 50, 80]]),
    ("copper", "Copper", &[[40, 25, 15], [120, 70, 40], [180, 110, 60], [220, 180, 140]]),
    ("electric", "Electric", &[[0, 0, 0], [0, 0, 255], [0, 255, 255], [255, 255, 255]]),
    ("heat", "Heat", &[[0, 0, 0], [255, 0, 0], [255, 255, 0], [255, 255, 255]]),
    ("cold", "Cold", &[[0, 0, 0], [0, 0, 128], [0, 128, 255], [200, 230, 255]]),
    ("lime", "Lime", &[[20, 40, 0], [80, 160, 0], [180, 255, 80], [220, 255, 180]]),
    ("grape", "Grape", &[[40, 0, 60], [100, 40, 140], [180, 120, 220], [220, 200, 255]]),
    ("peach", "Peach", &[[255, 220, 200], [255, 180, 140], [255, 140, 80], [200, 80, 40]]),
    ("steel", "Steel", &[[40, 50, 60], [100, 120, 140], [160, 180, 200], [220, 230, 240]]),
    ("aurora", "Aurora", &[[0, 40, 30], [0, 180, 120], [100, 255, 200], [200, 255, 255]]),
    ("wine", "Wine", &[[40, 0, 20], [100, 20, 50], [180, 60, 80], [255, 180, 180]]),
    ("honey", "Honey", &[[40, 25, 0], [140, 90, 0], [220, 180, 60], [255, 240, 180]]),
    ("lavender", "Lavender", &[[240, 230, 255], [200, 180, 255], [160, 120, 240], [100, 60, 180]]),
    ("emerald", "Emerald", &[[0, 40, 30], [0, 120, 80], [80, 200, 140], [180, 255, 220]]),
    ("coral", "Coral", &[[255, 220, 210], [255, 160, 140], [255, 100, 80], [200, 50, 50]]),
    ("slate", "Slate", &[[30, 35, 45], [70, 85, 105], [120, 140, 165], [190, 195, 210]]),
    ("citrus", "Citrus", &[[255, 240, 0], [255, 200, 0], [255, 140, 0], [200, 80, 0]]),
    ("berry", "Berry", &[[80, 0, 80], [160, 40, 120], [220, 100, 180], [255, 180, 220]]),
    ("fog", "Fog", &[[240, 242, 245], [200, 205, 215], [150, 160, 175], [100, 105, 120]]),
    ("gold", "Gold", &[[40, 30, 0], [120, 90, 0], [200, 160, 40], [255, 230, 140]]),
    ("cyanMagenta", "Cyan–Magenta", &[[0, 255, 255], [255, 0, 255], [0, 255, 255]]),
    ("greyscale", "Greyscale", &[[0, 0, 0], [255, 255, 255]]),
    ("sepia", "Sepia", &[[20, 15, 10], [80, 60, 40], [160, 130, 90], [255, 240, 210]]),
    ("vaporwave", "Vaporwave", &[[255, 0, 128], [128, 0, 255], [0, 255, 255], [255, 255, 0]]),
    ("matrix", "Matrix", &[[0, 20, 0], [0, 80, 0], [0, 180, 0], [180, 255, 180]]),
    ("synthwave", "Synthwave", &[[255, 50, 150], [100, 50, 255], [0, 200, 255], [255, 220, 100]]),
    ("nord", "Nord", &[[46, 52, 64], [76, 86, 106], [136, 192, 208], [236, 239, 244]]),
    ("dracula", "Dracula", &[[40, 42, 54], [68, 71, 90], [189, 147, 249], [255, 121, 198]]),
    ("monokai", "Monokai", &[[39, 40, 34], [249, 38, 114], [166, 226, 46], [253, 151, 31]]),
    ("tokyoNight", "Tokyo Night", &[[26, 27, 38], [49, 50, 68], [125, 207, 255], [187, 154, 247]]),
    ("oneDark", "One Dark", &[[40, 44, 52], [97, 175, 239], [152, 195, 121], [229, 192, 123]]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_palette_rejected() {
        assert!(matches!(
            Palette::new("empty", vec![]),
            Err(PipelineError::InvalidPalette(_))
        ));
    }

    #[test]
    fn test_endpoints_hit_first_and_last_colors() {
        for id in builtin_palette_ids() {
            let palette = Palette::builtin(id).unwrap();
            let colors = palette.colors();
            assert_eq!(palette.color_at(0.0), colors[0], "{id}");
            assert_eq!(palette.color_at(1.0), colors[colors.len() - 1], "{id}");
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let palette = Palette::builtin("fire").unwrap();
        assert_eq!(palette.color_at(-3.0), [0, 0, 0]);
        assert_eq!(palette.color_at(9.0), [255, 255, 150]);
    }

    #[test]
    fn test_single_color_palette() {
        let palette = Palette::new("solo", vec![[12, 34, 56]]).unwrap();
        assert_eq!(palette.color_at(0.0), [12, 34, 56]);
        assert_eq!(palette.color_at(0.7), [12, 34, 56]);
    }

    #[test]
    fn test_midpoint_interpolates() {
        let palette = Palette::builtin("greyscale").unwrap();
        assert_eq!(palette.color_at(0.5), [128, 128, 128]);
        let heat = Palette::builtin("heat").unwrap();
        // 0.5 * 3 = 1.5, halfway between red and yellow
        assert_eq!(heat.color_at(0.5), [255, 128, 0]);
    }

    #[test]
    fn test_default_is_not_a_palette() {
        assert!(Palette::builtin("default").is_none());
        assert!(Palette::builtin("nope").is_none());
    }
}
