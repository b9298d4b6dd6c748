//! Scalar field functions sampled by the generators.
//!
//! All take normalized coordinates `(nx, ny)` and an already speed-scaled
//! time `t`. Results are roughly in [0, 1] unless noted.

use std::f64::consts::TAU;

use crate::dot_pipeline::generators::permutation::PermutationTable;

/// Per-channel offsets for the colored noise variant.
pub const NOISE_CHANNEL_OFFSETS: [[f64; 3]; 3] = [
    [0.0, 0.0, 0.0],
    [77.7, 77.7 * 0.5, 77.7],
    [133.3, 133.3 * 0.3, 133.3],
];

/// Unit light direction for an azimuth in degrees.
pub fn light_direction(degrees: f64) -> (f64, f64) {
    let rad = degrees.to_radians();
    (rad.cos(), rad.sin())
}

fn wave(phase: f64) -> f64 {
    phase.sin() * 0.5 + 0.5
}

/// Horizontal and vertical sine bands, each scaled by `amplitude`.
pub fn waves(nx: f64, ny: f64, t: f64, frequency: f64, amplitude: f64) -> f64 {
    wave(nx * TAU * frequency + t) * amplitude + wave(ny * TAU * frequency * 0.7 + t * 1.1) * amplitude
}

pub fn wave_height(nx: f64, ny: f64, t: f64, frequency: f64, amplitude: f64) -> f64 {
    wave(nx * TAU * frequency + t) * amplitude + wave(ny * TAU * frequency * 0.8 + t * 1.2) * amplitude
}

/// Wave height times a Lambert-style shade from central-difference normals.
///
/// `step` is the normalized distance used for the differences.
pub fn shaded_waves(
    nx: f64,
    ny: f64,
    t: f64,
    frequency: f64,
    amplitude: f64,
    light: (f64, f64),
    step: f64,
) -> f64 {
    let h = |x: f64, y: f64| wave_height(x, y, t, frequency, amplitude);
    let height = h(nx, ny);
    let hx = (h(nx + step, ny) - h(nx - step, ny)) * 0.5;
    let hy = (h(nx, ny + step) - h(nx, ny - step)) * 0.5;
    let nz = 1.0;
    let len = (hx * hx + hy * hy + nz * nz).sqrt();
    let shade = ((-hx * light.0 - hy * light.1 + nz * 0.3) / len * 1.2 + 0.5).clamp(0.0, 1.0);
    height * shade
}

/// Summed sinusoid depth, scaled by 1.2 and clamped to [0, 1].
pub fn vertex_depth(nx: f64, ny: f64, t: f64, wavelength: f64, depth: f64) -> f64 {
    let z = wave(nx * TAU * wavelength + t) * depth + wave(ny * TAU * wavelength * 0.6 + t * 1.3) * depth;
    (z * 1.2).clamp(0.0, 1.0)
}

/// Axis, diagonal, and radial sinusoids averaged into [0, 1].
pub fn plasma(nx: f64, ny: f64, t: f64, scale: f64) -> f64 {
    let k = scale * 10.0;
    let radial = ((nx - 0.5).powi(2) + (ny - 0.5).powi(2)).sqrt();
    let sum = (nx * k + t).sin()
        + (ny * k + t * 1.1).sin()
        + ((nx + ny) * k + t * 0.9).sin()
        + (radial * scale * 15.0 + t).sin();
    sum * 0.25 + 0.5
}

/// Two-octave noise height shaded by its x/y slope against `light`.
///
/// `nx`/`ny` are already multiplied by the terrain scale.
pub fn terrain(table: &PermutationTable, nx: f64, ny: f64, t: f64, light: (f64, f64)) -> f64 {
    const EPS: f64 = 0.05;
    let height = table.noise3(nx, ny, t) * 0.6 + table.noise3(nx * 2.0, ny * 2.0, t * 0.7) * 0.3 + 0.1;
    let hx = (table.noise3(nx + EPS, ny, t) - table.noise3(nx - EPS, ny, t)) * 5.0;
    let hy = (table.noise3(nx, ny + EPS, t) - table.noise3(nx, ny - EPS, t)) * 5.0;
    let shade = ((-hx * light.0 - hy * light.1) * 2.0 + 0.6).clamp(0.0, 1.0);
    height * shade
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waves_range_follows_amplitude() {
        for i in 0..200 {
            let n = f64::from(i) / 200.0;
            let v = waves(n, 1.0 - n, f64::from(i) * 0.1, 4.0, 0.5);
            assert!((0.0..=1.0 + 1e-12).contains(&v));
        }
        assert_eq!(waves(0.3, 0.6, 1.0, 4.0, 0.0), 0.0);
    }

    #[test]
    fn test_plasma_is_normalized() {
        for i in 0..400 {
            let nx = f64::from(i % 20) / 20.0;
            let ny = f64::from(i / 20) / 20.0;
            let v = plasma(nx, ny, 2.5, 2.0);
            assert!((0.0..=1.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn test_shaded_waves_flat_field_gets_base_shade() {
        // Zero amplitude means no slope and zero height.
        assert_eq!(shaded_waves(0.2, 0.4, 0.0, 3.0, 0.0, light_direction(315.0), 0.05), 0.0);
    }

    #[test]
    fn test_vertex_depth_clamped() {
        for i in 0..100 {
            let n = f64::from(i) / 100.0;
            let v = vertex_depth(n, n, 0.3, 5.0, 2.0);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_terrain_is_bounded() {
        let table = PermutationTable::new(99);
        let light = light_direction(45.0);
        for i in 0..300 {
            let n = f64::from(i) * 0.031;
            let v = terrain(&table, n, n * 0.5, 0.2, light);
            assert!((0.0..=1.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn test_light_direction_is_unit() {
        let (x, y) = light_direction(315.0);
        assert!(((x * x + y * y) - 1.0).abs() < 1e-12);
        assert!(x > 0.0 && y < 0.0);
    }
}
