//! Permutation table and 3-D gradient value noise.

use std::sync::OnceLock;

use tracing::debug;

/// Shuffled 0..=255 permutation, doubled to 512 entries so lookups never wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationTable {
    perm: [u8; 512],
}

static SHARED: OnceLock<PermutationTable> = OnceLock::new();

impl PermutationTable {
    /// Builds a Fisher–Yates shuffled table from `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in (1..256).rev() {
            let j = rng.usize(..=i);
            p.swap(i, j);
        }
        let perm = std::array::from_fn(|i| p[i & 255]);
        Self { perm }
    }

    /// The process-wide table, shuffled from entropy on first use and read-only afterwards.
    pub fn shared() -> &'static PermutationTable {
        SHARED.get_or_init(|| {
            let seed = fastrand::u64(..);
            debug!(seed, "Initializing shared permutation table");
            PermutationTable::new(seed)
        })
    }

    fn at(&self, i: usize) -> usize {
        usize::from(self.perm[i])
    }

    /// Interpolated gradient noise at `(x, y, z)`, remapped to roughly [0, 1].
    ///
    /// Lattice corners hash through all three axes; the gradient dot product
    /// only uses the x/y offsets, so `z` acts as a smooth evolution axis.
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let zi = (z.floor() as i64 & 255) as usize;
        let x = x - x.floor();
        let y = y - y.floor();
        let z = z - z.floor();
        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let a = self.at(xi) + yi;
        let b = self.at(xi + 1) + yi;
        let aa = self.at(a) + zi;
        let ab = self.at(a + 1) + zi;
        let ba = self.at(b) + zi;
        let bb = self.at(b + 1) + zi;

        let near = lerp(
            lerp(grad(self.at(aa), x, y), grad(self.at(ba), x - 1.0, y), u),
            lerp(grad(self.at(ab), x, y - 1.0), grad(self.at(bb), x - 1.0, y - 1.0), u),
            v,
        );
        let far = lerp(
            lerp(grad(self.at(aa + 1), x, y), grad(self.at(ba + 1), x - 1.0, y), u),
            lerp(grad(self.at(ab + 1), x, y - 1.0), grad(self.at(bb + 1), x - 1.0, y - 1.0), u),
            v,
        );
        lerp(near, far, w) * 0.5 + 0.5
    }

    /// Fractal sum of `octaves` noise layers at doubling frequency and halving
    /// amplitude, normalized by the total amplitude.
    pub fn fbm(&self, x: f64, y: f64, z: f64, octaves: u32) -> f64 {
        self.fbm_shifted(x, y, z, [0.0; 3], octaves)
    }

    /// Like [`fbm`](Self::fbm), with `offset` added to every octave's sample
    /// point after frequency scaling. Used to decorrelate color channels.
    pub fn fbm_shifted(&self, x: f64, y: f64, z: f64, offset: [f64; 3], octaves: u32) -> f64 {
        let mut sum = 0.0;
        let mut norm = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        for _ in 0..octaves.max(1) {
            sum += amplitude
                * self.noise3(
                    x * frequency + offset[0],
                    y * frequency + offset[1],
                    z * frequency + offset[2],
                );
            norm += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }
        sum / norm
    }
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn grad(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}
