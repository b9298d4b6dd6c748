use crate::dot_pipeline::common::Raster;

/// Anything the pipeline can read pixels from: decoded video frames, camera
/// frames, generator output.
pub trait PixelSource {
    /// Source size, or `None` while the source is not ready to be read
    /// (e.g. video metadata not loaded yet).
    fn dimensions(&self) -> Option<(usize, usize)>;

    /// RGBA value at `(x, y)`. Only called with coordinates inside `dimensions()`.
    fn read_pixel(&self, x: usize, y: usize) -> [u8; 4];
}

impl PixelSource for Raster {
    fn dimensions(&self) -> Option<(usize, usize)> {
        Some((self.width(), self.height()))
    }

    fn read_pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixel(x, y)
    }
}

impl<S: PixelSource + ?Sized> PixelSource for &S {
    fn dimensions(&self) -> Option<(usize, usize)> {
        (**self).dimensions()
    }

    fn read_pixel(&self, x: usize, y: usize) -> [u8; 4] {
        (**self).read_pixel(x, y)
    }
}

impl<S: PixelSource> PixelSource for Option<S> {
    fn dimensions(&self) -> Option<(usize, usize)> {
        self.as_ref().and_then(|source| source.dimensions())
    }

    fn read_pixel(&self, x: usize, y: usize) -> [u8; 4] {
        match self {
            Some(source) => source.read_pixel(x, y),
            None => [0, 0, 0, 255],
        }
    }
}
