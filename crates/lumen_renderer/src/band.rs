//! Row-band partitioning of the image.
//!
//! The image is cut into contiguous, non-overlapping ranges of rows, one per
//! worker. Each band is rendered into its own pixel vector and the bands are
//! joined top to bottom afterwards, so the final ordering never depends on
//! which worker finishes first.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::renderer::{color_to_rgb8, render_pixel, RenderSettings};
use crate::{Camera, Hittable};

/// A contiguous range of image rows, `start_row..end_row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// First row (inclusive)
    pub start_row: u32,
    /// One past the last row
    pub end_row: u32,
    /// Position of this band from the top of the image
    pub index: usize,
}

impl RowBand {
    pub fn new(start_row: u32, end_row: u32, index: usize) -> Self {
        Self {
            start_row,
            end_row,
            index,
        }
    }

    /// Number of rows in the band.
    pub fn len(&self) -> u32 {
        self.end_row - self.start_row
    }

    pub fn is_empty(&self) -> bool {
        self.end_row <= self.start_row
    }

    pub fn rows(&self) -> std::ops::Range<u32> {
        self.start_row..self.end_row
    }
}

/// Split `height` rows across `workers` bands.
///
/// The worker count is capped at the number of rows. Every band gets
/// `height / workers` rows and the last band also takes the remainder.
pub fn partition_rows(height: u32, workers: usize) -> Vec<RowBand> {
    if height == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, height as usize) as u32;
    let band_height = height / workers;

    (0..workers)
        .map(|i| {
            let start = i * band_height;
            let end = if i + 1 == workers {
                height
            } else {
                start + band_height
            };
            RowBand::new(start, end, i as usize)
        })
        .collect()
}

/// Generator for one image row.
///
/// Seeding per row rather than per worker keeps the output identical for any
/// worker count.
pub fn row_rng(seed: u64, row: u32) -> StdRng {
    let mixed = (row as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(seed ^ mixed)
}

/// Result of rendering a band.
#[derive(Debug, Clone)]
pub struct BandResult {
    /// The band that was rendered
    pub band: RowBand,
    /// Tone-mapped pixels in row-major order
    pub pixels: Vec<[u8; 3]>,
}

impl BandResult {
    pub fn new(band: RowBand, pixels: Vec<[u8; 3]>) -> Self {
        Self { band, pixels }
    }
}

/// Render every pixel of a band.
pub fn render_band(
    band: &RowBand,
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
) -> BandResult {
    let width = camera.image_width;
    let mut pixels = Vec::with_capacity(width as usize * band.len() as usize);

    for y in band.rows() {
        let mut rng = row_rng(settings.seed, y);
        for x in 0..width {
            let color = render_pixel(camera, world, x, y, settings, &mut rng);
            pixels.push(color_to_rgb8(color));
        }
    }

    log::debug!(
        "Band {} finished (rows {}..{})",
        band.index,
        band.start_row,
        band.end_row
    );
    BandResult::new(*band, pixels)
}
