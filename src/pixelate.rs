//! Image to brick-grid conversion
//!
//! Decodes a PNG/JPEG, shrinks it to `n x n` with nearest-neighbour sampling
//! and keeps every pixel that is at least half opaque.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::imageops::{self, FilterType};

use crate::error::Result;
use crate::sim::{GridSize, PixelCell, PixelGrid};

/// Pixels below this alpha become empty cells
pub const ALPHA_THRESHOLD: u8 = 128;

/// Image-to-grid collaborator
pub trait PixelSource {
    fn pixelize(&self, image: &[u8], grid_size: GridSize) -> Result<PixelGrid>;
}

/// Local pixelizer backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePixelizer;

impl PixelSource for ImagePixelizer {
    fn pixelize(&self, image: &[u8], grid_size: GridSize) -> Result<PixelGrid> {
        pixelize(image, grid_size)
    }
}

/// Decode an encoded image and sample it down to the grid
pub fn pixelize(bytes: &[u8], grid_size: GridSize) -> Result<PixelGrid> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let n = grid_size.cells() as u32;
    let small = imageops::resize(&image, n, n, FilterType::Nearest);

    let rows = (0..n)
        .map(|y| {
            (0..n)
                .map(|x| {
                    let [r, g, b, a] = small.get_pixel(x, y).0;
                    (a >= ALPHA_THRESHOLD).then(|| PixelCell::new(r, g, b, a))
                })
                .collect()
        })
        .collect();

    let grid = PixelGrid::new(rows);
    log::info!(
        "Pixelized {}x{} image to {n}x{n} ({} filled cells)",
        image.width(),
        image.height(),
        grid.filled_cells()
    );
    Ok(grid)
}

/// Payload of a `data:<mime>;base64,<payload>` URL (or bare base64)
pub fn decode_data_url(data: &str) -> Result<Vec<u8>> {
    let payload = data.split_once(',').map_or(data, |(_, payload)| payload);
    Ok(STANDARD.decode(payload.trim())?)
}

pub fn pixelize_data_url(data: &str, grid_size: GridSize) -> Result<PixelGrid> {
    pixelize(&decode_data_url(data)?, grid_size)
}
