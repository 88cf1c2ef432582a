//! Map thumbnails attached to the star listing.
//!
//! The [`MapThumbnailer`] renders a schematic PNG of the world map region
//! grid around a star location, with the location marked in the centre.

use anyhow::{Context, ensure};
use mockall::automock;

use crate::stars::StarLocation;

/// Largest accepted thumbnail width or height, in pixels.
pub const MAX_THUMBNAIL_SIZE: u32 = 4096;

/// Size in tiles of a world map region.
const REGION_SIZE: i32 = 64;
/// Number of pixels used to draw one tile.
const PIXELS_PER_TILE: i32 = 4;
/// Half size in pixels of the location marker.
const MARKER_RADIUS: i32 = 6;

const BACKGROUND: [u8; 3] = [0x2b, 0x2d, 0x31];
const REGION_LINE: [u8; 3] = [0x5c, 0x5f, 0x66];
const MARKER: [u8; 3] = [0xf0, 0xc0, 0x30];

/// Renders PNG thumbnails for star locations.
#[automock]
pub trait Thumbnailer {
    /// Returns the PNG encoded thumbnail of `location`.
    fn render(&self, location: &StarLocation) -> anyhow::Result<Vec<u8>>;
}

/// Schematic region grid thumbnail renderer.
pub struct MapThumbnailer {
    width: u32,
    height: u32,
}

impl MapThumbnailer {
    /// Create a new [MapThumbnailer] producing `width`x`height` images.
    pub fn new(width: u32, height: u32) -> Self {
        MapThumbnailer { width, height }
    }

    /// Color of the pixel at `(px, py)` for a thumbnail centred on `location`.
    fn pixel(&self, location: &StarLocation, px: i32, py: i32) -> [u8; 3] {
        let cx = self.width as i32 / 2;
        let cy = self.height as i32 / 2;

        let dx = px - cx;
        let dy = py - cy;
        if dx.abs() <= MARKER_RADIUS && dy.abs() <= MARKER_RADIUS {
            return MARKER;
        }

        // World y grows northwards, image y grows downwards.
        let tile_x = location.x + dx.div_euclid(PIXELS_PER_TILE);
        let tile_y = location.y - dy.div_euclid(PIXELS_PER_TILE);
        let on_region_line_x =
            tile_x.rem_euclid(REGION_SIZE) == 0 && dx.rem_euclid(PIXELS_PER_TILE) == 0;
        let on_region_line_y =
            tile_y.rem_euclid(REGION_SIZE) == 0 && dy.rem_euclid(PIXELS_PER_TILE) == 0;

        if on_region_line_x || on_region_line_y {
            REGION_LINE
        } else {
            BACKGROUND
        }
    }
}

impl Thumbnailer for MapThumbnailer {
    fn render(&self, location: &StarLocation) -> anyhow::Result<Vec<u8>> {
        ensure!(
            (1..=MAX_THUMBNAIL_SIZE).contains(&self.width)
                && (1..=MAX_THUMBNAIL_SIZE).contains(&self.height),
            "invalid thumbnail size {}x{}",
            self.width,
            self.height
        );

        let capacity = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .context("thumbnail too large")?;
        let mut pixels = Vec::with_capacity(capacity);
        for py in 0..self.height as i32 {
            for px in 0..self.width as i32 {
                pixels.extend_from_slice(&self.pixel(location, px, py));
            }
        }

        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, self.width, self.height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&pixels)?;
            writer.finish()?;
        }

        Ok(bytes)
    }
}
