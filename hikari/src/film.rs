use std::path::Path;

use crate::{
    hikari_error, hikari_info,
    math::{Bounds2, Point2, Spectrum, Vec2},
    Error, Result,
};

/// A rectangular region of a [Film] rendered as one unit of work.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilmTile {
    /// The [Film] pixel bounds for this tile, upper bounds exclusive.
    pub bb: Bounds2<u16>,
}

impl FilmTile {
    /// Creates a new `FilmTile` with the given [Bounds2].
    pub fn new(bb: Bounds2<u16>) -> Self {
        Self { bb }
    }

    /// Returns the number of pixels covered by this tile.
    pub fn pixel_count(&self) -> usize {
        (self.bb.width() as usize) * (self.bb.height() as usize)
    }
}

/// Accumulated pixel values of a render, stored row-major.
#[derive(Clone, Debug)]
pub struct Film {
    res: Vec2<u16>,
    pixels: Vec<Spectrum<f32>>,
}

impl Film {
    /// Creates a black `Film` with resolution `res`.
    pub fn new(res: Vec2<u16>) -> Self {
        Self {
            res,
            pixels: vec![Spectrum::zeros(); (res.x as usize) * (res.y as usize)],
        }
    }

    /// Returns the resolution of this `Film`.
    pub fn res(&self) -> Vec2<u16> {
        self.res
    }

    /// Returns the bounds of the whole image.
    pub fn bounds(&self) -> Bounds2<u16> {
        Bounds2::new(Point2::new(0, 0), Point2::new(self.res.x, self.res.y))
    }

    /// Returns a reference to the the pixels of this `Film`.
    pub fn pixels(&self) -> &[Spectrum<f32>] {
        &self.pixels
    }

    pub fn pixel(&self, p: Point2<u16>) -> Spectrum<f32> {
        self.pixels[(p.y as usize) * (self.res.x as usize) + (p.x as usize)]
    }

    /// Updates this `Film` with the pixel values of a [FilmTile]. `tile_pixels` are row-major
    /// within the tile.
    pub fn update_tile(&mut self, tile: &FilmTile, tile_pixels: &[Spectrum<f32>]) {
        let tile_min = tile.bb.p_min;
        let tile_max = tile.bb.p_max;

        if tile_max.x > self.res.x || tile_max.y > self.res.y {
            hikari_error!("Tile doesn't fit film ({:?} {:?})", self.res, tile.bb);
            return;
        }
        if tile_pixels.len() < tile.pixel_count() {
            hikari_error!(
                "Tile {:?} has {} pixels, expected {}",
                tile.bb,
                tile_pixels.len(),
                tile.pixel_count()
            );
            return;
        }

        let tile_width = (tile_max.x - tile_min.x) as usize;

        // Copy pixels over to the film
        for (tile_row, film_row) in ((tile_min.y as usize)..(tile_max.y as usize)).enumerate() {
            let film_row_offset = film_row * (self.res.x as usize);

            let film_slice_start = film_row_offset + (tile_min.x as usize);
            let film_slice_end = film_row_offset + (tile_max.x as usize);

            let tile_slice_start = tile_row * tile_width;
            let tile_slice_end = (tile_row + 1) * tile_width;

            let film_slice = &mut self.pixels[film_slice_start..film_slice_end];
            let tile_slice = &tile_pixels[tile_slice_start..tile_slice_end];

            film_slice.copy_from_slice(tile_slice);
        }
    }

    /// Writes the pixels of this `Film` into an OpenEXR file.
    pub fn write_exr(&self, path: &Path) -> Result<()> {
        hikari_info!("Writing out EXR");
        let width = self.res.x as usize;
        exr::prelude::write_rgb_file(path, width, self.res.y as usize, |x, y| {
            let px = self.pixels[y * width + x];
            (px.r, px.g, px.b)
        })
        .map_err(|why| Error::Exr {
            path: path.to_path_buf(),
            reason: why.to_string(),
        })?;
        hikari_info!("EXR written to '{}'", path.to_string_lossy());
        Ok(())
    }
}
