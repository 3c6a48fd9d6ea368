use itertools::iproduct;
use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use crate::{
    film::FilmTile,
    hikari_error,
    math::{Bounds2, Point2, Vec2},
};

/// Hands out the tiles of an image to render workers, starting from the center tile and
/// spiraling outwards.
pub struct TileGenerator {
    tiles: Vec<FilmTile>,
    cursor: Mutex<usize>,
}

impl TileGenerator {
    /// Partitions an image of `res` pixels into tiles of at most `tile_dim` by `tile_dim` pixels.
    pub fn new(res: Vec2<u16>, tile_dim: u16) -> Self {
        let dim = tile_dim.max(1) as u32;
        let res_x = res.x as u32;
        let res_y = res.y as u32;
        let tiles_x = ((res_x + dim - 1) / dim) as i32;
        let tiles_y = ((res_y + dim - 1) / dim) as i32;

        // Collect tiles spanning the whole image hashed by their tile coordinates
        let mut tiles: HashMap<(i32, i32), FilmTile> = iproduct!(0..tiles_y, 0..tiles_x)
            .map(|(j, i)| {
                let min_x = (i as u32) * dim;
                let min_y = (j as u32) * dim;
                // Limit tiles to film dimensions
                let max_x = (min_x + dim).min(res_x);
                let max_y = (min_y + dim).min(res_y);
                (
                    (i, j),
                    FilmTile::new(Bounds2::new(
                        Point2::new(min_x as u16, min_y as u16),
                        Point2::new(max_x as u16, max_y as u16),
                    )),
                )
            })
            .collect();

        // Order tiles in a spiral from middle since that makes progressive output more useful:
        // Most things of interest are likely towards the center of the frame
        let mut tile_queue = Vec::with_capacity(tiles.len());
        let max_dim = tiles_x.max(tiles_y);
        let center_x = tiles_x / 2;
        let center_y = tiles_y / 2;
        let mut x = 0;
        let mut y = 0;
        let mut dx = 0;
        let mut dy = -1;
        while !tiles.is_empty() {
            let tile_x = center_x + x;
            let tile_y = center_y + y;

            if (tile_x.abs() > max_dim) || (tile_y.abs() > max_dim) {
                hikari_error!(
                    "Tile spiral overflow at tile {}, {}! {} tiles dangling",
                    tile_x,
                    tile_y,
                    tiles.len()
                );
                // Still hand out what's left so the image is covered
                let mut dangling: Vec<((i32, i32), FilmTile)> = tiles.drain().collect();
                dangling.sort_by_key(|&((i, j), _)| (j, i));
                tile_queue.extend(dangling.into_iter().map(|(_, tile)| tile));
                break;
            }

            if let Some(tile) = tiles.remove(&(tile_x, tile_y)) {
                tile_queue.push(tile);
            }

            if x == y || (x < 0 && x == -y) || (x > 0 && x == 1 - y) {
                std::mem::swap(&mut dx, &mut dy);
                dx *= -1;
            }

            x += dx;
            y += dy;
        }

        Self {
            tiles: tile_queue,
            cursor: Mutex::new(0),
        }
    }

    /// Returns the next tile to render, `None` once all tiles have been handed out.
    pub fn next(&self) -> Option<FilmTile> {
        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let tile = self.tiles.get(*cursor).copied();
        if tile.is_some() {
            *cursor += 1;
        }
        tile
    }

    /// Returns the total number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Returns all tiles in the order they are handed out.
    pub fn tiles(&self) -> &[FilmTile] {
        &self.tiles
    }
}
