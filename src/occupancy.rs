//! Per-pixel wall occupancy used for continuous collision queries.
//!
//! The map is rebuilt from scratch whenever the maze or the layout changes;
//! it is never patched incrementally. Points outside the maze grid count as
//! occupied even where the canvas padding has no wall pixels.

use crate::layout::{wall_rect, Layout, Rect};
use crate::maze::Maze;
use crate::vector::Vec2;

/// Anything the movement engine can probe for blocked points.
pub trait Obstacles {
    /// `point` is in grid-fractional coordinates.
    fn is_occupied(&self, point: Vec2) -> bool;
}

impl<F> Obstacles for F
where
    F: Fn(Vec2) -> bool,
{
    fn is_occupied(&self, point: Vec2) -> bool {
        self(point)
    }
}

#[derive(Debug, Clone)]
pub struct OccupancyMap {
    cols: usize,
    rows: usize,
    width: usize,
    height: usize,
    grid_offset: Vec2,
    grid_size: f64,
    pixels: Vec<bool>,
}

impl OccupancyMap {
    pub fn build(maze: &Maze, layout: &Layout, wall_width: f64) -> Self {
        let mut map = Self {
            cols: 0,
            rows: 0,
            width: 0,
            height: 0,
            grid_offset: Vec2::ZERO,
            grid_size: 1.0,
            pixels: Vec::new(),
        };
        map.recompute(maze, layout, wall_width);
        map
    }

    /// Rasterizes every visible wall onto a fresh `base_width x base_height`
    /// grid.
    ///
    /// A pixel `i` answers lookups for points that round to `i`, so it is
    /// marked when `[i - 0.5, i + 0.5]` touches a wall on both axes.
    pub fn recompute(&mut self, maze: &Maze, layout: &Layout, wall_width: f64) {
        self.cols = maze.cols();
        self.rows = maze.rows();
        self.width = layout.base_width();
        self.height = layout.base_height();
        self.grid_offset = layout.grid_offset();
        self.grid_size = layout.grid_size();
        self.pixels.clear();
        self.pixels.resize(self.width * self.height, false);

        let mut filled = 0usize;
        maze.for_each_wall_filtered(
            |_, wall| {
                let bounds = layout.rect_to_pixels(wall_rect(wall, wall_width));
                filled += self.fill(bounds);
            },
            |wall| !wall.hidden,
        );

        tracing::debug!(
            width = self.width,
            height = self.height,
            filled,
            "occupancy map rebuilt"
        );
    }

    fn fill(&mut self, rect: Rect) -> usize {
        let Some((x0, x1)) = pixel_span(rect.x, rect.right(), self.width) else {
            return 0;
        };
        let Some((y0, y1)) = pixel_span(rect.y, rect.bottom(), self.height) else {
            return 0;
        };
        for y in y0..=y1 {
            self.pixels[y * self.width + x0..=y * self.width + x1].fill(true);
        }
        (x1 - x0 + 1) * (y1 - y0 + 1)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw pixel lookup; out-of-range pixels count as walls.
    pub fn is_pixel_occupied(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return true;
        }
        self.pixels[y as usize * self.width + x as usize]
    }

    pub fn occupied_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }
}

impl Obstacles for OccupancyMap {
    fn is_occupied(&self, point: Vec2) -> bool {
        let inside = point.x > 0.0
            && point.y > 0.0
            && point.x < self.cols as f64
            && point.y < self.rows as f64;
        if !inside {
            return true;
        }
        let pixel = (self.grid_offset + point * self.grid_size).round();
        self.is_pixel_occupied(pixel.x as i64, pixel.y as i64)
    }
}

/// Inclusive pixel range whose lookup footprint touches `[start, end]`,
/// clipped to `[0, len)`.
fn pixel_span(start: f64, end: f64, len: usize) -> Option<(usize, usize)> {
    let first = (start - 0.5).ceil().max(0.0);
    let last = (end + 0.5).floor().min(len as f64 - 1.0);
    if len == 0 || first > last {
        return None;
    }
    Some((first as usize, last as usize))
}
