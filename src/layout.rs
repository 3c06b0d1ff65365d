//! Geometry shared by the occupancy map and the draw list: where the grid
//! sits on the base-resolution canvas, and how that canvas fits the screen.

use crate::config::GameConfig;
use crate::maze::Wall;
use crate::vector::{CellPos, Vec2};

/// Axis-aligned rectangle. Grid units or pixels depending on context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Closed containment test.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// A wall's footprint in grid units: a `wall_width`-thick bar spanning one
/// cell, centred on the lattice line.
pub fn wall_rect(wall: &Wall, wall_width: f64) -> Rect {
    let vertical = wall.is_vertical();
    Rect::new(
        wall.x as f64 - wall_width / 2.0,
        wall.y as f64 - wall_width / 2.0,
        wall_width + if vertical { 0.0 } else { 1.0 },
        wall_width + if vertical { 1.0 } else { 0.0 },
    )
}

pub fn cell_rect(pos: CellPos) -> Rect {
    Rect::new(pos.x as f64, pos.y as f64, 1.0, 1.0)
}

/// How the base-resolution canvas is scaled onto the host screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayFit {
    pub scale: f64,
    pub width: u32,
    pub height: u32,
    pub margin_left: u32,
    pub margin_top: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    base_width: usize,
    base_height: usize,
    grid_size: f64,
    grid_offset: Vec2,
    display: Option<DisplayFit>,
}

impl Layout {
    pub fn new(cols: usize, rows: usize, config: &GameConfig) -> Self {
        let mut base_width = ((cols + 2) as f64 * config.detail_resolution).round();
        let mut base_height = ((rows + 2) as f64 * config.detail_resolution).round();
        let multiplier = (base_width / config.max_render_resolution)
            .max(base_height / config.max_render_resolution);
        if multiplier > 1.0 {
            base_width /= multiplier.floor();
            base_height /= multiplier.floor();
        }
        let base_width = (base_width.floor() as usize).max(1);
        let base_height = (base_height.floor() as usize).max(1);

        let grid_size = (base_width as f64 / (cols as f64 + 2.0 * config.grid_padding))
            .min(base_height as f64 / (rows as f64 + 2.0 * config.grid_padding));
        let grid_offset = Vec2::new(
            ((base_width as f64 - cols as f64 * grid_size) / 2.0).floor(),
            ((base_height as f64 - rows as f64 * grid_size) / 2.0).floor(),
        );

        Self {
            base_width,
            base_height,
            grid_size,
            grid_offset,
            display: None,
        }
    }

    /// Scales the canvas to fit a `screen_width x screen_height` viewport,
    /// keeping aspect ratio and centring it.
    pub fn fit_screen(&mut self, screen_width: u32, screen_height: u32) -> DisplayFit {
        let scale = (screen_width as f64 / self.base_width as f64)
            .min(screen_height as f64 / self.base_height as f64);
        let width = (scale * self.base_width as f64).floor() as u32;
        let height = (scale * self.base_height as f64).floor() as u32;
        let fit = DisplayFit {
            scale,
            width,
            height,
            margin_left: screen_width.saturating_sub(width) / 2,
            margin_top: screen_height.saturating_sub(height) / 2,
        };
        self.display = Some(fit);
        fit
    }

    pub fn base_width(&self) -> usize {
        self.base_width
    }

    pub fn base_height(&self) -> usize {
        self.base_height
    }

    /// Pixels per cell on the base canvas.
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn grid_offset(&self) -> Vec2 {
        self.grid_offset
    }

    pub fn display(&self) -> Option<DisplayFit> {
        self.display
    }

    pub fn grid_to_pixel(&self, point: Vec2) -> Vec2 {
        self.grid_offset + point * self.grid_size
    }

    pub fn rect_to_pixels(&self, rect: Rect) -> Rect {
        let origin = self.grid_to_pixel(Vec2::new(rect.x, rect.y));
        Rect::new(
            origin.x,
            origin.y,
            rect.w * self.grid_size,
            rect.h * self.grid_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Maze, Orientation};

    #[test]
    fn default_grid_geometry() {
        let config = GameConfig::default();
        let layout = Layout::new(20, 14, &config);
        assert_eq!((layout.base_width(), layout.base_height()), (220, 160));
        let expected = (220.0 / 20.8f64).min(160.0 / 14.8);
        assert!((layout.grid_size() - expected).abs() < 1e-9);
        assert_eq!(layout.grid_offset(), Vec2::new(4.0, 5.0));
    }

    #[test]
    fn render_resolution_is_capped() {
        let config = GameConfig::default();
        // 250 * 10 = 2500 px wide -> divided by floor(2.5) = 2.
        let layout = Layout::new(248, 10, &config);
        assert_eq!(layout.base_width(), 1250);
        assert_eq!(layout.base_height(), 60);
    }

    #[test]
    fn fit_screen_preserves_aspect_and_centres() {
        let mut layout = Layout::new(20, 14, &GameConfig::default());
        let fit = layout.fit_screen(880, 1000);
        assert!((fit.scale - 4.0).abs() < 1e-9);
        assert_eq!((fit.width, fit.height), (880, 640));
        assert_eq!((fit.margin_left, fit.margin_top), (0, 180));
        assert_eq!(layout.display(), Some(fit));
    }

    #[test]
    fn wall_rects_follow_orientation() {
        let maze = Maze::new(2, 2).unwrap();
        let h = maze.wall(maze.wall_at(1, 0, Orientation::Horizontal).unwrap());
        let v = maze.wall(maze.wall_at(0, 1, Orientation::Vertical).unwrap());

        let hr = wall_rect(h, 0.1);
        assert!((hr.x + 0.05).abs() < 1e-12 && (hr.y - 0.95).abs() < 1e-12);
        assert!((hr.w - 1.1).abs() < 1e-12 && (hr.h - 0.1).abs() < 1e-12);

        let vr = wall_rect(v, 0.1);
        assert!((vr.w - 0.1).abs() < 1e-12 && (vr.h - 1.1).abs() < 1e-12);
        assert!(vr.contains(Vec2::new(1.0, 0.5)));
    }
}
