use crate::color::{Rgba, TARGET_COLOR};
use crate::vector::{CellPos, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.delta();
        Vec2::new(dx as f64, dy as f64)
    }

    pub(crate) fn bit(self) -> u8 {
        match self {
            Direction::Up => 1,
            Direction::Left => 2,
            Direction::Down => 4,
            Direction::Right => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub index: usize,
    /// Cell the player currently belongs to.
    pub position: CellPos,
    /// Displacement from the cell, in cells.
    pub offset: Vec2,
    /// Diameter as a fraction of a cell.
    pub size: f64,
    pub color: Rgba,
    pub score: u32,
}

impl Player {
    pub fn new(index: usize, position: CellPos, size: f64, color: Rgba) -> Self {
        Self {
            index,
            position,
            offset: Vec2::ZERO,
            size,
            color,
            score: 0,
        }
    }

    /// Exact grid-fractional location (cell origin plus offset).
    pub fn location(&self) -> Vec2 {
        self.position.as_vec2() + self.offset
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub position: CellPos,
    pub color: Rgba,
    pub done: bool,
}

impl Target {
    pub fn new(position: CellPos) -> Self {
        Self {
            position,
            color: TARGET_COLOR,
            done: false,
        }
    }
}
