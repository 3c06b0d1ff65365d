//! Maze topology: a `rows x cols` grid of cells and the lattice of walls
//! between them, plus randomized Prim's generation.
//!
//! Walls live in an arena ([`WallId`] indexes it). A slot table addressed by
//! `(row, col, orientation)` maps lattice coordinates to walls; slots that do
//! not exist on the outer edge (the vertical slot on the bottom lattice row,
//! the horizontal slot on the right lattice column) are `None`.
//!
//! ```
//! use maze_game::maze::Maze;
//! use maze_game::vector::CellPos;
//! use rand::SeedableRng;
//!
//! let mut maze = Maze::new(3, 4).unwrap();
//! maze.randomize(&mut rand_pcg::Pcg64Mcg::seed_from_u64(1));
//! assert_eq!(maze.hidden_wall_count(), 3 * 4 - 1);
//! assert!(maze.wall_between(CellPos::new(0, 0), CellPos::new(2, 0)).is_none());
//! ```

use rand::Rng;

use crate::error::MazeError;
use crate::vector::{manhattan_distance, CellPos};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Runs along x; separates a cell from the one above it.
    Horizontal,
    /// Runs along y; separates a cell from the one to its left.
    Vertical,
}

impl Orientation {
    pub const ALL: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

    fn slot(self) -> usize {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    fn index(self) -> usize {
        match self {
            Side::North => 0,
            Side::East => 1,
            Side::South => 2,
            Side::West => 3,
        }
    }
}

/// Index of a wall in the maze's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallId(usize);

impl WallId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub pos: CellPos,
    walls: [WallId; 4],
}

impl Cell {
    /// Bounding walls in north, east, south, west order.
    pub fn walls(&self) -> [WallId; 4] {
        self.walls
    }

    pub fn wall(&self, side: Side) -> WallId {
        self.walls[side.index()]
    }
}

#[derive(Debug, Clone)]
pub struct Wall {
    /// Lattice column of the wall's start point.
    pub x: i32,
    /// Lattice row of the wall's start point.
    pub y: i32,
    pub orientation: Orientation,
    /// Carved out: players can pass.
    pub hidden: bool,
    cells: [Option<CellPos>; 2],
}

impl Wall {
    /// The one or two cells this wall borders.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cells.iter().flatten().copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    /// Outer walls border a single cell and are never carved.
    pub fn is_boundary(&self) -> bool {
        self.cell_count() < 2
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Orientation::Vertical
    }
}

#[derive(Debug, Clone)]
pub struct Maze {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    walls: Vec<Wall>,
    slots: Vec<Option<WallId>>,
}

impl Maze {
    /// Builds a fully walled maze (every wall visible).
    pub fn new(rows: usize, cols: usize) -> Result<Self, MazeError> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::EmptyGrid { rows, cols });
        }

        let mut walls = Vec::with_capacity(2 * rows * cols + rows + cols);
        let mut slots = vec![None; (rows + 1) * (cols + 1) * 2];

        for i in 0..=rows {
            for j in 0..=cols {
                for orientation in Orientation::ALL {
                    let exists = match orientation {
                        Orientation::Horizontal => j < cols,
                        Orientation::Vertical => i < rows,
                    };
                    if !exists {
                        continue;
                    }

                    let own = (i < rows && j < cols).then(|| CellPos::new(j as i32, i as i32));
                    let neighbor = match orientation {
                        Orientation::Vertical if j > 0 => {
                            Some(CellPos::new(j as i32 - 1, i as i32))
                        }
                        Orientation::Horizontal if i > 0 => {
                            Some(CellPos::new(j as i32, i as i32 - 1))
                        }
                        _ => None,
                    };
                    let cells = match (own, neighbor) {
                        (Some(a), b) => [Some(a), b],
                        (None, b) => [b, None],
                    };

                    let id = WallId(walls.len());
                    walls.push(Wall {
                        x: j as i32,
                        y: i as i32,
                        orientation,
                        hidden: false,
                        cells,
                    });
                    slots[slot_index(cols, i, j, orientation)] = Some(id);
                }
            }
        }

        // Every side of an in-range cell is an existing lattice slot.
        let lookup = |row: usize, col: usize, orientation: Orientation| {
            slots[slot_index(cols, row, col, orientation)]
                .expect("lattice slot exists for every side of an in-range cell")
        };
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell {
                    pos: CellPos::new(col as i32, row as i32),
                    walls: [
                        lookup(row, col, Orientation::Horizontal),
                        lookup(row, col + 1, Orientation::Vertical),
                        lookup(row + 1, col, Orientation::Horizontal),
                        lookup(row, col, Orientation::Vertical),
                    ],
                });
            }
        }

        Ok(Self {
            rows,
            cols,
            cells,
            walls,
            slots,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.cols && (pos.y as usize) < self.rows
    }

    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.contains(pos)
            .then(|| &self.cells[pos.y as usize * self.cols + pos.x as usize])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn wall(&self, id: WallId) -> &Wall {
        &self.walls[id.0]
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Bounds-checked lattice lookup.
    pub fn wall_at(&self, row: usize, col: usize, orientation: Orientation) -> Option<WallId> {
        if row > self.rows || col > self.cols {
            return None;
        }
        self.slots[slot_index(self.cols, row, col, orientation)]
    }

    /// The wall shared by two 4-adjacent cells.
    pub fn wall_between(&self, a: CellPos, b: CellPos) -> Option<WallId> {
        if manhattan_distance(a, b) != 1 || !self.contains(a) || !self.contains(b) {
            return None;
        }
        if a.x != b.x {
            self.wall_at(a.y as usize, a.x.max(b.x) as usize, Orientation::Vertical)
        } else {
            self.wall_at(a.y.max(b.y) as usize, a.x as usize, Orientation::Horizontal)
        }
    }

    pub fn can_pass_between(&self, a: CellPos, b: CellPos) -> bool {
        self.wall_between(a, b)
            .is_some_and(|id| self.walls[id.0].hidden)
    }

    /// Cells reachable from `pos` in one step.
    pub fn open_neighbors(&self, pos: CellPos) -> Vec<CellPos> {
        let Some(cell) = self.cell(pos) else {
            return Vec::new();
        };
        cell.walls()
            .iter()
            .map(|id| &self.walls[id.0])
            .filter(|wall| wall.hidden)
            .filter_map(|wall| wall.cells().find(|c| *c != pos))
            .collect()
    }

    /// Walls in lattice row-major order, horizontal before vertical.
    pub fn walls(&self) -> impl Iterator<Item = (WallId, &Wall)> {
        self.walls.iter().enumerate().map(|(i, w)| (WallId(i), w))
    }

    pub fn for_each_wall(&self, mut visit: impl FnMut(WallId, &Wall)) {
        for (id, wall) in self.walls() {
            visit(id, wall);
        }
    }

    pub fn for_each_wall_filtered(
        &self,
        mut visit: impl FnMut(WallId, &Wall),
        filter: impl Fn(&Wall) -> bool,
    ) {
        for (id, wall) in self.walls() {
            if filter(wall) {
                visit(id, wall);
            }
        }
    }

    pub fn hidden_wall_count(&self) -> usize {
        self.walls.iter().filter(|w| w.hidden).count()
    }

    /// Closes every wall, then carves a perfect maze with randomized Prim's.
    ///
    /// A frontier wall is carved only when exactly one of its two cells has
    /// been visited, so the carved walls always form a spanning tree.
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        for wall in &mut self.walls {
            wall.hidden = false;
        }

        let mut visited = vec![false; self.rows * self.cols];
        let mut frontier: Vec<WallId> = Vec::with_capacity(self.walls.len());

        let start_row = rng.gen_range(0..self.rows);
        let start_col = rng.gen_range(0..self.cols);
        self.visit(start_row * self.cols + start_col, &mut visited, &mut frontier);

        let mut carved = 0usize;
        while !frontier.is_empty() {
            let idx = rng.gen_range(0..frontier.len());
            let id = frontier.swap_remove(idx);
            let wall = &self.walls[id.0];
            if wall.is_boundary() {
                continue;
            }

            let mut unvisited = None;
            let mut visited_count = 0;
            for cell in wall.cells() {
                let cell_idx = cell.y as usize * self.cols + cell.x as usize;
                if visited[cell_idx] {
                    visited_count += 1;
                } else {
                    unvisited = Some(cell_idx);
                }
            }
            let Some(next) = unvisited else {
                continue;
            };
            if visited_count != 1 {
                continue;
            }

            self.walls[id.0].hidden = true;
            carved += 1;
            self.visit(next, &mut visited, &mut frontier);
        }

        tracing::debug!(
            rows = self.rows,
            cols = self.cols,
            carved,
            "maze randomized"
        );
    }

    fn visit(&self, cell_idx: usize, visited: &mut [bool], frontier: &mut Vec<WallId>) {
        visited[cell_idx] = true;
        frontier.extend_from_slice(&self.cells[cell_idx].walls);
    }
}

fn slot_index(cols: usize, row: usize, col: usize, orientation: Orientation) -> usize {
    (row * (cols + 1) + col) * 2 + orientation.slot()
}
