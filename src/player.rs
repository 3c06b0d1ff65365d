//! Player controllers: turn directional intent into motion through the maze.
//!
//! [`SmoothController`] is the primary scheme: continuous motion, probed
//! against the occupancy map, with axis-aligned sliding along walls.
//! [`SnapController`] hops cell to cell and consults the maze topology
//! directly.

use crate::components::{Direction, Player};
use crate::config::{ControlScheme, GameConfig};
use crate::maze::Maze;
use crate::occupancy::Obstacles;
use crate::vector::{CellPos, Vec2};

/// Offset magnitude at which a player is considered to be in the next cell.
pub const CELL_CROSSING_THRESHOLD: f64 = 1.2 * (std::f64::consts::SQRT_2 / 2.0);

/// Offset from a cell's origin to its centre, where collisions are probed.
const CELL_CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// Set of currently held directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressedDirections(u8);

impl PressedDirections {
    pub fn set(&mut self, dir: Direction, pressed: bool) {
        if pressed {
            self.0 |= dir.bit();
        } else {
            self.0 &= !dir.bit();
        }
    }

    pub fn is_pressed(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.is_pressed(*d))
    }

    /// Sum of the unit vectors of every held direction.
    pub fn combined(self) -> Vec2 {
        self.iter().fold(Vec2::ZERO, |acc, d| acc + d.unit())
    }
}

#[derive(Debug, Clone)]
pub struct SmoothController {
    pressed: PressedDirections,
    /// Cells per second.
    speed: f64,
}

impl SmoothController {
    pub fn new(speed: f64) -> Self {
        Self {
            pressed: PressedDirections::default(),
            speed,
        }
    }

    pub fn set_pressed(&mut self, dir: Direction, pressed: bool) {
        self.pressed.set(dir, pressed);
    }

    pub fn pressed(&self) -> PressedDirections {
        self.pressed
    }

    /// Moves `player` for `dt_ms` of held input. Returns `true` when the
    /// player ended up in a different cell.
    pub fn advance<O>(&mut self, player: &mut Player, obstacles: &O, dt_ms: f64) -> bool
    where
        O: Obstacles + ?Sized,
    {
        let direction = self.pressed.combined();
        if direction.is_zero() {
            return false;
        }

        let mut step = direction.normalize() * (self.speed * dt_ms / 1000.0);
        let from = player.location();
        let to = from + step;
        let blocked = |p: Vec2| obstacles.is_occupied(p + CELL_CENTER);

        if blocked(to) {
            if !blocked(Vec2::new(from.x, to.y)) {
                step.x = 0.0;
            } else if !blocked(Vec2::new(to.x, from.y)) {
                step.y = 0.0;
            } else {
                return false;
            }
        }

        player.offset += step;
        if player.offset.magnitude() < CELL_CROSSING_THRESHOLD {
            return false;
        }

        let absolute = player.location();
        let previous = player.position;
        player.position = CellPos::from_rounded(absolute);
        player.offset = absolute - player.position.as_vec2();
        tracing::debug!(
            player = player.index,
            from = ?previous,
            to = ?player.position,
            "player crossed into a new cell"
        );
        previous != player.position
    }
}

/// Result of feeding a press to the snap controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Started,
    Buffered,
    Rejected,
}

#[derive(Debug, Clone)]
struct Hop {
    dir: Direction,
    target: CellPos,
    elapsed_ms: f64,
}

#[derive(Debug, Clone, Copy)]
struct BufferedPress {
    dir: Direction,
    at_ms: f64,
}

#[derive(Debug, Clone)]
pub struct SnapController {
    move_ms: f64,
    expire_ms: f64,
    clock_ms: f64,
    hop: Option<Hop>,
    buffered: Option<BufferedPress>,
}

impl SnapController {
    pub fn new(move_ms: f64, expire_ms: f64) -> Self {
        Self {
            move_ms,
            expire_ms,
            clock_ms: 0.0,
            hop: None,
            buffered: None,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.hop.is_some()
    }

    pub fn has_buffered(&self) -> bool {
        self.buffered.is_some()
    }

    pub fn press(&mut self, player: &Player, maze: &Maze, dir: Direction) -> PressOutcome {
        if self.hop.is_some() {
            tracing::trace!(player = player.index, ?dir, "buffering input");
            self.buffered = Some(BufferedPress {
                dir,
                at_ms: self.clock_ms,
            });
            return PressOutcome::Buffered;
        }

        let (dx, dy) = dir.delta();
        let target = CellPos::new(
            (player.position.x + dx).clamp(0, maze.cols() as i32 - 1),
            (player.position.y + dy).clamp(0, maze.rows() as i32 - 1),
        );
        if !maze.can_pass_between(player.position, target) {
            return PressOutcome::Rejected;
        }

        self.hop = Some(Hop {
            dir,
            target,
            elapsed_ms: 0.0,
        });
        PressOutcome::Started
    }

    /// Animates the current hop. Returns `true` when a hop finished and the
    /// player now occupies its target cell.
    pub fn advance(&mut self, player: &mut Player, maze: &Maze, dt_ms: f64) -> bool {
        self.clock_ms += dt_ms;
        let Some(hop) = self.hop.as_mut() else {
            return false;
        };

        hop.elapsed_ms += dt_ms;
        let t = (hop.elapsed_ms / self.move_ms).min(1.0);
        if t < 1.0 {
            player.offset = hop.dir.unit() * ease_out(t);
            return false;
        }

        player.position = hop.target;
        player.offset = Vec2::ZERO;
        self.hop = None;

        if let Some(press) = self.buffered.take() {
            if self.clock_ms - press.at_ms > self.expire_ms {
                tracing::trace!(player = player.index, dir = ?press.dir, "buffered input expired");
            } else {
                tracing::trace!(player = player.index, dir = ?press.dir, "replaying buffered input");
                self.press(player, maze, press.dir);
            }
        }
        true
    }
}

/// Quadratic ease-out.
fn ease_out(t: f64) -> f64 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone)]
pub enum Controller {
    Smooth(SmoothController),
    Snap(SnapController),
}

impl Controller {
    pub fn from_config(config: &GameConfig) -> Self {
        match config.scheme {
            ControlScheme::Smooth => Controller::Smooth(SmoothController::new(config.movement_speed)),
            ControlScheme::Snap => {
                Controller::Snap(SnapController::new(config.snap_move_ms, config.snap_expire_ms))
            }
        }
    }

    /// Routes a key press or release. The snap scheme reacts to presses only.
    pub fn set_direction(&mut self, player: &Player, maze: &Maze, dir: Direction, pressed: bool) {
        match self {
            Controller::Smooth(smooth) => smooth.set_pressed(dir, pressed),
            Controller::Snap(snap) => {
                if pressed {
                    snap.press(player, maze, dir);
                }
            }
        }
    }

    pub fn advance<O>(&mut self, player: &mut Player, maze: &Maze, obstacles: &O, dt_ms: f64) -> bool
    where
        O: Obstacles + ?Sized,
    {
        match self {
            Controller::Smooth(smooth) => smooth.advance(player, obstacles, dt_ms),
            Controller::Snap(snap) => snap.advance(player, maze, dt_ms),
        }
    }

    /// Drops any held or queued input.
    pub fn release_all(&mut self) {
        match self {
            Controller::Smooth(smooth) => smooth.pressed.clear(),
            Controller::Snap(snap) => snap.buffered = None,
        }
    }
}
