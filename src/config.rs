//! Game settings with defaults tuned for the original look and feel, plus
//! environment overrides for the terminal host.

use crate::error::MazeError;

pub const DEFAULT_GRID_COLS: usize = 20;
pub const DEFAULT_GRID_ROWS: usize = 14;
pub const DEFAULT_FRAME_LIMIT: u32 = 30;
pub const DEFAULT_TARGETS: usize = 10;
pub const MAX_PLAYERS: usize = 4;

/// How players translate input into motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlScheme {
    /// Continuous motion with wall sliding.
    #[default]
    Smooth,
    /// Animated cell-to-cell hops with a one-slot input buffer.
    Snap,
}

impl ControlScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "smooth" => Some(ControlScheme::Smooth),
            "snap" | "snappy" => Some(ControlScheme::Snap),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub cols: usize,
    pub rows: usize,
    pub players: usize,
    pub targets: usize,
    /// Upper bound on processed ticks per second.
    pub frame_limit: u32,
    /// Base pixels per grid unit before the render-resolution cap.
    pub detail_resolution: f64,
    pub max_render_resolution: f64,
    /// Wall thickness as a fraction of a cell.
    pub wall_width: f64,
    /// Empty margin around the maze, in cells.
    pub grid_padding: f64,
    /// Player circle diameter as a fraction of a cell.
    pub player_size: f64,
    pub player_floor_opacity: f64,
    /// Cells per second for the smooth controller.
    pub movement_speed: f64,
    pub scheme: ControlScheme,
    pub snap_move_ms: f64,
    pub snap_expire_ms: f64,
    /// Fixed seed for reproducible mazes and target placement.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_GRID_COLS,
            rows: DEFAULT_GRID_ROWS,
            players: 1,
            targets: DEFAULT_TARGETS,
            frame_limit: DEFAULT_FRAME_LIMIT,
            detail_resolution: 10.0,
            max_render_resolution: 1000.0,
            wall_width: 0.1,
            grid_padding: 0.4,
            player_size: 0.65,
            player_floor_opacity: 0.25,
            movement_speed: 500.0 / 120.0,
            scheme: ControlScheme::Smooth,
            snap_move_ms: 120.0,
            snap_expire_ms: 600.0,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults overlaid with `MAZE_*` environment variables. Unparseable or
    /// non-positive values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let positive = |key: &str, default: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        Self {
            cols: positive("MAZE_COLS", defaults.cols),
            rows: positive("MAZE_ROWS", defaults.rows),
            players: positive("MAZE_PLAYERS", defaults.players).min(MAX_PLAYERS),
            targets: positive("MAZE_TARGETS", defaults.targets),
            frame_limit: lookup("MAZE_FPS")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(defaults.frame_limit),
            seed: lookup("MAZE_SEED").and_then(|v| v.trim().parse::<u64>().ok()),
            scheme: lookup("MAZE_SCHEME")
                .and_then(|v| ControlScheme::from_name(&v))
                .unwrap_or(defaults.scheme),
            ..defaults
        }
    }

    pub fn validate(&self) -> Result<(), MazeError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(MazeError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.players == 0 || self.players > MAX_PLAYERS {
            return Err(invalid(
                "players",
                format!("must be between 1 and {MAX_PLAYERS}, got {}", self.players),
            ));
        }
        if self.frame_limit == 0 {
            return Err(invalid("frame_limit", "must be positive".to_owned()));
        }
        for (field, value) in [
            ("detail_resolution", self.detail_resolution),
            ("max_render_resolution", self.max_render_resolution),
            ("player_size", self.player_size),
            ("movement_speed", self.movement_speed),
            ("snap_move_ms", self.snap_move_ms),
            ("snap_expire_ms", self.snap_expire_ms),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive and finite, got {value}")));
            }
        }
        if !(self.wall_width > 0.0 && self.wall_width < 1.0) {
            return Err(invalid(
                "wall_width",
                format!("must be inside (0, 1), got {}", self.wall_width),
            ));
        }
        if !(self.grid_padding.is_finite() && self.grid_padding >= 0.0) {
            return Err(invalid(
                "grid_padding",
                format!("must be zero or positive, got {}", self.grid_padding),
            ));
        }
        if !(0.0..=1.0).contains(&self.player_floor_opacity) {
            return Err(invalid(
                "player_floor_opacity",
                format!("must be inside [0, 1], got {}", self.player_floor_opacity),
            ));
        }
        Ok(())
    }

    /// Minimum spacing between processed ticks.
    pub fn frame_interval_ms(&self) -> u64 {
        (1000.0 / self.frame_limit as f64).round() as u64
    }
}

fn invalid(field: &'static str, reason: String) -> MazeError {
    MazeError::InvalidConfig { field, reason }
}
