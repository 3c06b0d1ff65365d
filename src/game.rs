//! Top-level game session: owns the maze, the players and their
//! controllers, the target pool and the frame clock.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::color::{DynamicColorMap, PLAYER_COLORS};
use crate::components::{Direction, Player, Target};
use crate::config::GameConfig;
use crate::error::MazeError;
use crate::layout::Layout;
use crate::maze::Maze;
use crate::occupancy::OccupancyMap;
use crate::player::Controller;
use crate::render::{Frame, Host, Scene};
use crate::vector::{CellPos, Vec2};

/// Ticks further apart than this are drawn but not simulated.
const MAX_FRAME_GAP_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not running.
    Stopped,
    /// Too soon after the previous processed tick; nothing happened.
    Throttled,
    /// Drawn, but the gap was too large to simulate.
    Stalled,
    /// Drawn and simulated.
    Advanced,
}

pub struct GameSession {
    config: GameConfig,
    rng: Pcg64Mcg,
    maze: Maze,
    layout: Layout,
    occupancy: OccupancyMap,
    colors: DynamicColorMap,
    players: Vec<Player>,
    controllers: Vec<Controller>,
    targets: Vec<Target>,
    game_time_ms: f64,
    last_tick_ms: Option<u64>,
    running: bool,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, MazeError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg64Mcg::seed_from_u64(seed);

        let mut maze = Maze::new(config.rows, config.cols)?;
        maze.randomize(&mut rng);
        let layout = Layout::new(config.cols, config.rows, &config);
        let occupancy = OccupancyMap::build(&maze, &layout, config.wall_width);
        let colors = DynamicColorMap::new(&mut rng);

        let right = config.cols as i32 - 1;
        let bottom = config.rows as i32 - 1;
        let corners = [
            CellPos::new(0, 0),
            CellPos::new(right, 0),
            CellPos::new(0, bottom),
            CellPos::new(right, bottom),
        ];
        let players: Vec<Player> = (0..config.players)
            .map(|i| Player::new(i, corners[i], config.player_size, PLAYER_COLORS[i]))
            .collect();
        let controllers = players
            .iter()
            .map(|_| Controller::from_config(&config))
            .collect();

        tracing::info!(
            seed,
            cols = config.cols,
            rows = config.rows,
            players = config.players,
            scheme = ?config.scheme,
            "game session created"
        );

        let mut session = Self {
            config,
            rng,
            maze,
            layout,
            occupancy,
            colors,
            players,
            controllers,
            targets: Vec::new(),
            game_time_ms: 0.0,
            last_tick_ms: None,
            running: false,
        };
        session.refill_targets();
        Ok(session)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn occupancy(&self) -> &OccupancyMap {
        &self.occupancy
    }

    pub fn game_time_ms(&self) -> f64 {
        self.game_time_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self, host: &mut dyn Host) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_tick_ms = None;
        tracing::info!(game_time_ms = self.game_time_ms, "session started");

        self.check_target_collisions(host);
        self.report_scores(host);
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        for controller in &mut self.controllers {
            controller.release_all();
        }
        tracing::info!(game_time_ms = self.game_time_ms, "session stopped");
    }

    pub fn on_resize(&mut self, screen_width: u32, screen_height: u32) {
        self.layout = Layout::new(self.config.cols, self.config.rows, &self.config);
        let fit = self.layout.fit_screen(screen_width, screen_height);
        self.occupancy
            .recompute(&self.maze, &self.layout, self.config.wall_width);
        self.last_tick_ms = None;
        tracing::debug!(screen_width, screen_height, scale = fit.scale, "resized");
    }

    pub fn set_direction_pressed(
        &mut self,
        player: usize,
        dir: Direction,
        pressed: bool,
    ) -> Result<(), MazeError> {
        let players = self.players.len();
        let (Some(state), Some(controller)) =
            (self.players.get(player), self.controllers.get_mut(player))
        else {
            return Err(MazeError::UnknownPlayer {
                index: player,
                players,
            });
        };
        controller.set_direction(state, &self.maze, dir, pressed);
        Ok(())
    }

    pub fn tick(&mut self, now_ms: u64, host: &mut dyn Host) -> TickOutcome {
        if !self.running {
            return TickOutcome::Stopped;
        }

        let diff = self.last_tick_ms.map(|last| now_ms.saturating_sub(last));
        if diff.is_some_and(|d| d < self.config.frame_interval_ms()) {
            return TickOutcome::Throttled;
        }
        self.last_tick_ms = Some(now_ms);

        let frame = self.frame();
        host.request_redraw(&frame);

        let Some(diff) = diff.filter(|d| *d <= MAX_FRAME_GAP_MS) else {
            tracing::trace!(?diff, "tick not simulated");
            return TickOutcome::Stalled;
        };

        self.game_time_ms += diff as f64;
        let dt = diff as f64;
        let mut moved = false;
        for (player, controller) in self.players.iter_mut().zip(&mut self.controllers) {
            if controller.advance(player, &self.maze, &self.occupancy, dt) {
                host.on_player_moved(player.index, player.position);
                moved = true;
            }
        }
        if moved {
            self.check_target_collisions(host);
        }
        TickOutcome::Advanced
    }

    /// Awards every target that shares a cell with a player to the first such
    /// player, reports the new scores of those players, then replaces the
    /// collected targets. Returns how many were collected.
    pub fn check_target_collisions(&mut self, host: &mut dyn Host) -> usize {
        let mut collected = 0;
        let mut scored = vec![false; self.players.len()];
        for target in &mut self.targets {
            if let Some(player) = self
                .players
                .iter_mut()
                .find(|p| p.position == target.position)
            {
                player.score += 1;
                scored[player.index] = true;
                target.done = true;
                collected += 1;
                tracing::debug!(
                    player = player.index,
                    score = player.score,
                    x = target.position.x,
                    y = target.position.y,
                    "target collected"
                );
            }
        }

        if collected > 0 {
            for player in self.players.iter().filter(|p| scored[p.index]) {
                host.on_score_changed(player.index, player.score);
            }
            self.targets.retain(|t| !t.done);
            self.refill_targets();
        }
        collected
    }

    /// Carves a fresh maze in place. Players and targets keep their cells.
    pub fn regenerate(&mut self, host: &mut dyn Host) {
        self.maze.randomize(&mut self.rng);
        self.occupancy
            .recompute(&self.maze, &self.layout, self.config.wall_width);
        for controller in &mut self.controllers {
            controller.release_all();
        }
        tracing::info!("maze regenerated");
        let frame = self.frame();
        host.request_redraw(&frame);
    }

    /// Replaces the target pool with targets at `cells`. Cells outside the
    /// grid are ignored.
    pub fn reset_targets(&mut self, cells: impl IntoIterator<Item = CellPos>) {
        self.targets = cells
            .into_iter()
            .filter(|cell| self.maze.contains(*cell))
            .map(Target::new)
            .collect();
    }

    /// Moves a player to `cell` and clears any motion in progress.
    pub fn teleport_player(&mut self, index: usize, cell: CellPos) -> Result<(), MazeError> {
        let players = self.players.len();
        if !self.maze.contains(cell) {
            return Err(MazeError::OutOfBounds {
                x: cell.x,
                y: cell.y,
            });
        }
        let player = self
            .players
            .get_mut(index)
            .ok_or(MazeError::UnknownPlayer { index, players })?;
        player.position = cell;
        player.offset = Vec2::ZERO;
        self.controllers[index] = Controller::from_config(&self.config);
        Ok(())
    }

    pub fn frame(&self) -> Frame {
        Scene {
            maze: &self.maze,
            players: &self.players,
            targets: &self.targets,
            layout: &self.layout,
            colors: &self.colors,
            wall_width: self.config.wall_width,
            floor_opacity: self.config.player_floor_opacity,
            game_time_ms: self.game_time_ms,
        }
        .compose()
    }

    fn report_scores(&self, host: &mut dyn Host) {
        for player in &self.players {
            host.on_score_changed(player.index, player.score);
        }
    }

    fn refill_targets(&mut self) {
        let cols = self.config.cols as i32;
        let rows = self.config.rows as i32;
        while self.targets.len() < self.config.targets {
            let cell = CellPos::new(self.rng.gen_range(0..cols), self.rng.gen_range(0..rows));
            self.targets.push(Target::new(cell));
        }
    }
}
