//! Draw list handed to the host each processed tick, and the host callback
//! interface.
//!
//! All shapes are in grid-fractional coordinates: cell `(x, y)` covers
//! `[x, x + 1] x [y, y + 1]`. The host maps them to its own surface.

use crate::color::{DynamicColorMap, Rgba};
use crate::components::{Player, Target};
use crate::layout::{cell_rect, wall_rect, Layout, Rect};
use crate::maze::Maze;
use crate::vector::{CellPos, Vec2};

const WALL_OVERLAY_OPACITY: f64 = 0.5;

/// What a command depicts, so text-mode hosts can pick glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Target,
    Wall,
    Floor,
    Player,
    Overlay,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle { center: Vec2, radius: f64 },
    /// The occupancy map, blended over the scene.
    WallOverlay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub layer: Layer,
    pub shape: Shape,
    pub color: Rgba,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub game_time_ms: f64,
    /// Back-to-front.
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.layer == layer)
    }
}

/// Callbacks from the simulation core to whatever presents it.
pub trait Host {
    fn request_redraw(&mut self, frame: &Frame);

    fn on_score_changed(&mut self, player: usize, score: u32);

    fn on_player_moved(&mut self, _player: usize, _position: CellPos) {}
}

/// Everything needed to compose one frame.
pub struct Scene<'a> {
    pub maze: &'a Maze,
    pub players: &'a [Player],
    pub targets: &'a [Target],
    pub layout: &'a Layout,
    pub colors: &'a DynamicColorMap,
    pub wall_width: f64,
    pub floor_opacity: f64,
    pub game_time_ms: f64,
}

impl Scene<'_> {
    pub fn compose(&self) -> Frame {
        let mut commands = Vec::with_capacity(
            self.targets.len() + self.maze.wall_count() + self.players.len() * 3 + 1,
        );

        for target in self.targets {
            commands.push(DrawCommand {
                layer: Layer::Target,
                shape: Shape::Rect(cell_rect(target.position)),
                color: target.color,
            });
        }

        let width = self.layout.base_width() as f64;
        let height = self.layout.base_height() as f64;
        self.maze.for_each_wall_filtered(
            |_, wall| {
                let rect = wall_rect(wall, self.wall_width);
                let pixel_center = self.layout.rect_to_pixels(rect).center();
                commands.push(DrawCommand {
                    layer: Layer::Wall,
                    shape: Shape::Rect(rect),
                    color: self
                        .colors
                        .color_at(pixel_center, width, height, self.game_time_ms),
                });
            },
            |wall| !wall.hidden,
        );

        for player in self.players {
            self.push_player(player, &mut commands);
        }

        commands.push(DrawCommand {
            layer: Layer::Overlay,
            shape: Shape::WallOverlay,
            color: Rgba::rgba(0, 0, 0, WALL_OVERLAY_OPACITY),
        });

        Frame {
            game_time_ms: self.game_time_ms,
            commands,
        }
    }

    /// Floor highlight (cross-faded into the next cell while the player is
    /// more than half way there), then the player disc.
    fn push_player(&self, player: &Player, commands: &mut Vec<DrawCommand>) {
        let spread = player.offset.magnitude().min(1.0);
        let fade = 2.0 * (spread - 0.5);
        let leaving = spread > 0.5;

        commands.push(DrawCommand {
            layer: Layer::Floor,
            shape: Shape::Rect(cell_rect(player.position)),
            color: player
                .color
                .with_alpha(self.floor_opacity * (1.0 - if leaving { fade } else { 0.0 })),
        });

        let next = CellPos::from_rounded(player.location());
        if leaving && next != player.position {
            commands.push(DrawCommand {
                layer: Layer::Floor,
                shape: Shape::Rect(cell_rect(next)),
                color: player.color.with_alpha(self.floor_opacity * fade),
            });
        }

        commands.push(DrawCommand {
            layer: Layer::Player,
            shape: Shape::Circle {
                center: player.location() + Vec2::new(0.5, 0.5),
                radius: player.size / 2.0,
            },
            color: player.color,
        });
    }
}
