//! Multiplayer maze chase: a randomized Prim's maze, continuous or
//! cell-snapping movement against a pixel occupancy map, and a frame-gated
//! game session that hands draw lists to a host.
//!
//! ```
//! use maze_game::config::GameConfig;
//! use maze_game::game::GameSession;
//!
//! let session = GameSession::new(GameConfig { seed: Some(7), ..GameConfig::default() }).unwrap();
//! assert_eq!(session.maze().hidden_wall_count(), 20 * 14 - 1);
//! ```

#![deny(unsafe_code)]

pub mod color;
pub mod components;
pub mod config;
pub mod error;
pub mod game;
pub mod layout;
pub mod maze;
pub mod occupancy;
pub mod player;
pub mod render;
pub mod vector;

pub use error::MazeError;
