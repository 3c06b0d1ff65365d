/// Errors produced while building or driving a game session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MazeError {
    /// A maze needs at least one row and one column.
    #[error("maze must have at least one row and one column (got {rows} rows x {cols} cols)")]
    EmptyGrid { rows: usize, cols: usize },

    /// A configuration value is out of its accepted range.
    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// Input was routed to a player slot the session does not have.
    #[error("player {index} does not exist (session has {players} players)")]
    UnknownPlayer { index: usize, players: usize },

    /// A cell coordinate outside the maze.
    #[error("cell ({x}, {y}) is outside the maze")]
    OutOfBounds { x: i32, y: i32 },
}
