use crate::controller::GameMode;

/// Notifications a host shell can present to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A fresh board was dealt.
    Started { mode: GameMode, grid_size: usize },

    /// The board reached the solved layout. Sent once per game.
    Solved { moves: usize },
}
