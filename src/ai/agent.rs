use crate::game::{Board, Color};

/// Universal interface for all Reversi players.
///
/// An agent receives the board with its own color to move and returns the
/// chosen successor with the side to move already handed to the opponent.
pub trait Agent {
    /// Choose a move. `None` means no legal move exists, which ends the game.
    fn play_turn(&mut self, board: &Board) -> Option<Board>;

    /// Called once per finished game with the final board and the color this
    /// agent played.
    fn on_game_over(&mut self, _final_board: &Board, _our_color: Color) {}

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Turn learning (and exploration) on or off. No-op for fixed players.
    fn set_learning(&mut self, _learning: bool) {}

    /// True once the agent has produced a non-finite evaluation.
    fn is_degenerate(&self) -> bool {
        false
    }
}
