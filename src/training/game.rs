use crate::ai::Agent;
use crate::error::TrainingError;
use crate::game::{Board, Color};
use crate::training::metrics::MatchResult;

/// Play one game from the initial position. `first` plays black.
///
/// Agents alternate until one of them has no legal move; the board that was
/// handed to that agent is the final board.
pub fn play_game<'a>(first: &'a mut dyn Agent, second: &'a mut dyn Agent) -> Board {
    let mut board = Board::initial();
    let mut players = [first, second];
    let mut plies = 0;

    while let Some(next) = players[plies % 2].play_turn(&board) {
        board = next;
        plies += 1;
    }

    log::trace!(
        "game over after {plies} plies: {} black, {} white",
        board.count(Color::Black),
        board.count(Color::White)
    );
    board
}

/// Play `games` games between `a` and `b`, counting results for `a`.
///
/// Game `g` is opened by `a` when `g` is even and by `b` otherwise; the
/// opener plays black. Both agents are told the outcome after every game.
/// Stops with [`TrainingError::NumericDegeneracy`] as soon as either agent
/// reports a non-finite evaluation.
pub fn run_games(
    a: &mut dyn Agent,
    b: &mut dyn Agent,
    games: usize,
) -> Result<MatchResult, TrainingError> {
    let mut result = MatchResult::default();

    for game in 0..games {
        let a_color = if game % 2 == 0 {
            Color::Black
        } else {
            Color::White
        };
        let final_board = match a_color {
            Color::Black => play_game(a, b),
            Color::White => play_game(b, a),
        };

        a.on_game_over(&final_board, a_color);
        b.on_game_over(&final_board, a_color.opposite());
        result.record(final_board.winner(), a_color);

        for agent in [&*a, &*b] {
            if agent.is_degenerate() {
                return Err(TrainingError::NumericDegeneracy {
                    agent: agent.name().to_string(),
                    games_played: game + 1,
                });
            }
        }
    }

    log::debug!(
        "{} vs {}: {} wins, {} losses, {} draws",
        a.name(),
        b.name(),
        result.wins,
        result.losses,
        result.draws
    );
    Ok(result)
}

/// Deterministic seed for one RNG stream derived from a base seed.
pub fn derive_seed(base_seed: u64, stream: u64) -> u64 {
    // FNV-1a-inspired mixing for deterministic, well-distributed seeds
    let mut hash = base_seed ^ 0x517cc1b727220a95;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= stream;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= stream >> 32;
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{BinkleyHeuristic, MinimaxAgent, RandomAgent, TdAgent, TdConfig};

    /// Random player that remembers the color it was assigned each game and
    /// whether it won.
    struct Recorder {
        inner: RandomAgent,
        colors: Vec<Color>,
        wins: usize,
        degenerate_after: Option<usize>,
    }

    impl Recorder {
        fn new(seed: u64) -> Self {
            Recorder {
                inner: RandomAgent::with_seed(seed),
                colors: Vec::new(),
                wins: 0,
                degenerate_after: None,
            }
        }
    }

    impl Agent for Recorder {
        fn play_turn(&mut self, board: &Board) -> Option<Board> {
            self.inner.play_turn(board)
        }

        fn on_game_over(&mut self, final_board: &Board, our_color: Color) {
            self.colors.push(our_color);
            if final_board.winner() == Some(our_color) {
                self.wins += 1;
            }
        }

        fn name(&self) -> &str {
            "Recorder"
        }

        fn is_degenerate(&self) -> bool {
            self.degenerate_after
                .is_some_and(|limit| self.colors.len() >= limit)
        }
    }

    #[test]
    fn test_play_game_terminates() {
        let mut a = RandomAgent::with_seed(1);
        let mut b = RandomAgent::with_seed(2);
        let board = play_game(&mut a, &mut b);
        assert!(board.children().is_empty());
        assert!(board.count(Color::Black) + board.count(Color::White) <= 64);
    }

    #[test]
    fn test_run_games_alternates_opener() {
        let mut a = Recorder::new(1);
        let mut b = Recorder::new(2);
        let result = run_games(&mut a, &mut b, 4).unwrap();
        assert_eq!(result.games(), 4);
        assert_eq!(
            a.colors,
            vec![Color::Black, Color::White, Color::Black, Color::White]
        );
        assert_eq!(
            b.colors,
            vec![Color::White, Color::Black, Color::White, Color::Black]
        );
    }

    #[test]
    fn test_run_games_counts_wins_for_first_agent() {
        let mut a = Recorder::new(3);
        let mut b = Recorder::new(4);
        let result = run_games(&mut a, &mut b, 20).unwrap();
        assert_eq!(result.wins, a.wins);
        assert_eq!(result.losses, b.wins);
        assert_eq!(result.wins + result.losses + result.draws, 20);
    }

    #[test]
    fn test_run_games_stops_on_degeneracy() {
        let mut a = Recorder::new(5);
        let mut b = Recorder::new(6);
        b.degenerate_after = Some(2);
        let err = run_games(&mut a, &mut b, 10).unwrap_err();
        match err {
            TrainingError::NumericDegeneracy {
                agent,
                games_played,
            } => {
                assert_eq!(agent, "Recorder");
                assert_eq!(games_played, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(a.colors.len(), 2);
    }

    #[test]
    fn test_untrained_network_vs_minimax_rate_in_range() {
        let config = TdConfig {
            hidden_layer_sizes: vec![10],
            ..Default::default()
        };
        let mut net = TdAgent::with_seed(config, 17);
        net.set_learning(false);
        let mut minimax = MinimaxAgent::new(3, Box::new(BinkleyHeuristic::with_seed(10.0, 17)));
        let result = run_games(&mut net, &mut minimax, 2).unwrap();
        let rate = result.win_rate();
        assert!((0.0..=1.0).contains(&rate));
        assert_eq!(result.games(), 2);
    }

    #[test]
    fn test_derive_seed_deterministic() {
        assert_eq!(derive_seed(42, 100), derive_seed(42, 100));
    }

    #[test]
    fn test_derive_seed_varies() {
        let s1 = derive_seed(42, 0);
        let s2 = derive_seed(42, 1);
        let s3 = derive_seed(42, 2);
        assert_ne!(s1, s2);
        assert_ne!(s2, s3);
        assert_ne!(s1, s3);
        assert_ne!(derive_seed(1, 0), derive_seed(2, 0));
    }
}
