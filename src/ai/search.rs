//! Minimax and alpha-beta search over any tree that can enumerate its
//! successors. The leaf evaluator always scores from one fixed point of view;
//! `maximizing` says whether the player at the current layer wants that score
//! high or low.

use crate::game::Board;

/// Anything the search can expand.
pub trait Searchable: Sized {
    /// Positions reachable in one move, in a stable order. Empty means terminal.
    fn successors(&self) -> Vec<Self>;
}

impl Searchable for Board {
    /// Legal children with the side to move handed to the opponent.
    fn successors(&self) -> Vec<Board> {
        let mut children = self.children();
        for child in &mut children {
            child.swap_turn();
        }
        children
    }
}

/// Best successor found by a search and its backed-up value. `best` is `None`
/// when the root itself was evaluated (depth 0 or terminal).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<N> {
    pub best: Option<N>,
    pub value: f64,
}

/// Plain minimax without pruning.
pub fn minimax<N, F>(node: &N, depth: usize, maximizing: bool, eval: &mut F) -> SearchResult<N>
where
    N: Searchable,
    F: FnMut(&N) -> f64,
{
    let successors = node.successors();
    if depth == 0 || successors.is_empty() {
        return SearchResult {
            best: None,
            value: eval(node),
        };
    }

    let turn_factor = if maximizing { 1.0 } else { -1.0 };
    let mut best_value = f64::NEG_INFINITY * turn_factor;
    let mut best = None;

    for child in successors {
        let value = minimax(&child, depth - 1, !maximizing, eval).value;
        if value * turn_factor > best_value * turn_factor {
            best_value = value;
            best = Some(child);
        }
    }

    SearchResult {
        best,
        value: best_value,
    }
}

/// Minimax with alpha-beta pruning. With `alpha = -inf` and `beta = +inf` the
/// result is identical to [`minimax`]; ties keep the first successor.
pub fn alpha_beta<N, F>(
    node: &N,
    depth: usize,
    mut alpha: f64,
    mut beta: f64,
    maximizing: bool,
    eval: &mut F,
) -> SearchResult<N>
where
    N: Searchable,
    F: FnMut(&N) -> f64,
{
    let successors = node.successors();
    if depth == 0 || successors.is_empty() {
        return SearchResult {
            best: None,
            value: eval(node),
        };
    }

    let turn_factor = if maximizing { 1.0 } else { -1.0 };
    let mut best_value = f64::NEG_INFINITY * turn_factor;
    let mut best = None;

    for child in successors {
        let value = alpha_beta(&child, depth - 1, alpha, beta, !maximizing, eval).value;
        if value * turn_factor > best_value * turn_factor {
            best_value = value;
            best = Some(child);
        }
        if maximizing {
            alpha = alpha.max(best_value);
        } else {
            beta = beta.min(best_value);
        }
        if beta <= alpha {
            break;
        }
    }

    SearchResult {
        best,
        value: best_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::heuristic::{binkley_score, simple_score};
    use crate::game::Color;

    /// Small explicit game tree: leaves carry values, inner nodes children.
    #[derive(Debug, Clone, PartialEq)]
    enum Tree {
        Leaf(f64),
        Node(Vec<Tree>),
    }

    impl Searchable for Tree {
        fn successors(&self) -> Vec<Tree> {
            match self {
                Tree::Leaf(_) => Vec::new(),
                Tree::Node(children) => children.clone(),
            }
        }
    }

    fn leaf_value(tree: &Tree) -> f64 {
        match tree {
            Tree::Leaf(v) => *v,
            Tree::Node(_) => 0.0,
        }
    }

    fn textbook_tree() -> Tree {
        use Tree::{Leaf, Node};
        Node(vec![
            Node(vec![Leaf(3.0), Leaf(12.0), Leaf(8.0)]),
            Node(vec![Leaf(2.0), Leaf(4.0), Leaf(6.0)]),
            Node(vec![Leaf(14.0), Leaf(5.0), Leaf(2.0)]),
        ])
    }

    #[test]
    fn minimax_textbook_value() {
        let tree = textbook_tree();
        let result = minimax(&tree, 2, true, &mut leaf_value);
        assert_eq!(result.value, 3.0);
        assert_eq!(result.best, Some(tree.successors()[0].clone()));
    }

    #[test]
    fn alpha_beta_prunes_but_agrees() {
        let tree = textbook_tree();
        let mut evaluated = 0;
        let mut counting = |t: &Tree| {
            evaluated += 1;
            leaf_value(t)
        };
        let result = alpha_beta(&tree, 2, f64::NEG_INFINITY, f64::INFINITY, true, &mut counting);
        assert_eq!(result.value, 3.0);
        assert_eq!(result.best, Some(tree.successors()[0].clone()));
        assert!(evaluated < 9, "expected pruning, evaluated {evaluated} leaves");
    }

    #[test]
    fn depth_zero_evaluates_root() {
        let tree = textbook_tree();
        let result = alpha_beta(&tree, 0, f64::NEG_INFINITY, f64::INFINITY, true, &mut |_: &Tree| 42.0);
        assert_eq!(result, SearchResult { best: None, value: 42.0 });
    }

    #[test]
    fn ties_keep_first_child() {
        use Tree::{Leaf, Node};
        let tree = Node(vec![Leaf(1.0), Leaf(5.0), Leaf(5.0)]);
        let result = alpha_beta(&tree, 1, f64::NEG_INFINITY, f64::INFINITY, true, &mut leaf_value);
        assert_eq!(result.best, Some(Leaf(5.0)));
        let result = minimax(&tree, 1, false, &mut leaf_value);
        assert_eq!(result.best, Some(Leaf(1.0)));
    }

    #[test]
    fn successors_hand_turn_to_opponent() {
        let board = Board::initial();
        let successors = board.successors();
        assert_eq!(successors.len(), 4);
        assert!(successors.iter().all(|b| b.turn_color() == Color::White));
    }

    #[test]
    fn depth_one_simple_heuristic_on_opening() {
        let board = Board::initial();
        let mut eval = |b: &Board| simple_score(b, Color::Black);
        let result = alpha_beta(&board, 1, f64::NEG_INFINITY, f64::INFINITY, true, &mut eval);
        assert_eq!(result.value, 3.0);
        // Every opening flips one disc, so the first move in row-major order wins
        let mut expected = Board::initial().play(2, 3).unwrap();
        expected.swap_turn();
        assert_eq!(result.best, Some(expected));
    }

    #[test]
    fn minimax_and_alpha_beta_agree_on_reversi_positions() {
        let mut positions = vec![Board::initial()];
        let mut board = Board::initial();
        for ply in 0..6 {
            let successors = board.successors();
            board = successors[(ply * 3) % successors.len()];
            positions.push(board);
        }

        for position in &positions {
            let perspective = position.turn_color();
            for depth in 0..=3 {
                let mut eval = |b: &Board| binkley_score(b, perspective);
                let plain = minimax(position, depth, true, &mut eval);
                let pruned =
                    alpha_beta(position, depth, f64::NEG_INFINITY, f64::INFINITY, true, &mut eval);
                assert_eq!(plain.value, pruned.value, "depth {depth}");
                assert_eq!(plain.best, pruned.best, "depth {depth}");
            }
        }
    }

    #[test]
    fn minimax_and_alpha_beta_agree_at_depth_four() {
        let board = Board::initial();
        let mut eval = |b: &Board| simple_score(b, Color::Black);
        let plain = minimax(&board, 4, true, &mut eval);
        let pruned = alpha_beta(&board, 4, f64::NEG_INFINITY, f64::INFINITY, true, &mut eval);
        assert_eq!(plain, pruned);
    }
}
