use std::time::Instant;

use log::{debug, trace};

use crate::{
    board::Board,
    move_generator::generate_moves,
    moves::MoveRollback,
    piece::Color,
};

pub const DEFAULT_SEARCH_DEPTH: u8 = 3;
/// Score of a position where the maximizing side has no move
pub const SCORE_NO_MOVES_MAXIMIZING: i32 = i32::MIN;
/// Score of a position where the minimizing side has no move
pub const SCORE_NO_MOVES_MINIMIZING: i32 = i32::MAX;

#[derive(Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaf_nodes: u64,
}

/// Blue maximizes, Red minimizes
pub fn side_to_move(maximizing: bool) -> Color {
    if maximizing { Color::Blue } else { Color::Red }
}

/// Plain minimax with no pruning. Returns the score and the board after the chosen move, or the board itself
/// when it is already terminal. No board is returned when the side to move has no move at all.
pub fn minimax(board: &Board, depth: u8, maximizing: bool) -> (i32, Option<Board>) {
    Searcher::new(board).search(depth, maximizing)
}

/// Searches on a private copy of the board, making and unmaking moves on it instead of copying per node.
pub struct Searcher {
    board: Board,
    rollback: MoveRollback,
    pub stats: SearchStats,
}

impl Searcher {
    pub fn new(board: &Board) -> Searcher {
        Searcher {
            board: board.clone(),
            rollback: MoveRollback::default(),
            stats: SearchStats::default(),
        }
    }

    pub fn search(&mut self, depth: u8, maximizing: bool) -> (i32, Option<Board>) {
        let start_time = Instant::now();
        let result = self.search_root(depth, maximizing);
        let elapsed = start_time.elapsed();

        debug!(
            "minimax depth {depth} for {} scored {} in {}. {:?}",
            side_to_move(maximizing),
            result.0,
            humantime::format_duration(elapsed),
            self.stats
        );
        if let Some(b) = &result.1 {
            trace!("Chosen board:\n{b}");
        }
        debug_assert!(self.rollback.is_empty());

        result
    }

    fn search_root(&mut self, depth: u8, maximizing: bool) -> (i32, Option<Board>) {
        self.stats.nodes += 1;

        if depth == 0 || self.board.winner_by_count().is_some() {
            self.stats.leaf_nodes += 1;
            return (self.board.evaluate(), Some(self.board.clone()));
        }

        let moves = generate_moves(&self.board, side_to_move(maximizing));
        let mut best: Option<(i32, usize)> = None;

        for (i, r#move) in moves.iter().enumerate() {
            self.board.make_move(r#move, &mut self.rollback);
            let score = self.minimax_recurse(depth - 1, !maximizing);
            self.board.unmake_move(r#move, &mut self.rollback);

            if improves(score, best.map(|b| b.0), maximizing) {
                best = Some((score, i));
            }
        }

        match best {
            Some((score, i)) => (score, Some(self.board.successor(&moves[i]))),
            None => (no_moves_score(maximizing), None),
        }
    }

    fn minimax_recurse(&mut self, depth: u8, maximizing: bool) -> i32 {
        self.stats.nodes += 1;

        // Count-only terminal test; a side with no moves is scored below instead
        if depth == 0 || self.board.winner_by_count().is_some() {
            self.stats.leaf_nodes += 1;
            return self.board.evaluate();
        }

        let moves = generate_moves(&self.board, side_to_move(maximizing));
        let mut best = None;

        for r#move in &moves {
            self.board.make_move(r#move, &mut self.rollback);
            let score = self.minimax_recurse(depth - 1, !maximizing);
            self.board.unmake_move(r#move, &mut self.rollback);

            if improves(score, best, maximizing) {
                best = Some(score);
            }
        }

        best.unwrap_or(no_moves_score(maximizing))
    }
}

/// Strict comparison so the first move reaching the best score keeps it
#[inline]
fn improves(score: i32, best: Option<i32>, maximizing: bool) -> bool {
    match best {
        None => true,
        Some(b) if maximizing => score > b,
        Some(b) => score < b,
    }
}

#[inline]
fn no_moves_score(maximizing: bool) -> i32 {
    if maximizing {
        SCORE_NO_MOVES_MAXIMIZING
    } else {
        SCORE_NO_MOVES_MINIMIZING
    }
}
