use std::time::Instant;

use log::{debug, info};
use num_format::{Locale, ToFormattedString};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
    board::Board,
    move_generator::generate_moves,
    piece::Color,
    search::{Searcher, side_to_move},
};

/// Random plies played from the start before a position is searched
const MIN_OPENING_PLIES: usize = 4;
const MAX_OPENING_PLIES: usize = 24;

#[derive(Debug, Default)]
pub struct BenchResult {
    pub positions: usize,
    pub nodes: u64,
}

/// Positions reached by random play from the start. The side to move is returned with each board.
pub fn random_positions(count: usize, seed: u64) -> Vec<(Board, Color)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions = Vec::with_capacity(count);

    while positions.len() < count {
        let mut board = Board::new();
        let mut side = Color::Red;
        let plies = rng.gen_range(MIN_OPENING_PLIES..=MAX_OPENING_PLIES);

        for _ in 0..plies {
            let moves = generate_moves(&board, side);
            let Some(r#move) = moves.choose(&mut rng) else {
                break;
            };
            board.apply(r#move);
            side = side.opponent();
        }

        if board.winner_by_count().is_none() && !generate_moves(&board, side).is_empty() {
            positions.push((board, side));
        }
    }

    positions
}

/// Runs a full search on each random position and reports the total nodes and speed
pub fn bench(depth: u8, positions: usize, seed: u64) -> BenchResult {
    let boards = random_positions(positions, seed);
    let mut result = BenchResult::default();

    let start_time = Instant::now();

    for (board, side) in &boards {
        let maximizing = *side == side_to_move(true);
        let mut searcher = Searcher::new(board);
        let (score, _) = searcher.search(depth, maximizing);
        debug!("{}\n{side} to move scored {score}", board);

        result.positions += 1;
        result.nodes += searcher.stats.nodes;
    }

    let elapsed = start_time.elapsed();
    let nps = result.nodes as f64 / elapsed.as_secs_f64();

    info!(
        "Positions: {} Nodes: {} NPS: {} Time: {}",
        result.positions,
        result.nodes.to_formatted_string(&Locale::en),
        (nps as u64).to_formatted_string(&Locale::en),
        humantime::format_duration(elapsed)
    );
    println!("Nodes: {} NPS: {nps:.0} Time: {elapsed:#?}", result.nodes);

    result
}

#[cfg(test)]
mod bench_tests {
    use super::*;

    #[test]
    pub fn positions_are_reproducible() {
        let first = random_positions(5, 42);
        let second = random_positions(5, 42);

        assert_eq!(5, first.len());
        assert_eq!(first, second);
    }

    #[test]
    pub fn positions_are_playable() {
        for (board, side) in random_positions(10, 1) {
            assert_eq!(None, board.winner_by_count());
            assert!(!generate_moves(&board, side).is_empty());
        }
    }

    #[test]
    pub fn bench_counts_nodes() {
        let result = bench(2, 3, 9);

        assert_eq!(3, result.positions);
        assert!(result.nodes >= 3);
    }
}
