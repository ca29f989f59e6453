use std::{io::Write, time::Instant};

use log::info;
use num_format::{Locale, ToFormattedString};

use crate::{board::Board, move_generator::generate_moves, moves::MoveRollback, piece::Color};

impl Board {
    /// Counts the leaves of the full move tree `depth` plies deep with `side` moving first.
    /// With `divide` the count below each first move is written to `out`.
    pub fn start_perft(&mut self, depth: u8, side: Color, divide: bool, out: &mut impl Write) -> std::io::Result<u64> {
        let mut rollback = MoveRollback::default();
        let mut stats = PerftStats::default();

        let start_time = Instant::now();
        do_perft(depth, 1, side, self, &mut rollback, &mut stats, divide);
        let elapsed = start_time.elapsed();

        if divide {
            for (name, nodes) in &stats.divide {
                writeln!(out, "{name} {nodes}")?;
            }
            writeln!(out, "\n{}", stats.nodes)?;
        }

        let nps = stats.nodes as f64 / elapsed.as_secs_f64();
        info!(
            "depth {depth} in {}. Nodes: {}. Nodes per second: {}",
            humantime::format_duration(elapsed),
            stats.nodes.to_formatted_string(&Locale::en),
            (nps as u64).to_formatted_string(&Locale::en)
        );
        info!(
            "Captures: {} Multi captures: {} Promotions: {} No moves: {}",
            stats.captures, stats.multi_captures, stats.promotions, stats.no_moves
        );
        assert!(rollback.is_empty());

        Ok(stats.nodes)
    }
}

#[derive(Debug, Default)]
pub struct PerftStats {
    pub nodes: u64,
    pub captures: u64,
    pub multi_captures: u64,
    pub promotions: u64,
    /// Positions inside the tree where the side to move is stuck
    pub no_moves: u64,
    /// Leaves below each first move, filled only when dividing
    pub divide: Vec<(String, u64)>,
}

fn do_perft(
    draft: u8,
    ply: u8,
    side: Color,
    board: &mut Board,
    rollback: &mut MoveRollback,
    stats: &mut PerftStats,
    divide: bool,
) {
    if draft == 0 {
        stats.nodes += 1;
        return;
    }

    let moves = generate_moves(board, side);
    if moves.is_empty() {
        stats.no_moves += 1;
        return;
    }

    for r#move in &moves {
        if draft == 1 {
            if r#move.is_capture() {
                stats.captures += 1;
            }
            if r#move.captured.len() > 1 {
                stats.multi_captures += 1;
            }
        }

        board.make_move(r#move, rollback);

        if draft == 1 && rollback.was_king.last() == Some(&false) {
            let moved = board.get_piece(r#move.to.0, r#move.to.1);
            if moved.is_some_and(|p| p.is_king()) {
                stats.promotions += 1;
            }
        }

        let start_nodes = stats.nodes;
        do_perft(draft - 1, ply + 1, side.opponent(), board, rollback, stats, divide);

        if divide && ply == 1 {
            stats.divide.push((r#move.pretty_print(), stats.nodes - start_nodes));
        }

        board.unmake_move(r#move, rollback);
    }
}
