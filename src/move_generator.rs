use crate::{
    board::{Board, in_bounds},
    moves::{Captures, Move, MoveMap},
    piece::{Color, Piece},
};

/// A diagonal scan looks at the neighbouring square and, for a jump, the landing square behind it
const SCAN_LENGTH: usize = 2;
/// Column steps, left diagonal first
const COL_STEPS: [isize; 2] = [-1, 1];

/// Every destination `piece` can reach this turn, mapped to the pieces it jumps getting there.
///
/// Uncrowned pieces only look forward. Kings look forward and backward, upward (toward row 0) first.
/// A chain of jumps keeps the vertical direction it started in.
pub fn get_valid_moves(board: &Board, piece: &Piece) -> MoveMap {
    let mut moves = MoveMap::new();

    for row_step in [-1, 1] {
        if row_step != piece.color().forward() && !piece.is_king() {
            continue;
        }

        for col_step in COL_STEPS {
            traverse(
                board,
                piece.row() as isize + row_step,
                piece.col() as isize + col_step,
                row_step,
                col_step,
                piece.color(),
                &Captures::new(),
                &mut moves,
            );
        }
    }

    moves
}

/// Scans one diagonal starting at (`row`, `col`). `skipped` holds the pieces already jumped earlier in the chain
/// and is empty for the first scan of a move.
#[allow(clippy::too_many_arguments)]
fn traverse(
    board: &Board,
    mut row: isize,
    mut col: isize,
    row_step: isize,
    col_step: isize,
    color: Color,
    skipped: &Captures,
    moves: &mut MoveMap,
) {
    let mut last: Option<Piece> = None;

    for _ in 0..SCAN_LENGTH {
        if !in_bounds(row, col) {
            break;
        }

        match board.get_piece(row as usize, col as usize) {
            None => {
                let dest = (row as usize, col as usize);
                match last {
                    // A chain can only continue with another jump
                    None if !skipped.is_empty() => {}
                    None => moves.insert(dest, Captures::new()),
                    Some(victim) => {
                        let mut captured = skipped.clone();
                        captured.push(victim);
                        moves.insert(dest, captured.clone());

                        for next_col_step in COL_STEPS {
                            traverse(
                                board,
                                row + row_step,
                                col + next_col_step,
                                row_step,
                                next_col_step,
                                color,
                                &captured,
                                moves,
                            );
                        }
                    }
                }
                break;
            }
            Some(p) if p.color() == color => break,
            Some(p) => {
                if last.is_some() {
                    break;
                }
                last = Some(p);
            }
        }

        row += row_step;
        col += col_step;
    }
}

/// All moves for one side: pieces in board scan order, then each piece's destinations in discovery order.
pub fn generate_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();

    for piece in board.get_all_pieces(color) {
        for (dest, captured) in get_valid_moves(board, &piece) {
            moves.push(Move::new(piece.square(), dest, captured));
        }
    }

    moves
}

/// Independent copies of the board, one per move of `color`, in [generate_moves] order
pub fn get_all_moves(board: &Board, color: Color) -> Vec<Board> {
    generate_moves(board, color).iter().map(|m| board.successor(m)).collect()
}

pub fn has_any_moves(board: &Board, color: Color) -> bool {
    board
        .get_all_pieces(color)
        .iter()
        .any(|p| !get_valid_moves(board, p).is_empty())
}
