use std::fmt::{Debug, Display};

use array_macro::array;
use log::error;

use crate::piece::{Color, Piece};

pub const ROWS: usize = 8;
pub const COLS: usize = 8;
/// Pieces each side starts with
pub const STARTING_PIECES: u8 = 12;

/// (row, col). Row 0 is Blue's back row, row 7 is Red's.
pub type Square = (usize, usize);

#[rustfmt::skip]
pub static STARTING_DIAGRAM: &str = concat!(
    ".b.b.b.b/",
    "b.b.b.b./",
    ".b.b.b.b/",
    "......../",
    "......../",
    "r.r.r.r./",
    ".r.r.r.r/",
    "r.r.r.r.",
);

#[inline]
pub fn is_dark_square(row: usize, col: usize) -> bool {
    (row + col) % 2 == 1
}

#[inline]
pub fn in_bounds(row: isize, col: isize) -> bool {
    (0..ROWS as isize).contains(&row) && (0..COLS as isize).contains(&col)
}

fn starting_piece(row: usize, col: usize) -> Option<Piece> {
    if !is_dark_square(row, col) {
        None
    } else if row < 3 {
        Some(Piece::new(row, col, Color::Blue))
    } else if row > 4 {
        Some(Piece::new(row, col, Color::Red))
    } else {
        None
    }
}

/// Cloning gives a fully independent board; pieces are stored by value.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; COLS]; ROWS],
    /// Indexed by [Color] as usize
    pieces_left: [u8; 2],
}

impl Board {
    pub fn new() -> Board {
        Board {
            grid: array![row => array![col => starting_piece(row, col); COLS]; ROWS],
            pieces_left: [STARTING_PIECES; 2],
        }
    }

    pub fn empty() -> Board {
        Board {
            grid: [[None; COLS]; ROWS],
            pieces_left: [0; 2],
        }
    }

    /// Parses a diagram of 8 rows, top row (row 0) first, separated by `/` or newlines. `.` is an empty square,
    /// `r`/`b` are uncrowned Red/Blue pieces and `R`/`B` their kings.
    pub fn from_diagram(diagram: &str) -> Result<Board, String> {
        if !diagram.is_ascii() {
            return Err(String::from("Expected diagram to only contain ASCII characters"));
        }

        let rows: Vec<&str> = diagram
            .split(['/', '\n'])
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        if rows.len() != ROWS {
            return Err(format!("Expected diagram to have {ROWS} rows but it had {}", rows.len()));
        }

        let mut board = Board::empty();
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            if cells.len() != COLS {
                return Err(format!(
                    "Expected row {row} of the diagram to have {COLS} squares but it was '{line}'"
                ));
            }

            for (col, c) in cells.iter().enumerate() {
                let (color, king) = match c {
                    '.' => continue,
                    'r' => (Color::Red, false),
                    'R' => (Color::Red, true),
                    'b' => (Color::Blue, false),
                    'B' => (Color::Blue, true),
                    _ => {
                        return Err(format!(
                            "Encountered unexpected character '{c}' at row {row} col {col} of the diagram"
                        ));
                    }
                };

                if !is_dark_square(row, col) {
                    return Err(format!("Piece '{c}' at row {row} col {col} is on a light square"));
                }

                let mut piece = Piece::new(row, col, color);
                piece.set_king(king);
                board.restore(piece);
            }
        }

        Ok(board)
    }

    /// Single line form of the diagram, rows separated by `/`
    pub fn to_diagram_line(&self) -> String {
        self.to_string().replace('\n', "/")
    }

    /// Row and column must be on the board.
    pub fn get_piece(&self, row: usize, col: usize) -> Option<Piece> {
        self.grid[row][col]
    }

    /// Pieces of one side in row-major order. Search tie-breaks depend on this order.
    pub fn get_all_pieces(&self, color: Color) -> Vec<Piece> {
        self.pieces().filter(|p| p.color() == color).collect()
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.grid.iter().flatten().flatten().copied()
    }

    pub fn pieces_left(&self, color: Color) -> u8 {
        self.pieces_left[color as usize]
    }

    /// Moves `piece` to the destination and crowns it if the destination is either back row.
    /// Returns the piece as it stands after the move.
    pub fn move_piece(&mut self, piece: &Piece, row: usize, col: usize) -> Piece {
        let Some(mut moving) = self.grid[piece.row()][piece.col()].take() else {
            error!("Tried to move {piece:?} but its square is empty. {self:#?}");
            panic!("Tried to move a piece that is not on the board");
        };

        if !moving.same_piece(piece) {
            error!("Tried to move {piece:?} but {moving:?} is on its square. {self:#?}");
            panic!("Tried to move a piece that is not on the board");
        }
        debug_assert!(self.grid[row][col].is_none(), "destination ({row},{col}) is occupied");

        moving.move_to(row, col);
        if row == 0 || row == ROWS - 1 {
            moving.make_king();
        }
        self.grid[row][col] = Some(moving);

        moving
    }

    /// Takes each piece off the board and lowers its side's count. A piece that is no longer on its square is
    /// skipped, so removing the same piece twice only counts once. Returns how many pieces were taken off.
    pub fn remove(&mut self, pieces: &[Piece]) -> usize {
        let mut removed = 0;
        for piece in pieces {
            let slot = &mut self.grid[piece.row()][piece.col()];
            if slot.is_some_and(|p| p.same_piece(piece)) {
                *slot = None;
                self.pieces_left[piece.color() as usize] -= 1;
                removed += 1;
            }
        }

        removed
    }

    pub(crate) fn take_piece(&mut self, row: usize, col: usize) -> Option<Piece> {
        self.grid[row][col].take()
    }

    /// Puts a piece on its square without touching the counts
    pub(crate) fn place(&mut self, piece: Piece) {
        debug_assert!(self.grid[piece.row()][piece.col()].is_none());
        self.grid[piece.row()][piece.col()] = Some(piece);
    }

    /// Puts a piece back on its square and counts it
    pub(crate) fn restore(&mut self, piece: Piece) {
        self.place(piece);
        self.pieces_left[piece.color() as usize] += 1;
    }

    /// Only looks at piece counts. A side that is blocked in is not detected here.
    pub fn winner_by_count(&self) -> Option<Color> {
        if self.pieces_left(Color::Red) == 0 {
            Some(Color::Blue)
        } else if self.pieces_left(Color::Blue) == 0 {
            Some(Color::Red)
        } else {
            None
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| row.iter().map(|slot| slot.map_or('.', |p| p.to_char())).collect())
            .collect();

        f.write_str(&rows.join("\n"))
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("red_left", &self.pieces_left(Color::Red))
            .field("blue_left", &self.pieces_left(Color::Blue))
            .field("squares", &"See end value")
            .finish()?;

        writeln!(f, "\nsquares: \n{self}")
    }
}

#[cfg(test)]
mod board_tests {
    use super::*;

    #[test]
    pub fn starting_board_has_twelve_each() {
        let board = Board::new();

        assert_eq!(12, board.get_all_pieces(Color::Red).len());
        assert_eq!(12, board.get_all_pieces(Color::Blue).len());
        assert_eq!(12, board.pieces_left(Color::Red));
        assert_eq!(12, board.pieces_left(Color::Blue));
        assert_eq!(None, board.winner_by_count());
    }

    #[test]
    pub fn starting_board_matches_diagram() {
        let board = Board::new();

        assert_eq!(STARTING_DIAGRAM, board.to_diagram_line());
        assert_eq!(board, Board::from_diagram(STARTING_DIAGRAM).unwrap());
    }

    #[test]
    pub fn pieces_only_on_dark_squares() {
        let board = Board::new();

        for piece in board.pieces() {
            assert!(is_dark_square(piece.row(), piece.col()));
            assert_eq!(Some(piece), board.get_piece(piece.row(), piece.col()));
        }
    }

    #[test]
    pub fn all_pieces_are_row_major() {
        let board = Board::new();
        let squares: Vec<Square> = board.get_all_pieces(Color::Blue).iter().map(Piece::square).collect();

        let mut sorted = squares.clone();
        sorted.sort();
        assert_eq!(sorted, squares);
        assert_eq!((0, 1), squares[0]);
        assert_eq!((2, 7), squares[11]);
    }

    #[test]
    pub fn move_updates_grid_and_piece() {
        let mut board = Board::new();
        let piece = board.get_piece(5, 0).unwrap();

        let moved = board.move_piece(&piece, 4, 1);

        assert_eq!(None, board.get_piece(5, 0));
        assert_eq!(Some(moved), board.get_piece(4, 1));
        assert_eq!((4, 1), moved.square());
        assert!(moved.same_piece(&piece));
        assert!(!moved.is_king());
    }

    #[test]
    pub fn move_to_back_row_crowns_either_color() {
        let mut board = Board::from_diagram("......../..r...../......../......../......../......../.....b../........").unwrap();

        let red = board.get_piece(1, 2).unwrap();
        let red = board.move_piece(&red, 0, 1);
        assert!(red.is_king());

        let blue = board.get_piece(6, 5).unwrap();
        let blue = board.move_piece(&blue, 7, 4);
        assert!(blue.is_king());

        // Stays a king after leaving the back row
        let blue = board.move_piece(&blue, 6, 3);
        assert!(blue.is_king());
        assert!(board.get_piece(6, 3).unwrap().is_king());
    }

    #[test]
    pub fn king_can_land_on_own_back_row() {
        let mut board = Board::from_diagram("......../......../......../......../......../......../.R....../........").unwrap();
        let king = board.get_piece(6, 1).unwrap();

        let king = board.move_piece(&king, 7, 2);

        assert!(king.is_king());
    }

    #[test]
    pub fn remove_decrements_once_per_piece() {
        let mut board = Board::new();
        let victim = board.get_piece(2, 1).unwrap();

        assert_eq!(1, board.remove(&[victim]));
        assert_eq!(11, board.pieces_left(Color::Blue));
        assert_eq!(None, board.get_piece(2, 1));

        assert_eq!(0, board.remove(&[victim, victim]));
        assert_eq!(11, board.pieces_left(Color::Blue));
        assert_eq!(12, board.pieces_left(Color::Red));
    }

    #[test]
    pub fn remove_ignores_other_piece_on_same_square() {
        let mut board = Board::new();
        let victim = board.get_piece(2, 1).unwrap();
        board.remove(&[victim]);

        let replacement = board.get_piece(1, 2).unwrap();
        board.move_piece(&replacement, 2, 1);

        assert_eq!(0, board.remove(&[victim]));
        assert!(board.get_piece(2, 1).unwrap().same_piece(&replacement));
        assert_eq!(11, board.pieces_left(Color::Blue));
    }

    #[test]
    pub fn winner_when_one_side_is_gone() {
        let mut board = Board::from_diagram("......../......../.b....../......../...r..../......../......../........").unwrap();
        assert_eq!(None, board.winner_by_count());

        let red = board.get_piece(4, 3).unwrap();
        board.remove(&[red]);
        assert_eq!(Some(Color::Blue), board.winner_by_count());
    }

    #[test]
    pub fn winner_is_red_when_blue_is_gone() {
        let mut board = Board::from_diagram("......../......../.b....../......../...r..../......../......../........").unwrap();
        let blue = board.get_piece(2, 1).unwrap();
        board.remove(&[blue]);

        assert_eq!(Some(Color::Red), board.winner_by_count());
    }

    #[test]
    pub fn clone_is_independent() {
        let board = Board::new();
        let mut copy = board.clone();
        let piece = copy.get_piece(5, 2).unwrap();
        copy.move_piece(&piece, 4, 3);

        assert_eq!(Some(piece), board.get_piece(5, 2));
        assert_eq!(None, board.get_piece(4, 3));
    }

    #[test]
    pub fn diagram_errors() {
        assert!(Board::from_diagram("........").is_err());
        assert!(Board::from_diagram("r......./......../......../......../......../......../......../........").is_err());
        assert!(Board::from_diagram(".x....../......../......../......../......../......../......../........").is_err());
        assert!(Board::from_diagram("...../......../......../......../......../......../......../........").is_err());
    }
}
