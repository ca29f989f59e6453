use std::fmt::{Debug, Display};

/// The two sides. `Red` starts on the bottom three rows and moves first, `Blue` starts on the top three rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    #[default]
    Red = 0,
    Blue = 1,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// Row step taken by an uncrowned piece of this color
    pub fn forward(self) -> isize {
        match self {
            Color::Red => -1,
            Color::Blue => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A checker. Only [crate::board::Board] changes its position or crowns it, so the position always matches the
/// square the board keeps it in.
///
/// `id` is the index of the square the piece started on and stays fixed for the piece's lifetime. Two pieces are
/// the same piece when their ids match, wherever they stand.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Piece {
    row: usize,
    col: usize,
    color: Color,
    king: bool,
    id: u8,
}

impl Piece {
    pub(crate) fn new(row: usize, col: usize, color: Color) -> Piece {
        Piece {
            row,
            col,
            color,
            king: false,
            id: (row * 8 + col) as u8,
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn square(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_king(&self) -> bool {
        self.king
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn same_piece(&self, other: &Piece) -> bool {
        self.id == other.id
    }

    pub(crate) fn move_to(&mut self, row: usize, col: usize) {
        self.row = row;
        self.col = col;
    }

    pub(crate) fn make_king(&mut self) {
        self.king = true;
    }

    pub(crate) fn set_king(&mut self, king: bool) {
        self.king = king;
    }

    /// Character used in board diagrams. Uppercase marks a king.
    pub fn to_char(&self) -> char {
        match (self.color, self.king) {
            (Color::Red, false) => 'r',
            (Color::Red, true) => 'R',
            (Color::Blue, false) => 'b',
            (Color::Blue, true) => 'B',
        }
    }
}

impl Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@({},{})#{}", self.to_char(), self.row, self.col, self.id)
    }
}
