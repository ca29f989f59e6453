use crate::board::Board;

/// Indexed with [crate::piece::Color] as usize. Blue is the maximizing side so its material counts positive.
pub const PIECE_VALUES: [i32; 2] = [-10, 10];
/// Added on top of [PIECE_VALUES] for a king
pub const KING_BONUS: [i32; 2] = [-5, 5];

impl Board {
    /// Material only: pieces and kings. Positive favours Blue.
    pub fn evaluate(&self) -> i32 {
        self.pieces()
            .map(|p| {
                let color = p.color() as usize;
                PIECE_VALUES[color] + if p.is_king() { KING_BONUS[color] } else { 0 }
            })
            .sum()
    }
}
