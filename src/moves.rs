use log::error;
use tinyvec::ArrayVec;

use crate::board::{Board, STARTING_PIECES, Square};

/// Pieces jumped by one move in the order they were jumped. A side can't lose more than it starts with.
pub type Captures = ArrayVec<[crate::piece::Piece; STARTING_PIECES as usize]>;

/// Destinations reachable by one piece and what each one captures.
///
/// Keys keep the position of their first insertion. Inserting a key that is already present replaces its
/// captures, so the last capture chain found for a square is the one that is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveMap {
    entries: Vec<(Square, Captures)>,
}

impl MoveMap {
    pub fn new() -> MoveMap {
        MoveMap::default()
    }

    pub fn insert(&mut self, dest: Square, captured: Captures) {
        match self.entries.iter_mut().find(|(k, _)| *k == dest) {
            Some(entry) => entry.1 = captured,
            None => self.entries.push((dest, captured)),
        }
    }

    pub fn get(&self, dest: Square) -> Option<&Captures> {
        self.entries.iter().find(|(k, _)| *k == dest).map(|(_, v)| v)
    }

    pub fn contains(&self, dest: Square) -> bool {
        self.get(dest).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Square, Captures)> {
        self.entries.iter()
    }

    pub fn destinations(&self) -> impl Iterator<Item = Square> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }
}

impl IntoIterator for MoveMap {
    type Item = (Square, Captures);
    type IntoIter = std::vec::IntoIter<(Square, Captures)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub captured: Captures,
}

impl Move {
    pub fn new(from: Square, to: Square, captured: Captures) -> Move {
        Move { from, to, captured }
    }

    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// `r5c2-r4c3` for a step, `r5c2xr1c2` for a capture
    pub fn pretty_print(&self) -> String {
        format!(
            "r{}c{}{}r{}c{}",
            self.from.0,
            self.from.1,
            if self.is_capture() { 'x' } else { '-' },
            self.to.0,
            self.to.1
        )
    }
}

impl std::fmt::Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Move from: {:?} to: {:?} captured: {:?}\nPretty: {}",
            self.from,
            self.to,
            self.captured,
            self.pretty_print()
        )
    }
}

#[derive(Debug, Default)]
pub struct MoveRollback {
    pub was_king: Vec<bool>,
    // Only the pieces that were actually taken off
    pub removed: Vec<Captures>,
}

impl MoveRollback {
    pub fn is_empty(&self) -> bool {
        self.was_king.is_empty() && self.removed.is_empty()
    }
}

impl Board {
    /// Copy of this board with the move played on it
    pub fn successor(&self, r#move: &Move) -> Board {
        let mut board = self.clone();
        board.apply(r#move);
        board
    }

    /// Plays a move on this board the same way the live game does: move the piece, then take the captures off.
    pub fn apply(&mut self, r#move: &Move) {
        let Some(piece) = self.get_piece(r#move.from.0, r#move.from.1) else {
            error!("Tried to apply {m:?} but there is no piece to move. {self:#?}", m = r#move);
            panic!("Tried to apply a move with no piece on its starting square");
        };

        self.move_piece(&piece, r#move.to.0, r#move.to.1);
        self.remove(&r#move.captured);
    }

    pub fn make_move(&mut self, r#move: &Move, rollback: &mut MoveRollback) {
        let Some(piece) = self.get_piece(r#move.from.0, r#move.from.1) else {
            error!("Tried to make {m:?} but there is no piece to move. {self:#?}", m = r#move);
            panic!("Tried to make a move with no piece on its starting square");
        };
        rollback.was_king.push(piece.is_king());

        self.move_piece(&piece, r#move.to.0, r#move.to.1);

        let mut removed = Captures::new();
        for victim in r#move.captured.iter() {
            if self.remove(std::slice::from_ref(victim)) == 1 {
                removed.push(*victim);
            }
        }
        rollback.removed.push(removed);
    }

    pub fn unmake_move(&mut self, r#move: &Move, rollback: &mut MoveRollback) {
        let (Some(was_king), Some(removed)) = (rollback.was_king.pop(), rollback.removed.pop()) else {
            error!("Tried to unmake {m:?} with an empty rollback", m = r#move);
            panic!("Tried to unmake a move with an empty rollback");
        };

        let Some(mut piece) = self.take_piece(r#move.to.0, r#move.to.1) else {
            error!("Tried to unmake {m:?} but its destination is empty. {self:#?}", m = r#move);
            panic!("Tried to unmake a move whose piece is missing");
        };
        piece.move_to(r#move.from.0, r#move.from.1);
        piece.set_king(was_king);
        self.place(piece);

        for victim in removed {
            self.restore(victim);
        }
    }
}
