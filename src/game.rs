use log::{debug, info, trace};

use crate::{
    board::{Board, Square},
    move_generator::{get_valid_moves, has_any_moves},
    moves::{Move, MoveMap},
    piece::{Color, Piece},
    search::{DEFAULT_SEARCH_DEPTH, minimax},
};

/// The side the computer plays when there is one. It is the maximizing side of the search.
pub const COMPUTER_SIDE: Color = Color::Blue;
/// Side to move at the start of a game
pub const FIRST_SIDE: Color = Color::Red;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opponent {
    Human,
    Computer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub opponent: Opponent,
    pub search_depth: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            opponent: Opponent::Computer,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected { piece: Piece, moves: MoveMap },
}

/// Turn and selection state of one game. Squares are chosen one at a time: first a piece, then where it goes.
#[derive(Debug)]
pub struct Game {
    board: Board,
    turn: Color,
    selection: Selection,
    config: GameConfig,
}

impl Game {
    pub fn new(config: GameConfig) -> Game {
        Game {
            board: Board::new(),
            turn: FIRST_SIDE,
            selection: Selection::Idle,
            config,
        }
    }

    pub fn reset(&mut self) {
        *self = Game::new(self.config);
    }

    /// Starts from an arbitrary position
    pub fn set_position(&mut self, board: Board, turn: Color) {
        self.board = board;
        self.turn = turn;
        self.selection = Selection::Idle;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    pub fn selected(&self) -> Option<&Piece> {
        match &self.selection {
            Selection::Selected { piece, .. } => Some(piece),
            Selection::Idle => None,
        }
    }

    /// Destinations of the selected piece, none when nothing is selected
    pub fn valid_moves(&self) -> Option<&MoveMap> {
        match &self.selection {
            Selection::Selected { moves, .. } => Some(moves),
            Selection::Idle => None,
        }
    }

    /// Handles a click on a square. Returns true when a piece is selected afterwards.
    ///
    /// With a piece selected, a click on one of its destinations plays the move. Any other click drops the selection
    /// and is treated as a fresh click, so clicking another piece of the same side selects it instead.
    pub fn select(&mut self, row: usize, col: usize) -> bool {
        if let Selection::Selected { piece, moves } = std::mem::take(&mut self.selection) {
            if let Some(captured) = moves.get((row, col)) {
                let r#move = Move::new(piece.square(), (row, col), captured.clone());
                self.play(&r#move);
                return false;
            }
        }

        match self.board.get_piece(row, col) {
            Some(piece) if piece.color() == self.turn => {
                let moves = get_valid_moves(&self.board, &piece);
                trace!("Selected {piece:?} with moves {moves:?}");
                self.selection = Selection::Selected { piece, moves };
                true
            }
            _ => false,
        }
    }

    fn play(&mut self, r#move: &Move) {
        debug!("{} plays {}", self.turn, r#move.pretty_print());
        self.board.apply(r#move);
        self.change_turn();
    }

    fn change_turn(&mut self) {
        self.selection = Selection::Idle;
        self.turn = self.turn.opponent();

        if self.config.opponent == Opponent::Computer && self.turn == COMPUTER_SIDE {
            self.computer_turn();
        }
    }

    /// A computer side without moves has lost, so the turn stays with it and the game is over
    fn computer_turn(&mut self) {
        if !has_any_moves(&self.board, COMPUTER_SIDE) {
            info!("{COMPUTER_SIDE} has no moves, {} wins", COMPUTER_SIDE.opponent());
            return;
        }

        let (score, chosen) = minimax(&self.board, self.config.search_depth, true);
        if let Some(board) = chosen {
            debug!("{COMPUTER_SIDE} chose a position scored {score}");
            self.board = board;
        }
        self.change_turn();
    }

    /// The winner once a side has no pieces left or the side to move has no legal move.
    pub fn winner(&self) -> Option<Color> {
        if let Some(winner) = self.board.winner_by_count() {
            return Some(winner);
        }

        if !has_any_moves(&self.board, self.turn) {
            return Some(self.turn.opponent());
        }

        None
    }

    pub fn is_destination(&self, square: Square) -> bool {
        self.valid_moves().is_some_and(|m| m.contains(square))
    }
}

#[cfg(test)]
mod game_tests {
    use crate::{board::STARTING_PIECES, move_generator::generate_moves};

    use super::*;

    fn human_game() -> Game {
        Game::new(GameConfig {
            opponent: Opponent::Human,
            search_depth: DEFAULT_SEARCH_DEPTH,
        })
    }

    #[test]
    pub fn select_own_piece() {
        let mut game = human_game();

        assert!(game.select(5, 2));
        assert_eq!((5, 2), game.selected().unwrap().square());
        assert_eq!(vec![(4, 1), (4, 3)], game.valid_moves().unwrap().destinations().collect::<Vec<_>>());
        assert!(game.is_destination((4, 3)));
    }

    #[test]
    pub fn select_empty_or_opponent_stays_idle() {
        let mut game = human_game();

        assert!(!game.select(4, 1));
        assert!(!game.select(2, 1));
        assert_eq!(None, game.selected());
        assert_eq!(None, game.valid_moves());
    }

    #[test]
    pub fn move_and_change_turn() {
        let mut game = human_game();

        game.select(5, 2);
        assert!(!game.select(4, 3));

        assert_eq!(Color::Blue, game.turn());
        assert_eq!(None, game.selected());
        assert_eq!(None, game.board().get_piece(5, 2));
        assert_eq!(Color::Red, game.board().get_piece(4, 3).unwrap().color());
    }

    #[test]
    pub fn clicking_another_own_piece_switches_selection() {
        let mut game = human_game();

        game.select(5, 2);
        assert!(game.select(5, 4));

        assert_eq!((5, 4), game.selected().unwrap().square());
        assert_eq!(Color::Red, game.turn());
    }

    #[test]
    pub fn clicking_elsewhere_drops_selection() {
        let mut game = human_game();

        game.select(5, 2);
        assert!(!game.select(3, 2));

        assert_eq!(None, game.selected());
        assert_eq!(Color::Red, game.turn());
        assert_eq!(Board::new(), *game.board());
    }

    #[test]
    pub fn capture_removes_pieces() {
        let mut game = human_game();
        let board = Board::from_diagram("......../......../.b....../......../...b..../....r.../......../......b.").unwrap();
        game.set_position(board, Color::Red);

        game.select(5, 4);
        game.select(1, 0);

        assert_eq!(1, game.board().pieces_left(Color::Blue));
        assert_eq!(None, game.board().get_piece(4, 3));
        assert_eq!(None, game.board().get_piece(2, 1));
        assert_eq!(Color::Blue, game.turn());
    }

    #[test]
    pub fn computer_replies_immediately() {
        let mut game = Game::new(GameConfig::default());

        game.select(5, 2);
        game.select(4, 3);

        assert_eq!(Color::Red, game.turn());
        assert_eq!(1, game.board().get_all_pieces(Color::Blue).iter().filter(|p| p.row() == 3).count());
        assert_eq!(STARTING_PIECES, game.board().pieces_left(Color::Blue));
        assert_eq!(None, game.selected());
    }

    #[test]
    pub fn computer_takes_free_piece() {
        let mut game = Game::new(GameConfig {
            opponent: Opponent::Computer,
            search_depth: 1,
        });
        let board = Board::from_diagram(".....b../......../.b....../......../...r..../......../......../......r.").unwrap();
        game.set_position(board, Color::Red);

        // Red walks into the jump
        game.select(4, 3);
        game.select(3, 2);

        assert_eq!(Color::Red, game.turn());
        assert_eq!(1, game.board().pieces_left(Color::Red));
        assert_eq!(Color::Blue, game.board().get_piece(4, 3).unwrap().color());
    }

    #[test]
    pub fn winner_by_count_or_no_moves() {
        let mut game = human_game();
        assert_eq!(None, game.winner());

        game.set_position(
            Board::from_diagram("......../......../.b....../......../......../......../......../........").unwrap(),
            Color::Blue,
        );
        assert_eq!(Some(Color::Blue), game.winner());

        // Blue still has a piece but is stuck on its last row
        game.set_position(
            Board::from_diagram("......../......../......../..r...../......../......../......../b.......").unwrap(),
            Color::Blue,
        );
        assert_eq!(Some(Color::Red), game.winner());
        assert_eq!(None, game.board().winner_by_count());

        // Only the side to move is checked for moves
        game.set_position(
            Board::from_diagram("......../......../......../..r...../......../......../......../b.......").unwrap(),
            Color::Red,
        );
        assert_eq!(None, game.winner());
    }

    #[test]
    pub fn computer_without_moves_leaves_the_game_over() {
        let mut game = Game::new(GameConfig::default());
        let board = Board::from_diagram("......../......../......../......../...r..../......../......../b.......").unwrap();
        game.set_position(board, Color::Red);

        game.select(4, 3);
        game.select(3, 2);

        assert_eq!(Color::Blue, game.turn());
        assert_eq!(Some(Color::Red), game.winner());
    }

    #[test]
    pub fn computer_out_of_pieces_keeps_the_turn() {
        let mut game = Game::new(GameConfig::default());
        let board = Board::from_diagram("......../......../......../......../...b..../....r.../......../........").unwrap();
        game.set_position(board, Color::Red);

        game.select(5, 4);
        game.select(3, 2);

        assert_eq!(Color::Blue, game.turn());
        assert_eq!(0, game.board().pieces_left(Color::Blue));
        assert_eq!(Some(Color::Red), game.winner());
        assert_eq!(Color::Red, game.board().get_piece(3, 2).unwrap().color());
    }

    #[test]
    pub fn reset_restores_start() {
        let mut game = human_game();
        game.select(5, 2);
        game.select(4, 3);

        game.reset();

        assert_eq!(Board::new(), *game.board());
        assert_eq!(Color::Red, game.turn());
        assert_eq!(None, game.selected());
        assert_eq!(Opponent::Human, game.config().opponent);
    }

    #[test]
    pub fn pieces_are_conserved_over_a_game() {
        let mut game = Game::new(GameConfig {
            opponent: Opponent::Computer,
            search_depth: 2,
        });

        for _ in 0..40 {
            if game.winner().is_some() {
                break;
            }

            let Some(r#move) = generate_moves(game.board(), game.turn()).into_iter().next() else {
                break;
            };
            let blue_before = game.board().pieces_left(Color::Blue);
            let blue_on_board = game.board().get_all_pieces(Color::Blue).len();
            assert_eq!(blue_before as usize, blue_on_board);

            game.select(r#move.from.0, r#move.from.1);
            game.select(r#move.to.0, r#move.to.1);

            for color in [Color::Red, Color::Blue] {
                let left = game.board().pieces_left(color);
                assert_eq!(left as usize, game.board().get_all_pieces(color).len());
                assert!(left <= STARTING_PIECES);
            }
        }
    }
}
