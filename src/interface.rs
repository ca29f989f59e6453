use std::{io::Write, sync::LazyLock};

use log::{debug, error, trace};
use regex::Regex;

use crate::{
    board::{Board, COLS, ROWS},
    game::{Game, GameConfig, Opponent},
    move_generator::generate_moves,
    piece::Color,
};

static SELECT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^select\s+([0-7])\s*[ ,]\s*([0-7])$").unwrap());
static OPPONENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^opponent\s+(computer|human)$").unwrap());
static DEPTH_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^depth\s+([0-9]{1,2})$").unwrap());
static PERFT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^perft\s+([0-9]{1,2})(\s+divide)?$").unwrap());
static POSITION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^position\s+([rRbB./]+)(?:\s+(red|blue))?$").unwrap());

/// Line based commands standing in for a graphical front end. Answers go to `out`, diagnostics to the log.
pub struct TextInterface<W: Write> {
    game: Game,
    out: W,
}

impl<W: Write> TextInterface<W> {
    pub fn new(config: GameConfig, out: W) -> TextInterface<W> {
        TextInterface {
            game: Game::new(config),
            out,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Returns false once the interface should stop reading commands
    pub fn process_command(&mut self, cmd: &str) -> std::io::Result<bool> {
        let cmd = cmd.trim();
        debug!("Received cmd string '{cmd}'");

        if let Some(captures) = SELECT_PATTERN.captures(cmd) {
            let row = captures[1].parse::<usize>().unwrap_or_default();
            let col = captures[2].parse::<usize>().unwrap_or_default();
            let selected = self.game.select(row, col);

            if selected {
                let moves: Vec<String> = self
                    .game
                    .valid_moves()
                    .map(|m| m.destinations().map(|(r, c)| format!("r{r}c{c}")).collect())
                    .unwrap_or_default();
                writeln!(self.out, "selected r{row}c{col} {}", moves.join(" "))?;
            } else {
                writeln!(self.out, "idle")?;
            }

            self.print_board()?;
            self.print_state()?;
            return Ok(true);
        }

        if let Some(captures) = OPPONENT_PATTERN.captures(cmd) {
            let opponent = if &captures[1] == "computer" { Opponent::Computer } else { Opponent::Human };
            self.game.set_config(GameConfig {
                opponent,
                ..*self.game.config()
            });
            writeln!(self.out, "opponent {}", &captures[1])?;
            return Ok(true);
        }

        if let Some(captures) = DEPTH_PATTERN.captures(cmd) {
            match captures[1].parse::<u8>() {
                Ok(depth) if depth > 0 => {
                    self.game.set_config(GameConfig {
                        search_depth: depth,
                        ..*self.game.config()
                    });
                    writeln!(self.out, "depth {depth}")?;
                }
                _ => error!("Search depth must be at least 1, got '{}'", &captures[1]),
            }
            return Ok(true);
        }

        if let Some(captures) = PERFT_PATTERN.captures(cmd) {
            let depth = captures[1].parse::<u8>().unwrap_or_default();
            let divide = captures.get(2).is_some();
            let mut board = self.game.board().clone();
            let nodes = board.start_perft(depth, self.game.turn(), divide, &mut self.out)?;
            writeln!(self.out, "nodes {nodes}")?;
            return Ok(true);
        }

        if let Some(captures) = POSITION_PATTERN.captures(cmd) {
            match Board::from_diagram(&captures[1]) {
                Ok(board) => {
                    let turn = match captures.get(2).map(|m| m.as_str()) {
                        Some("blue") => Color::Blue,
                        _ => Color::Red,
                    };
                    self.game.set_position(board, turn);
                    trace!("At end of position. {:#?}", self.game.board());
                    self.print_board()?;
                    self.print_state()?;
                }
                Err(err_msg) => {
                    error!("Failed to parse diagram. Error message: {err_msg}. Diagram: {}", &captures[1])
                }
            }
            return Ok(true);
        }

        match cmd {
            "" => {}
            "board" => self.print_board()?,
            "moves" => {
                for r#move in generate_moves(self.game.board(), self.game.turn()) {
                    writeln!(self.out, "{}", r#move.pretty_print())?;
                }
            }
            "turn" => writeln!(self.out, "turn {}", self.game.turn())?,
            "winner" => match self.game.winner() {
                Some(winner) => writeln!(self.out, "winner {winner}")?,
                None => writeln!(self.out, "winner none")?,
            },
            "eval" => writeln!(self.out, "eval {}", self.game.board().evaluate())?,
            "reset" => {
                self.game.reset();
                self.print_board()?;
                self.print_state()?;
            }
            "quit" => return Ok(false),
            _ => {
                error!("Unknown cmd '{cmd}'");
                writeln!(self.out, "unknown command")?;
            }
        }

        Ok(true)
    }

    fn print_state(&mut self) -> std::io::Result<()> {
        writeln!(self.out, "turn {}", self.game.turn())?;
        if let Some(winner) = self.game.winner() {
            writeln!(self.out, "winner {winner}")?;
        }

        Ok(())
    }

    /// Board with row and column numbers. Destinations of the selected piece show as `*`.
    fn print_board(&mut self) -> std::io::Result<()> {
        let header: String = (0..COLS).map(|c| char::from(b'0' + c as u8)).collect();
        writeln!(self.out, "  {header}")?;

        for row in 0..ROWS {
            let line: String = (0..COLS)
                .map(|col| match self.game.board().get_piece(row, col) {
                    Some(piece) => piece.to_char(),
                    None if self.game.is_destination((row, col)) => '*',
                    None => '.',
                })
                .collect();
            writeln!(self.out, "{row} {line}")?;
        }

        Ok(())
    }
}
