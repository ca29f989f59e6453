pub mod bench;
pub mod board;
pub mod evaluate;
pub mod game;
pub mod interface;
pub mod move_generator;
pub mod moves;
pub mod perft;
pub mod piece;
pub mod search;
