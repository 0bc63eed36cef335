//! CoTuLenh board representation and game logic.
//!
//! Implements the full rule set of the 11×12 military chess variant:
//! terrain masks and river bridges, multi-piece stacks with a carrier
//! hierarchy, deploy sessions with delayed commit, heroic promotion,
//! air-defense zones and the flying-general exposure rule.
//!
//! # Example
//! ```
//! use cotulenh_engine::board::{Game, MoveQuery};
//!
//! let game = Game::new();
//! let moves = game.moves(&MoveQuery::default());
//! println!("Opening position has {} legal moves", moves.len());
//! ```

mod air_defense;
mod attacks;
mod cache;
mod command;
mod debug;
mod error;
mod fen;
mod history;
mod masks;
mod movegen;
mod perft;
mod rules;
mod san;
mod session;
mod state;
mod status;
mod types;

#[cfg(test)]
mod tests;

// Public API - types users need
pub use error::{
    CombineError, FenError, IllegalMoveReason, MoveError, SanError, SessionError, SquareError,
};
pub use fen::DEFAULT_FEN;
pub use history::MoveRecord;
pub use movegen::MoveQuery;
pub use session::{CommitOutcome, DeployView, SessionView};
pub use state::{Game, GameMetadata};
pub use types::{
    CarriedPiece, Color, Move, MoveFlags, MoveInput, MoveList, MoveOptions, MoveRequest, Piece,
    PieceKind, Square,
};

// Grid constants shared with the hashing module
pub use types::{FILE_COUNT, GRID_SIZE, PIECE_KIND_COUNT, RANK_COUNT};
