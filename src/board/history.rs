//! Committed move history.

use super::command::Command;
use super::state::Game;
use super::types::{Color, MoveFlags, Piece, PieceKind, Square};

/// What a committed turn (or a single deploy step) looked like.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MoveRecord {
    pub san: String,
    pub lan: String,
    pub color: Color,
    pub piece: PieceKind,
    pub from: Square,
    pub to: Square,
    pub flags: MoveFlags,
    pub captured: Option<Piece>,
    pub fen_before: String,
    pub fen_after: String,
}

#[derive(Clone, Debug)]
pub(crate) struct HistoryEntry {
    pub command: Command,
    pub record: MoveRecord,
    pub hash_after: u64,
}

impl Game {
    /// Verbose history of committed turns, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<&MoveRecord> {
        self.history.iter().map(|entry| &entry.record).collect()
    }

    /// SAN history of committed turns, oldest first.
    #[must_use]
    pub fn history_san(&self) -> Vec<String> {
        self.history
            .iter()
            .map(|entry| entry.record.san.clone())
            .collect()
    }
}
