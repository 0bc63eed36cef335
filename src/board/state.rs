use std::collections::HashMap;

use parking_lot::Mutex;

use super::air_defense::AirDefenseIndex;
use super::cache::MoveCache;
use super::history::HistoryEntry;
use super::masks::terrain_allows;
use super::session::DeploySession;
use super::types::{Color, Piece, PieceKind, Square, GRID_SIZE};
use crate::zobrist::{member_key, ZOBRIST};

/// Opt-in rule tweaks for embedding layers. The engine stores the flags; the
/// base rules do not consult `skip_last_guard_promotion` (the last-guard
/// promotion is not a base rule).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameMetadata {
    pub skip_last_guard_promotion: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub(crate) fn new() -> Self {
        RepetitionTable {
            counts: HashMap::new(),
        }
    }

    pub(crate) fn get(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, hash: u64, count: u32) {
        if count == 0 {
            self.counts.remove(&hash);
        } else {
            self.counts.insert(hash, count);
        }
    }

    pub(crate) fn increment(&mut self, hash: u64) -> u32 {
        let next = self.get(hash).saturating_add(1);
        self.set(hash, next);
        next
    }

    pub(crate) fn decrement(&mut self, hash: u64) {
        let count = self.get(hash);
        self.set(hash, count.saturating_sub(1));
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}

/// A full game: board, clocks, history, open deploy session and caches.
///
/// Single-threaded cooperative; callers on multiple threads must serialize
/// access externally.
#[derive(Debug)]
pub struct Game {
    pub(crate) squares: [Option<Piece>; GRID_SIZE],
    pub(crate) turn: Color,
    pub(crate) commanders: [Option<Square>; 2],
    pub(crate) air_defense: [AirDefenseIndex; 2],
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) repetition: RepetitionTable,
    pub(crate) history: Vec<HistoryEntry>,
    pub(crate) session: Option<DeploySession>,
    pub(crate) metadata: GameMetadata,
    pub(crate) cache: Mutex<MoveCache>,
}

impl Clone for Game {
    fn clone(&self) -> Self {
        Game {
            squares: self.squares.clone(),
            turn: self.turn,
            commanders: self.commanders,
            air_defense: self.air_defense.clone(),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            repetition: self.repetition.clone(),
            history: self.history.clone(),
            session: self.session.clone(),
            metadata: self.metadata,
            cache: Mutex::new(MoveCache::new()),
        }
    }
}

impl Game {
    /// Start a game from the standard opening position.
    #[must_use]
    pub fn new() -> Self {
        Game::try_from_fen(super::fen::DEFAULT_FEN).expect("default position is valid")
    }

    pub(crate) fn empty() -> Self {
        Game {
            squares: std::array::from_fn(|_| None),
            turn: Color::Red,
            commanders: [None, None],
            air_defense: [AirDefenseIndex::new(), AirDefenseIndex::new()],
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            repetition: RepetitionTable::new(),
            history: Vec::new(),
            session: None,
            metadata: GameMetadata::default(),
            cache: Mutex::new(MoveCache::new()),
        }
    }

    /// Side to move.
    #[inline]
    #[must_use]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Position digest including side to move; stable across FEN round trips.
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn metadata(&self) -> GameMetadata {
        self.metadata
    }

    pub fn set_metadata(&mut self, metadata: GameMetadata) {
        self.metadata = metadata;
    }

    /// Piece on a square, if any.
    #[must_use]
    pub fn get(&self, sq: Square) -> Option<&Piece> {
        if !sq.is_on_board() {
            return None;
        }
        self.squares[sq.index()].as_ref()
    }

    /// Place a piece for position setup. Rejects padding squares, hostile
    /// terrain, an occupied square and a second commander of one color.
    pub fn put(&mut self, piece: Piece, sq: Square) -> bool {
        if !sq.is_on_board()
            || self.squares[sq.index()].is_some()
            || !terrain_allows(piece.kind, sq)
        {
            return false;
        }
        if piece.contains(PieceKind::Commander) {
            let slot = self.commanders[piece.color.index()];
            if slot.is_some() {
                return false;
            }
        }
        self.squares[sq.index()] = Some(piece);
        self.refresh_derived();
        self.hash = self.calculate_hash();
        self.invalidate_cache();
        true
    }

    /// Remove and return the piece on a square.
    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        if !sq.is_on_board() {
            return None;
        }
        let piece = self.squares[sq.index()].take()?;
        self.refresh_derived();
        self.hash = self.calculate_hash();
        self.invalidate_cache();
        Some(piece)
    }

    /// Committed history length in turns.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub(crate) fn commander_square(&self, color: Color) -> Option<Square> {
        self.commanders[color.index()]
    }

    /// Recompute the commanders cache and both air-defense indexes from the
    /// board. Runs after every structural edit so the derived state always
    /// equals a full rebuild.
    pub(crate) fn refresh_derived(&mut self) {
        self.commanders = [None, None];
        for sq in Square::all() {
            if let Some(piece) = &self.squares[sq.index()] {
                if piece.contains(PieceKind::Commander) {
                    self.commanders[piece.color.index()] = Some(sq);
                }
            }
        }
        let red = AirDefenseIndex::rebuild(&self.squares, Color::Red);
        let blue = AirDefenseIndex::rebuild(&self.squares, Color::Blue);
        self.air_defense = [red, blue];
    }

    /// Position digest from scratch: every stack member keyed at its square,
    /// plus the side to move.
    #[must_use]
    pub(crate) fn calculate_hash(&self) -> u64 {
        let mut hash: u64 = 0;
        for sq in Square::all() {
            if let Some(piece) = &self.squares[sq.index()] {
                for m in piece.members() {
                    hash ^= member_key(m.kind, piece.color, sq, m.heroic);
                }
            }
        }
        if self.turn == Color::Blue {
            hash ^= ZOBRIST.blue_to_move_key;
        }
        hash
    }

    pub(crate) fn invalidate_cache(&self) {
        self.cache.lock().clear();
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
