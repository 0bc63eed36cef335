//! Zobrist hashing for CoTuLenh positions.
//!
//! Provides 64-bit position digests for the repetition table and the move
//! cache. Every stack member (carrier and carried alike) contributes its own
//! piece key at the stack's square, with a separate overlay key when the
//! member is heroic.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Color, PieceKind, Square, GRID_SIZE, PIECE_KIND_COUNT};

pub(crate) struct ZobristKeys {
    // piece_keys[kind][color][square_index]
    pub(crate) piece_keys: [[[u64; GRID_SIZE]; 2]; PIECE_KIND_COUNT],
    // heroic_keys[kind][color][square_index]
    pub(crate) heroic_keys: [[[u64; GRID_SIZE]; 2]; PIECE_KIND_COUNT],
    pub(crate) blue_to_move_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(0x5AD0_11E5_u64); // Fixed seed for reproducibility
        let mut piece_keys = [[[0; GRID_SIZE]; 2]; PIECE_KIND_COUNT];
        let mut heroic_keys = [[[0; GRID_SIZE]; 2]; PIECE_KIND_COUNT];

        for kind in &mut piece_keys {
            for color in kind.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        for kind in &mut heroic_keys {
            for color in kind.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let blue_to_move_key = rng.gen();

        ZobristKeys {
            piece_keys,
            heroic_keys,
            blue_to_move_key,
        }
    }
}

// Initialize Zobrist keys lazily and globally
pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[inline]
pub(crate) fn member_key(kind: PieceKind, color: Color, sq: Square, heroic: bool) -> u64 {
    let base = ZOBRIST.piece_keys[kind.index()][color.index()][sq.index()];
    if heroic {
        base ^ ZOBRIST.heroic_keys[kind.index()][color.index()][sq.index()]
    } else {
        base
    }
}
