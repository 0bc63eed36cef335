//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `fen.rs` - FEN parsing and rendering, stacks and session blocks
//! - `movegen.rs` - Per-piece movement, terrain and bridges
//! - `air_defense.rs` - Air-defense discs and flight classification
//! - `make_unmake.rs` - Command execute/revert correctness
//! - `session.rs` - Deploy-session lifecycle
//! - `heroic.rs` - Heroic promotion
//! - `san.rs` - Notation rendering and parsing
//! - `draw.rs` - Fifty-move and repetition rules
//! - `edge_cases.rs` - Boundary scenarios
//! - `perft.rs` - Node counts over the decision tree
//! - `proptest.rs` - Property-based tests

mod air_defense;
mod draw;
mod movegen;
mod perft;
mod session;

use rand::prelude::*;

use crate::board::{Game, Move, MoveOptions, MoveQuery, MoveRecord, Square};

pub(crate) fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

/// Find the whole-piece move between two squares in the legal move list.
pub(crate) fn find_move(game: &Game, from: &str, to: &str) -> Move {
    let (from, to) = (sq(from), sq(to));
    game.moves(&MoveQuery::default())
        .into_iter()
        .find(|m| m.from == from && m.to == to && !m.is_deploy() && !m.is_stay_capture())
        .unwrap_or_else(|| panic!("Expected move {from}-{to} not found"))
}

pub(crate) fn apply(game: &mut Game, notation: &str) -> MoveRecord {
    game.make_move(notation, &MoveOptions::default())
        .unwrap_or_else(|err| panic!("move '{notation}' failed: {err}"))
}

/// Play random legal moves, resolving any session left open at the end.
pub(crate) fn random_playout(game: &mut Game, rng: &mut StdRng, plies: usize) {
    for _ in 0..plies {
        let moves = game.moves(&MoveQuery::default());
        if moves.is_empty() {
            if game.session_view().is_some() {
                let _ = game.cancel_session();
                continue;
            }
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())].clone();
        if mv.is_deploy() {
            let _ = game.apply_deploy_step(mv, &MoveOptions::default());
        } else {
            let _ = game.commit_move(mv);
        }
    }
    if game.session_view().is_some() && !game.commit_session().success {
        let _ = game.cancel_session();
    }
}
