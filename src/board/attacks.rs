//! Attack and exposure oracle: who attacks a square, commander checks and
//! the flying-general rule.

use super::air_defense::FlightVerdict;
use super::masks::terrain_allows;
use super::rules::movement_config;
use super::state::Game;
use super::types::{Color, Piece, PieceKind, Square, GRID_WIDTH};

#[inline]
fn sign(v: i32) -> i16 {
    match v.cmp(&0) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}

impl Game {
    /// Squares of every `by`-colored piece that attacks `target` under its
    /// current movement config. Carried pieces are inert; only the carrier
    /// of a stack attacks.
    #[must_use]
    pub fn attackers_of(&self, target: Square, by: Color) -> Vec<Square> {
        let mut attackers = Vec::new();
        for sq in Square::all() {
            if let Some(piece) = self.get(sq) {
                if piece.color == by && self.piece_attacks_square(sq, piece, target) {
                    attackers.push(sq);
                }
            }
        }
        attackers
    }

    /// Whether the piece standing on `from` attacks `target`.
    pub(crate) fn piece_attacks_square(&self, from: Square, piece: &Piece, target: Square) -> bool {
        if from == target {
            return false;
        }
        let dr = target.rank() as i32 - from.rank() as i32;
        let df = target.file() as i32 - from.file() as i32;
        let orthogonal = dr == 0 || df == 0;
        let diagonal = dr != 0 && dr.abs() == df.abs();
        if !orthogonal && !diagonal {
            return false;
        }

        let cfg = movement_config(piece.kind, piece.heroic);
        if diagonal && cfg.directions == super::rules::DirectionSet::Orthogonal {
            return false;
        }

        let distance = dr.abs().max(df.abs()) as u8;
        let delta = sign(dr) * GRID_WIDTH as i16 + sign(df);

        let target_piece = self.get(target);
        let target_kind = target_piece.map_or(PieceKind::Infantry, |p| p.kind);

        // Flying general: commanders threaten each other along an empty
        // orthogonal line regardless of capture range.
        if piece.kind == PieceKind::Commander
            && orthogonal
            && target_piece.is_some_and(|p| p.contains(PieceKind::Commander))
            && self.ray_clear(from, target, delta)
        {
            return true;
        }

        if distance > cfg.capture_limit(diagonal, target_kind) {
            return false;
        }
        if !cfg.capture_ignores_blocking && !self.ray_clear(from, target, delta) {
            return false;
        }
        // The attacker either moves onto the square or shoots from afar.
        if !terrain_allows(piece.kind, target) && !piece.kind.is_ranged() {
            return false;
        }
        // Air defense can deny the flight outright.
        if piece.kind == PieceKind::AirForce {
            let path = self.ray_path(from, target, delta);
            if self.evaluate_flight_path(piece.color, &path) == FlightVerdict::Destroyed {
                return false;
            }
        }
        true
    }

    /// All squares strictly between `from` and `to` along `delta` are empty.
    pub(crate) fn ray_clear(&self, from: Square, to: Square, delta: i16) -> bool {
        let mut sq = from;
        loop {
            sq = match sq.offset(delta) {
                Some(next) => next,
                None => return false,
            };
            if sq == to {
                return true;
            }
            if self.get(sq).is_some() {
                return false;
            }
        }
    }

    /// Squares stepped through from `from` (exclusive) to `to` (inclusive).
    pub(crate) fn ray_path(&self, from: Square, to: Square, delta: i16) -> Vec<Square> {
        let mut path = Vec::new();
        let mut sq = from;
        while sq != to {
            match sq.offset(delta) {
                Some(next) => {
                    path.push(next);
                    sq = next;
                }
                None => break,
            }
        }
        path
    }

    /// Both commanders share an empty file or rank.
    pub(crate) fn flying_general_open(&self) -> bool {
        let (Some(red), Some(blue)) = (
            self.commander_square(Color::Red),
            self.commander_square(Color::Blue),
        ) else {
            return false;
        };
        let dr = blue.rank() as i32 - red.rank() as i32;
        let df = blue.file() as i32 - red.file() as i32;
        if dr != 0 && df != 0 {
            return false;
        }
        let delta = sign(dr) * GRID_WIDTH as i16 + sign(df);
        self.ray_clear(red, blue, delta)
    }

    /// The commander of `color` is attacked, or stands exposed to the enemy
    /// commander on an open line.
    #[must_use]
    pub fn is_commander_in_check(&self, color: Color) -> bool {
        let Some(sq) = self.commander_square(color) else {
            return false;
        };
        if self.flying_general_open() {
            return true;
        }
        !self.attackers_of(sq, color.opponent()).is_empty()
    }
}
