//! Per-color air-defense influence maps.
//!
//! Each defender with level `L` covers the closed disc
//! `(Δx)² + (Δy)² ≤ L²` around its square. The index stores, per square,
//! the squares of every defender covering it, and is rebuilt from the board
//! whenever a defender is placed, removed or flips heroic.

use smallvec::SmallVec;

use super::state::Game;
use super::types::{Color, Piece, Square, GRID_SIZE};

#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct AirDefenseIndex {
    covers: Vec<SmallVec<[Square; 2]>>,
}

impl AirDefenseIndex {
    pub(crate) fn new() -> Self {
        AirDefenseIndex {
            covers: vec![SmallVec::new(); GRID_SIZE],
        }
    }

    /// Full rebuild from the board for one color.
    pub(crate) fn rebuild(squares: &[Option<Piece>; GRID_SIZE], color: Color) -> Self {
        let mut index = AirDefenseIndex::new();
        for sq in Square::all() {
            if let Some(piece) = &squares[sq.index()] {
                if piece.color == color {
                    let level = piece.air_defense_level();
                    if level > 0 {
                        index.add_disc(sq, level);
                    }
                }
            }
        }
        index
    }

    fn add_disc(&mut self, defender: Square, level: u8) {
        let radius = level as i32;
        let (rank, file) = (defender.rank() as i32, defender.file() as i32);
        for dr in -radius..=radius {
            for df in -radius..=radius {
                if dr * dr + df * df > radius * radius {
                    continue;
                }
                let (r, f) = (rank + dr, file + df);
                if r < 0 || f < 0 {
                    continue;
                }
                if let Some(sq) = Square::try_new(r as usize, f as usize) {
                    self.covers[sq.index()].push(defender);
                }
            }
        }
    }

    #[inline]
    pub(crate) fn defenders_at(&self, sq: Square) -> &[Square] {
        &self.covers[sq.index()]
    }
}

/// Outcome of sending an Air Force along a ray through enemy air defense.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum FlightVerdict {
    /// No traversed square is covered.
    SafePass,
    /// Exactly one defender covers a tail of the path; the flight completes
    /// and the Air Force is destroyed on arrival.
    Kamikaze,
    /// Multiple defenders, or the path leaves a covered block again; the
    /// move is rejected.
    Destroyed,
}

impl Game {
    /// Classify an Air Force flight for the given path (origin excluded,
    /// destination included).
    pub(crate) fn evaluate_flight_path(&self, flyer: Color, path: &[Square]) -> FlightVerdict {
        let enemy = flyer.opponent();
        let index = &self.air_defense[enemy.index()];

        let mut defenders: SmallVec<[Square; 4]> = SmallVec::new();
        let mut last_covered = false;
        for sq in path {
            let covering = index.defenders_at(*sq);
            last_covered = !covering.is_empty();
            for d in covering {
                if !defenders.contains(d) {
                    defenders.push(*d);
                }
            }
        }

        if defenders.is_empty() {
            return FlightVerdict::SafePass;
        }
        if defenders.len() > 1 {
            return FlightVerdict::Destroyed;
        }
        // A single disc cut by a straight ray is one contiguous block, so the
        // flight never left it iff the destination is still covered.
        if last_covered {
            FlightVerdict::Kamikaze
        } else {
            FlightVerdict::Destroyed
        }
    }
}
