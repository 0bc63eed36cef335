//! Terrain masks and river bridges.
//!
//! Files a and b are open water, file c and the four river squares
//! (d6, e6, d7, e7) are mixed, everything from file c eastwards is land.
//! The river runs between ranks 6 and 7; heavy pieces cross it over the
//! bridge squares f6, f7, h6 and h7.

use once_cell::sync::Lazy;

use super::types::{PieceKind, Square, FILE_COUNT, GRID_SIZE, RANK_COUNT};

/// Squares a Navy may occupy.
pub(crate) static NAVY_MASK: Lazy<[bool; GRID_SIZE]> = Lazy::new(|| {
    let mut mask = [false; GRID_SIZE];
    for rank in 0..RANK_COUNT {
        for file in 0..FILE_COUNT {
            let water = file <= 2 || (is_river(rank, file));
            mask[Square::new(rank, file).index()] = water;
        }
    }
    mask
});

/// Squares land-family pieces may occupy.
pub(crate) static LAND_MASK: Lazy<[bool; GRID_SIZE]> = Lazy::new(|| {
    let mut mask = [false; GRID_SIZE];
    for rank in 0..RANK_COUNT {
        for file in 2..FILE_COUNT {
            mask[Square::new(rank, file).index()] = true;
        }
    }
    mask
});

/// River squares d6, e6, d7, e7 (navigable and walkable).
fn is_river(rank: usize, file: usize) -> bool {
    (rank == 5 || rank == 6) && (file == 3 || file == 4)
}

/// Bridge squares f6, f7, h6, h7.
#[inline]
pub(crate) fn is_bridge(sq: Square) -> bool {
    let (rank, file) = (sq.rank(), sq.file());
    (rank == 5 || rank == 6) && (file == 5 || file == 7)
}

/// Whether a single step moves between rank 6 and rank 7.
#[inline]
pub(crate) fn step_crosses_river(from: Square, to: Square) -> bool {
    matches!((from.rank(), to.rank()), (5, 6) | (6, 5))
}

/// Whether terrain admits this piece kind on this square. Air Force flies
/// over and lands on anything.
#[inline]
pub(crate) fn terrain_allows(kind: PieceKind, sq: Square) -> bool {
    match kind {
        PieceKind::AirForce => true,
        PieceKind::Navy => NAVY_MASK[sq.index()],
        _ => LAND_MASK[sq.index()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_navy_mask() {
        assert!(NAVY_MASK[sq("a1").index()]);
        assert!(NAVY_MASK[sq("b12").index()]);
        assert!(NAVY_MASK[sq("c5").index()]);
        assert!(NAVY_MASK[sq("d6").index()]);
        assert!(NAVY_MASK[sq("e7").index()]);
        assert!(!NAVY_MASK[sq("d5").index()]);
        assert!(!NAVY_MASK[sq("f6").index()]);
        assert!(!NAVY_MASK[sq("k12").index()]);
    }

    #[test]
    fn test_land_mask() {
        assert!(!LAND_MASK[sq("a1").index()]);
        assert!(!LAND_MASK[sq("b7").index()]);
        assert!(LAND_MASK[sq("c1").index()]);
        assert!(LAND_MASK[sq("d6").index()]);
        assert!(LAND_MASK[sq("k12").index()]);
    }

    #[test]
    fn test_bridges() {
        for s in ["f6", "f7", "h6", "h7"] {
            assert!(is_bridge(sq(s)), "{s} should be a bridge");
        }
        for s in ["g6", "g7", "e6", "f5", "f8", "h5"] {
            assert!(!is_bridge(sq(s)), "{s} should not be a bridge");
        }
    }

    #[test]
    fn test_step_crosses_river() {
        assert!(step_crosses_river(sq("f6"), sq("f7")));
        assert!(step_crosses_river(sq("g7"), sq("g6")));
        assert!(step_crosses_river(sq("f6"), sq("g7")));
        assert!(!step_crosses_river(sq("f5"), sq("f6")));
        assert!(!step_crosses_river(sq("f7"), sq("f8")));
    }

    #[test]
    fn test_terrain_allows() {
        assert!(terrain_allows(PieceKind::Navy, sq("a4")));
        assert!(!terrain_allows(PieceKind::Navy, sq("d5")));
        assert!(terrain_allows(PieceKind::Tank, sq("d5")));
        assert!(!terrain_allows(PieceKind::Tank, sq("b5")));
        assert!(terrain_allows(PieceKind::AirForce, sq("a1")));
        assert!(terrain_allows(PieceKind::AirForce, sq("k12")));
    }
}
