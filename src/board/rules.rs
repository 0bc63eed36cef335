//! Per-piece movement rules.

use super::types::{PieceKind, GRID_WIDTH};

/// Padded-grid deltas for the four orthogonal directions.
pub(crate) const ORTHOGONAL_DELTAS: [i16; 4] = [
    GRID_WIDTH as i16,
    -(GRID_WIDTH as i16),
    1,
    -1,
];

/// Padded-grid deltas for the four diagonal directions.
pub(crate) const DIAGONAL_DELTAS: [i16; 4] = [
    GRID_WIDTH as i16 + 1,
    GRID_WIDTH as i16 - 1,
    -(GRID_WIDTH as i16) - 1,
    -(GRID_WIDTH as i16) + 1,
];

/// Sentinel range for the Commander's unlimited slide.
pub(crate) const UNLIMITED_RANGE: u8 = u8::MAX;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum DirectionSet {
    Orthogonal,
    Both,
}

impl DirectionSet {
    pub(crate) fn deltas(self) -> &'static [i16] {
        static BOTH: [i16; 8] = [
            GRID_WIDTH as i16,
            -(GRID_WIDTH as i16),
            1,
            -1,
            GRID_WIDTH as i16 + 1,
            GRID_WIDTH as i16 - 1,
            -(GRID_WIDTH as i16) - 1,
            -(GRID_WIDTH as i16) + 1,
        ];
        match self {
            DirectionSet::Orthogonal => &ORTHOGONAL_DELTAS,
            DirectionSet::Both => &BOTH,
        }
    }
}

#[inline]
pub(crate) fn is_diagonal_delta(delta: i16) -> bool {
    DIAGONAL_DELTAS.contains(&delta)
}

/// Movement parameters of one piece image (kind + heroic flag).
#[derive(Clone, Copy, Debug)]
pub(crate) struct MovementConfig {
    pub move_range: u8,
    pub capture_range: u8,
    pub directions: DirectionSet,
    pub move_ignores_blocking: bool,
    pub capture_ignores_blocking: bool,
    /// Cap on diagonal rays (Missile reaches 1 diagonally, 2 when heroic).
    pub diagonal_cap: Option<u8>,
    /// Navy guns reach one square less against land targets than torpedoes
    /// do against other navies.
    pub naval_gun_range: Option<u8>,
}

impl MovementConfig {
    /// Movement limit along one ray.
    #[inline]
    pub(crate) fn move_limit(&self, diagonal: bool) -> u8 {
        match (diagonal, self.diagonal_cap) {
            (true, Some(cap)) => self.move_range.min(cap),
            _ => self.move_range,
        }
    }

    /// Capture limit along one ray against a target kind.
    #[inline]
    pub(crate) fn capture_limit(&self, diagonal: bool, target: PieceKind) -> u8 {
        let mut range = self.capture_range;
        if let Some(gun) = self.naval_gun_range {
            if target != PieceKind::Navy {
                range = gun;
            }
        }
        match (diagonal, self.diagonal_cap) {
            (true, Some(cap)) => range.min(cap),
            _ => range,
        }
    }
}

/// The movement table. Heroic pieces gain one square of range (the
/// Commander's slide stays unlimited, its capture grows 1 to 2), move in
/// all eight directions, and an immobile Headquarters starts walking.
pub(crate) fn movement_config(kind: PieceKind, heroic: bool) -> MovementConfig {
    let mut cfg = match kind {
        PieceKind::Commander => MovementConfig {
            move_range: UNLIMITED_RANGE,
            capture_range: 1,
            directions: DirectionSet::Orthogonal,
            move_ignores_blocking: false,
            capture_ignores_blocking: false,
            diagonal_cap: None,
            naval_gun_range: None,
        },
        PieceKind::Infantry | PieceKind::Engineer => MovementConfig {
            move_range: 1,
            capture_range: 1,
            directions: DirectionSet::Orthogonal,
            move_ignores_blocking: false,
            capture_ignores_blocking: false,
            diagonal_cap: None,
            naval_gun_range: None,
        },
        PieceKind::Militia => MovementConfig {
            move_range: 1,
            capture_range: 1,
            directions: DirectionSet::Both,
            move_ignores_blocking: false,
            capture_ignores_blocking: false,
            diagonal_cap: None,
            naval_gun_range: None,
        },
        PieceKind::Tank => MovementConfig {
            move_range: 2,
            capture_range: 2,
            directions: DirectionSet::Orthogonal,
            move_ignores_blocking: false,
            capture_ignores_blocking: true,
            diagonal_cap: None,
            naval_gun_range: None,
        },
        PieceKind::Artillery => MovementConfig {
            move_range: 3,
            capture_range: 3,
            directions: DirectionSet::Both,
            move_ignores_blocking: false,
            capture_ignores_blocking: true,
            diagonal_cap: None,
            naval_gun_range: None,
        },
        PieceKind::AntiAir => MovementConfig {
            move_range: 1,
            capture_range: 1,
            directions: DirectionSet::Orthogonal,
            move_ignores_blocking: false,
            capture_ignores_blocking: false,
            diagonal_cap: None,
            naval_gun_range: None,
        },
        PieceKind::Missile => MovementConfig {
            move_range: 2,
            capture_range: 2,
            directions: DirectionSet::Both,
            move_ignores_blocking: false,
            capture_ignores_blocking: true,
            diagonal_cap: Some(1),
            naval_gun_range: None,
        },
        PieceKind::AirForce => MovementConfig {
            move_range: 4,
            capture_range: 4,
            directions: DirectionSet::Both,
            move_ignores_blocking: true,
            capture_ignores_blocking: true,
            diagonal_cap: None,
            naval_gun_range: None,
        },
        PieceKind::Navy => MovementConfig {
            move_range: 4,
            capture_range: 4,
            directions: DirectionSet::Both,
            move_ignores_blocking: true,
            capture_ignores_blocking: true,
            diagonal_cap: None,
            naval_gun_range: Some(3),
        },
        PieceKind::Headquarters => MovementConfig {
            move_range: 0,
            capture_range: 0,
            directions: DirectionSet::Orthogonal,
            move_ignores_blocking: false,
            capture_ignores_blocking: false,
            diagonal_cap: None,
            naval_gun_range: None,
        },
    };

    if heroic {
        cfg.directions = DirectionSet::Both;
        match kind {
            PieceKind::Commander => cfg.capture_range = 2,
            PieceKind::Headquarters => {
                // Mobilized: walks like a Militia
                cfg.move_range = 1;
                cfg.capture_range = 1;
            }
            _ => {
                cfg.move_range = cfg.move_range.saturating_add(1);
                cfg.capture_range = cfg.capture_range.saturating_add(1);
                cfg.diagonal_cap = cfg.diagonal_cap.map(|c| c + 1);
                cfg.naval_gun_range = cfg.naval_gun_range.map(|c| c + 1);
            }
        }
    }

    cfg
}
