//! Piece, color and stack types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use smallvec::SmallVec;

use crate::board::error::CombineError;

/// Number of distinct piece kinds.
pub const PIECE_KIND_COUNT: usize = 11;

/// Side colors. Red moves first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
        }
    }

    /// Returns the opposite color
    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Blue => write!(f, "Blue"),
        }
    }
}

/// Piece kinds of the variant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Commander,
    Infantry,
    Tank,
    Militia,
    Engineer,
    Artillery,
    AntiAir,
    Missile,
    AirForce,
    Navy,
    Headquarters,
}

/// Humanlike kinds may ride Tanks, Air Force and the second Navy slot.
const HUMANLIKE: [PieceKind; 4] = [
    PieceKind::Infantry,
    PieceKind::Militia,
    PieceKind::Engineer,
    PieceKind::Commander,
];

const HEAVY_EQUIPMENT: [PieceKind; 3] = [
    PieceKind::Artillery,
    PieceKind::AntiAir,
    PieceKind::Missile,
];

const NAVY_SECOND_SLOT: [PieceKind; 5] = [
    PieceKind::Tank,
    PieceKind::Infantry,
    PieceKind::Militia,
    PieceKind::Engineer,
    PieceKind::Commander,
];

impl PieceKind {
    pub(crate) const ALL: [PieceKind; PIECE_KIND_COUNT] = [
        PieceKind::Commander,
        PieceKind::Infantry,
        PieceKind::Tank,
        PieceKind::Militia,
        PieceKind::Engineer,
        PieceKind::Artillery,
        PieceKind::AntiAir,
        PieceKind::Missile,
        PieceKind::AirForce,
        PieceKind::Navy,
        PieceKind::Headquarters,
    ];

    #[inline]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        match self {
            PieceKind::Commander => 0,
            PieceKind::Infantry => 1,
            PieceKind::Tank => 2,
            PieceKind::Militia => 3,
            PieceKind::Engineer => 4,
            PieceKind::Artillery => 5,
            PieceKind::AntiAir => 6,
            PieceKind::Missile => 7,
            PieceKind::AirForce => 8,
            PieceKind::Navy => 9,
            PieceKind::Headquarters => 10,
        }
    }

    /// The carrier hierarchy flag; the member with the highest flag
    /// takes the carrier slot of a stack.
    #[inline]
    #[must_use]
    pub const fn role_flag(self) -> u16 {
        match self {
            PieceKind::Commander => 1,
            PieceKind::Infantry => 2,
            PieceKind::Militia => 4,
            PieceKind::Artillery => 8,
            PieceKind::AntiAir => 16,
            PieceKind::Missile => 32,
            PieceKind::Tank => 64,
            PieceKind::AirForce => 128,
            PieceKind::Engineer => 256,
            PieceKind::Navy => 512,
            PieceKind::Headquarters => 1024,
        }
    }

    /// Parse a piece kind from a lowercase letter (c i t m e a g s f n h)
    #[must_use]
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'c' => Some(PieceKind::Commander),
            'i' => Some(PieceKind::Infantry),
            't' => Some(PieceKind::Tank),
            'm' => Some(PieceKind::Militia),
            'e' => Some(PieceKind::Engineer),
            'a' => Some(PieceKind::Artillery),
            'g' => Some(PieceKind::AntiAir),
            's' => Some(PieceKind::Missile),
            'f' => Some(PieceKind::AirForce),
            'n' => Some(PieceKind::Navy),
            'h' => Some(PieceKind::Headquarters),
            _ => None,
        }
    }

    /// Convert to the lowercase notation letter
    #[inline]
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Commander => 'c',
            PieceKind::Infantry => 'i',
            PieceKind::Tank => 't',
            PieceKind::Militia => 'm',
            PieceKind::Engineer => 'e',
            PieceKind::Artillery => 'a',
            PieceKind::AntiAir => 'g',
            PieceKind::Missile => 's',
            PieceKind::AirForce => 'f',
            PieceKind::Navy => 'n',
            PieceKind::Headquarters => 'h',
        }
    }

    /// Convert to a FEN letter with case based on color (uppercase for Red)
    #[inline]
    #[must_use]
    pub fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        if color == Color::Red {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Heavy pieces must cross the river over a bridge square.
    #[inline]
    #[must_use]
    pub const fn is_heavy(self) -> bool {
        matches!(
            self,
            PieceKind::Artillery | PieceKind::AntiAir | PieceKind::Missile
        )
    }

    /// Ranged kinds may stay-capture instead of moving onto the target.
    #[inline]
    #[must_use]
    pub const fn is_ranged(self) -> bool {
        matches!(
            self,
            PieceKind::Artillery | PieceKind::Missile | PieceKind::AirForce | PieceKind::Navy
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_humanlike(self) -> bool {
        matches!(
            self,
            PieceKind::Infantry | PieceKind::Militia | PieceKind::Engineer | PieceKind::Commander
        )
    }

    /// Base air-defense disc radius; zero for kinds without a defense role.
    #[inline]
    #[must_use]
    pub(crate) const fn base_air_defense(self) -> u8 {
        match self {
            PieceKind::Navy | PieceKind::AntiAir => 1,
            PieceKind::Missile => 2,
            _ => 0,
        }
    }

    /// Carrier slot blueprint: each slot lists the kinds it admits.
    fn carrier_slots(self) -> &'static [&'static [PieceKind]] {
        match self {
            PieceKind::Navy => &[&[PieceKind::AirForce], &NAVY_SECOND_SLOT],
            PieceKind::AirForce => &[&[PieceKind::Tank], &HUMANLIKE],
            PieceKind::Tank => &[&HUMANLIKE],
            PieceKind::Engineer => &[&HEAVY_EQUIPMENT],
            PieceKind::Headquarters => &[&[PieceKind::Commander]],
            _ => &[],
        }
    }
}

/// A stack member below the carrier. Color is the carrier's; stacks are
/// monochrome and flat.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CarriedPiece {
    pub kind: PieceKind,
    pub heroic: bool,
}

/// A piece on the board. When `carried` is nonempty the piece is a stack
/// and this value is its carrier.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub heroic: bool,
    pub carried: SmallVec<[CarriedPiece; 2]>,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            heroic: false,
            carried: SmallVec::new(),
        }
    }

    #[must_use]
    pub(crate) fn with_heroic(kind: PieceKind, color: Color, heroic: bool) -> Self {
        Piece {
            kind,
            color,
            heroic,
            carried: SmallVec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_stack(&self) -> bool {
        !self.carried.is_empty()
    }

    /// All members, carrier first.
    pub fn members(&self) -> impl Iterator<Item = CarriedPiece> + '_ {
        std::iter::once(CarriedPiece {
            kind: self.kind,
            heroic: self.heroic,
        })
        .chain(self.carried.iter().copied())
    }

    /// Split into solo pieces, carrier first.
    #[must_use]
    pub fn flatten(&self) -> Vec<Piece> {
        self.members()
            .map(|m| Piece::with_heroic(m.kind, self.color, m.heroic))
            .collect()
    }

    #[must_use]
    pub fn contains(&self, kind: PieceKind) -> bool {
        self.members().any(|m| m.kind == kind)
    }

    /// Heroic flag of the member with the given kind, if present.
    #[must_use]
    pub fn member_heroic(&self, kind: PieceKind) -> Option<bool> {
        self.members().find(|m| m.kind == kind).map(|m| m.heroic)
    }

    /// Flip a member's heroic flag, returning the prior value.
    pub(crate) fn set_member_heroic(&mut self, kind: PieceKind, value: bool) -> Option<bool> {
        if self.kind == kind {
            let prior = self.heroic;
            self.heroic = value;
            return Some(prior);
        }
        for m in &mut self.carried {
            if m.kind == kind {
                let prior = m.heroic;
                m.heroic = value;
                return Some(prior);
            }
        }
        None
    }

    /// Air-defense disc radius projected by this square. Carried members are
    /// inert; only the carrier defends. Heroic raises a nonzero base by one.
    #[must_use]
    pub fn air_defense_level(&self) -> u8 {
        let base = self.kind.base_air_defense();
        if base > 0 && self.heroic {
            base + 1
        } else {
            base
        }
    }

    /// Remove the member of the given kind, returning it as a solo piece
    /// together with whatever remains on the square.
    ///
    /// Fails when the member is absent or when the leftover members can no
    /// longer form a legal stack.
    pub(crate) fn detach(&self, kind: PieceKind) -> Result<(Piece, Option<Piece>), CombineError> {
        let mut rest = self.flatten();
        let pos = rest
            .iter()
            .position(|p| p.kind == kind)
            .ok_or(CombineError::MemberNotFound { kind })?;
        let removed = rest.remove(pos);
        let remaining = match rest.len() {
            0 => None,
            1 => Some(rest.pop().expect("len checked")),
            _ => Some(build_stack(rest)?),
        };
        Ok((removed, remaining))
    }
}

impl fmt::Display for Piece {
    /// FEN-style rendering: `+T`, `(NFT)`, `(+nft)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_stack() {
            write!(f, "(")?;
            for m in self.members() {
                if m.heroic {
                    write!(f, "+")?;
                }
                write!(f, "{}", m.kind.to_fen_char(self.color))?;
            }
            write!(f, ")")
        } else {
            if self.heroic {
                write!(f, "+")?;
            }
            write!(f, "{}", self.kind.to_fen_char(self.color))
        }
    }
}

/// Build a stack from solo pieces. Members are ordered by descending role
/// flag; the first becomes the carrier and the rest must fit its slot
/// blueprint.
pub(crate) fn build_stack(mut pieces: Vec<Piece>) -> Result<Piece, CombineError> {
    debug_assert!(!pieces.is_empty());
    let color = pieces[0].color;
    if pieces.iter().any(|p| p.color != color) {
        return Err(CombineError::ColorMismatch);
    }
    for p in &pieces {
        for q in &pieces {
            if !std::ptr::eq(p, q) && p.kind == q.kind {
                return Err(CombineError::DuplicateKind { kind: p.kind });
            }
        }
    }

    pieces.sort_by(|a, b| b.kind.role_flag().cmp(&a.kind.role_flag()));
    let carrier = pieces.remove(0);
    let slots = carrier.kind.carrier_slots();
    if pieces.len() > slots.len() {
        return Err(CombineError::CapacityExceeded {
            carrier: carrier.kind,
        });
    }

    if !assign_to_slots(&pieces, slots) {
        // Name the first cargo the blueprint cannot seat
        let cargo = pieces
            .iter()
            .find(|p| !slots.iter().any(|s| s.contains(&p.kind)))
            .or_else(|| pieces.first())
            .expect("nonempty cargo");
        return Err(CombineError::Blueprint {
            carrier: carrier.kind,
            cargo: cargo.kind,
        });
    }

    Ok(Piece {
        kind: carrier.kind,
        color,
        heroic: carrier.heroic,
        carried: pieces
            .iter()
            .map(|p| CarriedPiece {
                kind: p.kind,
                heroic: p.heroic,
            })
            .collect(),
    })
}

/// Try to seat every cargo piece in a distinct slot.
fn assign_to_slots(cargo: &[Piece], slots: &[&[PieceKind]]) -> bool {
    match cargo {
        [] => true,
        [a] => slots.iter().any(|s| s.contains(&a.kind)),
        [a, b] => {
            if slots.len() < 2 {
                return false;
            }
            (slots[0].contains(&a.kind) && slots[1].contains(&b.kind))
                || (slots[0].contains(&b.kind) && slots[1].contains(&a.kind))
        }
        _ => false,
    }
}

/// Merge a new piece (possibly a stack) into an existing one.
pub(crate) fn add_to_stack(existing: &Piece, new: &Piece) -> Result<Piece, CombineError> {
    let mut members = existing.flatten();
    members.extend(new.flatten());
    build_stack(members)
}
