//! Move types and request/option structs.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::{Color, Piece, PieceKind};
use super::square::Square;

/// Move-kind bit flags. `CAPTURE` co-occurs with `STAY_CAPTURE` and
/// `SUICIDE`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoveFlags(u8);

impl MoveFlags {
    pub const NORMAL: MoveFlags = MoveFlags(1);
    pub const CAPTURE: MoveFlags = MoveFlags(2);
    pub const STAY_CAPTURE: MoveFlags = MoveFlags(4);
    pub const SUICIDE: MoveFlags = MoveFlags(8);
    pub const DEPLOY: MoveFlags = MoveFlags(16);
    pub const COMBINE: MoveFlags = MoveFlags(32);
    pub const STAY: MoveFlags = MoveFlags(64);

    #[inline]
    #[must_use]
    pub const fn contains(self, other: MoveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    #[must_use]
    pub const fn intersects(self, other: MoveFlags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    #[must_use]
    pub const fn without(self, other: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 & !other.0)
    }
}

impl BitOr for MoveFlags {
    type Output = MoveFlags;

    fn bitor(self, rhs: MoveFlags) -> MoveFlags {
        MoveFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for MoveFlags {
    fn bitor_assign(&mut self, rhs: MoveFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for MoveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        for (flag, name) in [
            (MoveFlags::NORMAL, "NORMAL"),
            (MoveFlags::CAPTURE, "CAPTURE"),
            (MoveFlags::STAY_CAPTURE, "STAY_CAPTURE"),
            (MoveFlags::SUICIDE, "SUICIDE"),
            (MoveFlags::DEPLOY, "DEPLOY"),
            (MoveFlags::COMBINE, "COMBINE"),
            (MoveFlags::STAY, "STAY"),
        ] {
            if self.contains(flag) {
                names.push(name);
            }
        }
        write!(f, "MoveFlags({})", names.join("|"))
    }
}

/// A generated move. Carries the image of the moving piece and the captured
/// or combined pieces so the command layer can compose an exactly reversible
/// edit.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Kind of the moving piece (for deploys: the deployed member).
    pub piece: PieceKind,
    /// Heroic flag of the moving piece at `from`.
    pub heroic: bool,
    pub color: Color,
    pub flags: MoveFlags,
    /// Image of the captured piece, whole stack included.
    pub captured: Option<Piece>,
    /// Resulting stack of a combine move.
    pub combined: Option<Piece>,
    /// Origin stack square when this is a deploy step.
    pub deploy_origin: Option<Square>,
}

impl Move {
    #[inline]
    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.flags.intersects(MoveFlags::CAPTURE)
    }

    #[inline]
    #[must_use]
    pub fn is_stay_capture(&self) -> bool {
        self.flags.contains(MoveFlags::STAY_CAPTURE)
    }

    /// The mover is removed when the move executes (air-defense kamikaze).
    #[inline]
    #[must_use]
    pub fn is_suicide(&self) -> bool {
        self.flags.contains(MoveFlags::SUICIDE)
    }

    #[inline]
    #[must_use]
    pub fn is_deploy(&self) -> bool {
        self.flags.contains(MoveFlags::DEPLOY)
    }

    #[inline]
    #[must_use]
    pub fn is_combine(&self) -> bool {
        self.flags.contains(MoveFlags::COMBINE)
    }

    /// Deploy step that keeps the member on the origin stack.
    #[inline]
    #[must_use]
    pub fn is_stay(&self) -> bool {
        self.flags.contains(MoveFlags::STAY)
    }

    /// The square the mover ends on.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> Square {
        if self.is_stay_capture() || self.is_stay() {
            self.from
        } else {
            self.to
        }
    }
}

impl fmt::Display for Move {
    /// Long algebraic notation, e.g. `Ic4-c5`, `Txd5`, `c3:Tc3>c5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.piece.to_char().to_ascii_uppercase();
        if let Some(origin) = self.deploy_origin {
            if self.is_stay() {
                return write!(f, "{origin}:{letter}{origin}<");
            }
            let op = if self.is_capture() { "x" } else { ">" };
            return write!(f, "{origin}:{letter}{origin}{op}{}", self.to);
        }
        let op = if self.is_combine() {
            "&"
        } else if self.is_suicide() && self.is_capture() {
            "**"
        } else if self.is_stay_capture() {
            "*"
        } else if self.is_capture() {
            "x"
        } else {
            "-"
        };
        write!(f, "{letter}{}{op}{}", self.from, self.to)
    }
}

/// List of moves.
pub type MoveList = Vec<Move>;

/// Structured move request, the non-notation form accepted by
/// [`Game::make_move`](crate::board::Game::make_move).
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveRequest {
    pub from: Option<Square>,
    pub to: Option<Square>,
    pub piece: Option<PieceKind>,
    /// Request a deploy step rather than moving the whole stack.
    pub deploy: bool,
    /// Deploy step that keeps the piece on the origin.
    pub stay: bool,
}

/// Input accepted by [`Game::make_move`](crate::board::Game::make_move):
/// SAN, LAN, or a structured request.
#[derive(Clone, Copy, Debug)]
pub enum MoveInput<'a> {
    Notation(&'a str),
    Structured(MoveRequest),
}

impl<'a> From<&'a str> for MoveInput<'a> {
    fn from(s: &'a str) -> Self {
        MoveInput::Notation(s)
    }
}

impl From<MoveRequest> for MoveInput<'_> {
    fn from(req: MoveRequest) -> Self {
        MoveInput::Structured(req)
    }
}

/// Options for [`Game::make_move`](crate::board::Game::make_move).
#[derive(Clone, Copy, Debug)]
pub struct MoveOptions {
    /// Match against legal moves only. With `false`, pseudo-legal moves
    /// (which may leave the commander exposed) are accepted too.
    pub legal: bool,
    /// Commit a deploy session as soon as every member is accounted for.
    pub auto_commit: bool,
    /// Require notation input to match the canonical SAN or LAN rendering
    /// exactly instead of the permissive grammar.
    pub strict: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        MoveOptions {
            legal: true,
            auto_commit: true,
            strict: false,
        }
    }
}
