//! Error types for board operations.

use std::fmt;

use super::types::{PieceKind, Square};

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-11)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-10)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-11)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-10)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 6)
    TooFewParts { found: usize },
    /// Invalid piece character in position string
    InvalidPiece { char: char },
    /// Invalid side to move (must be 'r' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid rank in position string
    InvalidRank { rank: usize },
    /// Too many files in a rank
    TooManyFiles { rank: usize, files: usize },
    /// Unterminated or malformed stack group
    InvalidStack { rank: usize },
    /// Invalid halfmove or fullmove counter
    InvalidCounter { found: String },
    /// A side has two commanders, or a piece sits on hostile terrain
    InvalidSetup { square: Square },
    /// Malformed trailing deploy-session block
    InvalidSession { found: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 6 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'r' or 'b'")
            }
            FenError::InvalidRank { rank } => {
                write!(f, "Invalid rank index {rank} in FEN")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::InvalidStack { rank } => {
                write!(f, "Malformed stack group in rank {rank}")
            }
            FenError::InvalidCounter { found } => {
                write!(f, "Invalid move counter '{found}'")
            }
            FenError::InvalidSetup { square } => {
                write!(f, "Illegal piece setup at {square}")
            }
            FenError::InvalidSession { found } => {
                write!(f, "Malformed deploy-session block '{found}'")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Why a requested move is not playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    /// Destination beyond the piece's range or off its directions
    OutOfRange,
    /// Path to the destination is blocked
    Blocked,
    /// Destination terrain does not admit the piece
    WrongTerrain,
    /// Heavy piece crossing the river away from a bridge
    BridgeRequired,
    /// Air Force path crosses more than one air-defense zone
    AirDefenseDestroyed,
    /// Move opens the file or rank between the commanders
    CommanderExposure,
    /// Move leaves the own commander attacked
    LeavesOwnInCheck,
    /// Commanders would face each other after the move
    FlyingGeneral,
}

impl fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IllegalMoveReason::OutOfRange => "destination out of range",
            IllegalMoveReason::Blocked => "path is blocked",
            IllegalMoveReason::WrongTerrain => "wrong terrain for this piece",
            IllegalMoveReason::BridgeRequired => "heavy pieces cross the river on bridges",
            IllegalMoveReason::AirDefenseDestroyed => "flight path crosses air defense",
            IllegalMoveReason::CommanderExposure => "move exposes the commander",
            IllegalMoveReason::LeavesOwnInCheck => "own commander left in check",
            IllegalMoveReason::FlyingGeneral => "commanders may not face each other",
        };
        write!(f, "{name}")
    }
}

/// Error type for stack construction failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineError {
    /// Members of different colors
    ColorMismatch,
    /// Two members of the same kind
    DuplicateKind { kind: PieceKind },
    /// More cargo than the carrier has slots
    CapacityExceeded { carrier: PieceKind },
    /// The blueprint does not let the carrier hold this cargo
    Blueprint {
        carrier: PieceKind,
        cargo: PieceKind,
    },
    /// Stack member of the requested kind does not exist
    MemberNotFound { kind: PieceKind },
}

impl fmt::Display for CombineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineError::ColorMismatch => write!(f, "Stack members must share a color"),
            CombineError::DuplicateKind { kind } => {
                write!(f, "Stack already holds a {kind:?}")
            }
            CombineError::CapacityExceeded { carrier } => {
                write!(f, "{carrier:?} cannot carry that many pieces")
            }
            CombineError::Blueprint { carrier, cargo } => {
                write!(f, "{carrier:?} cannot carry {cargo:?}")
            }
            CombineError::MemberNotFound { kind } => {
                write!(f, "No {kind:?} in this stack")
            }
        }
    }
}

impl std::error::Error for CombineError {}

/// Error type for deploy-session operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No deploy session is open
    NoSessionOpen,
    /// A session is already open at another square
    SessionAlreadyOpen { origin: Square },
    /// Commit blocked: the net position leaves the commander in check
    CannotCommit { reason: IllegalMoveReason },
    /// Cancel requested with nothing to cancel
    CannotCancelEmpty,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoSessionOpen => write!(f, "No deploy session is open"),
            SessionError::SessionAlreadyOpen { origin } => {
                write!(f, "A deploy session is already open at {origin}")
            }
            SessionError::CannotCommit { reason } => {
                write!(f, "Cannot commit session: {reason}")
            }
            SessionError::CannotCancelEmpty => write!(f, "No session to cancel"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Error type for SAN/LAN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// Empty notation string
    Empty,
    /// Invalid piece character
    InvalidPiece { char: char },
    /// Invalid square in the notation
    InvalidSquare { notation: String },
    /// Missing or unknown move operator
    InvalidOperator { notation: String },
    /// Ambiguous move (multiple pieces can reach the target)
    AmbiguousMove { san: String },
    /// No matching legal move found
    NoMatchingMove { san: String },
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "Empty notation string"),
            SanError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}'")
            }
            SanError::InvalidSquare { notation } => {
                write!(f, "Invalid square in '{notation}'")
            }
            SanError::InvalidOperator { notation } => {
                write!(f, "Missing move operator in '{notation}'")
            }
            SanError::AmbiguousMove { san } => write!(f, "Ambiguous move '{san}'"),
            SanError::NoMatchingMove { san } => {
                write!(f, "No legal move matches '{san}'")
            }
        }
    }
}

impl std::error::Error for SanError {}

/// Error type for [`Game::make_move`](crate::board::Game::make_move) and the
/// board-editing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Origin square holds no piece of the side to move
    PieceNotFound { square: Square },
    /// The requested move is not playable
    Illegal {
        reason: IllegalMoveReason,
        notation: String,
    },
    /// Stack blueprint rejected the combination
    Combination(CombineError),
    /// Deploy-session state rejected the operation
    Session(SessionError),
    /// The notation could not be parsed or matched
    Parse(SanError),
    /// The game is already over
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::PieceNotFound { square } => {
                write!(f, "No piece to move on {square}")
            }
            MoveError::Illegal { reason, notation } => {
                write!(f, "Illegal move '{notation}': {reason}")
            }
            MoveError::Combination(err) => write!(f, "{err}"),
            MoveError::Session(err) => write!(f, "{err}"),
            MoveError::Parse(err) => write!(f, "{err}"),
            MoveError::GameOver => write!(f, "The game is over"),
        }
    }
}

impl std::error::Error for MoveError {}

impl From<CombineError> for MoveError {
    fn from(err: CombineError) -> Self {
        MoveError::Combination(err)
    }
}

impl From<SessionError> for MoveError {
    fn from(err: SessionError) -> Self {
        MoveError::Session(err)
    }
}

impl From<SanError> for MoveError {
    fn from(err: SanError) -> Self {
        MoveError::Parse(err)
    }
}
