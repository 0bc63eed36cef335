//! Game-state predicates.

use super::movegen::MoveQuery;
use super::state::Game;
use super::types::Color;

impl Game {
    /// The side to move is in check.
    #[must_use]
    pub fn is_check(&self) -> bool {
        self.is_commander_in_check(self.turn)
    }

    /// Check test for an arbitrary color.
    #[must_use]
    pub fn is_commander_in_danger(&self, color: Color) -> bool {
        self.is_commander_in_check(color)
    }

    /// A commander has been captured; the game is decided.
    #[must_use]
    pub fn is_commander_captured(&self) -> bool {
        self.commander_square(Color::Red).is_none() || self.commander_square(Color::Blue).is_none()
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        !self.is_commander_captured() && self.is_check() && !self.has_legal_move()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_commander_captured() && !self.is_check() && !self.has_legal_move()
    }

    #[must_use]
    pub fn is_draw_by_fifty_moves(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// The committed position occurred at least three times.
    #[must_use]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition.get(self.hash) >= 3
    }

    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_draw_by_fifty_moves() || self.is_threefold_repetition()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_commander_captured()
            || self.is_draw()
            || !self.has_legal_move()
    }

    fn has_legal_move(&self) -> bool {
        !self.moves(&MoveQuery::default()).is_empty()
    }
}
