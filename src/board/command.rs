//! Atomic reversible board edits and their composition into commands.
//!
//! Every action captures the prior value when it executes, so a command is
//! undone exactly by reverting its actions in reverse order. One committed
//! turn is one command; a committed deploy session is one composite command.

use super::error::MoveError;
use super::history::{HistoryEntry, MoveRecord};
use super::state::Game;
use super::types::{add_to_stack, Color, Move, Piece, PieceKind, Square};

/// Turn and clock snapshot carried by a `SetMeta` action.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct MetaSnapshot {
    pub turn: Color,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// One atomic board edit with the prior state it replaced.
#[derive(Clone, Debug)]
pub(crate) enum Action {
    RemovePiece { sq: Square, prior: Piece },
    PlacePiece { sq: Square, piece: Piece },
    PopFromStack { sq: Square, kind: PieceKind, prior: Piece },
    PushToStack { sq: Square, prior: Piece },
    SetHeroic {
        sq: Square,
        kind: PieceKind,
        prior: bool,
    },
    SetMeta { prior: MetaSnapshot },
}

/// An ordered list of atomic actions; reversing it restores the prior state
/// bit for bit.
#[derive(Clone, Debug, Default)]
pub(crate) struct Command {
    pub actions: Vec<Action>,
}

impl Game {
    pub(crate) fn meta_snapshot(&self) -> MetaSnapshot {
        MetaSnapshot {
            turn: self.turn,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    fn exec_remove(&mut self, sq: Square) -> Result<Action, MoveError> {
        let prior = self.squares[sq.index()]
            .take()
            .ok_or(MoveError::PieceNotFound { square: sq })?;
        Ok(Action::RemovePiece { sq, prior })
    }

    fn exec_place(&mut self, sq: Square, piece: Piece) -> Action {
        debug_assert!(self.squares[sq.index()].is_none(), "place onto occupied square");
        self.squares[sq.index()] = Some(piece.clone());
        Action::PlacePiece { sq, piece }
    }

    fn exec_pop(&mut self, sq: Square, kind: PieceKind) -> Result<(Action, Piece), MoveError> {
        let prior = self.squares[sq.index()]
            .clone()
            .ok_or(MoveError::PieceNotFound { square: sq })?;
        let (removed, remaining) = prior.detach(kind)?;
        self.squares[sq.index()] = remaining;
        Ok((Action::PopFromStack { sq, kind, prior }, removed))
    }

    fn exec_push(&mut self, sq: Square, piece: Piece) -> Result<Action, MoveError> {
        let prior = self.squares[sq.index()]
            .clone()
            .ok_or(MoveError::PieceNotFound { square: sq })?;
        let merged = add_to_stack(&prior, &piece)?;
        self.squares[sq.index()] = Some(merged);
        Ok(Action::PushToStack { sq, prior })
    }

    fn exec_set_heroic(&mut self, sq: Square, kind: PieceKind, value: bool) -> Option<Action> {
        let piece = self.squares[sq.index()].as_mut()?;
        let prior = piece.set_member_heroic(kind, value)?;
        Some(Action::SetHeroic { sq, kind, prior })
    }

    pub(crate) fn exec_set_meta(&mut self, next: MetaSnapshot) -> Action {
        let prior = self.meta_snapshot();
        self.turn = next.turn;
        self.halfmove_clock = next.halfmove_clock;
        self.fullmove_number = next.fullmove_number;
        Action::SetMeta { prior }
    }

    pub(crate) fn revert_action(&mut self, action: Action) {
        match action {
            Action::RemovePiece { sq, prior } | Action::PopFromStack { sq, prior, .. } => {
                self.squares[sq.index()] = Some(prior);
            }
            Action::PlacePiece { sq, .. } => {
                self.squares[sq.index()] = None;
            }
            Action::PushToStack { sq, prior } => {
                self.squares[sq.index()] = Some(prior);
            }
            Action::SetHeroic { sq, kind, prior } => {
                if let Some(piece) = self.squares[sq.index()].as_mut() {
                    piece.set_member_heroic(kind, prior);
                }
            }
            Action::SetMeta { prior } => {
                self.turn = prior.turn;
                self.halfmove_clock = prior.halfmove_clock;
                self.fullmove_number = prior.fullmove_number;
            }
        }
    }

    pub(crate) fn revert_command(&mut self, command: Command) {
        for action in command.actions.into_iter().rev() {
            self.revert_action(action);
        }
        self.refresh_derived();
    }

    /// Execute the board edits of one move (no turn flip, no heroic scan)
    /// and return the recorded command. Shared by the legality filter, the
    /// deploy-session append path and the commit path.
    pub(crate) fn execute_move_actions(&mut self, mv: &Move) -> Result<Command, MoveError> {
        let mut actions = Vec::new();

        if mv.is_deploy() {
            if !mv.is_stay() {
                let (pop, deployed) = self.exec_pop(mv.from, mv.piece)?;
                actions.push(pop);
                if mv.is_capture() {
                    actions.push(self.exec_remove(mv.to)?);
                }
                if !mv.is_suicide() {
                    if self.squares[mv.to.index()].is_some() {
                        actions.push(self.exec_push(mv.to, deployed)?);
                    } else {
                        actions.push(self.exec_place(mv.to, deployed));
                    }
                }
            }
        } else if mv.is_stay_capture() {
            actions.push(self.exec_remove(mv.to)?);
        } else if mv.is_combine() {
            let moving = self.squares[mv.from.index()]
                .clone()
                .ok_or(MoveError::PieceNotFound { square: mv.from })?;
            actions.push(self.exec_remove(mv.from)?);
            actions.push(self.exec_push(mv.to, moving)?);
        } else {
            let moving = self.squares[mv.from.index()]
                .clone()
                .ok_or(MoveError::PieceNotFound { square: mv.from })?;
            actions.push(self.exec_remove(mv.from)?);
            if mv.is_capture() {
                actions.push(self.exec_remove(mv.to)?);
            }
            if !mv.is_suicide() {
                actions.push(self.exec_place(mv.to, moving));
            }
        }

        self.refresh_derived();
        Ok(Command { actions })
    }

    /// Promote every not-yet-heroic own piece that now attacks the enemy
    /// commander. Returns whether anything was promoted.
    pub(crate) fn run_heroic_scan(&mut self, us: Color, actions: &mut Vec<Action>) -> bool {
        let Some(enemy_commander) = self.commander_square(us.opponent()) else {
            return false;
        };
        let mut promoted = false;
        for sq in self.attackers_of(enemy_commander, us) {
            let Some(piece) = self.get(sq) else { continue };
            if piece.color == us && !piece.heroic {
                let kind = piece.kind;
                if let Some(action) = self.exec_set_heroic(sq, kind, true) {
                    actions.push(action);
                    promoted = true;
                }
            }
        }
        if promoted {
            self.refresh_derived();
        }
        promoted
    }

    /// Execute and commit one non-deploy move: board edits, heroic scan,
    /// turn flip and clocks, history, repetition.
    pub(crate) fn commit_move(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        let fen_before = self.fen();
        let san = self.move_to_san(&mv);
        let lan = mv.to_string();

        let mut command = self.execute_move_actions(&mv)?;
        let promoted = self.run_heroic_scan(mv.color, &mut command.actions);

        let reset_clock = mv.is_capture() || promoted;
        let next = MetaSnapshot {
            turn: self.turn.opponent(),
            halfmove_clock: if reset_clock {
                0
            } else {
                self.halfmove_clock + 1
            },
            fullmove_number: self.fullmove_number + u32::from(self.turn == Color::Blue),
        };
        command.actions.push(self.exec_set_meta(next));

        self.hash = self.calculate_hash();
        let hash_after = self.hash;
        self.repetition.increment(hash_after);

        let record = MoveRecord {
            san,
            lan,
            color: mv.color,
            piece: mv.piece,
            from: mv.from,
            to: mv.to,
            flags: mv.flags,
            captured: mv.captured.clone(),
            fen_before,
            fen_after: self.fen(),
        };
        self.history.push(HistoryEntry {
            command,
            record: record.clone(),
            hash_after,
        });
        self.invalidate_cache();

        #[cfg(feature = "logging")]
        log::debug!("committed {}", record.lan);

        Ok(record)
    }

    /// Take back the latest deploy step, or the latest committed turn when
    /// no session is open.
    pub fn undo(&mut self) -> Option<MoveRecord> {
        if self.session.is_some() {
            return self.undo_session_step();
        }
        let entry = self.history.pop()?;
        self.repetition.decrement(entry.hash_after);
        self.revert_command(entry.command);
        self.hash = self.calculate_hash();
        self.invalidate_cache();
        Some(entry.record)
    }
}
