//! Deploy sessions: an open transaction in which members of one stack move
//! independently before the turn commits.
//!
//! Lifecycle: `None -> Open -> (Canceled | Committed)`. The turn never flips
//! while a session is open; the session commits into a single history entry.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::command::{Command, MetaSnapshot};
use super::error::{IllegalMoveReason, MoveError, SessionError};
use super::history::{HistoryEntry, MoveRecord};
use super::state::Game;
use super::types::{Color, Move, MoveFlags, MoveOptions, Piece, PieceKind, Square};

#[derive(Clone, Debug)]
pub(crate) struct DeployStep {
    pub mv: Move,
    pub command: Command,
    pub record: MoveRecord,
}

#[derive(Clone, Debug)]
pub(crate) struct DeploySession {
    pub origin: Square,
    /// Snapshot of the stack as it stood when the session opened.
    pub original: Piece,
    pub turn: Color,
    pub steps: Vec<DeployStep>,
    pub fen_before: String,
}

impl DeploySession {
    /// A member is accounted for once it deployed or explicitly stayed.
    pub(crate) fn accounted(&self, kind: PieceKind) -> bool {
        self.steps.iter().any(|s| s.mv.piece == kind)
    }

    pub(crate) fn deployed(&self) -> Vec<(PieceKind, Square)> {
        self.steps
            .iter()
            .filter(|s| !s.mv.is_stay())
            .map(|s| (s.mv.piece, s.mv.to))
            .collect()
    }

    pub(crate) fn stayed(&self) -> Vec<PieceKind> {
        self.steps
            .iter()
            .filter(|s| s.mv.is_stay())
            .map(|s| s.mv.piece)
            .collect()
    }

    /// Members of the original stack not yet deployed or stayed.
    pub(crate) fn remaining(&self) -> Vec<PieceKind> {
        self.original
            .members()
            .map(|m| m.kind)
            .filter(|kind| !self.accounted(*kind))
            .collect()
    }

    pub(crate) fn carrier_moved(&self) -> bool {
        self.steps
            .iter()
            .any(|s| s.mv.piece == self.original.kind && !s.mv.is_stay())
    }

    /// Step token as used in session SAN and the FEN session block:
    /// `T>c5`, `Txd5`, `T<`, with a `+` prefix for heroic members.
    pub(crate) fn step_token(mv: &Move) -> String {
        let mut token = String::new();
        if mv.heroic {
            token.push('+');
        }
        token.push(mv.piece.to_char().to_ascii_uppercase());
        if mv.is_stay() {
            token.push('<');
        } else {
            token.push(if mv.is_capture() { 'x' } else { '>' });
            token.push_str(&mv.to.to_string());
        }
        token
    }

    pub(crate) fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.origin.hash(&mut hasher);
        for step in &self.steps {
            step.mv.piece.hash(&mut hasher);
            step.mv.to.hash(&mut hasher);
            step.mv.flags.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Read-only view of an open session.
#[derive(Clone, Debug)]
pub struct SessionView {
    pub origin: Square,
    pub turn: Color,
    pub original: Piece,
    pub deployed: Vec<(PieceKind, Square)>,
    pub stayed: Vec<PieceKind>,
    pub remaining: Vec<PieceKind>,
    pub steps: Vec<String>,
}

/// Deploy progress of an open session.
#[derive(Clone, Debug)]
pub struct DeployView {
    pub origin: Square,
    pub remaining: Vec<PieceKind>,
    pub carrier_moved: bool,
}

/// Outcome of a commit attempt. Failure leaves the session open and the
/// board untouched.
#[derive(Clone, Debug)]
pub struct CommitOutcome {
    pub success: bool,
    pub reason: Option<SessionError>,
    pub record: Option<MoveRecord>,
}

impl CommitOutcome {
    fn failure(reason: SessionError) -> Self {
        CommitOutcome {
            success: false,
            reason: Some(reason),
            record: None,
        }
    }
}

impl Game {
    #[must_use]
    pub fn session_view(&self) -> Option<SessionView> {
        let session = self.session.as_ref()?;
        Some(SessionView {
            origin: session.origin,
            turn: session.turn,
            original: session.original.clone(),
            deployed: session.deployed(),
            stayed: session.stayed(),
            remaining: session.remaining(),
            steps: session
                .steps
                .iter()
                .map(|s| DeploySession::step_token(&s.mv))
                .collect(),
        })
    }

    #[must_use]
    pub fn deploy_state(&self) -> Option<DeployView> {
        let session = self.session.as_ref()?;
        Some(DeployView {
            origin: session.origin,
            remaining: session.remaining(),
            carrier_moved: session.carrier_moved(),
        })
    }

    pub(crate) fn session_digest(&self) -> u64 {
        self.session.as_ref().map_or(0, DeploySession::digest)
    }

    /// Whether the open session could commit right now.
    #[must_use]
    pub fn can_commit_session(&self) -> bool {
        match &self.session {
            Some(session) => !self.is_commander_in_check(session.turn),
            None => false,
        }
    }

    /// Execute one deploy step, opening a session on the first one.
    pub(crate) fn apply_deploy_step(
        &mut self,
        mv: Move,
        opts: &MoveOptions,
    ) -> Result<MoveRecord, MoveError> {
        let origin = mv.deploy_origin.unwrap_or(mv.from);
        match &self.session {
            Some(session) if session.origin != origin => {
                return Err(SessionError::SessionAlreadyOpen {
                    origin: session.origin,
                }
                .into());
            }
            _ => {}
        }

        let opening = self.session.is_none();
        let snapshot = if opening {
            let original = self
                .get(origin)
                .cloned()
                .ok_or(MoveError::PieceNotFound { square: origin })?;
            if !original.is_stack() {
                return Err(MoveError::PieceNotFound { square: origin });
            }
            Some((original, self.fen()))
        } else {
            None
        };

        let fen_before = self.fen();
        let san = self.move_to_san(&mv);
        let lan = mv.to_string();
        let command = self.execute_move_actions(&mv)?;

        if let Some((original, fen_at_open)) = snapshot {
            self.session = Some(DeploySession {
                origin,
                original,
                turn: self.turn,
                steps: Vec::new(),
                fen_before: fen_at_open,
            });
        }

        let mut record = MoveRecord {
            san,
            lan,
            color: mv.color,
            piece: mv.piece,
            from: mv.from,
            to: mv.to,
            flags: mv.flags,
            captured: mv.captured.clone(),
            fen_before,
            fen_after: String::new(),
        };
        let session = self.session.as_mut().expect("session just ensured");
        session.steps.push(DeployStep {
            mv,
            command,
            record: record.clone(),
        });
        let done = session.remaining().is_empty();
        // The post-step FEN carries the session block, so it can only be
        // rendered once the step is registered.
        record.fen_after = self.fen();
        if let Some(session) = self.session.as_mut() {
            if let Some(step) = session.steps.last_mut() {
                step.record.fen_after = record.fen_after.clone();
            }
        }
        self.invalidate_cache();

        if opts.auto_commit && done {
            let outcome = self.commit_session();
            if outcome.success {
                return Ok(outcome.record.expect("successful commit has a record"));
            }
        }
        Ok(record)
    }

    /// Commit the open session into a single history entry: merged step
    /// commands, heroic scan, turn flip, clocks.
    pub fn commit_session(&mut self) -> CommitOutcome {
        let Some(session) = self.session.as_ref() else {
            return CommitOutcome::failure(SessionError::NoSessionOpen);
        };
        let turn = session.turn;
        if self.is_commander_in_check(turn) {
            let reason = if self.flying_general_open() {
                IllegalMoveReason::CommanderExposure
            } else {
                IllegalMoveReason::LeavesOwnInCheck
            };
            return CommitOutcome::failure(SessionError::CannotCommit { reason });
        }

        let session = self.session.take().expect("session checked above");
        let any_capture = session.steps.iter().any(|s| s.mv.is_capture());
        let tokens: Vec<String> = session
            .steps
            .iter()
            .map(|s| DeploySession::step_token(&s.mv))
            .collect();
        let notation = format!("{}:{}", session.origin, tokens.join(","));

        let mut actions: Vec<_> = session
            .steps
            .into_iter()
            .flat_map(|s| s.command.actions)
            .collect();
        let promoted = self.run_heroic_scan(turn, &mut actions);

        let reset_clock = any_capture || promoted;
        let next = MetaSnapshot {
            turn: turn.opponent(),
            halfmove_clock: if reset_clock {
                0
            } else {
                self.halfmove_clock + 1
            },
            fullmove_number: self.fullmove_number + u32::from(turn == Color::Blue),
        };
        actions.push(self.exec_set_meta(next));

        self.hash = self.calculate_hash();
        let hash_after = self.hash;
        self.repetition.increment(hash_after);

        let record = MoveRecord {
            san: notation.clone(),
            lan: notation,
            color: turn,
            piece: session.original.kind,
            from: session.origin,
            to: session.origin,
            flags: MoveFlags::DEPLOY,
            captured: None,
            fen_before: session.fen_before,
            fen_after: self.fen(),
        };
        self.history.push(HistoryEntry {
            command: Command { actions },
            record: record.clone(),
            hash_after,
        });
        self.invalidate_cache();

        #[cfg(feature = "logging")]
        log::debug!("committed session {}", record.san);

        CommitOutcome {
            success: true,
            reason: None,
            record: Some(record),
        }
    }

    /// Undo every appended step and discard the session. The turn does not
    /// flip and no history entry is written.
    pub fn cancel_session(&mut self) -> Result<(), SessionError> {
        let session = self.session.take().ok_or(SessionError::NoSessionOpen)?;
        for step in session.steps.into_iter().rev() {
            self.revert_command(step.command);
        }
        self.invalidate_cache();
        Ok(())
    }

    /// Take back the most recent deploy step; popping the first step
    /// discards the session entirely.
    pub(crate) fn undo_session_step(&mut self) -> Option<MoveRecord> {
        let session = self.session.as_mut()?;
        let step = session.steps.pop()?;
        if session.steps.is_empty() {
            self.session = None;
        }
        self.revert_command(step.command);
        self.invalidate_cache();
        Some(step.record)
    }
}
