//! Move generation: pseudo-legal candidates for normal and deploy contexts,
//! the legality filter, and resolution of user move requests.

use super::air_defense::FlightVerdict;
use super::error::{IllegalMoveReason, MoveError, SanError};
use super::history::MoveRecord;
use super::masks::{is_bridge, step_crosses_river, terrain_allows, LAND_MASK, NAVY_MASK};
use super::rules::{is_diagonal_delta, movement_config};
use super::session::DeploySession;
use super::state::Game;
use super::types::{
    add_to_stack, Move, MoveFlags, MoveInput, MoveList, MoveOptions, MoveRequest, Piece,
    PieceKind, Square,
};

/// Filters for [`Game::moves`].
#[derive(Clone, Copy, Debug)]
pub struct MoveQuery {
    /// Only moves departing this square.
    pub square: Option<Square>,
    /// Only moves of this piece kind.
    pub piece: Option<PieceKind>,
    /// Apply the legality filter (own commander safe). Default true.
    pub legal: bool,
}

impl Default for MoveQuery {
    fn default() -> Self {
        MoveQuery {
            square: None,
            piece: None,
            legal: true,
        }
    }
}

impl Game {
    /// Generate moves for the side to move, deploy-session aware.
    #[must_use]
    pub fn moves(&self, query: &MoveQuery) -> MoveList {
        self.moves_internal(query.legal)
            .into_iter()
            .filter(|m| query.square.is_none_or(|sq| m.from == sq))
            .filter(|m| query.piece.is_none_or(|p| m.piece == p))
            .collect()
    }

    pub(crate) fn moves_internal(&self, legal: bool) -> MoveList {
        let key = self
            .hash
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ self.session_digest().rotate_left(17)
            ^ u64::from(legal);
        if let Some(hit) = self.cache.lock().get(key) {
            return hit;
        }
        let mut list = self.pseudo_moves();
        if legal {
            list = self.legal_filter(list);
        }
        self.cache.lock().put(key, list.clone());
        list
    }

    /// All pseudo-legal candidates for the side to move.
    pub(crate) fn pseudo_moves(&self) -> MoveList {
        let mut out = MoveList::new();
        if self.is_commander_captured() {
            return out;
        }
        if let Some(session) = &self.session {
            self.deploy_mode_moves(session, &mut out);
        } else {
            for sq in Square::all() {
                let Some(piece) = self.get(sq) else { continue };
                if piece.color != self.turn {
                    continue;
                }
                self.piece_moves(sq, piece, None, &mut out);
                if piece.is_stack() {
                    self.stack_deploy_moves(sq, piece, &mut out);
                }
            }
        }
        out
    }

    /// First-step deploy candidates for a stack in normal mode.
    fn stack_deploy_moves(&self, origin: Square, stack: &Piece, out: &mut MoveList) {
        for member in stack.members() {
            let Ok((solo, _rest)) = stack.detach(member.kind) else {
                continue;
            };
            self.piece_moves(origin, &solo, Some(origin), out);
        }
    }

    /// Candidates while a session is open: further deploys of unaccounted
    /// members (recombines included) plus explicit Stay steps.
    fn deploy_mode_moves(&self, session: &DeploySession, out: &mut MoveList) {
        let origin = session.origin;
        let Some(stack_now) = self.get(origin) else {
            return;
        };
        for member in stack_now.members() {
            if session.accounted(member.kind) {
                continue;
            }
            let Ok((solo, _rest)) = stack_now.detach(member.kind) else {
                continue;
            };
            self.piece_moves(origin, &solo, Some(origin), out);
            out.push(Move {
                from: origin,
                to: origin,
                piece: member.kind,
                heroic: member.heroic,
                color: stack_now.color,
                flags: MoveFlags::DEPLOY | MoveFlags::STAY,
                captured: None,
                combined: None,
                deploy_origin: Some(origin),
            });
        }
    }

    /// Walk every ray of one piece image and emit candidates.
    fn piece_moves(
        &self,
        from: Square,
        image: &Piece,
        deploy_origin: Option<Square>,
        out: &mut MoveList,
    ) {
        let cfg = movement_config(image.kind, image.heroic);
        let us = image.color;

        for &delta in cfg.directions.deltas() {
            let diagonal = is_diagonal_delta(delta);
            let move_limit = u16::from(cfg.move_limit(diagonal));
            let scan_limit = move_limit.max(u16::from(cfg.capture_limit(diagonal, PieceKind::Navy)));

            let mut blocked = false;
            let mut captured_on_ray = false;
            let mut path: Vec<Square> = Vec::new();
            let mut prev = from;
            let mut step: u16 = 0;

            loop {
                step += 1;
                if step > scan_limit {
                    break;
                }
                let Some(next) = prev.offset(delta) else { break };
                if image.kind.is_heavy() && step_crosses_river(prev, next) && !is_bridge(next) {
                    break;
                }
                // Hostile terrain stops movement. Pieces whose fire ignores
                // blocking may still shoot at and past the boundary.
                let hostile = match image.kind {
                    PieceKind::AirForce => false,
                    PieceKind::Navy => !NAVY_MASK[next.index()],
                    _ => !LAND_MASK[next.index()],
                };
                if hostile {
                    blocked = true;
                    if !cfg.capture_ignores_blocking {
                        break;
                    }
                }
                path.push(next);

                match self.get(next) {
                    None => {
                        if !blocked && step <= move_limit {
                            self.push_quiet(from, next, image, deploy_origin, &path, out);
                        }
                    }
                    Some(other) if other.color == us => {
                        if !blocked && step <= move_limit {
                            self.push_combine(from, next, image, other, deploy_origin, &path, out);
                        }
                        if !cfg.move_ignores_blocking {
                            blocked = true;
                        }
                        if !cfg.move_ignores_blocking && !cfg.capture_ignores_blocking {
                            break;
                        }
                    }
                    Some(enemy) => {
                        let cap_limit = u16::from(cfg.capture_limit(diagonal, enemy.kind));
                        let in_reach = step <= cap_limit && (!blocked || cfg.capture_ignores_blocking);
                        // Commanders take each other along an open line
                        // regardless of their capture range.
                        let flying_general = image.kind == PieceKind::Commander
                            && !diagonal
                            && enemy.contains(PieceKind::Commander)
                            && !blocked;
                        if !captured_on_ray && (in_reach || flying_general) {
                            self.push_captures(from, next, image, enemy, deploy_origin, &path, out);
                            captured_on_ray = true;
                        }
                        if !cfg.move_ignores_blocking {
                            blocked = true;
                        }
                        if !cfg.move_ignores_blocking && !cfg.capture_ignores_blocking {
                            break;
                        }
                    }
                }
                prev = next;
            }
        }
    }

    fn push_quiet(
        &self,
        from: Square,
        to: Square,
        image: &Piece,
        deploy_origin: Option<Square>,
        path: &[Square],
        out: &mut MoveList,
    ) {
        let mut flags = MoveFlags::NORMAL;
        if image.kind == PieceKind::AirForce {
            match self.evaluate_flight_path(image.color, path) {
                FlightVerdict::SafePass => {}
                FlightVerdict::Kamikaze => flags |= MoveFlags::SUICIDE,
                FlightVerdict::Destroyed => return,
            }
        }
        if deploy_origin.is_some() {
            flags |= MoveFlags::DEPLOY;
        }
        out.push(Move {
            from,
            to,
            piece: image.kind,
            heroic: image.heroic,
            color: image.color,
            flags,
            captured: None,
            combined: None,
            deploy_origin,
        });
    }

    fn push_combine(
        &self,
        from: Square,
        to: Square,
        image: &Piece,
        target: &Piece,
        deploy_origin: Option<Square>,
        path: &[Square],
        out: &mut MoveList,
    ) {
        let Ok(combined) = add_to_stack(target, image) else {
            return;
        };
        if image.kind == PieceKind::AirForce
            && self.evaluate_flight_path(image.color, path) != FlightVerdict::SafePass
        {
            return;
        }
        let mut flags = MoveFlags::COMBINE;
        if deploy_origin.is_some() {
            flags |= MoveFlags::DEPLOY;
        }
        out.push(Move {
            from,
            to,
            piece: image.kind,
            heroic: image.heroic,
            color: image.color,
            flags,
            captured: None,
            combined: Some(combined),
            deploy_origin,
        });
    }

    fn push_captures(
        &self,
        from: Square,
        target: Square,
        image: &Piece,
        enemy: &Piece,
        deploy_origin: Option<Square>,
        path: &[Square],
        out: &mut MoveList,
    ) {
        let base = if deploy_origin.is_some() {
            MoveFlags::DEPLOY
        } else {
            MoveFlags::default()
        };

        // Capture by moving onto the target square.
        if terrain_allows(image.kind, target) {
            let mut flags = base | MoveFlags::CAPTURE;
            let mut allowed = true;
            if image.kind == PieceKind::AirForce {
                match self.evaluate_flight_path(image.color, path) {
                    FlightVerdict::SafePass => {}
                    FlightVerdict::Kamikaze => flags |= MoveFlags::SUICIDE,
                    FlightVerdict::Destroyed => allowed = false,
                }
            }
            if allowed {
                out.push(Move {
                    from,
                    to: target,
                    piece: image.kind,
                    heroic: image.heroic,
                    color: image.color,
                    flags,
                    captured: Some(enemy.clone()),
                    combined: None,
                    deploy_origin,
                });
            }
        }

        // Ranged pieces may also fire without moving.
        if image.kind.is_ranged() {
            let safe = image.kind != PieceKind::AirForce
                || self.evaluate_flight_path(image.color, path) == FlightVerdict::SafePass;
            if safe {
                out.push(Move {
                    from,
                    to: target,
                    piece: image.kind,
                    heroic: image.heroic,
                    color: image.color,
                    flags: base | MoveFlags::CAPTURE | MoveFlags::STAY_CAPTURE,
                    captured: Some(enemy.clone()),
                    combined: None,
                    deploy_origin,
                });
            }
        }
    }

    /// Keep only candidates that do not leave the mover's commander attacked
    /// or exposed. Capturing the enemy commander ends the game and is always
    /// legal.
    fn legal_filter(&self, moves: MoveList) -> MoveList {
        let mut scratch = self.clone();
        moves
            .into_iter()
            .filter(|mv| {
                if mv
                    .captured
                    .as_ref()
                    .is_some_and(|c| c.contains(PieceKind::Commander))
                {
                    return true;
                }
                match scratch.execute_move_actions(mv) {
                    Ok(command) => {
                        let ok = !scratch.is_commander_in_check(mv.color);
                        scratch.revert_command(command);
                        ok
                    }
                    Err(_) => false,
                }
            })
            .collect()
    }

    /// Play a move given as SAN, LAN or a structured request.
    pub fn make_move<'a>(
        &mut self,
        input: impl Into<MoveInput<'a>>,
        opts: &MoveOptions,
    ) -> Result<MoveRecord, MoveError> {
        if self.session.is_none() && self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let mv = match input.into() {
            MoveInput::Notation(s) => self.resolve_notation(s, opts)?,
            MoveInput::Structured(req) => self.resolve_request(&req, opts)?,
        };
        if mv.is_deploy() {
            self.apply_deploy_step(mv, opts)
        } else {
            self.commit_move(mv)
        }
    }

    pub(crate) fn resolve_request(
        &self,
        req: &MoveRequest,
        opts: &MoveOptions,
    ) -> Result<Move, MoveError> {
        let candidates = self.moves_internal(opts.legal);
        let mut matches: Vec<&Move> = candidates
            .iter()
            .filter(|m| req.from.is_none_or(|f| m.from == f))
            .filter(|m| req.piece.is_none_or(|p| m.piece == p))
            .filter(|m| {
                if req.stay {
                    m.is_stay()
                } else if let Some(to) = req.to {
                    !m.is_stay() && m.to == to
                } else {
                    !m.is_stay()
                }
            })
            .filter(|m| !req.deploy || m.is_deploy())
            .collect();

        // Prefer the plain move over stay-capture and deploy variants when
        // the request leaves the choice open.
        matches.sort_by_key(|m| (m.is_stay_capture(), !req.deploy && m.is_deploy()));
        match matches.first() {
            Some(mv) => Ok((*mv).clone()),
            None => Err(self.diagnose_request(req)),
        }
    }

    /// Best-effort failure reason for a request that matched nothing.
    pub(crate) fn diagnose_request(&self, req: &MoveRequest) -> MoveError {
        let Some(from) = req.from else {
            return SanError::NoMatchingMove {
                san: format!("{req:?}"),
            }
            .into();
        };
        let piece = match self.get(from) {
            Some(p) if p.color == self.turn => p.clone(),
            _ => return MoveError::PieceNotFound { square: from },
        };
        let Some(to) = req.to else {
            return SanError::NoMatchingMove {
                san: format!("{req:?}"),
            }
            .into();
        };
        let notation = format!("{from}-{to}");

        // Pseudo-legal but filtered: the move exposes the commander.
        let pseudo = self.pseudo_moves();
        if let Some(mv) = pseudo
            .iter()
            .find(|m| m.from == from && m.to == to && !m.is_stay())
        {
            let mut scratch = self.clone();
            if let Ok(command) = scratch.execute_move_actions(mv) {
                let reason = if scratch.flying_general_open() {
                    IllegalMoveReason::CommanderExposure
                } else {
                    IllegalMoveReason::LeavesOwnInCheck
                };
                scratch.revert_command(command);
                return MoveError::Illegal { reason, notation };
            }
        }

        let image = match req.piece {
            Some(kind) if kind != piece.kind => match piece.detach(kind) {
                Ok((solo, _)) => solo,
                Err(_) => return MoveError::PieceNotFound { square: from },
            },
            _ => piece,
        };
        MoveError::Illegal {
            reason: self.classify_geometry(from, to, &image),
            notation,
        }
    }

    fn classify_geometry(&self, from: Square, to: Square, image: &Piece) -> IllegalMoveReason {
        let cfg = movement_config(image.kind, image.heroic);
        let dr = to.rank() as i32 - from.rank() as i32;
        let df = to.file() as i32 - from.file() as i32;
        let orthogonal = dr == 0 || df == 0;
        let diagonal = dr != 0 && dr.abs() == df.abs();
        if !orthogonal && !diagonal {
            return IllegalMoveReason::OutOfRange;
        }
        if diagonal && cfg.directions == super::rules::DirectionSet::Orthogonal {
            return IllegalMoveReason::OutOfRange;
        }

        let distance = dr.abs().max(df.abs()) as u16;
        let target_kind = self.get(to).map_or(PieceKind::Infantry, |p| p.kind);
        let reach = u16::from(cfg.move_limit(diagonal))
            .max(u16::from(cfg.capture_limit(diagonal, target_kind)));
        if distance > reach {
            return IllegalMoveReason::OutOfRange;
        }

        if !terrain_allows(image.kind, to) {
            // Moving onto hostile terrain is never possible; shooting at it
            // is, for ranged pieces.
            if self.get(to).is_none() || !image.kind.is_ranged() {
                return IllegalMoveReason::WrongTerrain;
            }
        }

        let delta_sign = |v: i32| -> i16 {
            match v.cmp(&0) {
                std::cmp::Ordering::Greater => 1,
                std::cmp::Ordering::Less => -1,
                std::cmp::Ordering::Equal => 0,
            }
        };
        let delta = delta_sign(dr) * super::types::GRID_WIDTH as i16 + delta_sign(df);

        if image.kind.is_heavy() {
            let mut prev = from;
            let mut sq = from;
            while sq != to {
                match sq.offset(delta) {
                    Some(next) => {
                        if step_crosses_river(prev, next) && !is_bridge(next) {
                            return IllegalMoveReason::BridgeRequired;
                        }
                        prev = next;
                        sq = next;
                    }
                    None => break,
                }
            }
        }

        // Terrain along the ray for surface pieces; the final square was
        // already judged above.
        let path = self.ray_path(from, to, delta);
        let transit = &path[..path.len().saturating_sub(1)];
        match image.kind {
            PieceKind::AirForce => {
                if self.evaluate_flight_path(image.color, &path) == FlightVerdict::Destroyed {
                    return IllegalMoveReason::AirDefenseDestroyed;
                }
            }
            PieceKind::Navy => {
                if !cfg.capture_ignores_blocking
                    && transit.iter().any(|sq| !NAVY_MASK[sq.index()])
                {
                    return IllegalMoveReason::WrongTerrain;
                }
            }
            _ => {
                if !cfg.capture_ignores_blocking
                    && transit.iter().any(|sq| !LAND_MASK[sq.index()])
                {
                    return IllegalMoveReason::WrongTerrain;
                }
            }
        }

        if !cfg.move_ignores_blocking && !self.ray_clear(from, to, delta) {
            return IllegalMoveReason::Blocked;
        }
        IllegalMoveReason::OutOfRange
    }
}
