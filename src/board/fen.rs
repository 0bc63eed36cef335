//! FEN for positions, stacks, heroic flags and open deploy sessions.
//!
//! Twelve ranks top-down separated by `/`, digit runs for empty squares
//! (`11` is a full empty rank), uppercase Red / lowercase Blue, `+` prefix
//! for heroic pieces, `(...)` for stacks carrier-first. The trailing fields
//! are side to move, two reserved `-` fields, halfmove clock and fullmove
//! number, optionally followed by an open-session block
//! `origin:step,step ...`.

use std::str::FromStr;

use super::command::Command;
use super::error::FenError;
use super::history::MoveRecord;
use super::session::{DeploySession, DeployStep};
use super::state::Game;
use super::types::{
    build_stack, Color, Move, MoveFlags, Piece, PieceKind, Square, FILE_COUNT, RANK_COUNT,
};

/// The standard opening position.
pub const DEFAULT_FEN: &str = "1n1sfcfg3/2a2h2a2/1n1t1m1t3/2iei1iei2/11/11/11/11/2IEI1IEI2/1N1T1M1T3/2A2H2A2/1N1SFCFG3 r - - 0 1";

impl Game {
    /// Parse a position from FEN notation.
    ///
    /// Returns an error if the FEN string is invalid.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut game = Game::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 6 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != RANK_COUNT {
            return Err(FenError::InvalidRank { rank: ranks.len() });
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = RANK_COUNT - 1 - rank_idx;
            let mut file = 0usize;
            let mut chars = rank_str.chars().peekable();
            while let Some(c) = chars.next() {
                if let Some(d) = c.to_digit(10) {
                    let mut run = d as usize;
                    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                        run = run * 10 + d as usize;
                        chars.next();
                    }
                    file += run;
                    continue;
                }

                if file >= FILE_COUNT {
                    return Err(FenError::TooManyFiles {
                        rank,
                        files: file + 1,
                    });
                }
                let sq = Square::new(rank, file);

                let piece = if c == '(' {
                    let mut members = Vec::new();
                    loop {
                        let mc = chars.next().ok_or(FenError::InvalidStack { rank })?;
                        if mc == ')' {
                            break;
                        }
                        members.push(parse_member(mc, &mut chars, rank)?);
                    }
                    if members.len() < 2 {
                        return Err(FenError::InvalidStack { rank });
                    }
                    build_stack(members).map_err(|_| FenError::InvalidStack { rank })?
                } else {
                    parse_member(c, &mut chars, rank)?
                };

                game.place_for_setup(sq, piece)?;
                file += 1;
            }
            if file > FILE_COUNT {
                return Err(FenError::TooManyFiles { rank, files: file });
            }
        }

        game.turn = match parts[1] {
            "r" => Color::Red,
            "b" => Color::Blue,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        // parts[2] and parts[3] are reserved fields
        game.halfmove_clock = parts[4].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[4].to_string(),
        })?;
        game.fullmove_number = parts[5].parse().map_err(|_| FenError::InvalidCounter {
            found: parts[5].to_string(),
        })?;

        game.refresh_derived();
        game.hash = game.calculate_hash();
        game.repetition.set(game.hash, 1);

        if let Some(block) = parts.get(6) {
            if *block != "..." {
                game.reopen_session(block)?;
            }
        }

        Ok(game)
    }

    /// Parse a position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible
    /// parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Replace the current position. History, repetition counts and any open
    /// session are reset; metadata is kept.
    pub fn load(&mut self, fen: &str) -> Result<(), FenError> {
        let mut game = Game::try_from_fen(fen)?;
        game.metadata = self.metadata;
        *self = game;

        #[cfg(feature = "logging")]
        log::debug!("loaded position {fen}");

        Ok(())
    }

    fn place_for_setup(&mut self, sq: Square, piece: Piece) -> Result<(), FenError> {
        if self.squares[sq.index()].is_some()
            || !super::masks::terrain_allows(piece.kind, sq)
        {
            return Err(FenError::InvalidSetup { square: sq });
        }
        if piece.contains(PieceKind::Commander)
            && self.commanders[piece.color.index()].is_some()
        {
            return Err(FenError::InvalidSetup { square: sq });
        }
        if piece.contains(PieceKind::Commander) {
            self.commanders[piece.color.index()] = Some(sq);
        }
        self.squares[sq.index()] = Some(piece);
        Ok(())
    }

    /// Render the position, open session included.
    #[must_use]
    pub fn fen(&self) -> String {
        let mut rows: Vec<String> = Vec::new();
        for rank in (0..RANK_COUNT).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..FILE_COUNT {
                let sq = Square::new(rank, file);
                if let Some(piece) = self.get(sq) {
                    if empty > 0 {
                        row.push_str(&empty.to_string());
                        empty = 0;
                    }
                    row.push_str(&piece.to_string());
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let side = match self.turn {
            Color::Red => "r",
            Color::Blue => "b",
        };
        let mut fen = format!(
            "{} {} - - {} {}",
            rows.join("/"),
            side,
            self.halfmove_clock,
            self.fullmove_number
        );

        if let Some(session) = &self.session {
            let tokens: Vec<String> = session
                .steps
                .iter()
                .map(|s| DeploySession::step_token(&s.mv))
                .collect();
            fen.push_str(&format!(" {}:{} ...", session.origin, tokens.join(",")));
        }

        fen
    }

    /// Rebuild an open deploy session from its FEN block: return the
    /// deployed members to the origin stack, then replay the steps.
    ///
    /// An enemy piece captured by an earlier step is not recoverable from
    /// the serialized form; replay reapplies the movement only.
    fn reopen_session(&mut self, block: &str) -> Result<(), FenError> {
        let invalid = || FenError::InvalidSession {
            found: block.to_string(),
        };

        let (origin_str, steps_str) = block.split_once(':').ok_or_else(invalid)?;
        let origin = Square::from_str(origin_str).map_err(|_| invalid())?;
        let turn = self.turn;

        let mut parsed: Vec<(PieceKind, bool, bool, Option<Square>, bool)> = Vec::new();
        for token in steps_str.split(',') {
            let mut chars = token.chars().peekable();
            let mut heroic = false;
            if chars.peek() == Some(&'+') {
                heroic = true;
                chars.next();
            }
            let letter = chars.next().ok_or_else(invalid)?;
            let kind = PieceKind::from_char(letter).ok_or_else(invalid)?;
            let op = chars.next().ok_or_else(invalid)?;
            match op {
                '<' => parsed.push((kind, heroic, true, None, false)),
                '>' | 'x' => {
                    let dest_str: String = chars.collect();
                    let dest = Square::from_str(&dest_str).map_err(|_| invalid())?;
                    parsed.push((kind, heroic, false, Some(dest), op == 'x'));
                }
                _ => return Err(invalid()),
            }
        }

        // Pull the deployed members back off the board.
        let mut recovered: Vec<(PieceKind, Piece, bool)> = Vec::new();
        for (kind, heroic, stay, dest, _) in &parsed {
            if *stay {
                continue;
            }
            let dest = dest.expect("non-stay step has a destination");
            let on_dest = self.squares[dest.index()].take();
            match on_dest {
                Some(piece) if piece.color == turn && piece.contains(*kind) => {
                    let (member, rest) = piece.detach(*kind).map_err(|_| invalid())?;
                    self.squares[dest.index()] = rest;
                    recovered.push((*kind, member, true));
                }
                other => {
                    // Member absent (destroyed in flight); restore the square
                    // and rebuild the member from its token image.
                    self.squares[dest.index()] = other;
                    recovered.push((*kind, Piece::with_heroic(*kind, turn, *heroic), false));
                }
            }
        }

        // Rebuild the original stack on the origin.
        let mut members: Vec<Piece> = self
            .squares[origin.index()]
            .take()
            .map(|p| p.flatten())
            .unwrap_or_default();
        members.extend(recovered.iter().map(|(_, piece, _)| piece.clone()));
        if members.len() < 2 {
            return Err(invalid());
        }
        let original = build_stack(members).map_err(|_| invalid())?;
        self.squares[origin.index()] = Some(original.clone());
        self.refresh_derived();
        let fen_before = self.fen();

        // Replay the steps through the command layer.
        let mut steps: Vec<DeployStep> = Vec::new();
        for (kind, heroic, stay, dest, was_capture) in parsed {
            let survived = recovered
                .iter()
                .find(|(k, _, _)| *k == kind)
                .map_or(true, |(_, _, found)| *found);
            let mut flags = MoveFlags::DEPLOY;
            if stay {
                flags |= MoveFlags::STAY;
            }
            if was_capture {
                flags |= MoveFlags::CAPTURE;
            }
            if !survived {
                flags |= MoveFlags::SUICIDE;
            }
            let to = dest.unwrap_or(origin);
            if !stay && survived && self.squares[to.index()].is_some() {
                flags |= MoveFlags::COMBINE;
            }
            let mv = Move {
                from: origin,
                to,
                piece: kind,
                heroic,
                color: turn,
                flags,
                captured: None,
                combined: None,
                deploy_origin: Some(origin),
            };

            let fen_step_before = self.fen();
            let mut exec = mv.clone();
            exec.flags = exec.flags.without(MoveFlags::CAPTURE);
            let command: Command = self
                .execute_move_actions(&exec)
                .map_err(|_| invalid())?;
            let record = MoveRecord {
                san: DeploySession::step_token(&mv),
                lan: mv.to_string(),
                color: turn,
                piece: kind,
                from: origin,
                to,
                flags: mv.flags,
                captured: None,
                fen_before: fen_step_before,
                fen_after: self.fen(),
            };
            steps.push(DeployStep {
                mv,
                command,
                record,
            });
        }

        self.session = Some(DeploySession {
            origin,
            original,
            turn,
            steps,
            fen_before,
        });
        Ok(())
    }
}

impl FromStr for Game {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Game::try_from_fen(s)
    }
}

fn parse_member(
    first: char,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    rank: usize,
) -> Result<Piece, FenError> {
    let heroic = first == '+';
    let letter = if heroic {
        chars.next().ok_or(FenError::InvalidStack { rank })?
    } else {
        first
    };
    let kind = PieceKind::from_char(letter).ok_or(FenError::InvalidPiece { char: letter })?;
    let color = if letter.is_ascii_uppercase() {
        Color::Red
    } else {
        Color::Blue
    };
    Ok(Piece::with_heroic(kind, color, heroic))
}
