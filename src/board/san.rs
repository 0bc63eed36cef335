//! Standard and long algebraic notation.
//!
//! Operators: `-` move, `x` capture, `*` stay-capture, `**` suicide-capture,
//! `&` combine, `>` deploy step, `<` deploy stay, `:` session origin prefix,
//! `+`/`#` check and mate suffixes. Disambiguation works as in chess: file,
//! rank, or full square. The parser accepts SAN and LAN alike and resolves
//! the result against the generated move list.

use super::error::{MoveError, SanError};
use super::state::Game;
use super::types::{Move, MoveOptions, PieceKind, Square};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ParsedOp {
    Move,
    Capture,
    StayCapture,
    SuicideCapture,
    Combine,
    Deploy,
    DeployCapture,
    Stay,
}

#[derive(Clone, Debug)]
struct ParsedMove {
    origin: Option<Square>,
    piece: Option<PieceKind>,
    from_file: Option<usize>,
    from_rank: Option<usize>,
    op: ParsedOp,
    to: Option<Square>,
}

impl ParsedMove {
    fn matches(&self, m: &Move) -> bool {
        if let Some(kind) = self.piece {
            if m.piece != kind {
                return false;
            }
        }
        if let Some(origin) = self.origin {
            if m.deploy_origin != Some(origin) {
                return false;
            }
        }
        if let Some(file) = self.from_file {
            if m.from.file() != file {
                return false;
            }
        }
        if let Some(rank) = self.from_rank {
            if m.from.rank() != rank {
                return false;
            }
        }
        let op_ok = match self.op {
            ParsedOp::Move => {
                !m.is_capture() && !m.is_combine() && !m.is_deploy() && !m.is_stay()
            }
            ParsedOp::Capture => m.is_capture() && !m.is_stay_capture() && !m.is_suicide(),
            ParsedOp::StayCapture => m.is_stay_capture(),
            ParsedOp::SuicideCapture => m.is_suicide() && m.is_capture() && !m.is_stay_capture(),
            ParsedOp::Combine => m.is_combine(),
            ParsedOp::Deploy => m.is_deploy() && !m.is_stay() && !m.is_capture() && !m.is_combine(),
            ParsedOp::DeployCapture => {
                m.is_deploy() && m.is_capture() && !m.is_stay_capture()
            }
            ParsedOp::Stay => m.is_stay(),
        };
        if !op_ok {
            return false;
        }
        match (self.op, self.to) {
            (ParsedOp::Stay, _) => true,
            (_, Some(to)) => m.to == to,
            (_, None) => false,
        }
    }
}

impl Game {
    /// Format a move in standard algebraic notation, with minimal
    /// disambiguation and check/mate suffixes.
    #[must_use]
    pub fn move_to_san(&self, mv: &Move) -> String {
        let mut san = if mv.is_deploy() {
            // Spelled with the origin square so the step stays unambiguous
            // outside its session; the session block keeps the short token.
            let mut san = String::new();
            san.push(mv.piece.to_char().to_ascii_uppercase());
            san.push_str(&mv.from.to_string());
            if mv.is_stay() {
                san.push('<');
            } else {
                san.push_str(if mv.is_capture() { ">x" } else { ">" });
                san.push_str(&mv.to.to_string());
            }
            san
        } else {
            let mut san = String::new();
            san.push(mv.piece.to_char().to_ascii_uppercase());

            let (needs_file, needs_rank) = self.needs_disambiguation(mv);
            if needs_file {
                san.push((b'a' + mv.from.file() as u8) as char);
            }
            if needs_rank {
                san.push_str(&(mv.from.rank() + 1).to_string());
            }

            let op = if mv.is_combine() {
                "&"
            } else if mv.is_suicide() && mv.is_capture() {
                "**"
            } else if mv.is_stay_capture() {
                "*"
            } else if mv.is_capture() {
                "x"
            } else {
                "-"
            };
            san.push_str(op);
            san.push_str(&mv.to.to_string());
            san
        };

        // Check and mate suffixes, probed by applying the move on a scratch
        // copy.
        let mut scratch = self.clone();
        if scratch.execute_move_actions(mv).is_ok() {
            let enemy = mv.color.opponent();
            if scratch.commander_square(enemy).is_none() {
                san.push('#');
            } else {
                scratch.turn = enemy;
                scratch.hash = scratch.calculate_hash();
                scratch.session = None;
                if scratch.is_checkmate() {
                    san.push('#');
                } else if scratch.is_check() {
                    san.push('+');
                }
            }
        }
        san
    }

    /// Long algebraic notation; always carries the origin square.
    #[must_use]
    pub fn move_to_lan(&self, mv: &Move) -> String {
        mv.to_string()
    }

    /// Determine whether SAN needs the origin file and/or rank.
    fn needs_disambiguation(&self, mv: &Move) -> (bool, bool) {
        let moves = self.moves_internal(true);
        let rivals: Vec<&Move> = moves
            .iter()
            .filter(|m| {
                m.piece == mv.piece
                    && m.to == mv.to
                    && m.from != mv.from
                    && m.is_capture() == mv.is_capture()
                    && m.is_stay_capture() == mv.is_stay_capture()
                    && m.is_combine() == mv.is_combine()
                    && m.is_deploy() == mv.is_deploy()
            })
            .collect();

        if rivals.is_empty() {
            return (false, false);
        }

        let same_file = rivals.iter().any(|m| m.from.file() == mv.from.file());
        let same_rank = rivals.iter().any(|m| m.from.rank() == mv.from.rank());
        match (same_file, same_rank) {
            (false, _) => (true, false),
            (true, false) => (false, true),
            (true, true) => (true, true),
        }
    }

    /// Parse SAN or LAN and resolve it against the move list.
    pub(crate) fn resolve_notation(
        &self,
        input: &str,
        opts: &MoveOptions,
    ) -> Result<Move, MoveError> {
        let parsed = parse_notation(input)?;
        let candidates = self.moves_internal(opts.legal);
        let mut matches: Vec<&Move> = candidates.iter().filter(|m| parsed.matches(m)).collect();

        // A bare capture or quiet notation prefers the whole-piece move over
        // the equivalent first deploy step.
        if matches.len() > 1 {
            let non_deploy: Vec<&Move> = matches
                .iter()
                .copied()
                .filter(|m| !m.is_deploy())
                .collect();
            if !non_deploy.is_empty() {
                matches = non_deploy;
            }
        }

        match matches.len() {
            1 => {
                let mv = matches[0].clone();
                if opts.strict {
                    let bare = input.trim().trim_end_matches(['+', '#']);
                    let san = self.move_to_san(&mv);
                    let canonical = san.trim_end_matches(['+', '#']);
                    if bare != canonical && bare != self.move_to_lan(&mv) {
                        return Err(SanError::NoMatchingMove {
                            san: input.to_string(),
                        }
                        .into());
                    }
                }
                Ok(mv)
            }
            0 => {
                // Fall back to the structured diagnosis when the squares are
                // known.
                let from = match (parsed.from_file, parsed.from_rank) {
                    (Some(file), Some(rank)) => Square::try_new(rank, file),
                    _ => parsed.origin,
                };
                if let Some(from) = from {
                    let req = super::types::MoveRequest {
                        from: Some(from),
                        to: parsed.to,
                        piece: parsed.piece,
                        deploy: matches!(
                            parsed.op,
                            ParsedOp::Deploy | ParsedOp::DeployCapture | ParsedOp::Stay
                        ),
                        stay: parsed.op == ParsedOp::Stay,
                    };
                    return Err(self.diagnose_request(&req));
                }
                Err(SanError::NoMatchingMove {
                    san: input.to_string(),
                }
                .into())
            }
            _ => Err(SanError::AmbiguousMove {
                san: input.to_string(),
            }
            .into()),
        }
    }
}

fn parse_notation(input: &str) -> Result<ParsedMove, SanError> {
    let mut s = input.trim();
    if s.is_empty() {
        return Err(SanError::Empty);
    }
    while let Some(stripped) = s.strip_suffix(['+', '#']) {
        s = stripped;
    }
    if s.is_empty() {
        return Err(SanError::Empty);
    }

    let origin = match s.split_once(':') {
        Some((origin_str, rest)) => {
            let origin = origin_str
                .parse::<Square>()
                .map_err(|_| SanError::InvalidSquare {
                    notation: input.to_string(),
                })?;
            s = rest;
            Some(origin)
        }
        None => None,
    };

    // Deploy stay: `T<`, `Tc3<`
    if let Some(head) = s.strip_suffix('<') {
        let (piece, rest) = split_piece_letter(head)?;
        let (from_file, from_rank) = parse_disambiguation(rest, input)?;
        return Ok(ParsedMove {
            origin,
            piece,
            from_file,
            from_rank,
            op: ParsedOp::Stay,
            to: None,
        });
    }

    // Target square at the end: file letter followed by rank digits.
    let target_start = s
        .rfind(|c: char| c.is_ascii_lowercase() && ('a'..='k').contains(&c))
        .ok_or(SanError::InvalidSquare {
            notation: input.to_string(),
        })?;
    let to = s[target_start..]
        .parse::<Square>()
        .map_err(|_| SanError::InvalidSquare {
            notation: input.to_string(),
        })?;
    let mut head = &s[..target_start];

    let op = if let Some(h) = head.strip_suffix("**") {
        head = h;
        ParsedOp::SuicideCapture
    } else if let Some(h) = head.strip_suffix(">x") {
        head = h;
        ParsedOp::DeployCapture
    } else if let Some(h) = head.strip_suffix('x') {
        head = h;
        ParsedOp::Capture
    } else if let Some(h) = head.strip_suffix('*') {
        head = h;
        ParsedOp::StayCapture
    } else if let Some(h) = head.strip_suffix('&') {
        head = h;
        ParsedOp::Combine
    } else if let Some(h) = head.strip_suffix('>') {
        head = h;
        ParsedOp::Deploy
    } else if let Some(h) = head.strip_suffix('-') {
        head = h;
        ParsedOp::Move
    } else {
        return Err(SanError::InvalidOperator {
            notation: input.to_string(),
        });
    };

    let (piece, rest) = split_piece_letter(head)?;
    let (from_file, from_rank) = parse_disambiguation(rest, input)?;

    Ok(ParsedMove {
        origin,
        piece,
        from_file,
        from_rank,
        op,
        to: Some(to),
    })
}

/// Leading uppercase piece letter, with an optional `+` heroic marker that
/// is accepted and ignored.
fn split_piece_letter(head: &str) -> Result<(Option<PieceKind>, &str), SanError> {
    let mut rest = head;
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }
    let Some(first) = rest.chars().next() else {
        return Ok((None, rest));
    };
    if first.is_ascii_uppercase() {
        let kind = PieceKind::from_char(first).ok_or(SanError::InvalidPiece { char: first })?;
        let mut after = &rest[1..];
        if let Some(stripped) = after.strip_prefix('+') {
            after = stripped;
        }
        Ok((Some(kind), after))
    } else {
        Ok((None, rest))
    }
}

/// `""`, a file letter, a rank number, or a full square.
fn parse_disambiguation(
    rest: &str,
    input: &str,
) -> Result<(Option<usize>, Option<usize>), SanError> {
    if rest.is_empty() {
        return Ok((None, None));
    }
    let invalid = || SanError::InvalidSquare {
        notation: input.to_string(),
    };
    let mut chars = rest.chars().peekable();
    let mut from_file = None;
    if chars
        .peek()
        .is_some_and(|c| c.is_ascii_lowercase() && ('a'..='k').contains(c))
    {
        from_file = Some(*chars.peek().expect("peeked") as usize - 'a' as usize);
        chars.next();
    }
    let digits: String = chars.collect();
    let from_rank = if digits.is_empty() {
        None
    } else {
        let rank: usize = digits.parse().map_err(|_| invalid())?;
        if !(1..=super::types::RANK_COUNT).contains(&rank) {
            return Err(invalid());
        }
        Some(rank - 1)
    };
    Ok((from_file, from_rank))
}
