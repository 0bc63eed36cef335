//! Board pretty-printing.

use super::state::Game;
use super::types::{Color, Square, FILE_COUNT, RANK_COUNT};

impl Game {
    /// Render the board as fixed-width ASCII, rank 12 at the top. Each cell
    /// shows the carrier letter (uppercase Red, lowercase Blue), a `+` for
    /// heroic carriers and a trailing `*` when the piece carries cargo.
    #[must_use]
    pub fn ascii(&self) -> String {
        let mut out = String::new();
        for rank in (0..RANK_COUNT).rev() {
            out.push_str(&format!("{:>2} ", rank + 1));
            for file in 0..FILE_COUNT {
                let sq = Square::new(rank, file);
                let cell = match self.get(sq) {
                    Some(piece) => {
                        let mut cell = String::new();
                        if piece.heroic {
                            cell.push('+');
                        }
                        cell.push(piece.kind.to_fen_char(piece.color));
                        if piece.is_stack() {
                            cell.push('*');
                        }
                        cell
                    }
                    None => ".".to_string(),
                };
                out.push_str(&format!("{cell:>4}"));
            }
            out.push('\n');
        }
        out.push_str("   ");
        for file in 0..FILE_COUNT {
            out.push_str(&format!("{:>4}", (b'a' + file as u8) as char));
        }
        out.push('\n');
        out.push_str(&format!(
            "{} to move\n",
            match self.turn() {
                Color::Red => "Red",
                Color::Blue => "Blue",
            }
        ));
        out
    }
}
