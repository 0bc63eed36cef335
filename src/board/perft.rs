//! Decision-tree node counting for move-generator validation.

use super::movegen::MoveQuery;
use super::state::Game;
use super::types::MoveOptions;

impl Game {
    /// Count decision nodes to the given depth.
    ///
    /// Every legal choice is one ply: a committed move, a single deploy
    /// step, or committing an open session early. Children run on clones so
    /// a mid-branch session commit cannot disturb its siblings.
    #[must_use]
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let opts = MoveOptions::default();
        let mut nodes = 0;

        for mv in self.moves(&MoveQuery::default()) {
            let mut child = self.clone();
            let ok = if mv.is_deploy() {
                child.apply_deploy_step(mv, &opts).is_ok()
            } else {
                child.commit_move(mv).is_ok()
            };
            if ok {
                nodes += child.perft(depth - 1);
            }
        }

        // Committing an incomplete session is a choice of its own.
        if self.session_view().is_some() && self.can_commit_session() {
            let mut child = self.clone();
            if child.commit_session().success {
                nodes += child.perft(depth - 1);
            }
        }

        nodes
    }

    /// Per-move node counts at the root, for debugging generator changes.
    #[must_use]
    pub fn perft_divide(&self, depth: u32) -> Vec<(String, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let opts = MoveOptions::default();
        let mut counts = Vec::new();
        for mv in self.moves(&MoveQuery::default()) {
            let lan = self.move_to_lan(&mv);
            let mut child = self.clone();
            let ok = if mv.is_deploy() {
                child.apply_deploy_step(mv, &opts).is_ok()
            } else {
                child.commit_move(mv).is_ok()
            };
            if ok {
                counts.push((lan, child.perft(depth - 1)));
            }
        }
        counts
    }
}
