//! Node-count tests for the move generator.

use crate::board::{Game, MoveQuery};

#[test]
fn test_perft_depth_zero_is_one() {
    let game = Game::new();
    assert_eq!(game.perft(0), 1);
}

#[test]
fn test_perft_depth_one_matches_move_count() {
    let game = Game::new();
    assert_eq!(game.perft(1), game.moves(&MoveQuery::default()).len() as u64);
}

#[test]
fn test_perft_lone_commanders() {
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/11/11/11/2C8 r - - 0 1").unwrap();
    assert_eq!(game.perft(1), 17);
    assert!(game.perft(2) > 17);
}

#[test]
fn test_perft_counts_deploy_steps() {
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/11/2(TI)8/11/5C5 r - - 0 1").unwrap();
    let move_count = game.moves(&MoveQuery::default()).len() as u64;
    assert_eq!(game.perft(1), move_count);
    assert!(game
        .moves(&MoveQuery::default())
        .iter()
        .any(|m| m.is_deploy()));
}

#[test]
fn test_perft_is_deterministic() {
    let game = Game::new();
    assert_eq!(game.perft(2), game.perft(2));
}

#[test]
fn test_perft_divide_sums_to_perft() {
    let game = Game::new();
    let total: u64 = game.perft_divide(2).iter().map(|(_, n)| n).sum();
    assert_eq!(total, game.perft(2));
}
