//! Fifty-move and repetition rules.

use super::{apply, find_move};
use crate::board::Game;

// Lone commanders on c1 and k12 with a blue tank to capture.
const SHUFFLE_FEN: &str = "10c/11/11/11/11/11/11/11/11/11/11/2C8 r - - 0 1";

#[test]
fn test_fen_halfmove_parsing() {
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/11/11/11/2C8 r - - 57 1").unwrap();
    assert_eq!(game.halfmove_clock(), 57);
    assert!(!game.is_draw());
}

#[test]
fn test_fifty_move_rule_draw() {
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/11/11/11/2C8 r - - 100 1").unwrap();
    assert!(game.is_draw_by_fifty_moves());
    assert!(game.is_draw());
    assert!(game.is_game_over());
}

#[test]
fn test_halfmove_resets_on_capture() {
    // Red tank next to a blue militia, clock one short of the limit.
    let fen = "10c/11/11/11/11/11/11/11/11/11/3Tm6/2C8 r - - 99 1";
    let mut game = Game::try_from_fen(fen).unwrap();
    let mv = find_move(&game, "d2", "e2");
    assert!(mv.is_capture());
    game.commit_move(mv).unwrap();
    assert_eq!(game.halfmove_clock(), 0);
    assert!(!game.is_draw());
}

#[test]
fn test_threefold_repetition() {
    let mut game = Game::try_from_fen(SHUFFLE_FEN).unwrap();
    for _ in 0..2 {
        apply(&mut game, "Cc1-c2");
        apply(&mut game, "Ck12-k11");
        apply(&mut game, "Cc2-c1");
        apply(&mut game, "Ck11-k12");
    }
    assert!(game.is_threefold_repetition());
    assert!(game.is_draw());
    assert!(game.is_game_over());
}

#[test]
fn test_repetition_count_drops_on_undo() {
    let mut game = Game::try_from_fen(SHUFFLE_FEN).unwrap();
    for _ in 0..2 {
        apply(&mut game, "Cc1-c2");
        apply(&mut game, "Ck12-k11");
        apply(&mut game, "Cc2-c1");
        apply(&mut game, "Ck11-k12");
    }
    assert!(game.is_threefold_repetition());
    game.undo().unwrap();
    assert!(!game.is_threefold_repetition());
}

#[test]
fn test_fullmove_counts_complete_turns() {
    let mut game = Game::try_from_fen(SHUFFLE_FEN).unwrap();
    assert_eq!(game.fullmove_number(), 1);
    apply(&mut game, "Cc1-c2");
    assert_eq!(game.fullmove_number(), 1, "red's move does not bump it");
    apply(&mut game, "Ck12-k11");
    assert_eq!(game.fullmove_number(), 2, "blue's reply completes the turn");
}
