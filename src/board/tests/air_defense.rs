//! Air-defense disc and flight-path classification tests.

use super::sq;
use crate::board::{
    Game, IllegalMoveReason, MoveError, MoveOptions, MoveQuery, MoveRequest, PieceKind,
};

// Red Air Force f4, blue Anti-Air f8 (disc radius 1).
const ONE_DEFENDER: &str = "10c/11/11/11/5g5/11/11/11/5F5/11/11/2C8 r - - 0 1";
// Second blue Anti-Air on f6; the two discs overlap across the f-file.
const TWO_DEFENDERS: &str = "10c/11/11/11/5g5/11/5g5/11/5F5/11/11/2C8 r - - 0 1";

#[test]
fn test_safe_pass_outside_coverage() {
    let game = Game::try_from_fen(ONE_DEFENDER).unwrap();
    let moves = game.moves(&MoveQuery::default());
    let quiet = moves
        .iter()
        .find(|m| m.from == sq("f4") && m.to == sq("f6"))
        .expect("flight below the disc");
    assert!(!quiet.is_suicide());
}

#[test]
fn test_kamikaze_capture_removes_attacker() {
    let mut game = Game::try_from_fen(ONE_DEFENDER).unwrap();
    let moves = game.moves(&MoveQuery::default());
    let strike = moves
        .iter()
        .find(|m| m.from == sq("f4") && m.to == sq("f8") && m.is_capture())
        .expect("kamikaze strike on the defender")
        .clone();
    assert!(strike.is_suicide());
    // No stay-capture through a defended ray.
    assert!(!moves
        .iter()
        .any(|m| m.from == sq("f4") && m.to == sq("f8") && m.is_stay_capture()));

    game.commit_move(strike).unwrap();
    assert!(game.get(sq("f8")).is_none(), "defender removed");
    assert!(game.get(sq("f4")).is_none(), "attacker removed on arrival");
}

#[test]
fn test_kamikaze_into_empty_covered_square() {
    let mut game = Game::try_from_fen(ONE_DEFENDER).unwrap();
    let moves = game.moves(&MoveQuery::default());
    let flight = moves
        .iter()
        .find(|m| m.from == sq("f4") && m.to == sq("f7"))
        .expect("flight ending inside the disc")
        .clone();
    assert!(flight.is_suicide());
    assert!(!flight.is_capture());

    game.commit_move(flight).unwrap();
    assert!(game.get(sq("f4")).is_none());
    assert!(game.get(sq("f7")).is_none(), "air force destroyed on arrival");
    assert_eq!(
        game.get(sq("f8")).unwrap().kind,
        PieceKind::AntiAir,
        "defender survives a plain kamikaze flight"
    );
}

#[test]
fn test_two_overlapping_discs_destroy_the_flight() {
    let mut game = Game::try_from_fen(TWO_DEFENDERS).unwrap();
    assert!(!game
        .moves(&MoveQuery::default())
        .iter()
        .any(|m| m.from == sq("f4") && m.to == sq("f8")));

    let req = MoveRequest {
        from: Some(sq("f4")),
        to: Some(sq("f8")),
        ..MoveRequest::default()
    };
    let err = game.make_move(req, &MoveOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        MoveError::Illegal {
            reason: IllegalMoveReason::AirDefenseDestroyed,
            ..
        }
    ));
}

#[test]
fn test_single_disc_entered_and_kept() {
    // Entering the lower disc and stopping inside it stays a kamikaze, not
    // a destruction.
    let game = Game::try_from_fen(TWO_DEFENDERS).unwrap();
    let moves = game.moves(&MoveQuery::default());
    let flight = moves
        .iter()
        .find(|m| m.from == sq("f4") && m.to == sq("f5"))
        .expect("short hop into the first disc");
    assert!(flight.is_suicide());
}

#[test]
fn test_heroic_defender_extends_disc() {
    // A heroic Anti-Air reaches two squares; f6 is now covered from f8.
    let fen = "10c/11/11/11/5+g5/11/11/11/5F5/11/11/2C8 r - - 0 1";
    let game = Game::try_from_fen(fen).unwrap();
    let moves = game.moves(&MoveQuery::default());
    let into_disc = moves
        .iter()
        .find(|m| m.from == sq("f4") && m.to == sq("f6"))
        .expect("flight into the enlarged disc");
    assert!(into_disc.is_suicide());
}
