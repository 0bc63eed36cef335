//! Move generation tests: ranges, terrain, bridges, combines and deploys.

use super::{find_move, sq};
use crate::board::{
    Game, IllegalMoveReason, MoveError, MoveOptions, MoveQuery, MoveRequest, PieceKind,
};

fn structured(game: &mut Game, from: &str, to: &str) -> Result<(), MoveError> {
    let req = MoveRequest {
        from: Some(sq(from)),
        to: Some(sq(to)),
        ..MoveRequest::default()
    };
    game.make_move(req, &MoveOptions::default()).map(|_| ())
}

#[test]
fn test_opening_has_moves_and_is_deterministic() {
    let game = Game::new();
    let first = game.moves(&MoveQuery::default());
    let second = game.moves(&MoveQuery::default());
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_infantry_single_step() {
    let game = Game::new();
    let mv = find_move(&game, "c4", "c5");
    assert_eq!(mv.piece, PieceKind::Infantry);
    assert!(!game
        .moves(&MoveQuery::default())
        .iter()
        .any(|m| m.from == sq("c4") && m.to == sq("c6")));
}

#[test]
fn test_commander_slides_but_not_into_exposure() {
    // Lone commanders on c1 and k12. The red commander may slide the whole
    // file and rank except onto c12 and k1, where the line to the enemy
    // commander would open.
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/11/11/11/2C8 r - - 0 1").unwrap();
    let moves = game.moves(&MoveQuery::default());
    assert_eq!(moves.len(), 17);
    assert!(!moves.iter().any(|m| m.to == sq("c12")));
    assert!(!moves.iter().any(|m| m.to == sq("k1")));
    assert!(moves.iter().any(|m| m.to == sq("c11")));
    assert!(moves.iter().any(|m| m.to == sq("j1")));
    // Files a and b are water; the commander stays on land.
    assert!(!moves.iter().any(|m| m.to == sq("b1")));
}

#[test]
fn test_tank_captures_over_blocker() {
    // Red tank e4, red infantry e5, blue artillery e6. The tank cannot move
    // through the infantry but its gun reaches over it.
    let game = Game::try_from_fen("10c/11/11/11/11/11/4a6/4I6/4T6/11/11/2C8 r - - 0 1")
        .unwrap();
    let moves = game.moves(&MoveQuery::default());

    let capture = moves
        .iter()
        .find(|m| m.from == sq("e4") && m.to == sq("e6"))
        .expect("tank capture over blocker");
    assert!(capture.is_capture());
    assert!(!capture.is_stay_capture());

    // Tank and infantry may also combine into a stack.
    let combine = moves
        .iter()
        .find(|m| m.from == sq("e4") && m.to == sq("e5") && m.is_combine())
        .expect("tank combines with infantry");
    let stack = combine.combined.as_ref().unwrap();
    assert_eq!(stack.kind, PieceKind::Tank);
    assert_eq!(stack.carried[0].kind, PieceKind::Infantry);

    // No quiet move past the blocker.
    assert!(!moves
        .iter()
        .any(|m| m.from == sq("e4") && m.to == sq("e6") && !m.is_capture()));
}

#[test]
fn test_navy_rejects_land_destination() {
    let mut game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/2N8/11/11/2C8 r - - 0 1").unwrap();
    let err = structured(&mut game, "c4", "d5").unwrap_err();
    assert!(matches!(
        err,
        MoveError::Illegal {
            reason: IllegalMoveReason::WrongTerrain,
            ..
        }
    ));
    // The water file is open.
    assert!(structured(&mut game, "c4", "c8").is_ok());
}

#[test]
fn test_navy_stay_captures_land_target() {
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/2Nt7/11/11/2C8 r - - 0 1").unwrap();
    let moves = game.moves(&MoveQuery::default());
    let shot = moves
        .iter()
        .find(|m| m.from == sq("c4") && m.to == sq("d4") && m.is_stay_capture())
        .expect("naval gun stay-capture");
    assert!(shot.is_capture());
    // Moving onto the land square is not an option for the navy.
    assert!(!moves
        .iter()
        .any(|m| m.from == sq("c4") && m.to == sq("d4") && !m.is_stay_capture()));
}

#[test]
fn test_heavy_piece_needs_bridge() {
    // Artillery on f5 crosses at the f7 bridge; artillery on g5 has no
    // bridge on its file.
    let mut game =
        Game::try_from_fen("10c/11/11/11/11/11/11/5AA4/11/11/11/2C8 r - - 0 1").unwrap();
    let moves = game.moves(&MoveQuery::default());
    assert!(moves
        .iter()
        .any(|m| m.from == sq("f5") && m.to == sq("f7")));
    assert!(moves
        .iter()
        .any(|m| m.from == sq("f5") && m.to == sq("f8")));
    assert!(!moves
        .iter()
        .any(|m| m.from == sq("g5") && m.to == sq("g7")));

    let err = structured(&mut game, "g5", "g7").unwrap_err();
    assert!(matches!(
        err,
        MoveError::Illegal {
            reason: IllegalMoveReason::BridgeRequired,
            ..
        }
    ));
}

#[test]
fn test_missile_diagonal_cap() {
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/5S5/11/11/2C8 r - - 0 1").unwrap();
    let moves = game.moves(&MoveQuery::default());
    assert!(moves.iter().any(|m| m.from == sq("f4") && m.to == sq("f6")));
    assert!(moves.iter().any(|m| m.from == sq("f4") && m.to == sq("g5")));
    assert!(!moves.iter().any(|m| m.from == sq("f4") && m.to == sq("h6")));
}

#[test]
fn test_headquarters_immobile_until_heroic() {
    let base =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/5H5/11/11/2C8 r - - 0 1").unwrap();
    assert!(base
        .moves(&MoveQuery::default())
        .iter()
        .all(|m| m.from != sq("f4")));

    let heroic =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/5+H5/11/11/2C8 r - - 0 1").unwrap();
    let moves = heroic.moves(&MoveQuery::default());
    assert!(moves.iter().any(|m| m.from == sq("f4") && m.to == sq("f5")));
    assert!(moves.iter().any(|m| m.from == sq("f4") && m.to == sq("g5")));
}

#[test]
fn test_stack_offers_deploy_candidates() {
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/11/2(TI)8/11/5C5 r - - 0 1").unwrap();
    let moves = game.moves(&MoveQuery::default());

    // Whole-stack move.
    assert!(moves
        .iter()
        .any(|m| m.from == sq("c3") && m.to == sq("c5") && !m.is_deploy()));
    // Tank deploys alone, leaving the infantry behind.
    assert!(moves
        .iter()
        .any(|m| m.is_deploy() && m.piece == PieceKind::Tank && m.to == sq("c5")));
    // Infantry deploys alone.
    assert!(moves
        .iter()
        .any(|m| m.is_deploy() && m.piece == PieceKind::Infantry && m.to == sq("d3")));
}

#[test]
fn test_moves_query_filters() {
    let game = Game::new();
    let by_square = game.moves(&MoveQuery {
        square: Some(sq("c4")),
        ..MoveQuery::default()
    });
    assert!(!by_square.is_empty());
    assert!(by_square.iter().all(|m| m.from == sq("c4")));

    let by_piece = game.moves(&MoveQuery {
        piece: Some(PieceKind::Tank),
        ..MoveQuery::default()
    });
    assert!(by_piece.iter().all(|m| m.piece == PieceKind::Tank));
}

#[test]
fn test_navy_torpedo_outranges_gun() {
    // Blue navy four squares up the a-file, blue tank four squares east on
    // land: the torpedo reaches the navy, the gun falls one square short.
    let game = Game::try_from_fen("10c/11/11/11/n10/11/11/11/N3t6/11/11/2C8 r - - 0 1")
        .unwrap();
    let moves = game.moves(&MoveQuery::default());
    assert!(moves
        .iter()
        .any(|m| m.from == sq("a4") && m.to == sq("a8") && m.is_capture()));
    assert!(!moves
        .iter()
        .any(|m| m.from == sq("a4") && m.to == sq("e4") && m.is_capture()));
}

#[test]
fn test_navy_gun_reaches_three() {
    let game = Game::try_from_fen("10c/11/11/11/11/11/11/11/N2t7/11/11/2C8 r - - 0 1")
        .unwrap();
    let shot = game
        .moves(&MoveQuery::default())
        .into_iter()
        .find(|m| m.from == sq("a4") && m.to == sq("d4") && m.is_stay_capture())
        .expect("gun shot at range three");
    assert!(shot.is_capture());
}

#[test]
fn test_air_force_flies_over_blockers() {
    // Own infantry on f6 does not stop the flight to f8.
    let game = Game::try_from_fen("10c/11/11/11/11/11/5I5/11/5F5/11/11/2C8 r - - 0 1")
        .unwrap();
    let moves = game.moves(&MoveQuery::default());
    assert!(moves
        .iter()
        .any(|m| m.from == sq("f4") && m.to == sq("f8") && !m.is_capture()));
}

#[test]
fn test_heroic_commander_gains_diagonals() {
    let game =
        Game::try_from_fen("10c/11/11/11/11/11/11/11/11/11/11/2+C8 r - - 0 1").unwrap();
    let moves = game.moves(&MoveQuery::default());
    assert!(moves.iter().any(|m| m.to == sq("d2")));
    assert!(moves.iter().any(|m| m.to == sq("j8")));
    // k9 would line the commander up with k12 on an open file.
    assert!(!moves.iter().any(|m| m.to == sq("k9")));
}

#[test]
fn test_piece_not_found() {
    let mut game = Game::new();
    let err = structured(&mut game, "f6", "f7").unwrap_err();
    assert!(matches!(err, MoveError::PieceNotFound { .. }));
}

#[test]
fn test_out_of_range_diagnosis() {
    let mut game = Game::new();
    // Infantry cannot walk two squares.
    let err = structured(&mut game, "c4", "c6").unwrap_err();
    assert!(matches!(
        err,
        MoveError::Illegal {
            reason: IllegalMoveReason::OutOfRange,
            ..
        }
    ));
}
