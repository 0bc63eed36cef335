//! Deploy-session lifecycle tests.

use super::sq;
use crate::board::{
    Color, Game, MoveOptions, MoveRequest, PieceKind, SessionError,
};

// Red stack (TI) on c3, red commander f1, blue commander k12.
const STACK_FEN: &str = "10c/11/11/11/11/11/11/11/11/2(TI)8/11/5C5 r - - 0 1";

fn deploy(game: &mut Game, from: &str, to: &str, piece: PieceKind, opts: &MoveOptions) {
    game.make_move(
        MoveRequest {
            from: Some(sq(from)),
            to: Some(sq(to)),
            piece: Some(piece),
            deploy: true,
            stay: false,
        },
        opts,
    )
    .unwrap_or_else(|err| panic!("deploy {piece:?} {from}->{to} failed: {err}"));
}

fn no_auto_commit() -> MoveOptions {
    MoveOptions {
        auto_commit: false,
        ..MoveOptions::default()
    }
}

#[test]
fn test_deploy_session_manual_commit() {
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    let opts = no_auto_commit();

    deploy(&mut game, "c3", "c5", PieceKind::Tank, &opts);
    assert_eq!(game.turn(), Color::Red, "turn does not flip mid-session");
    assert_eq!(game.history_len(), 0);
    assert_eq!(game.get(sq("c5")).unwrap().kind, PieceKind::Tank);
    assert_eq!(game.get(sq("c3")).unwrap().kind, PieceKind::Infantry);

    let view = game.session_view().unwrap();
    assert_eq!(view.origin, sq("c3"));
    assert_eq!(view.deployed, vec![(PieceKind::Tank, sq("c5"))]);
    assert_eq!(view.remaining, vec![PieceKind::Infantry]);

    deploy(&mut game, "c3", "d3", PieceKind::Infantry, &opts);
    assert!(game.can_commit_session());

    let outcome = game.commit_session();
    assert!(outcome.success);
    let record = outcome.record.unwrap();
    assert_eq!(record.san, "c3:T>c5,I>d3");

    assert!(game.get(sq("c3")).is_none());
    assert_eq!(game.get(sq("c5")).unwrap().kind, PieceKind::Tank);
    assert_eq!(game.get(sq("d3")).unwrap().kind, PieceKind::Infantry);
    assert_eq!(game.history_len(), 1);
    assert_eq!(game.turn(), Color::Blue);
    assert!(game.session_view().is_none());
}

#[test]
fn test_deploy_session_auto_commit() {
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    let opts = MoveOptions::default();

    deploy(&mut game, "c3", "c5", PieceKind::Tank, &opts);
    assert!(game.session_view().is_some(), "one member still unaccounted");

    deploy(&mut game, "c3", "d3", PieceKind::Infantry, &opts);
    assert!(game.session_view().is_none(), "last member commits the session");
    assert_eq!(game.history_len(), 1);
    assert_eq!(game.turn(), Color::Blue);
}

#[test]
fn test_cancel_restores_snapshot() {
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    let before = game.fen();

    deploy(&mut game, "c3", "c5", PieceKind::Tank, &MoveOptions::default());
    game.cancel_session().unwrap();

    assert_eq!(game.fen(), before);
    assert_eq!(game.turn(), Color::Red);
    assert_eq!(game.history_len(), 0);
    let stack = game.get(sq("c3")).unwrap();
    assert_eq!(stack.kind, PieceKind::Tank);
    assert_eq!(stack.carried[0].kind, PieceKind::Infantry);
}

#[test]
fn test_cancel_without_session_fails() {
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    assert_eq!(game.cancel_session(), Err(SessionError::NoSessionOpen));
    assert!(!game.can_commit_session());
}

#[test]
fn test_stay_step_accounts_member() {
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    let opts = MoveOptions::default();

    deploy(&mut game, "c3", "c5", PieceKind::Tank, &opts);
    game.make_move(
        MoveRequest {
            from: Some(sq("c3")),
            to: None,
            piece: Some(PieceKind::Infantry),
            deploy: true,
            stay: true,
        },
        &opts,
    )
    .unwrap();

    assert!(game.session_view().is_none(), "stay completes the session");
    assert_eq!(game.get(sq("c3")).unwrap().kind, PieceKind::Infantry);
    assert_eq!(game.turn(), Color::Blue);
    assert_eq!(game.history_len(), 1);
}

#[test]
fn test_undo_pops_session_step() {
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    let before = game.fen();

    deploy(&mut game, "c3", "c5", PieceKind::Tank, &MoveOptions::default());
    assert!(game.session_view().is_some());

    game.undo().unwrap();
    assert!(game.session_view().is_none(), "first step popped, session gone");
    assert_eq!(game.fen(), before);
    assert_eq!(game.history_len(), 0);
}

#[test]
fn test_open_session_fen_round_trip() {
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    deploy(&mut game, "c3", "c5", PieceKind::Tank, &MoveOptions::default());

    let fen = game.fen();
    assert!(fen.ends_with("c3:T>c5 ..."), "fen: {fen}");

    let restored = Game::try_from_fen(&fen).unwrap();
    assert_eq!(restored.fen(), fen);

    let view = restored.session_view().unwrap();
    assert_eq!(view.origin, sq("c3"));
    assert_eq!(view.remaining, vec![PieceKind::Infantry]);
    assert_eq!(view.deployed, vec![(PieceKind::Tank, sq("c5"))]);

    // The restored session can still be finished.
    let mut restored = restored;
    deploy(
        &mut restored,
        "c3",
        "d3",
        PieceKind::Infantry,
        &MoveOptions::default(),
    );
    assert!(restored.session_view().is_none());
    assert_eq!(restored.turn(), Color::Blue);
}

#[test]
fn test_restored_session_cancel_restores_stack() {
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    deploy(&mut game, "c3", "c5", PieceKind::Tank, &MoveOptions::default());

    let mut restored = Game::try_from_fen(&game.fen()).unwrap();
    restored.cancel_session().unwrap();
    assert_eq!(restored.fen(), STACK_FEN);
}

#[test]
fn test_commit_blocked_while_exposed() {
    // The stack on f3 is the only cover between the commanders. Deploying
    // both members away (forced through the pseudo-legal path) leaves the
    // file open; the commit must refuse.
    let fen = "5c5/11/11/11/11/11/11/11/11/5(TI)5/11/5C5 r - - 0 1";
    let mut game = Game::try_from_fen(fen).unwrap();
    let opts = MoveOptions {
        legal: false,
        auto_commit: false,
        ..MoveOptions::default()
    };

    deploy(&mut game, "f3", "g3", PieceKind::Tank, &opts);
    deploy(&mut game, "f3", "e3", PieceKind::Infantry, &opts);

    assert!(!game.can_commit_session());
    let outcome = game.commit_session();
    assert!(!outcome.success);
    assert!(matches!(
        outcome.reason,
        Some(SessionError::CannotCommit { .. })
    ));
    assert!(game.session_view().is_some(), "session stays open");

    game.cancel_session().unwrap();
    assert_eq!(game.fen(), fen);
}

#[test]
fn test_deploy_capture() {
    // The deployed tank takes the blue militia on c5.
    let fen = "10c/11/11/11/11/11/11/2m8/11/2(TI)8/11/5C5 r - - 0 1";
    let mut game = Game::try_from_fen(fen).unwrap();
    deploy(&mut game, "c3", "c5", PieceKind::Tank, &no_auto_commit());

    assert_eq!(game.get(sq("c5")).unwrap().kind, PieceKind::Tank);
    assert_eq!(game.get(sq("c5")).unwrap().color, Color::Red);
    let view = game.session_view().unwrap();
    assert_eq!(view.steps, vec!["Txc5".to_string()]);

    let outcome = game.commit_session();
    assert!(outcome.success);
    assert_eq!(game.halfmove_clock(), 0, "capture resets the clock");
}

#[test]
fn test_recombine_into_deployed_member() {
    // Tank deploys two squares up, then the infantry re-joins it there.
    let mut game = Game::try_from_fen(STACK_FEN).unwrap();
    let opts = no_auto_commit();

    deploy(&mut game, "c3", "c4", PieceKind::Tank, &opts);
    deploy(&mut game, "c3", "c4", PieceKind::Infantry, &opts);

    let stack = game.get(sq("c4")).unwrap();
    assert_eq!(stack.kind, PieceKind::Tank);
    assert_eq!(stack.carried[0].kind, PieceKind::Infantry);
    assert!(game.get(sq("c3")).is_none());

    let outcome = game.commit_session();
    assert!(outcome.success);
    assert_eq!(game.history_len(), 1);
}
