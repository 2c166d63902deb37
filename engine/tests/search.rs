//! Engine behaviour on small positions.

use std::time::Duration;

use checkers_engine::engine::is_decisive;
use checkers_engine::{Board, Engine, Pos, Side, Weights, WIN_SCORE};

fn board(diagram: &str) -> Board {
    diagram.parse().unwrap()
}

#[test]
fn prefers_the_double_jump() {
    // dark has a single capture and several double jumps on offer
    let board = board(
        "........
         ........
         .d.d....
         ..l.l...
         ........
         ..l.....
         ........
         l.......",
    );
    let result = Engine::default().best_move(&board, Side::Dark, 1).unwrap();
    assert_eq!(result.best_move.captured.len(), 2);
}

#[test]
fn sees_a_forced_win() {
    // after a waiting move light's only step walks into a capture of its last man
    let board = board(
        ".......d
         ........
         ........
         ..d.....
         ........
         l.......
         ........
         ........",
    );
    let result = Engine::default().best_move(&board, Side::Dark, 6).unwrap();
    assert!(is_decisive(result.score), "score {}", result.score);
    assert_eq!(result.score, WIN_SCORE - 3);
}

#[test]
fn avoids_hanging_its_last_man() {
    let board = board(
        "........
         ........
         ........
         ..d.....
         ........
         ....l...
         ........
         ........",
    );
    // stepping to (4, 3) lets the light man jump back to (3, 2)
    let result = Engine::default().best_move(&board, Side::Dark, 2).unwrap();
    assert_eq!(result.best_move.to, Pos::new(4, 1));
    assert!(!is_decisive(result.score));
}

#[test]
fn custom_weights_change_nothing_about_legality() {
    let engine = Engine::new(Weights { man: 1, king: 3, advancement: 0, center: 0, back_rank: 0 });
    let board = Board::initial_standard();
    let result = engine.best_move(&board, Side::Light, 3).unwrap();
    assert!(board.legal_moves(Side::Light).contains(&result.best_move));
}

#[test]
fn time_budget_keeps_a_legal_move() {
    let board = Board::initial_standard();
    let result = Engine::default()
        .best_move_within(&board, Side::Dark, 8, Duration::from_millis(50))
        .unwrap();
    assert!(result.depth >= 1 && result.depth <= 8);
    assert!(board.legal_moves(Side::Dark).contains(&result.best_move));
}
