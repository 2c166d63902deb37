//! Crowning men on the far rank.

use checkers_engine::{legal_moves, Board, Pos, Rank, Side};

fn board(diagram: &str) -> Board {
    diagram.parse().unwrap()
}

#[test]
fn light_man_crowns_on_row_zero() {
    let board = board(
        "........
         ..l.....
         ........
         ........
         ........
         ........
         ........
         ......d.",
    );
    let moves = legal_moves(&board, Side::Light);
    assert_eq!(moves.len(), 2);
    for mv in &moves {
        let after = board.apply_move(mv).unwrap();
        assert_eq!(after.piece_at(mv.to).unwrap().map(|p| p.rank), Some(Rank::King));
        assert_eq!(after.kings(Side::Light), 1);
    }
}

/// Reaching the far rank mid-chain crowns the man at once, and the chain
/// carries on with a backwards king jump.
#[test]
fn crowned_mid_chain_continues_as_king() {
    let board = board(
        "........
         ........
         ........
         ........
         ........
         ..d.....
         ...l.l..
         ........",
    );
    let moves = legal_moves(&board, Side::Dark);
    assert_eq!(moves.len(), 1);
    let chain = &moves[0];
    assert_eq!(chain.path, vec![Pos::new(7, 4), Pos::new(5, 6)]);
    assert_eq!(chain.captured, vec![Pos::new(6, 3), Pos::new(6, 5)]);

    let after = board.apply_move(chain).unwrap();
    let piece = after.piece_at(Pos::new(5, 6)).unwrap().unwrap();
    assert_eq!(piece.rank, Rank::King);
    assert_eq!(after.count(Side::Light), 0);
}

#[test]
fn kings_stay_kings() {
    let board = board(
        "........
         ........
         ........
         ........
         ...D....
         ........
         ........
         ......l.",
    );
    let backwards = legal_moves(&board, Side::Dark)
        .into_iter()
        .find(|mv| mv.to.row < mv.from.row)
        .unwrap();
    let after = board.apply_move(&backwards).unwrap();
    assert!(after.piece_at(backwards.to).unwrap().unwrap().is_king());
}
