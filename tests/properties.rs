use proptest::prelude::*;

use territory::fingerprint;
use territory::rules;
use territory::{Board, Player, Position, Session, SessionConfig};

#[derive(Debug, Clone)]
enum Op {
    Move(i32, i32),
    Undo,
    Redo,
    Reset,
}

fn op(size: i32) -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (-1..=size, -1..=size).prop_map(|(x, y)| Op::Move(x, y)),
        2 => Just(Op::Undo),
        2 => Just(Op::Redo),
        1 => Just(Op::Reset),
    ]
}

fn apply(session: &mut Session, op: &Op) {
    match *op {
        Op::Move(x, y) => {
            session.make_move(Position::new(x, y));
        }
        Op::Undo => {
            session.undo();
        }
        Op::Redo => {
            session.redo();
        }
        Op::Reset => session.reset(),
    }
}

fn session(size: usize) -> Session {
    Session::new(SessionConfig {
        board_size: size,
        history_limit: None,
    })
    .unwrap()
}

fn board_strategy() -> impl Strategy<Value = Board> {
    (1usize..=6).prop_flat_map(|size| {
        let cell = prop::option::of(prop_oneof![Just(Player::P1), Just(Player::P2)]);
        prop::collection::vec(cell, size * size).prop_map(move |cells| {
            let rows: Vec<Vec<_>> = cells.chunks(size).map(|row| row.to_vec()).collect();
            Board::try_from(rows).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn score_partitions_the_occupied_cells(board in board_strategy()) {
        let score = rules::compute_score(&board);
        prop_assert_eq!(score.total() as usize, board.occupied_count());
        prop_assert!(score.total() as usize <= board.size() * board.size());
    }

    #[test]
    fn every_transition_yields_a_verified_consistent_state(ops in prop::collection::vec(op(5), 0..80)) {
        let mut s = session(5);
        for op in &ops {
            apply(&mut s, op);
            let state = s.current();
            prop_assert!(fingerprint::verify(state));
            prop_assert_eq!(state.move_history().len(), state.board().occupied_count());
            prop_assert_eq!(state.score(), rules::compute_score(state.board()));
        }
    }

    #[test]
    fn empty_stack_undo_and_redo_change_nothing(ops in prop::collection::vec(op(4), 0..40)) {
        let mut s = session(4);
        for op in &ops {
            apply(&mut s, op);
        }

        while s.can_redo() {
            s.redo();
        }
        let before = s.current().clone();
        prop_assert!(!s.redo());
        prop_assert_eq!(s.current(), &before);

        while s.can_undo() {
            s.undo();
        }
        let before = s.current().clone();
        prop_assert!(!s.undo());
        prop_assert_eq!(s.current(), &before);
    }

    #[test]
    fn rejected_moves_leave_the_state_untouched(ops in prop::collection::vec(op(4), 0..40), x in -2..6, y in -2..6) {
        let mut s = session(4);
        for op in &ops {
            apply(&mut s, op);
        }
        let target = Position::new(x, y);
        let legal = s.is_valid_move(target);
        let before = s.current().clone();

        let applied = s.make_move(target);

        prop_assert_eq!(applied, legal);
        if !applied {
            prop_assert_eq!(s.current(), &before);
        } else {
            prop_assert_eq!(s.current().current_player(), before.current_player().opponent());
            prop_assert!(!s.can_redo());
        }
    }

    #[test]
    fn export_then_import_round_trips(ops in prop::collection::vec(op(5), 0..60)) {
        let mut source = session(5);
        for op in &ops {
            apply(&mut source, op);
        }
        let json = source.export_json().unwrap();

        let mut target = session(8);
        prop_assert!(target.import_json(&json));
        prop_assert_eq!(target.current().board(), source.current().board());
        prop_assert_eq!(target.current().current_player(), source.current().current_player());
        prop_assert_eq!(target.current().move_history(), source.current().move_history());
    }

    #[test]
    fn tampered_history_is_rejected(ops in prop::collection::vec(op(5), 1..60), dx in 1..5i32) {
        let mut source = session(5);
        for op in &ops {
            apply(&mut source, op);
        }
        prop_assume!(!source.current().move_history().is_empty());

        let mut value = serde_json::to_value(source.current()).unwrap();
        let x = value["moveHistory"][0]["x"].as_i64().unwrap();
        value["moveHistory"][0]["x"] = serde_json::Value::from(x + i64::from(dx));
        let tampered = serde_json::to_string(&value).unwrap();

        let mut target = session(5);
        let before = target.current().clone();
        prop_assert!(!target.import_json(&tampered));
        prop_assert_eq!(target.current(), &before);
    }
}
