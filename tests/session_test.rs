use gemgrid::core::{find_all_matches, BoardConfig};
use gemgrid::engine::{Session, SessionOptions};
use gemgrid::types::Notification;

fn config(seed: u64) -> BoardConfig {
    BoardConfig {
        hint_delay_ms: 200,
        seed,
        ..BoardConfig::default()
    }
}

#[test]
fn autoplay_makes_moves_and_leaves_a_stable_board() {
    let mut session = Session::new(config(42), SessionOptions::default()).unwrap();
    let swaps = session.play(5, 200_000);

    assert!(session.is_stuck() || swaps == 5);
    if !session.is_stuck() {
        assert!(session.is_settled());
    }
    let board = session.controller().board();
    assert!(board.is_full());
    assert!(find_all_matches(board).is_empty());
}

#[test]
fn opening_drop_reports_every_piece() {
    let mut session = Session::new(
        config(7),
        SessionOptions {
            autoplay: false,
            ..SessionOptions::default()
        },
    )
    .unwrap();

    let first = session.tick().to_vec();
    let spawned = first
        .iter()
        .filter(|n| matches!(n, Notification::PieceSpawned { .. }))
        .count();
    assert_eq!(spawned, 64);
    assert!(session.mover().in_flight() >= 64);

    assert!(session.run_until_settled(100_000));
    assert!(session.mover().is_idle());
    assert_eq!(session.swaps(), 0);
}

#[test]
fn sessions_with_same_seed_replay_identically() {
    let run = |seed| {
        let mut session = Session::new(config(seed), SessionOptions::default()).unwrap();
        let mut log = Vec::new();
        for _ in 0..3_000 {
            log.extend_from_slice(session.tick());
        }
        (log, session.controller().board().to_rows())
    };
    assert_eq!(run(9), run(9));
}
