//! Integration tests that drive every variant through the dispatcher.

use baduk_core::{Cell, Color, ColorSet, Coord, Move, Submission};
use baduk_engine::{Game, GameError, GameEvent, IllegalReason, Outcome, Phase, VariantKind};
use serde_json::json;

fn grid(size: u16) -> serde_json::Value {
    json!({"type": "grid", "width": size, "height": size})
}

fn play(game: &mut Game, moves: &[&str]) {
    for text in moves {
        let submission: Submission = text.parse().expect("valid move notation");
        game.submit(submission)
            .unwrap_or_else(|e| panic!("move {} rejected: {}", text, e));
    }
}

#[test]
fn test_standard_game_to_the_end() {
    let mut game = Game::create("standard", &json!({"board": grid(5), "komi": 0.5}))
        .expect("Failed to create game");

    play(
        &mut game,
        &["B 1,0", "W 3,0", "B 1,1", "W 3,1", "B 1,2", "W 3,2", "B 1,3", "W 3,3", "B 1,4", "W 3,4"],
    );
    play(&mut game, &["B pass", "W pass"]);

    assert!(game.is_over());
    let score = game.score();
    // Black: column 0 and column 1. White: columns 3 and 4. Column 2 is shared.
    assert_eq!(score.total(Color::BLACK), 10.0);
    assert_eq!(score.total(Color::WHITE), 10.5);
    assert_eq!(
        game.state().outcome().and_then(Outcome::winner),
        Some(Color::WHITE)
    );
    assert_eq!(game.state().history().len(), 12);
}

#[test]
fn test_baduk_alias_and_ko_fight() {
    let mut game = Game::create("baduk", &json!({"board": grid(5)})).expect("Failed to create game");
    assert_eq!(game.kind(), VariantKind::Standard);

    // Build a ko shape around 1,1 / 2,1.
    play(
        &mut game,
        &["B 1,0", "W 2,0", "B 0,1", "W 3,1", "B 1,2", "W 2,2", "B 4,4", "W 1,1", "B 2,1"],
    );
    assert_eq!(game.state().board().get(Coord::new(1, 1)), Ok(Cell::Empty));

    let before = game.to_snapshot().expect("snapshot");
    assert_eq!(
        game.submit_move(Color::WHITE, Move::Place(Coord::new(1, 1))),
        Err(GameError::KoViolation)
    );
    assert_eq!(game.to_snapshot().expect("snapshot"), before);

    // A ko threat elsewhere, then the retake is legal.
    play(&mut game, &["W 4,0", "B 4,1", "W 1,1"]);
    assert_eq!(game.state().board().get(Coord::new(2, 1)), Ok(Cell::Empty));
}

#[test]
fn test_parallel_collision_policies() {
    let both: ColorSet = [Color::BLACK, Color::WHITE].into_iter().collect();
    for (policy, expected) in [
        ("merge", Cell::Merged(both)),
        ("pass", Cell::Empty),
        ("ko", Cell::Blocker),
    ] {
        let mut game = Game::create("parallel", &json!({"board": grid(5), "collision": policy}))
            .expect("Failed to create game");
        play(&mut game, &["B 2,2", "W 2,2"]);
        assert_eq!(
            game.state().board().get(Coord::new(2, 2)),
            Ok(expected),
            "collision policy {}",
            policy
        );
    }
}

#[test]
fn test_parallel_four_players() {
    let mut game = Game::create("parallel", &json!({"board": grid(6), "players": 4}))
        .expect("Failed to create game");
    play(&mut game, &["0 0,0", "1 5,0", "2 0,5"]);
    assert_eq!(game.state().phase(), Phase::RoundResolving);

    let events = game.submit_move(Color::new(3).expect("color"), Move::Place(Coord::new(5, 5)))
        .expect("round completes");
    assert!(events.contains(&GameEvent::RoundResolved { round: 1 }));
    assert_eq!(game.state().board().occupied().count(), 4);
    assert_eq!(
        game.submit_move(Color::new(4).expect("color"), Move::Pass),
        Err(GameError::IllegalMove(IllegalReason::UnknownPlayer(
            Color::new(4).expect("color")
        )))
    );
}

#[test]
fn test_parallel_forced_resolution() {
    let mut game = Game::create("parallel", &json!({"board": grid(5)})).expect("Failed to create game");
    play(&mut game, &["W 1,1"]);
    game.resolve_round().expect("forced resolution");
    assert_eq!(
        game.state().board().get(Coord::new(1, 1)),
        Ok(Cell::Stone(Color::WHITE))
    );
    assert_eq!(game.state().phase(), Phase::AwaitingMove);
}

#[test]
fn test_drift_moves_every_stone() {
    let mut game = Game::create("drift", &json!({"board": grid(5), "shift": {"dx": 0, "dy": 1}}))
        .expect("Failed to create game");
    play(&mut game, &["B 2,4", "W 0,0"]);
    // Black was shifted twice, White once.
    assert_eq!(
        game.state().board().get(Coord::new(2, 1)),
        Ok(Cell::Stone(Color::BLACK))
    );
    assert_eq!(
        game.state().board().get(Coord::new(0, 1)),
        Ok(Cell::Stone(Color::WHITE))
    );
}

#[test]
fn test_quantum_realities_diverge_after_entanglement() {
    let mut game = Game::create("quantum", &json!({"board": grid(5)})).expect("Failed to create game");
    play(&mut game, &["B 0,0", "W 4,4", "B 2,2"]);
    let boards = game.state().boards();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0].get(Coord::new(0, 0)), Ok(Cell::Stone(Color::BLACK)));
    assert_eq!(boards[1].get(Coord::new(0, 0)), Ok(Cell::Stone(Color::WHITE)));
    assert_eq!(boards[0].get(Coord::new(4, 4)), Ok(Cell::Stone(Color::WHITE)));
    assert_eq!(boards[1].get(Coord::new(4, 4)), Ok(Cell::Stone(Color::BLACK)));
    assert_eq!(boards[0].get(Coord::new(2, 2)), boards[1].get(Coord::new(2, 2)));
}

#[test]
fn test_pyramid_scores_by_weight() {
    let mut game = Game::create("pyramid", &json!({"board": grid(5), "komi": 0.0}))
        .expect("Failed to create game");
    play(&mut game, &["B 2,2", "W 0,0"]);
    let score = game.score();
    // Only stones count: the empty region touches both colors.
    assert_eq!(score.total(Color::BLACK), 3.0);
    assert_eq!(score.total(Color::WHITE), 1.0);
}

/// A path of `len` nodes along the x axis.
fn path(len: i32) -> serde_json::Value {
    let nodes: Vec<_> = (0..len).map(|x| json!({"x": x, "y": 0})).collect();
    let edges: Vec<_> = (1..len)
        .map(|x| json!([{"x": x - 1, "y": 0}, {"x": x, "y": 0}]))
        .collect();
    json!({"type": "graph", "nodes": nodes, "edges": edges})
}

#[test]
fn test_capture_on_hex_board() {
    let mut game = Game::create(
        "standard",
        &json!({"board": {"type": "hex", "radius": 1}, "komi": 0.5}),
    )
    .expect("Failed to create game");

    // 1,0 sits on the rim; its only neighbors are 0,0, 1,-1 and 0,1.
    play(&mut game, &["B 0,0", "W 1,0", "B 1,-1", "W pass"]);
    let events = game
        .submit_move(Color::BLACK, Move::Place(Coord::new(0, 1)))
        .expect("capturing move");
    assert!(events.contains(&GameEvent::Captured {
        color: Color::WHITE,
        stones: vec![Coord::new(1, 0)],
        reality: None,
    }));
    assert_eq!(game.state().board().get(Coord::new(1, 0)), Ok(Cell::Empty));
    assert_eq!(game.state().captures(Color::BLACK), 1);

    // Three stones plus the four empty points they alone surround.
    let score = game.score();
    assert_eq!(score.total(Color::BLACK), 7.0);
    assert_eq!(score.total(Color::WHITE), 0.5);
}

#[test]
fn test_pyramid_on_graph_board() {
    let mut game = Game::create("pyramid", &json!({"board": path(5), "komi": 0.0}))
        .expect("Failed to create game");

    // Weights along the path are 1 2 3 2 1.
    play(&mut game, &["B 2,0", "W 4,0", "B pass", "W pass"]);
    assert!(game.is_over());
    let score = game.score();
    // Black owns 0,0 and 1,0; 3,0 touches both colors.
    assert_eq!(score.total(Color::BLACK), 3.0 + 1.0 + 2.0);
    assert_eq!(score.total(Color::WHITE), 1.0);
    assert_eq!(
        game.state().outcome().and_then(Outcome::winner),
        Some(Color::BLACK)
    );
}

#[test]
fn test_extreme_coordinates_are_rejected() {
    let boards = [grid(5), json!({"type": "hex", "radius": 2}), path(4)];
    let extremes = [
        Coord::new(i32::MIN, i32::MIN),
        Coord::new(i32::MAX, i32::MAX),
        Coord::new(i32::MIN, i32::MAX),
        Coord::new(i32::MAX, 0),
        Coord::new(0, i32::MIN),
    ];
    for board in boards {
        for kind in [VariantKind::Standard, VariantKind::Parallel, VariantKind::Quantum] {
            let mut game = Game::create(kind.id(), &json!({"board": board.clone()}))
                .expect("Failed to create game");
            for at in extremes {
                assert_eq!(
                    game.submit_move(Color::BLACK, Move::Place(at)),
                    Err(GameError::InvalidCoordinate(at)),
                    "{} on {}",
                    kind,
                    board
                );
            }
            assert!(game.state().history().is_empty());
        }
    }
}

#[test]
fn test_moves_after_resignation_are_rejected() {
    for kind in VariantKind::ALL {
        let mut game = Game::create(kind.id(), &json!({"board": grid(5)})).expect("Failed to create game");
        let events = game.submit_move(Color::WHITE, Move::Resign).expect("resignation");
        assert!(matches!(events.last(), Some(GameEvent::GameOver { .. })), "{}", kind);
        assert_eq!(
            game.state().outcome(),
            Some(&Outcome::Resignation {
                winner: Color::BLACK
            })
        );
        assert_eq!(
            game.submit_move(Color::BLACK, Move::Pass),
            Err(GameError::GameEnded)
        );
    }
}

#[test]
fn test_snapshot_restores_pending_round() {
    let mut game = Game::create("parallel", &json!({"board": grid(5), "players": 3}))
        .expect("Failed to create game");
    play(&mut game, &["0 1,1", "2 3,3"]);

    let snapshot = game.to_snapshot().expect("snapshot");
    let mut restored = Game::from_snapshot(&snapshot).expect("restore");
    assert_eq!(restored, game);

    assert_eq!(
        restored.submit_move(Color::BLACK, Move::Pass),
        game.submit_move(Color::BLACK, Move::Pass)
    );
    assert_eq!(
        restored.submit_move(Color::WHITE, Move::Place(Coord::new(2, 2))),
        game.submit_move(Color::WHITE, Move::Place(Coord::new(2, 2)))
    );
    assert_eq!(restored, game);
}

#[test]
fn test_malformed_snapshot() {
    assert!(Game::from_snapshot("not json").is_err());
    assert!(Game::from_snapshot("{\"variant\": \"standard\"}").is_err());
}
