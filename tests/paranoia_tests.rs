//! Adversarial check and retry loop tests
//!
//! Boards where the first proposal walks into a counter, and the bot has to
//! fall back to another objective or to the least dangerous rejection.

mod common;

use common::{board, config, snake, world};
use paranoid_snake::bot::Bot;
use paranoid_snake::objective::{Label, Objective};
use paranoid_snake::paranoia::{AdversarialChecker, ThreatKind, Verdict};
use paranoid_snake::types::Direction;

#[test]
fn test_trap_into_head_to_head_is_replaced_by_food() {
    // Cutting left would pin the opponent to the top wall, but it is as long as
    // we are and its head would sit right next to ours
    let bot = Bot::new(config());
    let board = board(
        7,
        7,
        &[(4, 3)],
        vec![
            snake("me", &[(1, 5), (2, 5)], 24),
            snake("them", &[(0, 6), (1, 6)], 65),
        ],
    );

    let world = world(&board, "me");
    let config = config();
    let checker = AdversarialChecker::new(&config);
    let trap = Objective::targeting(Label::Trapping, Direction::Left, "them");
    match checker.check(&world, &trap) {
        Verdict::Unsafe(threat) => {
            assert_eq!(threat.kind, ThreatKind::HeadToHead);
            assert_eq!(threat.opponent_id, "them");
        }
        Verdict::Safe => panic!("trap next to an equal head should be rejected"),
    }

    let decision = bot.decide(&board, "me").unwrap();
    assert_eq!(decision.label, Label::RiskyFood);
    assert_eq!(decision.direction, Direction::Right);
}

#[test]
fn test_food_run_that_opens_a_trap_is_rejected() {
    let board = board(
        5,
        5,
        &[(0, 4), (4, 0)],
        vec![
            snake("me", &[(0, 0), (1, 0)], 52),
            snake("them", &[(1, 2), (0, 2), (0, 3), (1, 3), (1, 4)], 65),
        ],
    );
    let world = world(&board, "me");
    let config = config();
    let checker = AdversarialChecker::new(&config);

    let verdict = checker.check(&world, &Objective::new(Label::RiskyFood, Direction::Right));
    match verdict {
        Verdict::Unsafe(threat) => {
            assert_eq!(threat.kind, ThreatKind::Tactic(Label::Trapping));
            assert_eq!(threat.opponent_id, "them");
            assert_eq!(threat.distance, 2);
        }
        Verdict::Safe => panic!("the opponent can trap us after this move"),
    }

    let decision = Bot::new(common::config()).decide(&board, "me").unwrap();
    assert_eq!(decision.label, Label::GoingToCenter);
    assert_eq!(decision.direction, Direction::Up);
}

#[test]
fn test_every_move_rejected_falls_back_to_first_rejection() {
    // Cornered at (6, 0): both exits touch the head of a longer opponent
    let bot = Bot::new(config());
    let board = board(
        7,
        7,
        &[(3, 5), (4, 5)],
        vec![
            snake("me", &[(6, 0), (5, 0)], 93),
            snake("them", &[(5, 1), (4, 1), (4, 0)], 47),
        ],
    );

    let world = world(&board, "me");
    let config = config();
    let checker = AdversarialChecker::new(&config);
    for direction in [Direction::Left, Direction::Up] {
        let verdict = checker.check(&world, &Objective::new(Label::Stalling, direction));
        assert!(
            matches!(verdict, Verdict::Unsafe(ref threat) if threat.kind == ThreatKind::HeadToHead),
            "{} should be a head-to-head risk",
            direction.as_str()
        );
    }

    let decision = bot.decide(&board, "me").unwrap();
    assert_eq!(decision.label, Label::GoingToCenter);
    assert_eq!(decision.direction, Direction::Left);
}

#[test]
fn test_opponents_without_moves_are_not_consulted() {
    // The opponent is sealed in the corner by our body and cannot answer
    let board = board(
        7,
        7,
        &[],
        vec![
            snake("me", &[(2, 0), (1, 0), (1, 1), (0, 1), (0, 2)], 90),
            snake("them", &[(0, 0)], 90),
        ],
    );
    let world = world(&board, "me");
    let them = world.actor("them").unwrap();
    assert!(world.passable_neighbours(&them.head(), them, 1, 0).is_empty());

    let config = config();
    let checker = AdversarialChecker::new(&config);
    let verdict = checker.check(&world, &Objective::new(Label::Stalling, Direction::Right));
    assert_eq!(verdict, Verdict::Safe);
}
