use std::collections::HashSet;

use board_game_traits::Color;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::environment::TakEnvironment;
use crate::position::Piece::*;
use crate::position::{Action, GameState};
use crate::search::random::{weighted_choice, winning_actions};
use crate::search::{Agent, MinMax, Policy, PolicyAgent, RandomPolicy, Sarsa, SarsaAgent, Score};
use crate::tests::{empty_state, sq, state_with_pieces};

/// White to move with one stone left. Playing it ends the game,
/// and white only wins by completing the a file.
fn white_can_win() -> GameState {
    state_with_pieces(
        3,
        Color::White,
        &[
            ("a1", WhiteFlat),
            ("a2", WhiteFlat),
            ("b1", BlackFlat),
            ("b2", BlackFlat),
            ("c1", BlackFlat),
            ("c2", BlackFlat),
        ],
    )
    .with_reserves(Color::White, 1, 0)
    .with_reserves(Color::Black, 8, 0)
}

/// White to move, and must stop black from completing the a file with its last stone
fn white_must_block() -> GameState {
    state_with_pieces(
        3,
        Color::White,
        &[
            ("a1", BlackFlat),
            ("a2", BlackFlat),
            ("c1", WhiteFlat),
            ("b3", WhiteFlat),
        ],
    )
    .with_reserves(Color::Black, 1, 0)
}

#[test]
fn winning_actions_test() {
    let state = white_can_win();
    let actions = state.possible_actions();
    assert_eq!(
        winning_actions(&state, &actions),
        vec![&Action::Place(WhiteFlat, sq("a3"))]
    );
    assert!(winning_actions(&white_must_block(), &white_must_block().possible_actions()).is_empty());
}

#[test]
fn random_policy_picks_legal_actions() {
    let state = white_must_block();
    let actions = state.possible_actions();
    for policy in [RandomPolicy::uniform(), RandomPolicy::weighted(0.5), RandomPolicy::default()] {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let action = policy.select_action(&state, &actions, &mut rng).unwrap();
            assert!(actions.contains(&action));
        }
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(policy.select_action(&state, &[], &mut rng), None);
    }
    assert_eq!(RandomPolicy::uniform().place_probability(), None);
    assert_eq!(RandomPolicy::default().place_probability(), Some(0.5));
}

#[test]
fn random_policy_takes_win() {
    let state = white_can_win();
    let actions = state.possible_actions();
    let policy = RandomPolicy::uniform().take_win();
    for seed in 0..20 {
        let mut rng = SmallRng::seed_from_u64(seed);
        assert_eq!(
            policy.select_action(&state, &actions, &mut rng),
            Some(Action::Place(WhiteFlat, sq("a3")))
        );
    }
}

#[test]
fn weighted_choice_test() {
    let state = white_must_block();
    let actions = state.possible_actions();
    let moves: Vec<Action> = actions.iter().filter(|action| action.is_move()).cloned().collect();
    let mut rng = SmallRng::seed_from_u64(1);
    for _ in 0..20 {
        assert!(weighted_choice(&actions, 1.0, &mut rng).unwrap().is_place());
        assert!(weighted_choice(&actions, 0.0, &mut rng).unwrap().is_move());
        // Falls back to moves when there are no placements
        assert!(weighted_choice(&moves, 1.0, &mut rng).unwrap().is_move());
    }
    assert_eq!(weighted_choice(&[], 0.5, &mut rng), None);
}

#[test]
fn minmax_takes_win() {
    let state = white_can_win();
    let actions = state.possible_actions();
    for depth in 1..=2 {
        let minmax = MinMax::new(depth);
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert_eq!(
                minmax.select_action(&state, &actions, &mut rng),
                Some(Action::Place(WhiteFlat, sq("a3")))
            );
        }
    }
}

#[test]
fn minmax_blocks_road() {
    let state = white_must_block();
    let actions = state.possible_actions();
    let minmax = MinMax::new(2);
    for seed in 0..5 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let action = minmax.select_action(&state, &actions, &mut rng).unwrap();
        let next = state.apply_copy(&action).unwrap();
        assert!(
            winning_actions(&next, &next.possible_actions()).is_empty(),
            "{} doesn't stop black from winning",
            action
        );
    }

    let values = minmax.evaluate_actions(&state, &actions);
    assert_eq!(values.len(), actions.len());
    let losing = values.iter().filter(|(_, value)| *value < 0.0).count();
    assert!(losing > 0 && losing < actions.len());
}

#[test]
fn minmax_breaks_ties_randomly() {
    let state = empty_state(3, Color::White);
    let actions = state.possible_actions();
    let minmax = MinMax::new(1);
    let chosen: HashSet<Action> = (0..30)
        .map(|seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            minmax.select_action(&state, &actions, &mut rng).unwrap()
        })
        .collect();
    assert!(chosen.len() > 1);
}

#[test]
fn minmax_with_custom_evaluator() {
    let state = white_can_win();
    let flat_lead = |state: &GameState| -> Score {
        let us = state.last_mover();
        state.flat_count(us) as Score - state.flat_count(!us) as Score
    };
    let minmax = MinMax::with_evaluator(1, flat_lead);
    let actions = vec![
        Action::Place(WhiteFlat, sq("c3")),
        Action::Place(WhiteWall, sq("c3")),
    ];
    let values = minmax.evaluate_actions(&state, &actions);
    // Both end the game, as white runs out of stones
    assert_eq!(values[0], (actions[0].clone(), -1.0));
    assert_eq!(values[1], (actions[1].clone(), -2.0));
}

#[test]
fn sarsa_update() {
    let mut sarsa = Sarsa::new(0.5, 0.9, 0.0);
    let state = empty_state(3, Color::White);
    let action = Action::Place(BlackFlat, sq("a1"));
    let next = state.apply_copy(&action).unwrap();

    assert_eq!(sarsa.q(&state, &action), 0.0);
    sarsa.update(&state, &action, 1.0, &next, None);
    assert_eq!(sarsa.q(&state, &action), 0.5);
    sarsa.update(&state, &action, 1.0, &next, None);
    assert_eq!(sarsa.q(&state, &action), 0.75);

    let next_action = Action::Place(WhiteFlat, sq("b2"));
    let other = Action::Place(BlackFlat, sq("c3"));
    sarsa.set_q(&next, &next_action, 1.0);
    sarsa.update(&state, &other, 0.0, &next, Some(&next_action));
    assert!((sarsa.q(&state, &other) - 0.45).abs() < 1e-6);
    assert_eq!(sarsa.len(), 3);
}

#[test]
fn sarsa_exploits_best_action() {
    let state = empty_state(3, Color::White);
    let actions = state.possible_actions();
    let best = Action::Place(BlackFlat, sq("b2"));
    let mut sarsa = Sarsa::new(0.1, 0.9, 0.0).initial_q(0.5);
    sarsa.set_q(&state, &best, 1.0);
    for seed in 0..10 {
        let mut rng = SmallRng::seed_from_u64(seed);
        assert_eq!(sarsa.select_action(&state, &actions, &mut rng), Some(best.clone()));
    }
}

#[test]
fn sarsa_explores_winning_actions() {
    let state = white_can_win();
    let actions = state.possible_actions();
    let sarsa = Sarsa::new(0.1, 0.9, 1.0);
    for seed in 0..10 {
        let mut rng = SmallRng::seed_from_u64(seed);
        assert_eq!(
            sarsa.select_action(&state, &actions, &mut rng),
            Some(Action::Place(WhiteFlat, sq("a3")))
        );
    }
}

#[test]
fn sarsa_agent_learns_from_games() {
    let env = TakEnvironment::with_size(3).unwrap();
    let mut learner = SarsaAgent::new(Sarsa::new(0.5, 0.9, 0.2), 3);
    let mut opponent = PolicyAgent::new(RandomPolicy::default(), 4);

    for _ in 0..3 {
        let mut state = env.reset();
        for _ in 0..300 {
            let action = match state.side_to_move() {
                Color::White => learner.select_action(&env, &state).unwrap(),
                Color::Black => opponent.select_action(&env, &state).unwrap(),
            };
            let (next, result) = env.step(&state, &action).unwrap();
            learner.observe(&env, &state, &action, &next);
            opponent.observe(&env, &state, &action, &next);
            state = next;
            if result.done {
                break;
            }
        }
    }
    let learned = learner.sarsa().len();
    assert!(learned > 0);
    assert_eq!(learner.into_inner().len(), learned);
}
