use board_game_traits::Color;

use crate::config::GameConfig;
use crate::environment::TakEnvironment;
use crate::position::Action;
use crate::position::Piece::*;
use crate::search::{Agent, MctsAgent, MctsSetting};
use crate::tests::{sq, state_with_pieces};

#[test]
fn root_visits_equal_iterations_times_rollouts() {
    let env = TakEnvironment::with_size(3).unwrap();
    let state = env.reset();
    for parallel in [false, true] {
        let settings = MctsSetting::default()
            .iterations(5)
            .rollouts(4)
            .parallel_rollouts(parallel)
            .seed(1);
        let mut agent = MctsAgent::new(Color::White, settings);
        let root = agent.search(&env, &state).unwrap();
        assert_eq!(agent.graph().visits(root), 20);
        assert_eq!(agent.graph().total_rollouts(root), 20);
        assert!(agent.graph().total_nodes() > 1);
    }
}

#[test]
fn search_is_deterministic_for_a_seed() {
    let env = TakEnvironment::with_size(4).unwrap();
    let state = env.reset();
    let settings = MctsSetting::default().iterations(8).rollouts(3).seed(7);
    let mut first = MctsAgent::new(Color::White, settings.clone());
    let mut second = MctsAgent::new(Color::White, settings);
    assert_eq!(
        first.select_action(&env, &state).unwrap(),
        second.select_action(&env, &state).unwrap()
    );
}

#[test]
fn mcts_takes_win() {
    let env = TakEnvironment::with_size(3).unwrap();
    // White's last stone either completes the a file or loses on flats
    let state = state_with_pieces(
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
    .with_reserves(Color::White, 1, 0);

    let settings = MctsSetting::default()
        .iterations(300)
        .rollouts(2)
        .expansion_epsilon(1.0)
        .seed(3);
    let mut agent = MctsAgent::new(Color::White, settings);
    assert_eq!(
        agent.select_action(&env, &state).unwrap(),
        Action::Place(WhiteFlat, sq("a3"))
    );
}

#[test]
fn rollout_rewards_ignore_discount_setting() {
    let config = GameConfig::new(3).unwrap().discount(false);
    let env = TakEnvironment::new(config).unwrap();
    // Black just played its last stone, and white has a road
    let state = state_with_pieces(
        3,
        Color::White,
        &[("a1", WhiteFlat), ("a2", WhiteFlat), ("a3", WhiteFlat), ("b1", BlackFlat)],
    )
    .with_reserves(Color::Black, 0, 0);
    assert_eq!(state.winner(), Some(Color::White));
    assert_eq!(env.terminal_reward(&state), 0.0);
    assert_eq!(env.terminal_magnitude(&state), 9.0);

    for side in [Color::White, Color::Black] {
        let settings = MctsSetting::default().iterations(1).rollouts(3).seed(5);
        let mut agent = MctsAgent::new(side, settings);
        let root = agent.search(&env, &state).unwrap();
        assert_eq!(agent.graph().visits(root), 3);
        let expected = if side == Color::White { 27.0 } else { -27.0 };
        assert_eq!(agent.graph().total_reward(root), expected);
    }
}

#[test]
fn unexplored_root_falls_back_to_any_legal_action() {
    let env = TakEnvironment::with_size(3).unwrap();
    // Only c3 is empty, so nearly all actions are moves
    let state = state_with_pieces(
        3,
        Color::White,
        &[
            ("a1", WhiteFlat),
            ("a2", BlackFlat),
            ("a3", WhiteFlat),
            ("b1", BlackFlat),
            ("b2", WhiteFlat),
            ("b3", BlackFlat),
            ("c1", WhiteFlat),
            ("c2", BlackFlat),
        ],
    );
    let actions = env.possible_actions(&state);
    let mut moves_chosen = 0;
    for seed in 0..20 {
        let settings = MctsSetting::default()
            .iterations(0)
            .place_probability(1.0)
            .seed(seed);
        let mut agent = MctsAgent::new(Color::White, settings);
        let action = agent.select_action(&env, &state).unwrap();
        assert!(actions.contains(&action));
        if action.is_move() {
            moves_chosen += 1;
        }
    }
    assert!(moves_chosen > 0);
}

#[test]
fn selected_actions_are_legal() {
    let env = TakEnvironment::with_size(4).unwrap();
    let mut state = env.reset();
    let settings = MctsSetting::default().iterations(3).rollouts(2).seed(11);
    let mut white = MctsAgent::new(Color::White, settings.clone());
    let mut black = MctsAgent::new(Color::Black, settings.reuse_graph(false));
    for _ in 0..6 {
        let action = match state.side_to_move() {
            Color::White => white.select_action(&env, &state).unwrap(),
            Color::Black => black.select_action(&env, &state).unwrap(),
        };
        assert!(env.possible_actions(&state).contains(&action));
        let (next, result) = env.step(&state, &action).unwrap();
        white.observe(&env, &state, &action, &next);
        black.observe(&env, &state, &action, &next);
        state = next;
        if result.done {
            break;
        }
    }
    assert_eq!(white.side(), Color::White);
    assert!(white.graph().contains(&state));
}

#[test]
fn observed_actions_are_added_to_graph() {
    let env = TakEnvironment::with_size(3).unwrap();
    let state = env.reset();
    let mut agent = MctsAgent::new(Color::Black, MctsSetting::default().iterations(0));
    let root = agent.search(&env, &state).unwrap();
    assert_eq!(agent.graph().total_nodes(), 1);

    let action = Action::Place(BlackFlat, sq("b2"));
    let next = state.apply_copy(&action).unwrap();
    agent.observe(&env, &state, &action, &next);
    assert_eq!(agent.graph().total_nodes(), 2);
    assert_eq!(agent.graph().children(root).count(), 1);

    // Positions the graph has never seen are ignored
    let after = next.apply_copy(&Action::Place(WhiteFlat, sq("a1"))).unwrap();
    let later = after.apply_copy(&Action::Place(WhiteFlat, sq("c3"))).unwrap();
    agent.observe(&env, &after, &Action::Place(WhiteFlat, sq("c3")), &later);
    assert!(!agent.graph().contains(&later));

    agent.reset_graph();
    assert_eq!(agent.graph().total_nodes(), 0);
}
