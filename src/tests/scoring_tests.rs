use board_game_traits::Color;

use crate::position::{GameState, RoadRule};
use crate::position::Piece::*;
use crate::scoring::{base_score, Scorer, ScoringRules};
use crate::tests::state_with_pieces;

fn straight_road() -> GameState {
    state_with_pieces(
        3,
        Color::Black,
        &[("a1", WhiteFlat), ("a2", WhiteFlat), ("a3", WhiteFlat)],
    )
    .with_reserves(Color::White, 7, 0)
}

fn winding_road() -> GameState {
    state_with_pieces(
        3,
        Color::Black,
        &[("a1", WhiteFlat), ("a2", WhiteFlat), ("b2", WhiteFlat), ("b3", WhiteFlat)],
    )
    .with_reserves(Color::White, 6, 0)
}

fn tall_road() -> GameState {
    state_with_pieces(
        3,
        Color::Black,
        &[
            ("a1", WhiteFlat),
            ("a2", BlackFlat),
            ("a2", WhiteFlat),
            ("a3", WhiteFlat),
        ],
    )
    .with_reserves(Color::White, 7, 0)
}

#[test]
fn rules_by_name() {
    for rules in ScoringRules::ALL {
        assert_eq!(ScoringRules::from_name(rules.name()), rules);
        assert_eq!(rules.to_string(), rules.name());
    }
    assert_eq!(ScoringRules::from_name("tarway"), ScoringRules::Tarway);
    assert_eq!(ScoringRules::from_name("no such rules"), ScoringRules::Default);
    assert_eq!(ScoringRules::default(), ScoringRules::Default);
}

#[test]
fn base_score_test() {
    let state = straight_road();
    assert_eq!(base_score(&state, Color::White), 16.0);
    assert_eq!(base_score(&state, Color::Black), 19.0);
}

#[test]
fn default_scoring() {
    let state = straight_road();
    let rules = ScoringRules::Default;
    assert_eq!(rules.score(&state, Color::White, Some(Color::White), true), 16.0);
    assert_eq!(rules.score(&state, Color::Black, Some(Color::White), true), -19.0);
    assert_eq!(rules.score(&state, Color::Black, Some(Color::White), false), 0.0);
    assert_eq!(rules.score(&state, Color::White, None, true), -16.0);
    assert_eq!(rules.score(&state, Color::White, None, false), 0.0);
}

#[test]
fn downings_doubles_straight_roads() {
    let rules = ScoringRules::Downings;
    let straight = straight_road();
    assert_eq!(rules.score(&straight, Color::White, Some(Color::White), true), 32.0);
    let winding = winding_road();
    assert!(winding.has_road(Color::White, RoadRule::Any));
    assert!(!winding.has_road(Color::White, RoadRule::Straight));
    assert_eq!(rules.score(&winding, Color::White, Some(Color::White), true), 15.0);
}

#[test]
fn middletown_doubles_with_capstone_in_hand() {
    let rules = ScoringRules::Middletown;
    let without_cap = straight_road();
    assert_eq!(rules.score(&without_cap, Color::White, Some(Color::White), true), 16.0);
    let with_cap = straight_road().with_reserves(Color::White, 7, 1);
    assert_eq!(rules.score(&with_cap, Color::White, Some(Color::White), true), 32.0);
}

#[test]
fn tarway_prefers_low_roads() {
    let rules = ScoringRules::Tarway;
    assert_eq!(rules.score(&straight_road(), Color::White, Some(Color::White), true), 32.0);
    assert_eq!(rules.score(&tall_road(), Color::White, Some(Color::White), true), 48.0);
    assert_eq!(rules.score(&tall_road(), Color::Black, Some(Color::White), true), -19.0);
}
