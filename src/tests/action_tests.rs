use board_game_traits::Color;

use crate::error::TakError;
use crate::position::Direction::*;
use crate::position::Piece::*;
use crate::position::{Action, DropOrder, Square, MAX_DROPS};
use crate::tests::{empty_state, sq, state_with_pieces};

fn drops(counts: &[u8]) -> DropOrder {
    DropOrder::new(counts).unwrap()
}

#[test]
fn action_notation() {
    assert_eq!(Action::Place(WhiteFlat, Square::new(0, 0)).to_string(), "Fa1");
    assert_eq!(Action::Place(BlackWall, sq("c3")).to_string(), "Sc3");
    assert_eq!(Action::Place(WhiteCap, sq("b2")).to_string(), "Cb2");
    assert_eq!(
        Action::Move(Square::new(1, 5), East, drops(&[1, 1])).to_string(),
        "2b6→11"
    );
    assert_eq!(
        Action::Move(Square::new(1, 5), South, drops(&[1, 1, 2, 1])).to_string(),
        "5b6↓1121"
    );
    assert_eq!(
        Action::Move(sq("c3"), East, drops(&[1, 2])).to_string(),
        "3c3→12"
    );
    assert_eq!(Action::Move(sq("d1"), North, drops(&[1])).to_string(), "1d1↑1");
    assert_eq!(Action::Move(sq("d1"), West, drops(&[2])).to_string(), "2d1←2");
}

#[test]
fn drop_order_construction() {
    assert!(DropOrder::new(&[]).is_none());
    assert!(DropOrder::new(&[1, 0, 2]).is_none());
    assert!(DropOrder::new(&[1; MAX_DROPS + 1]).is_none());

    let order = drops(&[2, 1, 3]);
    assert_eq!(order.total(), 6);
    assert_eq!(order.len(), 3);
    assert_eq!(order.last(), Some(3));
    assert_eq!(order.as_slice(), &[2, 1, 3]);
    assert_eq!(order.to_string(), "213");
}

#[test]
fn action_accessors() {
    let place = Action::Place(BlackFlat, sq("e5"));
    let mv = Action::Move(sq("a2"), North, drops(&[1]));
    assert!(place.is_place() && !place.is_move());
    assert!(mv.is_move() && !mv.is_place());
    assert_eq!(place.origin(), sq("e5"));
    assert_eq!(mv.origin(), sq("a2"));
}

#[test]
fn parse_placements() {
    let opening = empty_state(5, Color::White);
    assert_eq!(
        opening.parse_action("Fa1").unwrap(),
        Action::Place(BlackFlat, sq("a1"))
    );

    let state = state_with_pieces(5, Color::Black, &[("a1", BlackFlat), ("e5", WhiteFlat)]);
    assert_eq!(
        state.parse_action("Sc3").unwrap(),
        Action::Place(BlackWall, sq("c3"))
    );
    assert_eq!(
        state.parse_action("Cb2").unwrap(),
        Action::Place(BlackCap, sq("b2"))
    );
}

#[test]
fn parse_moves() {
    let state = state_with_pieces(5, Color::White, &[("a1", BlackFlat), ("e5", WhiteFlat)]);
    let expected = Action::Move(sq("c3"), East, drops(&[1, 2]));
    for input in ["3c3→12", "3c3>12", "3c3R12"] {
        assert_eq!(state.parse_action(input).unwrap(), expected);
    }
    assert_eq!(
        state.parse_action("c3-").unwrap(),
        Action::Move(sq("c3"), South, drops(&[1]))
    );
    assert_eq!(
        state.parse_action("2c3+").unwrap(),
        Action::Move(sq("c3"), North, drops(&[2]))
    );
    assert_eq!(
        state.parse_action("5b6↓1121").unwrap(),
        Action::Move(sq("b6"), South, drops(&[1, 1, 2, 1]))
    );

    for action in state.possible_actions() {
        assert_eq!(state.parse_action(&action.to_string()).unwrap(), action);
    }
}

#[test]
fn parse_errors() {
    let state = state_with_pieces(5, Color::White, &[("a1", BlackFlat), ("e5", WhiteFlat)]);
    for input in ["", "Xa1", "Fz", "3c3→13", "3c3→102", "3c3", "c3→x"] {
        assert!(
            matches!(state.parse_action(input), Err(TakError::ParseError(_))),
            "{} parsed",
            input
        );
    }
}

#[test]
fn missing_count_moves_one_stone() {
    let state = state_with_pieces(
        5,
        Color::White,
        &[("c3", BlackFlat), ("c3", WhiteFlat), ("c3", WhiteFlat), ("e5", BlackFlat)],
    );
    let action = state.parse_action("c3<").unwrap();
    assert_eq!(action, Action::Move(sq("c3"), West, drops(&[1])));
    assert!(state.is_valid(&action));
    assert_eq!(
        state.parse_action("3c3<").unwrap(),
        Action::Move(sq("c3"), West, drops(&[3]))
    );
}
