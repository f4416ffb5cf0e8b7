use std::sync::OnceLock;

use board_game_traits::Color;

use crate::position::color_trait::{BlackTr, ColorTr, WhiteTr};
use crate::position::mv::drop_orders;
use crate::position::{
    Action, Direction, DropOrder, GameState, Piece, Role, Square, MAX_BOARD_SIZE,
};

/// Every drop order for picking up `pieces` pieces, computed once per process
pub fn drop_order_table(pieces: usize) -> &'static [DropOrder] {
    static TABLE: OnceLock<Vec<Vec<DropOrder>>> = OnceLock::new();
    let table = TABLE.get_or_init(|| (0..=MAX_BOARD_SIZE).map(drop_orders).collect());
    table.get(pieces).map(Vec::as_slice).unwrap_or(&[])
}

impl GameState {
    /// All legal actions, or none if the game is over
    pub fn possible_actions(&self) -> Vec<Action> {
        let mut actions = vec![];
        self.generate_actions(&mut actions);
        actions
    }

    /// Append all legal actions to `actions`. Appends nothing if the game is over.
    pub fn generate_actions(&self, actions: &mut Vec<Action>) {
        if self.is_terminal() {
            return;
        }
        match self.side_to_move() {
            Color::White => self.generate_actions_colortr::<WhiteTr, BlackTr>(actions),
            Color::Black => self.generate_actions_colortr::<BlackTr, WhiteTr>(actions),
        }
    }

    fn generate_actions_colortr<Us: ColorTr, Them: ColorTr>(&self, actions: &mut Vec<Action>) {
        debug_assert_eq!(Us::color(), self.side_to_move());
        let stones_left = Us::stones_left(self);
        if self.is_first_action() {
            if stones_left > 0 {
                for square in self.board().empty_squares() {
                    actions.push(Action::Place(Them::flat_piece(), square));
                }
            }
            return;
        }

        let caps_left = Us::caps_left(self);
        for square in self.board().empty_squares() {
            if stones_left > 0 {
                actions.push(Action::Place(Us::flat_piece(), square));
                actions.push(Action::Place(Us::wall_piece(), square));
            }
            if caps_left > 0 {
                actions.push(Action::Place(Us::cap_piece(), square));
            }
        }

        for square in self.board().squares() {
            let stack = &self.board()[square];
            match stack.top_stone() {
                Some(piece) if Us::piece_is_ours(piece) => (),
                _ => continue,
            }
            let max_pieces = stack.len().min(self.max_pickup());
            for direction in Direction::ALL {
                for pieces in 1..=max_pieces {
                    for drops in drop_order_table(pieces) {
                        if self.move_is_valid(square, direction, drops) {
                            actions.push(Action::Move(square, direction, drops.clone()));
                        }
                    }
                }
            }
        }
    }

    /// Whether `action` may be played in this position.
    /// Does not check whether the game has already ended.
    pub fn is_valid(&self, action: &Action) -> bool {
        match action {
            Action::Place(piece, square) => self.place_is_valid(*piece, *square),
            Action::Move(origin, direction, drops) => {
                self.move_is_valid(*origin, *direction, drops)
            }
        }
    }

    fn place_is_valid(&self, piece: Piece, square: Square) -> bool {
        if !square.is_on_board(self.size()) || !self.board()[square].is_empty() {
            return false;
        }
        let us = self.side_to_move();
        if self.is_first_action() {
            piece == Piece::from_role_color(Role::Flat, !us) && self.stones_left(us) > 0
        } else if piece.color() != us {
            false
        } else if piece.role() == Role::Cap {
            self.caps_left(us) > 0
        } else {
            self.stones_left(us) > 0
        }
    }

    fn move_is_valid(&self, origin: Square, direction: Direction, drops: &DropOrder) -> bool {
        let size = self.size();
        if self.is_first_action() || !origin.is_on_board(size) || drops.is_empty() {
            return false;
        }
        let stack = &self.board()[origin];
        let moving_piece = match stack.top_stone() {
            Some(piece) if piece.color() == self.side_to_move() => piece,
            _ => return false,
        };
        let pieces = drops.total();
        if pieces > stack.len() || pieces > self.max_pickup() {
            return false;
        }

        let last = drops.len() - 1;
        let mut square = origin;
        for (i, count) in drops.iter().enumerate() {
            square = match square.go_direction(direction, size) {
                Some(next) => next,
                None => return false,
            };
            match self.board()[square].top_stone().map(Piece::role) {
                None | Some(Role::Flat) => (),
                Some(Role::Cap) => return false,
                // Only a capstone travelling alone may land on a wall, flattening it
                Some(Role::Wall) => {
                    if i != last || count != 1 || moving_piece.role() != Role::Cap {
                        return false;
                    }
                }
            }
        }
        true
    }
}
