//! Collision checks for pieces against a board.

use crate::board::Board;
use crate::piece::Piece;

/// Whether `piece`, translated by `(dx, dy)`, may sit on `board`.
///
/// Only filled template cells are checked. Cells above the top edge
/// (`y < 0`) are ignored so pieces can spawn partly off-screen; every other
/// filled cell must be inside the board and on a blank cell.
pub fn is_valid(board: &Board, piece: &Piece, dx: i32, dy: i32) -> bool {
    piece.cells_at(dx, dy).all(|(x, y)| {
        y < 0 || matches!(board.get(x, y), Some(cell) if cell.is_blank())
    })
}

/// Largest `dy >= 0` at which the piece is still valid, or `None` if it is
/// not valid where it stands.
pub fn drop_distance(board: &Board, piece: &Piece) -> Option<i32> {
    if !is_valid(board, piece, 0, 0) {
        return None;
    }
    let mut dy = 0;
    while is_valid(board, piece, 0, dy + 1) {
        dy += 1;
    }
    Some(dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, ShapeId};

    #[test]
    fn cells_above_board_are_not_checked() {
        let board = Board::new(10, 20);
        // Vertical I at y=-3 has only its bottom cell on the board.
        let piece = Piece::new(ShapeId::I, 0, 4, -3, 0);
        assert!(is_valid(&board, &piece, 0, 0));
        // Even fully above and off to the side it is accepted.
        let above = Piece::new(ShapeId::I, 0, 20, -10, 0);
        assert!(is_valid(&board, &above, 0, 0));
    }

    #[test]
    fn walls_and_floor_reject() {
        let board = Board::new(10, 20);
        // Horizontal I spans template columns 0..=3.
        let piece = Piece::new(ShapeId::I, 1, 0, 0, 0);
        assert!(is_valid(&board, &piece, 0, 0));
        assert!(!is_valid(&board, &piece, -1, 0));
        assert!(is_valid(&board, &piece, 6, 0));
        assert!(!is_valid(&board, &piece, 7, 0));
        // Row 2 of the template must stay above row 20.
        assert!(is_valid(&board, &piece, 0, 17));
        assert!(!is_valid(&board, &piece, 0, 18));
    }

    #[test]
    fn only_blank_board_cells_accept() {
        let mut board = Board::new(10, 20);
        let piece = Piece::new(ShapeId::O, 0, 0, 0, 0);
        board.set(1, 2, Cell::Filled(3));
        assert!(!is_valid(&board, &piece, 0, 0));
        board.set(1, 2, Cell::Poison);
        assert!(!is_valid(&board, &piece, 0, 0));
        board.set(1, 2, Cell::Blank);
        assert!(is_valid(&board, &piece, 0, 0));
    }

    #[test]
    fn drop_distance_lands_on_floor() {
        let board = Board::new(10, 20);
        let piece = Piece::new(ShapeId::I, 0, 4, -2, 0);
        // Bottom template row is 3: 19 - 3 - (-2) = 18.
        assert_eq!(drop_distance(&board, &piece), Some(18));
    }
}
