//! Shape catalog - the fixed tetromino templates and their rotation states
//!
//! Every rotation is a `TEMPLATE_SIZE` x `TEMPLATE_SIZE` matrix written row by
//! row, top to bottom: `.` is blank, `O` is filled and `x` is poison.
//! Rotation indices wrap, so `rotation_count` steps in one direction always
//! return to the starting state.

use crate::types::{Cell, ShapeId, TEMPLATE_SIZE};

/// One rotation state, one byte string per row.
pub type Template = [&'static [u8; TEMPLATE_SIZE]; TEMPLATE_SIZE];

const S_ROTATIONS: [Template; 2] = [
    [b".....", b".....", b"..OO.", b".OO..", b"....."],
    [b".....", b"..O..", b"..OO.", b"...O.", b"....."],
];

const Z_ROTATIONS: [Template; 2] = [
    [b".....", b".....", b".OO..", b"..OO.", b"....."],
    [b".....", b"..O..", b".OO..", b".O...", b"....."],
];

const I_ROTATIONS: [Template; 2] = [
    [b"..O..", b"..O..", b"..O..", b"..O..", b"....."],
    [b".....", b".....", b"OOOO.", b".....", b"....."],
];

const O_ROTATIONS: [Template; 1] = [[b".....", b".....", b".OO..", b".OO..", b"....."]];

const J_ROTATIONS: [Template; 4] = [
    [b".....", b".O...", b".OOO.", b".....", b"....."],
    [b".....", b"..OO.", b"..O..", b"..O..", b"....."],
    [b".....", b".....", b".OOO.", b"...O.", b"....."],
    [b".....", b"..O..", b"..O..", b".OO..", b"....."],
];

const L_ROTATIONS: [Template; 4] = [
    [b".....", b"...O.", b".OOO.", b".....", b"....."],
    [b".....", b"..O..", b"..O..", b"..OO.", b"....."],
    [b".....", b".....", b".OOO.", b".O...", b"....."],
    [b".....", b".OO..", b"..O..", b"..O..", b"....."],
];

const T_ROTATIONS: [Template; 4] = [
    [b".....", b"..O..", b".OOO.", b".....", b"....."],
    [b".....", b"..O..", b"..OO.", b"..O..", b"....."],
    [b".....", b".....", b".OOO.", b"..O..", b"....."],
    [b".....", b"..O..", b".OO..", b"..O..", b"....."],
];

/// All rotation states of `shape`, in clockwise order.
pub fn rotations(shape: ShapeId) -> &'static [Template] {
    match shape {
        ShapeId::S => &S_ROTATIONS,
        ShapeId::Z => &Z_ROTATIONS,
        ShapeId::I => &I_ROTATIONS,
        ShapeId::O => &O_ROTATIONS,
        ShapeId::J => &J_ROTATIONS,
        ShapeId::L => &L_ROTATIONS,
        ShapeId::T => &T_ROTATIONS,
    }
}

/// Number of distinct rotation states of `shape` (always at least 1).
pub fn rotation_count(shape: ShapeId) -> u8 {
    rotations(shape).len() as u8
}

/// Marker at template column `x`, row `y` of the given rotation.
///
/// # Panics
///
/// Panics if `rotation`, `x` or `y` is out of range. Callers normalise
/// rotations with [`next_rotation`]/[`prev_rotation`].
pub fn cell(shape: ShapeId, rotation: u8, x: usize, y: usize) -> Cell {
    let states = rotations(shape);
    assert!(
        (rotation as usize) < states.len(),
        "rotation {rotation} out of range for shape {shape:?}"
    );
    match states[rotation as usize][y][x] {
        b'O' => Cell::Filled(0),
        b'x' => Cell::Poison,
        _ => Cell::Blank,
    }
}

/// Rotation index one step clockwise.
pub fn next_rotation(shape: ShapeId, rotation: u8) -> u8 {
    (rotation + 1) % rotation_count(shape)
}

/// Rotation index one step counter-clockwise.
pub fn prev_rotation(shape: ShapeId, rotation: u8) -> u8 {
    let count = rotation_count(shape);
    (rotation + count - 1) % count
}

/// Template coordinates of every filled cell, row-major.
pub fn filled_cells(shape: ShapeId, rotation: u8) -> impl Iterator<Item = (usize, usize)> {
    (0..TEMPLATE_SIZE).flat_map(move |y| {
        (0..TEMPLATE_SIZE)
            .filter(move |&x| cell(shape, rotation, x, y).is_filled())
            .map(move |x| (x, y))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_four_cells_per_rotation() {
        for shape in ShapeId::ALL {
            for r in 0..rotation_count(shape) {
                assert_eq!(filled_cells(shape, r).count(), 4, "{shape:?} rotation {r}");
            }
        }
    }

    #[test]
    fn rotation_counts_match_classic_set() {
        assert_eq!(rotation_count(ShapeId::S), 2);
        assert_eq!(rotation_count(ShapeId::Z), 2);
        assert_eq!(rotation_count(ShapeId::I), 2);
        assert_eq!(rotation_count(ShapeId::O), 1);
        assert_eq!(rotation_count(ShapeId::J), 4);
        assert_eq!(rotation_count(ShapeId::L), 4);
        assert_eq!(rotation_count(ShapeId::T), 4);
    }

    #[test]
    fn templates_are_read_row_by_row() {
        // Vertical I occupies column 2, rows 0..=3.
        for y in 0..4 {
            assert!(cell(ShapeId::I, 0, 2, y).is_filled());
        }
        assert!(cell(ShapeId::I, 0, 2, 4).is_blank());
        // Horizontal I occupies row 2, columns 0..=3.
        for x in 0..4 {
            assert!(cell(ShapeId::I, 1, x, 2).is_filled());
        }
    }

    #[test]
    fn prev_undoes_next() {
        for shape in ShapeId::ALL {
            for r in 0..rotation_count(shape) {
                assert_eq!(prev_rotation(shape, next_rotation(shape, r)), r);
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_rotation_panics() {
        let _ = cell(ShapeId::O, 1, 0, 0);
    }
}
