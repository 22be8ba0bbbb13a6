//! Board geometry: sides, formation slots, and grid cells.
//!
//! The battlefield is a 3-row grid split down a vertical midline. Each side
//! fields up to nine units in a 3x3 formation. Slots are abstract formation
//! indices; cells are concrete board coordinates. All helpers here are pure.

use crate::config::BattleConfig;

/// Which roster a unit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    /// The opposing side.
    pub const fn opponent(self) -> Side {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }

    /// Both sides, ally first. Stable ordering matters for deterministic
    /// iteration.
    pub const BOTH: [Side; 2] = [Side::Ally, Side::Enemy];
}

/// Per-side storage addressed by [`Side`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerSide<T> {
    pub ally: T,
    pub enemy: T,
}

impl<T> PerSide<T> {
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Ally => &self.ally,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Ally => &mut self.ally,
            Side::Enemy => &mut self.enemy,
        }
    }
}

/// Abstract formation position within one side, 0..=8.
///
/// Slot `s` maps to file `s % 3` (0 = closest to the midline) and row
/// `s / 3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot(pub u8);

impl Slot {
    /// Iterates every slot in ascending order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..BattleConfig::SLOTS_PER_SIDE).map(Slot)
    }

    /// Row (cy) of this slot.
    pub const fn row(self) -> u8 {
        self.0 / BattleConfig::BOARD_COLS
    }

    /// File within the side: 0 is the column touching the midline.
    pub const fn file(self) -> u8 {
        self.0 % BattleConfig::BOARD_COLS
    }
}

/// A concrete board coordinate.
///
/// Ally columns are `cx` 0..=2 (2 touches the midline), enemy columns are
/// `cx` 3..=5 (3 touches the midline). Rows are `cy` 0..=2 on both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub cx: i8,
    pub cy: i8,
}

impl Cell {
    pub const fn new(cx: i8, cy: i8) -> Self {
        Self { cx, cy }
    }

    /// Manhattan distance between two cells.
    pub const fn manhattan(self, other: Cell) -> u32 {
        (self.cx - other.cx).unsigned_abs() as u32 + (self.cy - other.cy).unsigned_abs() as u32
    }

    /// Which side of the midline this cell lies on, if it is on the board.
    pub const fn side(self) -> Option<Side> {
        let cols = BattleConfig::BOARD_COLS as i8;
        let rows = BattleConfig::BOARD_ROWS as i8;
        if self.cy < 0 || self.cy >= rows || self.cx < 0 || self.cx >= cols * 2 {
            return None;
        }
        if self.cx < cols {
            Some(Side::Ally)
        } else {
            Some(Side::Enemy)
        }
    }
}

/// Maps a formation slot to its board cell.
pub const fn slot_to_cell(side: Side, slot: Slot) -> Cell {
    let cols = BattleConfig::BOARD_COLS as i8;
    let file = slot.file() as i8;
    let cy = slot.row() as i8;
    let cx = match side {
        // Ally file 0 sits at cx = cols - 1, directly on the midline.
        Side::Ally => cols - 1 - file,
        Side::Enemy => cols + file,
    };
    Cell { cx, cy }
}

/// Maps a board cell back to its side and formation slot.
pub const fn cell_to_slot(cell: Cell) -> Option<(Side, Slot)> {
    let cols = BattleConfig::BOARD_COLS as i8;
    let side = match cell.side() {
        Some(side) => side,
        None => return None,
    };
    let file = match side {
        Side::Ally => cols - 1 - cell.cx,
        Side::Enemy => cell.cx - cols,
    };
    Some((
        side,
        Slot((cell.cy as u8) * BattleConfig::BOARD_COLS + file as u8),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_cell_round_trip_on_both_sides() {
        for side in Side::BOTH {
            for slot in Slot::all() {
                let cell = slot_to_cell(side, slot);
                assert_eq!(cell_to_slot(cell), Some((side, slot)));
            }
        }
    }

    #[test]
    fn front_files_face_each_other_across_the_midline() {
        let ally_front = slot_to_cell(Side::Ally, Slot(0));
        let enemy_front = slot_to_cell(Side::Enemy, Slot(0));
        assert_eq!(ally_front, Cell::new(2, 0));
        assert_eq!(enemy_front, Cell::new(3, 0));
        assert_eq!(ally_front.manhattan(enemy_front), 1);
    }

    #[test]
    fn off_board_cells_have_no_side() {
        assert_eq!(Cell::new(-1, 0).side(), None);
        assert_eq!(Cell::new(6, 1).side(), None);
        assert_eq!(Cell::new(0, 3).side(), None);
    }
}
