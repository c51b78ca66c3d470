use serde::{Deserialize, Serialize};

/// Single signed board axis. The board is unbounded and grows in every
/// direction from the start tile at the origin.
pub type Coord = i32;

/// Board coordinates `(x, y)`. `y` grows downward, matching the wire format.
pub type Coord2 = (Coord, Coord);

/// Packed map key for one board cell.
pub type CellKey = u64;

/// Quarter-turn count; any integer is accepted and normalized into [0,3].
pub type Turns = i32;

pub trait ToCellKey {
    fn to_cell_key(self) -> CellKey;
}

impl ToCellKey for Coord2 {
    fn to_cell_key(self) -> CellKey {
        ((self.0 as u32 as u64) << 32) | (self.1 as u32 as u64)
    }
}

/// Recovers the coordinates packed by [`ToCellKey`].
pub const fn from_cell_key(key: CellKey) -> Coord2 {
    (((key >> 32) as u32) as i32, (key as u32) as i32)
}

/// One of the four tile sides, in the same order the wire format lists
/// link bits: top, right, bottom, left.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    /// The side a neighbor presents back toward this tile.
    pub const fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    pub const fn offset(self) -> Coord2 {
        match self {
            Side::Top => (0, -1),
            Side::Right => (1, 0),
            Side::Bottom => (0, 1),
            Side::Left => (-1, 0),
        }
    }

    /// Coordinates of the neighbor cell across this side.
    pub const fn neighbor_of(self, (x, y): Coord2) -> Coord2 {
        let (dx, dy) = self.offset();
        (x + dx, y + dy)
    }
}
