//! Shared rule engine for a tile-laying path game.
//!
//! Every client holds the same session seed and the same synchronized
//! placement data, and must derive bit-for-bit identical answers: the deck
//! order, each tile's state, who holds which hand, which cells accept a
//! tile, and whether the path network has reached a vein. The engine is
//! pure and synchronous; transport, rendering and turn arbitration live
//! elsewhere and only feed it DTOs.

#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use deck::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use player::*;
pub use random::*;
pub use tile::*;
pub use types::*;

mod deck;
mod engine;
mod error;
mod grid;
mod player;
mod random;
mod tile;
mod types;

/// Identity of every tile shape in the game, deck and fixed tiles alike.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Fixed all-open tile at the origin; reachability grows outward from it.
    Start,
    Cross,
    StraightVertical,
    StraightHorizontal,
    /// Vertical run with a branch to the right.
    TeeEast,
    /// Horizontal run with a branch downward.
    TeeSouth,
    ElbowNorthEast,
    ElbowNorthWest,
    ElbowSouthEast,
    DeadEndNorth,
    DeadEndCross,
    DeadEndVertical,
    DeadEndHorizontal,
    DeadEndTeeEast,
    DeadEndElbowNorthEast,
    /// Hidden goal tile; presents all-open sides until identified.
    GoldVein,
    /// Hidden decoy tile; presents all-open sides until revealed.
    CoalVein,
    /// A coal vein after the path reached it: a blocking dead end.
    CoalRevealed,
}

impl TileKind {
    /// Base path descriptor before rotation.
    pub const fn base_path(self) -> PathDescriptor {
        use Link::{Blocked as B, Open as O};
        use TileKind::*;
        match self {
            Start | Cross | GoldVein | CoalVein => PathDescriptor::new(O, O, O, O, O),
            StraightVertical => PathDescriptor::new(O, B, O, B, O),
            StraightHorizontal => PathDescriptor::new(B, O, B, O, O),
            TeeEast => PathDescriptor::new(O, O, O, B, O),
            TeeSouth => PathDescriptor::new(B, O, O, O, O),
            ElbowNorthEast => PathDescriptor::new(O, O, B, B, O),
            ElbowNorthWest => PathDescriptor::new(O, B, B, O, O),
            ElbowSouthEast => PathDescriptor::new(B, O, O, B, O),
            DeadEndNorth => PathDescriptor::new(O, B, B, B, B),
            DeadEndCross | CoalRevealed => PathDescriptor::new(O, O, O, O, B),
            DeadEndVertical => PathDescriptor::new(O, B, O, B, B),
            DeadEndHorizontal => PathDescriptor::new(B, O, B, O, B),
            DeadEndTeeEast => PathDescriptor::new(O, O, O, B, B),
            DeadEndElbowNorthEast => PathDescriptor::new(O, O, B, B, B),
        }
    }

    pub const fn is_vein(self) -> bool {
        matches!(self, TileKind::GoldVein | TileKind::CoalVein)
    }
}

/// Deck composition entry: how many copies of one shape the deck holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConfig {
    pub kind: TileKind,
    pub deck_count: u8,
}

const fn cfg(kind: TileKind, deck_count: u8) -> TileConfig {
    TileConfig { kind, deck_count }
}

/// Static deck table. Expansion order is exactly this order; only the
/// seeded shuffle afterwards introduces randomness.
pub const DECK_CONFIGS: [TileConfig; 14] = [
    cfg(TileKind::Cross, 5),
    cfg(TileKind::StraightVertical, 4),
    cfg(TileKind::StraightHorizontal, 4),
    cfg(TileKind::TeeEast, 5),
    cfg(TileKind::TeeSouth, 5),
    cfg(TileKind::ElbowNorthEast, 5),
    cfg(TileKind::ElbowNorthWest, 5),
    cfg(TileKind::ElbowSouthEast, 5),
    cfg(TileKind::DeadEndNorth, 1),
    cfg(TileKind::DeadEndCross, 1),
    cfg(TileKind::DeadEndVertical, 1),
    cfg(TileKind::DeadEndHorizontal, 1),
    cfg(TileKind::DeadEndTeeEast, 1),
    cfg(TileKind::DeadEndElbowNorthEast, 1),
];

/// True identity of a vein slot, assigned per session from the seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VeinKind {
    Gold,
    Coal,
}

/// What occupies a fixed board position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreplacedSlot {
    Start,
    /// Index into the seed-shuffled vein identity list.
    Vein(usize),
}

/// Fixed-position tile: the start tile plus the three hidden vein slots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreplacedTile {
    pub slot: PreplacedSlot,
    pub rotation: Turns,
    pub coords: Coord2,
}

pub const VEIN_SLOTS: usize = 3;

pub const PREPLACED_LAYOUT: [PreplacedTile; 1 + VEIN_SLOTS] = [
    PreplacedTile {
        slot: PreplacedSlot::Start,
        rotation: 0,
        coords: (0, 0),
    },
    PreplacedTile {
        slot: PreplacedSlot::Vein(0),
        rotation: 0,
        coords: (8, -2),
    },
    PreplacedTile {
        slot: PreplacedSlot::Vein(1),
        rotation: 0,
        coords: (8, 0),
    },
    PreplacedTile {
        slot: PreplacedSlot::Vein(2),
        rotation: 0,
        coords: (8, 2),
    },
];
