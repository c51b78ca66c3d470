use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use tunnelgrid_protocol::TileDto;
use uuid::Uuid;

use crate::{
    Coord2, DECK_CONFIGS, GameError, PathDescriptor, Result, SeededRng, TileKind, Turns,
    VEIN_SLOTS, VeinKind,
};

/// Derived state of one deck tile. Nothing but the placement DTOs and the
/// turn counter feeds this; every client computes the same value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileState {
    Unused,
    Drawn,
    Placed,
    Discarded,
}

impl Default for TileState {
    fn default() -> Self {
        Self::Unused
    }
}

impl TileState {
    pub const fn is_placed(self) -> bool {
        matches!(self, Self::Placed)
    }
}

/// One deck tile with its derived per-tick state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: Uuid,
    pub kind: TileKind,
    pub state: TileState,
    pub rotation: Turns,
    pub coords: Option<Coord2>,
}

impl Tile {
    fn new(id: Uuid, kind: TileKind) -> Self {
        Self {
            id,
            kind,
            state: TileState::Unused,
            rotation: 0,
            coords: None,
        }
    }

    pub fn rotated_path(&self) -> PathDescriptor {
        self.kind.base_path().rotated(self.rotation)
    }

    /// Re-derives this tile's state from the synchronized record (if any),
    /// the turn counter and the size of the drawn window.
    ///
    /// A placement record wins over everything and its rotation and
    /// coordinates are adopted; otherwise the deck position alone decides:
    /// before the game starts every tile is unused, afterwards the first
    /// `turn_index + drawn_window` deck positions have been drawn.
    pub fn apply(
        &mut self,
        dto: Option<&TileDto>,
        index: usize,
        turn_index: Option<u32>,
        drawn_window: usize,
    ) -> Result<()> {
        match dto {
            Some(dto) if dto.discarded => {
                self.state = TileState::Discarded;
                self.rotation = 0;
                self.coords = None;
            }
            Some(dto) => {
                let x = dto
                    .coordinate_x
                    .ok_or(GameError::MissingCoordinates(dto.id))?;
                let y = dto
                    .coordinate_y
                    .ok_or(GameError::MissingCoordinates(dto.id))?;
                self.state = TileState::Placed;
                self.rotation = dto.rotation.unwrap_or(0).rem_euclid(4);
                self.coords = Some((x, y));
            }
            None => {
                self.state = match turn_index {
                    Some(turn) if index < turn as usize + drawn_window => TileState::Drawn,
                    _ => TileState::Unused,
                };
                self.rotation = 0;
                self.coords = None;
            }
        }
        Ok(())
    }
}

/// Expands the deck table into a flat kind list, in table order. No
/// randomness enters here.
pub fn expand_deck() -> Vec<TileKind> {
    let mut kinds = Vec::new();
    for config in DECK_CONFIGS {
        for _ in 0..config.deck_count {
            kinds.push(config.kind);
        }
    }
    kinds
}

/// Builds the canonical session deck: expand, seeded shuffle, then one
/// seeded id per tile in final deck order. The stream layout is part of the
/// determinism contract (see [`SeededRng`]).
pub fn build_deck(seed: &str) -> Vec<Tile> {
    let mut rng = SeededRng::new(seed);
    let mut kinds = expand_deck();
    rng.shuffle(&mut kinds);
    kinds
        .into_iter()
        .map(|kind| Tile::new(rng.uuid(), kind))
        .collect()
}

/// Per-player hand size, tiered by player count.
pub const fn hand_size_for(player_count: usize) -> usize {
    if player_count <= 5 {
        6
    } else if player_count <= 7 {
        5
    } else {
        4
    }
}

/// Total number of tiles dealt when the game starts.
pub const fn opening_deal(player_count: usize) -> usize {
    hand_size_for(player_count) * player_count
}

/// Which player's hand a drawn deck position belongs to. Ownership is never
/// transmitted; deck position alone decides it, identically on every
/// client. `player_count` must be nonzero.
pub const fn hand_owner_of(index: usize, player_count: usize) -> usize {
    index % player_count
}

/// Seed-shuffled true identities of the three fixed vein slots.
pub fn vein_identities(seed: &str) -> [VeinKind; VEIN_SLOTS] {
    let mut identities = [VeinKind::Gold, VeinKind::Coal, VeinKind::Coal];
    SeededRng::new(seed).shuffle(&mut identities);
    identities
}
