use thiserror::Error;

use crate::Coord2;

/// Data-corruption errors. Every variant means the external sync layer
/// delivered inconsistent data, not that a player tried an illegal move;
/// illegal moves are plain `false` answers from the grid queries.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("tile record {0} does not match any derived deck tile")]
    UnknownTile(uuid::Uuid),
    #[error("placed tile {0} is missing coordinates")]
    MissingCoordinates(uuid::Uuid),
    #[error("two placed tiles claim the cell at {0:?}")]
    OccupiedCell(Coord2),
    #[error("conflicting path requirements accumulated at {0:?}")]
    InconsistentRequirement(Coord2),
}

pub type Result<T> = core::result::Result<T, GameError>;
