//! Wire DTOs shared between the rule engine and the transport layer.
//!
//! Field names follow the server's JSON (camelCase). All types derive
//! `PartialEq` because the engine detects sync updates by structural
//! comparison against the previous payload.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full synchronized snapshot delivered on every sync tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataDto {
    pub session: SessionDto,
    pub players: Vec<PlayerDto>,
    pub tiles: Vec<TileDto>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: Uuid,
    pub seed: String,
    /// `None` until the game has started.
    pub turn_index: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: Uuid,
    pub name: String,
    /// Position in the seeded deal order, `None` before the deal.
    pub order_index: Option<u32>,
}

/// One record per tile the server knows to be placed or discarded.
///
/// Tiles never leave this list once they enter it; the engine derives every
/// other tile's state from the deck position alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDto {
    pub id: Uuid,
    pub rotation: Option<i32>,
    pub coordinate_x: Option<i32>,
    pub coordinate_y: Option<i32>,
    #[serde(default)]
    pub discarded: bool,
}

/// Outbound payload for joining a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDto {
    pub session_id: Uuid,
    pub player_name: String,
}

/// Outbound payload for placing or discarding a tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceTileDto {
    pub id: Uuid,
    pub session_id: Uuid,
    pub rotation: i32,
    pub coordinate_x: Option<i32>,
    pub coordinate_y: Option<i32>,
    #[serde(default)]
    pub discarded: bool,
}
