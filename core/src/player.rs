use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SeededRng;

/// Hidden per-player role. The server never transmits roles; every client
/// derives the same assignment from the seed and the player order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Miner,
    Saboteur,
}

/// Number of distinct cosmetic profiles.
pub const PROFILE_COUNT: u8 = 4;

/// Unshuffled role list for a player count: the tiered saboteur quota
/// first, padded with miners.
pub fn roles_for(player_count: usize) -> Vec<Role> {
    let saboteurs = if player_count <= 4 {
        1
    } else if player_count <= 6 {
        2
    } else if player_count <= 9 {
        3
    } else {
        4
    };
    (0..player_count)
        .map(|i| if i < saboteurs { Role::Saboteur } else { Role::Miner })
        .collect()
}

/// Seed-shuffled roles; a player's role is this list indexed by their
/// order index.
pub fn assigned_roles(seed: &str, player_count: usize) -> Vec<Role> {
    let mut roles = roles_for(player_count);
    SeededRng::new(seed).shuffle(&mut roles);
    roles
}

/// Seed-shuffled cosmetic profile ids, cyclic over [0, PROFILE_COUNT)
/// before the shuffle, indexed by order index.
pub fn assigned_profiles(seed: &str, player_count: usize) -> Vec<u8> {
    let mut profiles: Vec<u8> = (0..player_count)
        .map(|i| (i % PROFILE_COUNT as usize) as u8)
        .collect();
    SeededRng::new(seed).shuffle(&mut profiles);
    profiles
}

/// Synchronized player data joined with the seed-derived role and profile.
/// Both stay `None` until the player has an order index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: Uuid,
    pub name: String,
    pub order_index: Option<u32>,
    pub role: Option<Role>,
    pub profile: Option<u8>,
}
