use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use tunnelgrid_protocol::{DataDto, PlayerDto, SessionDto, TileDto};
use uuid::Uuid;

use crate::{
    CellKey, ConnectivityGrid, Coord, Coord2, GameError, PREPLACED_LAYOUT, PlacedPath,
    PlayerRecord, PreplacedSlot, Result, Tile, TileKind, TileState, ToCellKey, Turns, VeinKind,
    assigned_profiles, assigned_roles, build_deck, from_cell_key, hand_owner_of, opening_deal,
    vein_identities,
};

/// Result of feeding one sync payload to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    NoChange,
    Updated,
}

impl SyncOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Updated)
    }
}

/// Per-session rule engine. One instance is constructed per game session
/// and handed to consumers explicitly; it holds no ambient global state.
///
/// Everything inside is re-derived from scratch on every accepted sync
/// payload, except the two one-way latches: the win flag and the set of
/// revealed coal cells. Both only ever grow, matching the append-only
/// nature of the synchronized data itself.
#[derive(Clone, Debug, Default)]
pub struct SessionEngine {
    data: Option<DataDto>,
    deck_seed: Option<String>,
    deck: Vec<Tile>,
    players: Vec<PlayerRecord>,
    grid: ConnectivityGrid,
    gold_found: bool,
    revealed_coal: BTreeSet<CellKey>,
}

impl SessionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a fresh sync payload. Structurally identical payloads are
    /// ignored; anything else triggers a full recompute of the deck states,
    /// the player records and the connectivity grid.
    pub fn sync(&mut self, data: DataDto) -> Result<SyncOutcome> {
        if self.data.as_ref() == Some(&data) {
            return Ok(SyncOutcome::NoChange);
        }
        self.rebuild(&data)?;
        self.data = Some(data);
        Ok(SyncOutcome::Updated)
    }

    pub fn session(&self) -> Option<&SessionDto> {
        self.data.as_ref().map(|data| &data.session)
    }

    /// The full classified deck in canonical order.
    pub fn tiles(&self) -> &[Tile] {
        &self.deck
    }

    pub fn placed_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.deck.iter().filter(|tile| tile.state.is_placed())
    }

    /// Tiles currently in the hand of the player at `order_index`. Derived
    /// from deck position alone; the server never transmits hands.
    pub fn hand_of(&self, order_index: usize) -> impl Iterator<Item = &Tile> {
        let player_count = self.player_count();
        self.deck
            .iter()
            .enumerate()
            .filter(move |(index, tile)| {
                player_count != 0
                    && tile.state == TileState::Drawn
                    && hand_owner_of(*index, player_count) == order_index
            })
            .map(|(_, tile)| tile)
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// Every tile physically on the board: placed deck tiles plus the fixed
    /// layout with resolved vein slots. This is exactly what the grid is
    /// rebuilt from.
    pub fn all_in_world(&self) -> Vec<PlacedPath> {
        match self.session() {
            Some(session) => self.world_paths(session.seed.as_str()),
            None => Vec::new(),
        }
    }

    pub fn grid(&self) -> &ConnectivityGrid {
        &self.grid
    }

    /// UI gate for a placement drag: may the cell receive any tile at all.
    pub fn can_place_at(&self, x: Coord, y: Coord) -> bool {
        self.grid.is_adjacent(x, y)
    }

    /// UI gate for a drop: does this kind, rotated as dragged, fit here.
    pub fn placement_fits(&self, x: Coord, y: Coord, kind: TileKind, rotation: Turns) -> bool {
        self.grid.is_aligned(x, y, kind.base_path(), rotation)
    }

    /// Win latch: true once the path network has ever reached the gold vein.
    pub fn gold_found(&self) -> bool {
        self.gold_found
    }

    /// Coal cells revealed so far, in coordinate order.
    pub fn revealed_coal(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.revealed_coal.iter().map(|&key| from_cell_key(key))
    }

    fn player_count(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.players.len())
    }

    fn rebuild(&mut self, data: &DataDto) -> Result<()> {
        let seed = data.session.seed.as_str();
        if self.deck_seed.as_deref() != Some(seed) {
            self.deck = build_deck(seed);
            self.deck_seed = Some(String::from(seed));
        }

        let player_count = data.players.len();
        if player_count == 0 && data.session.turn_index.is_some() {
            log::warn!("sync payload carries a turn index but no players");
        }

        let mut records: HashMap<Uuid, &TileDto> = HashMap::with_capacity(data.tiles.len());
        for dto in &data.tiles {
            if !self.deck.iter().any(|tile| tile.id == dto.id) {
                return Err(GameError::UnknownTile(dto.id));
            }
            records.insert(dto.id, dto);
        }

        let window = opening_deal(player_count);
        for (index, tile) in self.deck.iter_mut().enumerate() {
            tile.apply(
                records.get(&tile.id).copied(),
                index,
                data.session.turn_index,
                window,
            )?;
        }

        self.players = Self::derive_players(seed, &data.players);

        let grid = ConnectivityGrid::build(&self.world_paths(seed))?;
        if grid.gold_reached() {
            self.gold_found = true;
        }
        for &coords in grid.coal_reached() {
            self.revealed_coal.insert(coords.to_cell_key());
        }
        self.grid = grid;
        Ok(())
    }

    fn derive_players(seed: &str, dtos: &[PlayerDto]) -> Vec<PlayerRecord> {
        let roles = assigned_roles(seed, dtos.len());
        let profiles = assigned_profiles(seed, dtos.len());
        dtos.iter()
            .map(|dto| {
                let order = dto.order_index.map(|i| i as usize);
                if order.is_some_and(|i| i >= dtos.len()) {
                    log::warn!("player {} has an out-of-range order index", dto.id);
                }
                PlayerRecord {
                    id: dto.id,
                    name: dto.name.clone(),
                    order_index: dto.order_index,
                    role: order.and_then(|i| roles.get(i).copied()),
                    profile: order.and_then(|i| profiles.get(i).copied()),
                }
            })
            .collect()
    }

    /// Everything the grid is built from: placed deck tiles plus the fixed
    /// layout, with vein slots resolved against the seed and already
    /// revealed coal re-entering as the blocking revealed variant.
    fn world_paths(&self, seed: &str) -> Vec<PlacedPath> {
        let identities = vein_identities(seed);
        let mut world = Vec::new();

        for pre in PREPLACED_LAYOUT {
            let path = match pre.slot {
                PreplacedSlot::Start => PlacedPath {
                    coords: pre.coords,
                    base: TileKind::Start.base_path(),
                    rotation: pre.rotation,
                    vein: None,
                },
                PreplacedSlot::Vein(_) if self.revealed_coal.contains(&pre.coords.to_cell_key()) => {
                    PlacedPath {
                        coords: pre.coords,
                        base: TileKind::CoalRevealed.base_path(),
                        rotation: pre.rotation,
                        vein: None,
                    }
                }
                PreplacedSlot::Vein(slot) => {
                    let kind = identities[slot];
                    let base = match kind {
                        VeinKind::Gold => TileKind::GoldVein.base_path(),
                        VeinKind::Coal => TileKind::CoalVein.base_path(),
                    };
                    PlacedPath {
                        coords: pre.coords,
                        base,
                        rotation: pre.rotation,
                        vein: Some(kind),
                    }
                }
            };
            world.push(path);
        }

        for tile in self.placed_tiles() {
            if let Some(coords) = tile.coords {
                world.push(PlacedPath {
                    coords,
                    base: tile.kind.base_path(),
                    rotation: tile.rotation,
                    vein: None,
                });
            }
        }
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use tunnelgrid_protocol::PlayerDto;

    const SEED: &str = "abc123";

    fn session(turn_index: Option<u32>) -> SessionDto {
        SessionDto {
            id: Uuid::from_u128(1),
            seed: SEED.to_string(),
            turn_index,
        }
    }

    fn players(count: usize) -> Vec<PlayerDto> {
        (0..count)
            .map(|i| PlayerDto {
                id: Uuid::from_u128(100 + i as u128),
                name: "player".to_string(),
                order_index: Some(i as u32),
            })
            .collect()
    }

    fn placed_dto(id: Uuid, rotation: i32, coords: Coord2) -> TileDto {
        TileDto {
            id,
            rotation: Some(rotation),
            coordinate_x: Some(coords.0),
            coordinate_y: Some(coords.1),
            discarded: false,
        }
    }

    /// Pulls deck tiles of horizontally open kinds and lays them in a
    /// corridor from the start toward the vein column.
    fn corridor_dtos(deck: &[Tile], row: Coord) -> Vec<TileDto> {
        let mut dtos = Vec::new();
        let mut x = 1;
        for tile in deck {
            if x > 7 {
                break;
            }
            // crosses stay reserved for the vertical step-over columns
            let open_through = matches!(
                tile.kind,
                TileKind::StraightHorizontal | TileKind::TeeSouth
            );
            if open_through {
                dtos.push(placed_dto(tile.id, 0, (x, row)));
                x += 1;
            }
        }
        assert_eq!(x, 8, "not enough horizontally open tiles in the deck");
        dtos
    }

    #[test]
    fn identical_payloads_are_ignored() {
        let mut engine = SessionEngine::new();
        let data = DataDto {
            session: session(None),
            players: players(2),
            tiles: vec![],
        };

        assert!(engine.sync(data.clone()).unwrap().has_update());
        assert_eq!(engine.sync(data).unwrap(), SyncOutcome::NoChange);
    }

    #[test]
    fn before_the_first_turn_every_tile_is_unused() {
        let mut engine = SessionEngine::new();
        engine
            .sync(DataDto {
                session: session(None),
                players: players(3),
                tiles: vec![],
            })
            .unwrap();

        assert_eq!(engine.tiles().len(), 44);
        assert!(engine
            .tiles()
            .iter()
            .all(|tile| tile.state == TileState::Unused));
        // the fixed layout alone already answers placement queries
        assert!(engine.can_place_at(0, -1));
        assert!(engine.placement_fits(0, -1, TileKind::StraightVertical, 0));
    }

    #[test]
    fn hands_cover_the_drawn_set_without_overlap() {
        let mut engine = SessionEngine::new();
        engine
            .sync(DataDto {
                session: session(Some(2)),
                players: players(4),
                tiles: vec![],
            })
            .unwrap();

        let drawn: Vec<Uuid> = engine
            .tiles()
            .iter()
            .filter(|t| t.state == TileState::Drawn)
            .map(|t| t.id)
            .collect();
        assert_eq!(drawn.len(), opening_deal(4) + 2);

        let mut seen: Vec<Uuid> = Vec::new();
        for order in 0..4 {
            for tile in engine.hand_of(order) {
                assert!(!seen.contains(&tile.id), "tile in two hands");
                seen.push(tile.id);
            }
        }
        assert_eq!(seen.len(), drawn.len());
        assert!(drawn.iter().all(|id| seen.contains(id)));
    }

    #[test]
    fn players_get_seeded_roles_and_profiles() {
        let mut engine = SessionEngine::new();
        engine
            .sync(DataDto {
                session: session(Some(0)),
                players: players(5),
                tiles: vec![],
            })
            .unwrap();

        let saboteurs = engine
            .players()
            .iter()
            .filter(|p| p.role == Some(crate::Role::Saboteur))
            .count();
        assert_eq!(saboteurs, 2);
        assert!(engine
            .players()
            .iter()
            .all(|p| p.profile.is_some_and(|id| id < crate::PROFILE_COUNT)));
    }

    #[test]
    fn a_placement_record_enters_the_grid() {
        let mut engine = SessionEngine::new();
        let deck = build_deck(SEED);
        let vertical = deck
            .iter()
            .find(|t| t.kind == TileKind::StraightVertical)
            .unwrap();

        engine
            .sync(DataDto {
                session: session(Some(0)),
                players: players(2),
                tiles: vec![placed_dto(vertical.id, 0, (0, -1))],
            })
            .unwrap();

        let placed: Vec<&Tile> = engine.placed_tiles().collect();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].coords, Some((0, -1)));
        assert!(engine.grid().is_reachable(0, -1));
        assert!(engine.can_place_at(0, -2));
        assert!(engine.placement_fits(0, -2, TileKind::StraightVertical, 0));
        // the world view carries the fixed layout plus the one placement
        assert_eq!(engine.all_in_world().len(), PREPLACED_LAYOUT.len() + 1);
    }

    #[test]
    fn unknown_tile_records_are_rejected() {
        let mut engine = SessionEngine::new();
        let bogus = Uuid::from_u128(0xdead_beef);

        let result = engine.sync(DataDto {
            session: session(Some(0)),
            players: players(2),
            tiles: vec![placed_dto(bogus, 0, (0, -1))],
        });

        assert_eq!(result.unwrap_err(), GameError::UnknownTile(bogus));
    }

    #[test]
    fn reaching_the_gold_vein_latches_the_win() {
        // aim the corridor at whichever slot the seed made gold
        let identities = vein_identities(SEED);
        let gold_slot = identities
            .iter()
            .position(|&v| v == VeinKind::Gold)
            .unwrap();
        let gold_coords = PREPLACED_LAYOUT[1 + gold_slot].coords;
        assert_eq!(gold_coords.0, 8);

        // the fixed layout only puts veins on row 0 reachable straight; for
        // the offset rows, walk the corridor on the vein's own row and step
        // over from the start with vertical tiles
        let deck = build_deck(SEED);
        let mut dtos = corridor_dtos(&deck, gold_coords.1);
        if gold_coords.1 != 0 {
            let used: Vec<Uuid> = dtos.iter().map(|d| d.id).collect();
            let mut y = 0;
            let step = if gold_coords.1 > 0 { 1 } else { -1 };
            for tile in &deck {
                if y == gold_coords.1 {
                    break;
                }
                if used.contains(&tile.id) {
                    continue;
                }
                if tile.kind == TileKind::Cross {
                    dtos.push(placed_dto(tile.id, 0, (0, y + step)));
                    y += step;
                }
            }
            assert_eq!(y, gold_coords.1, "not enough cross tiles for the step-over");
            // bridge from the step-over column into the corridor row
            assert!(dtos.iter().any(|d| d.coordinate_y == Some(gold_coords.1)));
        }

        let mut engine = SessionEngine::new();
        engine
            .sync(DataDto {
                session: session(Some(0)),
                players: players(2),
                tiles: dtos.clone(),
            })
            .unwrap();

        assert!(engine.gold_found());
        assert_eq!(engine.revealed_coal().count(), 0);

        // the latch survives later unrelated placements
        let used: Vec<Uuid> = dtos.iter().map(|d| d.id).collect();
        let spare = deck.iter().find(|t| !used.contains(&t.id)).unwrap();
        dtos.push(placed_dto(spare.id, 0, (-1, 0)));
        engine
            .sync(DataDto {
                session: session(Some(1)),
                players: players(2),
                tiles: dtos,
            })
            .unwrap();
        assert!(engine.gold_found());
    }

    #[test]
    fn reached_coal_stays_revealed_and_blocks() {
        let identities = vein_identities(SEED);
        let coal_slot = identities
            .iter()
            .position(|&v| v == VeinKind::Coal)
            .unwrap();
        let coal_coords = PREPLACED_LAYOUT[1 + coal_slot].coords;

        // build the corridor on row 0 only when the coal actually sits there;
        // otherwise reuse the same step-over construction as the gold test
        if coal_coords.1 != 0 {
            return reached_coal_offset_row(coal_coords);
        }

        let deck = build_deck(SEED);
        let mut dtos = corridor_dtos(&deck, 0);
        let mut engine = SessionEngine::new();
        engine
            .sync(DataDto {
                session: session(Some(0)),
                players: players(2),
                tiles: dtos.clone(),
            })
            .unwrap();

        assert!(!engine.gold_found());
        assert!(engine.revealed_coal().any(|c| c == coal_coords));
        // the revealed vein re-enters the grid as a dead end: the cell past
        // it is adjacent but never placeable
        assert!(engine.can_place_at(9, 0));
        assert!(!engine.placement_fits(9, 0, TileKind::Cross, 0));

        // latch survives further syncs
        let used: Vec<Uuid> = dtos.iter().map(|d| d.id).collect();
        let spare = deck.iter().find(|t| !used.contains(&t.id)).unwrap();
        dtos.push(placed_dto(spare.id, 0, (-1, 0)));
        engine
            .sync(DataDto {
                session: session(Some(1)),
                players: players(2),
                tiles: dtos,
            })
            .unwrap();
        assert!(engine.revealed_coal().any(|c| c == coal_coords));
    }

    fn reached_coal_offset_row(coal_coords: Coord2) {
        let deck = build_deck(SEED);
        let mut dtos = corridor_dtos(&deck, coal_coords.1);
        let used: Vec<Uuid> = dtos.iter().map(|d| d.id).collect();
        let mut y = 0;
        let step = if coal_coords.1 > 0 { 1 } else { -1 };
        for tile in &deck {
            if y == coal_coords.1 {
                break;
            }
            if used.contains(&tile.id) {
                continue;
            }
            if tile.kind == TileKind::Cross {
                dtos.push(placed_dto(tile.id, 0, (0, y + step)));
                y += step;
            }
        }
        assert_eq!(y, coal_coords.1);

        let mut engine = SessionEngine::new();
        engine
            .sync(DataDto {
                session: session(Some(0)),
                players: players(2),
                tiles: dtos,
            })
            .unwrap();

        assert!(engine.revealed_coal().any(|c| c == coal_coords));
    }
}
