use alloc::collections::VecDeque;
use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::{
    CellKey, Coord, Coord2, GameError, Link, PathDescriptor, Reachability, Result, Side, ToCellKey,
    Turns, VeinKind,
};

/// One tile fed into a grid build: base descriptor plus the rotation the
/// grid applies itself. `vein` marks the hidden fixed tiles, which are
/// excluded from ordinary reachability propagation and evaluated last.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlacedPath {
    pub coords: Coord2,
    pub base: PathDescriptor,
    pub rotation: Turns,
    pub vein: Option<VeinKind>,
}

/// One grid cell. Either a real tile sits here (`occupied`) or this is a
/// requirement template describing what a future tile must look like to
/// fit; never both.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub path: PathDescriptor,
    pub occupied: bool,
    pub reachable: Reachability,
    pub vein: Option<VeinKind>,
}

impl GridCell {
    fn template() -> Self {
        Self {
            path: PathDescriptor::unconstrained(),
            occupied: false,
            reachable: Reachability::No,
            vein: None,
        }
    }
}

/// Coordinate→cell map rebuilt wholesale from the currently placed tiles
/// whenever placement data changes. Answers the two placement queries and
/// carries the per-build vein findings.
#[derive(Clone, Debug, Default)]
pub struct ConnectivityGrid {
    cells: HashMap<CellKey, GridCell>,
    gold_reached: bool,
    coal_reached: Vec<Coord2>,
}

impl ConnectivityGrid {
    /// Builds the full grid: writes every tile and its four requirement
    /// templates, runs start-reachability propagation, then evaluates the
    /// vein cells. There is no partial success; the first inconsistent
    /// input aborts the build.
    pub fn build(tiles: &[PlacedPath]) -> Result<Self> {
        let mut grid = Self::default();
        for tile in tiles {
            grid.write_tile(tile)?;
        }
        grid.propagate();
        grid.scan_veins();
        Ok(grid)
    }

    /// True iff the cell is empty but touches at least one placed tile.
    pub fn is_adjacent(&self, x: Coord, y: Coord) -> bool {
        self.cells
            .get(&(x, y).to_cell_key())
            .is_some_and(|cell| !cell.occupied)
    }

    /// Whether a candidate tile, rotated as requested, fits the cell at
    /// `(x, y)`: every constrained template side must match exactly, the
    /// path network must already reach the cell, and at least one side must
    /// form a real Open–Open connection.
    pub fn is_aligned(&self, x: Coord, y: Coord, base: PathDescriptor, rotation: Turns) -> bool {
        let Some(cell) = self.cells.get(&(x, y).to_cell_key()) else {
            return false;
        };
        if cell.occupied || !cell.reachable.is_yes() {
            return false;
        }

        let candidate = base.rotated(rotation);
        let mut connections = 0;
        for side in Side::ALL {
            let required = cell.path.side(side);
            let offered = candidate.side(side);
            if !required.accepts(offered) {
                return false;
            }
            if required.is_open() && offered.is_open() {
                connections += 1;
            }
        }
        connections > 0
    }

    pub fn is_reachable(&self, x: Coord, y: Coord) -> bool {
        self.cells
            .get(&(x, y).to_cell_key())
            .is_some_and(|cell| cell.reachable.is_yes())
    }

    pub fn cell(&self, coords: Coord2) -> Option<&GridCell> {
        self.cells.get(&coords.to_cell_key())
    }

    /// Whether this build connected the gold vein to the start.
    pub fn gold_reached(&self) -> bool {
        self.gold_reached
    }

    /// Coal veins this build connected to the start, in coordinate order.
    pub fn coal_reached(&self) -> &[Coord2] {
        &self.coal_reached
    }

    fn write_tile(&mut self, tile: &PlacedPath) -> Result<()> {
        let path = tile.base.rotated(tile.rotation);
        let key = tile.coords.to_cell_key();

        if self.cells.get(&key).is_some_and(|cell| cell.occupied) {
            return Err(GameError::OccupiedCell(tile.coords));
        }
        // a real tile supersedes any requirement template at its cell
        self.cells.insert(
            key,
            GridCell {
                path,
                occupied: true,
                reachable: Reachability::No,
                vein: tile.vein,
            },
        );

        for side in Side::ALL {
            let neighbor_coords = side.neighbor_of(tile.coords);
            let entry = self
                .cells
                .entry(neighbor_coords.to_cell_key())
                .or_insert_with(GridCell::template);
            if entry.occupied {
                continue;
            }

            // my side constrains the neighbor's mirrored side
            let required = path.side(side);
            let slot = entry.path.side_mut(side.opposite());
            match *slot {
                Link::Wildcard => *slot = required,
                existing if existing == required => {}
                _ => return Err(GameError::InconsistentRequirement(neighbor_coords)),
            }
            // template center records whether any neighbor could feed a
            // path into this cell: sticky once Open
            if entry.path.center != Link::Open {
                entry.path.center = path.center;
            }
        }
        Ok(())
    }

    /// Worklist traversal from the origin. Marks every occupied cell the
    /// path network connects to the start, and every empty template cell an
    /// Open link feeds into. Hidden veins neither propagate nor get marked
    /// here; `scan_veins` handles them afterwards.
    fn propagate(&mut self) {
        let start_key: CellKey = (0, 0).to_cell_key();
        match self.cells.get_mut(&start_key) {
            Some(start) if start.occupied => start.reachable.mark_yes(),
            _ => return,
        }

        let mut worklist = VecDeque::from([(0, 0)]);
        while let Some(coords) = worklist.pop_front() {
            let cell = self.cells[&coords.to_cell_key()];
            if !cell.path.center.is_open() {
                continue;
            }
            for side in Side::ALL {
                if !cell.path.side(side).is_open() {
                    continue;
                }
                let neighbor_coords = side.neighbor_of(coords);
                let Some(neighbor) = self.cells.get_mut(&neighbor_coords.to_cell_key()) else {
                    continue;
                };
                if neighbor.vein.is_some() || neighbor.reachable.is_yes() {
                    continue;
                }
                if neighbor.occupied {
                    if neighbor.path.side(side.opposite()).is_open() {
                        neighbor.reachable.mark_yes();
                        worklist.push_back(neighbor_coords);
                    }
                } else {
                    // an empty cell an Open link feeds; placement may grow here
                    neighbor.reachable.mark_yes();
                }
            }
        }
    }

    /// Evaluated after ordinary propagation: a vein is reached once any
    /// occupied non-vein neighbor with an Open center and an Open side
    /// toward it reports reachability.
    fn scan_veins(&mut self) {
        let veins: Vec<(Coord2, CellKey, VeinKind)> = self
            .cells
            .iter()
            .filter_map(|(&key, cell)| {
                cell.vein
                    .map(|kind| (crate::from_cell_key(key), key, kind))
            })
            .collect();

        for (coords, key, kind) in veins {
            let reached = Side::ALL.iter().any(|&side| {
                let neighbor_coords = side.neighbor_of(coords);
                self.cells
                    .get(&neighbor_coords.to_cell_key())
                    .is_some_and(|n| {
                        n.occupied
                            && n.vein.is_none()
                            && n.reachable.is_yes()
                            && n.path.center.is_open()
                            && n.path.side(side.opposite()).is_open()
                    })
            });
            if !reached {
                continue;
            }

            if let Some(cell) = self.cells.get_mut(&key) {
                cell.reachable.mark_yes();
            }
            match kind {
                VeinKind::Gold => self.gold_reached = true,
                VeinKind::Coal => self.coal_reached.push(coords),
            }
        }
        // map iteration order must not leak into the result
        self.coal_reached.sort_unstable();
    }
}
