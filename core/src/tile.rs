use serde::{Deserialize, Serialize};

use crate::{Side, Turns};

/// Traversability of one tile side or center.
///
/// `Wildcard` never appears on a real tile; it is the "unconstrained" value
/// in requirement templates for empty cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Link {
    Blocked,
    Open,
    Wildcard,
}

impl Link {
    /// Template-side match: a wildcard requirement accepts anything, a
    /// concrete requirement accepts only an exact match.
    pub const fn accepts(self, candidate: Link) -> bool {
        matches!(self, Link::Wildcard) || (self as u8) == (candidate as u8)
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Link::Open)
    }
}

impl Default for Link {
    fn default() -> Self {
        Self::Wildcard
    }
}

/// Which of a tile's four sides plus center are traversable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathDescriptor {
    pub top: Link,
    pub right: Link,
    pub bottom: Link,
    pub left: Link,
    pub center: Link,
}

impl PathDescriptor {
    pub const fn new(top: Link, right: Link, bottom: Link, left: Link, center: Link) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
            center,
        }
    }

    /// A requirement template with every field unconstrained.
    pub const fn unconstrained() -> Self {
        Self::new(
            Link::Wildcard,
            Link::Wildcard,
            Link::Wildcard,
            Link::Wildcard,
            Link::Wildcard,
        )
    }

    pub const fn side(&self, side: Side) -> Link {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub const fn side_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }

    /// Rotates by `turns` quarter turns. Rotation cyclically shifts
    /// top→right→bottom→left→top; the center is rotation-invariant.
    /// `turns` may be any integer and is normalized into [0,3].
    pub const fn rotated(self, turns: Turns) -> Self {
        let mut path = self;
        let mut remaining = turns.rem_euclid(4);
        while remaining > 0 {
            path = Self::new(path.left, path.top, path.right, path.bottom, path.center);
            remaining -= 1;
        }
        path
    }
}

/// One-way latch: whether the path network connects a cell to the start
/// tile. Within a single grid build this only ever moves from `No` to `Yes`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reachability {
    No,
    Yes,
}

impl Reachability {
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }

    pub const fn mark_yes(&mut self) {
        *self = Self::Yes;
    }
}

impl Default for Reachability {
    fn default() -> Self {
        Self::No
    }
}
