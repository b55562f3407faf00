//! Per-room structural constraints supplied by the external parameter
//! sampler.
//!
//! The sampler hands the generator one [`RoomParams`] tuple per room. Inside
//! the arena each value becomes a [`Constraint`] so that propagation code can
//! never silently operate on an unset constraint.

use std::fmt;

/// A structural constraint that is either unset or pinned to a value.
///
/// Rooms are created before the sampler assigns their parameters, so every
/// constraint starts out as `Unassigned`. Validators treat an unassigned
/// constraint explicitly rather than defaulting it to zero.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Constraint {
    /// No value has been assigned yet.
    #[default]
    Unassigned,
    /// The sampler pinned this constraint to a concrete value.
    Assigned(usize),
}

impl Constraint {
    /// Returns the assigned value, or `None` when unset.
    #[must_use]
    pub const fn value(self) -> Option<usize> {
        match self {
            Self::Unassigned => None,
            Self::Assigned(value) => Some(value),
        }
    }

    /// Returns `true` when the sampler has pinned a value.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unassigned => f.write_str("unassigned"),
            Self::Assigned(value) => write!(f, "{value}"),
        }
    }
}

/// Sampled parameters for a single room.
///
/// `cp_distance == 0` marks a room as lying on the critical path. The
/// entrance (room `0`) must carry `depth == 0` and `cp_distance == 0`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RoomParams {
    /// Exact degree the room must have once the topology is finalized.
    pub max_neighbours: usize,
    /// Distance from the entrance along the room's assigned branch.
    pub depth: usize,
    /// Shortest distance from the room to the critical path.
    pub cp_distance: usize,
}

impl RoomParams {
    /// Creates a parameter tuple for one room.
    #[must_use]
    pub const fn new(max_neighbours: usize, depth: usize, cp_distance: usize) -> Self {
        Self {
            max_neighbours,
            depth,
            cp_distance,
        }
    }

    /// Returns `true` when the room lies on the critical path.
    #[must_use]
    pub const fn on_critical_path(&self) -> bool {
        self.cp_distance == 0
    }
}
