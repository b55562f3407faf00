//! Rooms and candidate neighbour sets.
//!
//! Rooms live in an arena owned by [`crate::TopologyGraph`] and are addressed
//! by stable integer index, so undo frames can snapshot and restore domains
//! by value instead of relying on object identity.

use crate::constraints::{Constraint, RoomParams};

/// Stable arena index identifying a room for the lifetime of a graph.
pub type RoomId = usize;

/// One candidate neighbour set: a full, sized-to-`max_neighbours` set of
/// rooms that could become a room's actual neighbours.
///
/// Membership defines equality. Ids are kept sorted and deduplicated so two
/// candidates with the same members but different construction order compare
/// equal and cannot both survive deduplication.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NeighbourSet(Vec<RoomId>);

impl NeighbourSet {
    /// Builds a candidate set from the given ids, sorting and deduplicating.
    #[must_use]
    pub fn new(mut ids: Vec<RoomId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    /// Returns the member ids in ascending order.
    #[must_use]
    pub fn members(&self) -> &[RoomId] {
        &self.0
    }

    /// Returns `true` when `id` is a member.
    #[must_use]
    pub fn contains(&self, id: RoomId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    /// Returns `true` when every id in `ids` is a member.
    #[must_use]
    pub fn is_superset_of(&self, ids: &[RoomId]) -> bool {
        ids.iter().all(|&id| self.contains(id))
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A room: one node of the dungeon topology.
///
/// `edges` holds the realized connections; `domain` holds the candidate
/// neighbour sets that are still possible. A room with a singleton domain is
/// *instantiated*. The domain only shrinks during propagation, except when an
/// undo frame restores it on backtrack.
#[derive(Clone, Debug)]
pub struct Room {
    id: RoomId,
    pub(crate) max_neighbours: Constraint,
    pub(crate) depth: Constraint,
    pub(crate) cp_distance: Constraint,
    pub(crate) edges: Vec<RoomId>,
    pub(crate) domain: Vec<NeighbourSet>,
}

impl Room {
    /// Creates a room with no edges and an empty domain.
    ///
    /// The entrance (id `0`) sits at the start of the critical path, so its
    /// `depth` and `cp_distance` are pinned to zero by construction.
    pub(crate) fn new(id: RoomId) -> Self {
        let pinned = if id == 0 {
            Constraint::Assigned(0)
        } else {
            Constraint::Unassigned
        };
        Self {
            id,
            max_neighbours: Constraint::Unassigned,
            depth: pinned,
            cp_distance: pinned,
            edges: Vec::new(),
            domain: Vec::new(),
        }
    }

    pub(crate) fn assign(&mut self, params: &RoomParams) {
        self.max_neighbours = Constraint::Assigned(params.max_neighbours);
        self.depth = Constraint::Assigned(params.depth);
        self.cp_distance = Constraint::Assigned(params.cp_distance);
    }

    /// Adds a directed edge towards `other`; returns `false` when it already
    /// exists. The graph is responsible for inserting the inverse edge.
    pub(crate) fn add_edge(&mut self, other: RoomId) -> bool {
        if self.edges.contains(&other) {
            return false;
        }
        self.edges.push(other);
        true
    }

    pub(crate) fn remove_edge(&mut self, other: RoomId) {
        self.edges.retain(|&id| id != other);
    }

    /// The room's stable arena index.
    #[must_use]
    pub fn id(&self) -> RoomId {
        self.id
    }

    /// Required degree once the topology is finalized.
    #[must_use]
    pub fn max_neighbours(&self) -> Constraint {
        self.max_neighbours
    }

    /// Distance from the entrance along the room's assigned branch.
    #[must_use]
    pub fn depth(&self) -> Constraint {
        self.depth
    }

    /// Shortest distance from the room to the critical path; zero if and
    /// only if the room lies on it.
    #[must_use]
    pub fn cp_distance(&self) -> Constraint {
        self.cp_distance
    }

    /// Realized neighbours, in connection order.
    #[must_use]
    pub fn neighbours(&self) -> &[RoomId] {
        &self.edges
    }

    /// Number of realized connections.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` when a realized edge to `other` exists.
    #[must_use]
    pub fn is_connected(&self, other: RoomId) -> bool {
        self.edges.contains(&other)
    }

    /// Candidate neighbour sets that are still possible.
    #[must_use]
    pub fn domain(&self) -> &[NeighbourSet] {
        &self.domain
    }

    /// Returns `true` when the domain has shrunk to exactly one candidate.
    #[must_use]
    pub fn is_instantiated(&self) -> bool {
        self.domain.len() == 1
    }
}
