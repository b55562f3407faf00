//! The dungeon topology graph: rooms, corridors, and path queries.
//!
//! The graph owns every room in an arena indexed by [`RoomId`]. Every
//! realized connection is stored as a symmetric pair of directed edges so
//! adjacency queries are direction-agnostic. Derived values (critical path,
//! adjacency list, planarity) are computed on demand and never cached,
//! because edges change continually during search.

use std::collections::VecDeque;
use std::fmt;

use tracing::warn;

use crate::constraints::RoomParams;
use crate::error::TopologyError;
use crate::room::{Room, RoomId};

/// Node/edge container with adjacency and shortest-path queries.
#[derive(Clone, Debug)]
pub struct TopologyGraph {
    rooms: Vec<Room>,
}

impl TopologyGraph {
    /// Creates a graph with rooms `0..room_count`, each with empty edges and
    /// an empty domain. Room `0` is the entrance; the last room is the goal.
    #[must_use]
    pub fn new(room_count: usize) -> Self {
        Self {
            rooms: (0..room_count).map(Room::new).collect(),
        }
    }

    /// Number of rooms in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns `true` when the graph has no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Looks up a room by arena index.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    /// All rooms in id order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub(crate) fn room_mut(&mut self, id: RoomId) -> &mut Room {
        &mut self.rooms[id]
    }

    /// Id of the entrance room.
    #[must_use]
    pub fn entrance_id(&self) -> RoomId {
        0
    }

    /// Id of the goal room (the critical path's terminal room).
    #[must_use]
    pub fn goal_id(&self) -> RoomId {
        self.rooms.len().saturating_sub(1)
    }

    /// Assigns sampled parameters to each room, in id order.
    pub(crate) fn assign_params(&mut self, params: &[RoomParams]) {
        for (room, param) in self.rooms.iter_mut().zip(params) {
            room.assign(param);
        }
    }

    /// Connects two rooms with a symmetric edge pair.
    ///
    /// Connecting a room to itself is a logged skip, not an error, and
    /// connecting an already-connected pair does not double-count.
    pub fn connect(&mut self, a: RoomId, b: RoomId) {
        if a == b {
            warn!(room = a, "skipping self-loop connect");
            return;
        }
        if a >= self.rooms.len() || b >= self.rooms.len() {
            warn!(a, b, rooms = self.rooms.len(), "skipping out-of-arena connect");
            return;
        }
        if self.rooms[a].add_edge(b) {
            self.rooms[b].add_edge(a);
        }
    }

    /// Removes the symmetric edge pair between two rooms, if present.
    pub fn disconnect(&mut self, a: RoomId, b: RoomId) {
        if a >= self.rooms.len() || b >= self.rooms.len() {
            return;
        }
        self.rooms[a].remove_edge(b);
        self.rooms[b].remove_edge(a);
    }

    /// Shortest path from `from` to `to` over the current adjacency, as an
    /// ordered list of room ids including both endpoints. Corridors are
    /// uniform weight, so breadth-first search is Dijkstra here. Returns an
    /// empty path when `to` is unreachable.
    #[must_use]
    pub fn path_to(&self, from: RoomId, to: RoomId) -> Vec<RoomId> {
        if from >= self.rooms.len() || to >= self.rooms.len() {
            return Vec::new();
        }
        if from == to {
            return vec![from];
        }

        let mut came_from: Vec<Option<RoomId>> = vec![None; self.rooms.len()];
        let mut visited = vec![false; self.rooms.len()];
        visited[from] = true;

        let mut frontier = VecDeque::from([from]);
        while let Some(current) = frontier.pop_front() {
            for &next in self.rooms[current].neighbours() {
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                came_from[next] = Some(current);
                if next == to {
                    return Self::reconstruct(&came_from, from, to);
                }
                frontier.push_back(next);
            }
        }
        Vec::new()
    }

    fn reconstruct(came_from: &[Option<RoomId>], from: RoomId, to: RoomId) -> Vec<RoomId> {
        let mut path = vec![to];
        let mut current = to;
        while current != from {
            match came_from[current] {
                Some(previous) => {
                    path.push(previous);
                    current = previous;
                }
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }

    /// The designated shortest route from the entrance to the goal. Empty
    /// while the two are not yet connected.
    #[must_use]
    pub fn critical_path(&self) -> Vec<RoomId> {
        if self.rooms.is_empty() {
            return Vec::new();
        }
        self.path_to(self.entrance_id(), self.goal_id())
    }

    /// Number of realized connections (symmetric pairs counted once).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.rooms.iter().map(Room::degree).sum::<usize>() / 2
    }

    /// Conservative planarity heuristic: the Euler bound
    /// `edges <= 3 * rooms - 6`.
    ///
    /// This is a necessary condition for planarity, not a sufficient one; a
    /// graph can satisfy the bound and still be non-planar. The relaxation is
    /// deliberate and documented, not a bug to fix silently.
    #[must_use]
    pub fn is_planar(&self) -> bool {
        if self.rooms.len() < 3 {
            return true;
        }
        self.edge_count() <= 3 * self.rooms.len() - 6
    }

    /// Returns `true` when the critical path is non-empty and every room has
    /// at least one corridor.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.critical_path().is_empty() && self.rooms.iter().all(|room| room.degree() > 0)
    }

    /// Returns `true` when every room's domain has shrunk to exactly one
    /// candidate neighbour set.
    #[must_use]
    pub fn are_rooms_instantiated(&self) -> bool {
        self.rooms.iter().all(Room::is_instantiated)
    }

    /// Realizes every room's singleton candidate set as concrete edges.
    ///
    /// # Errors
    /// Returns [`TopologyError::DomainNotSingleton`] if any room's domain has
    /// not collapsed to exactly one candidate.
    pub fn instantiate(&mut self) -> core::result::Result<(), TopologyError> {
        for room in &self.rooms {
            if room.domain.len() != 1 {
                return Err(TopologyError::DomainNotSingleton {
                    id: room.id(),
                    candidates: room.domain.len(),
                });
            }
        }
        for id in 0..self.rooms.len() {
            let members = self.rooms[id].domain[0].members().to_vec();
            for other in members {
                self.connect(id, other);
            }
        }
        Ok(())
    }

    /// Upper-triangular adjacency list: for each room, the sorted ids of its
    /// neighbours with a larger id. This is the sole artifact consumed by the
    /// external room-shape renderer.
    #[must_use]
    pub fn to_adjacency_list(&self) -> Vec<Vec<RoomId>> {
        self.rooms
            .iter()
            .map(|room| {
                let mut neighbours: Vec<RoomId> = room
                    .neighbours()
                    .iter()
                    .copied()
                    .filter(|&other| other > room.id())
                    .collect();
                neighbours.sort_unstable();
                neighbours
            })
            .collect()
    }
}

/// Diagnostic adjacency-matrix and adjacency-list dump: `&` on the diagonal,
/// `.` for an absent edge, the edge count otherwise. Logging aid only, not
/// part of the functional contract.
impl fmt::Display for TopologyGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:7}", "")?;
        for id in 0..self.rooms.len() {
            write!(f, "{id}  ")?;
        }
        writeln!(f)?;

        for (row, room) in self.rooms.iter().enumerate() {
            write!(f, "{row} | [")?;
            for col in 0..self.rooms.len() {
                if row == col {
                    write!(f, " &,")?;
                } else if room.is_connected(col) {
                    write!(f, " 1,")?;
                } else {
                    write!(f, " .,")?;
                }
            }
            writeln!(f, " ]")?;
        }
        writeln!(f)?;

        for (row, neighbours) in self.to_adjacency_list().iter().enumerate() {
            let line: Vec<String> = neighbours.iter().map(ToString::to_string).collect();
            writeln!(f, "[{row}]: {}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
