//! Candidate neighbour-set enumeration.
//!
//! Seeds each room's domain with every combination of other rooms of size
//! `max_neighbours`, giving `C(n - 1, max_neighbours)` candidates per room.
//! Candidates are compared by membership, so construction order cannot leak
//! duplicate sets into a domain.

use std::collections::HashSet;

use crate::constraints::Constraint;
use crate::error::{GenerationError, Result};
use crate::graph::TopologyGraph;
use crate::room::NeighbourSet;

/// All `k`-combinations of `items`, in lexicographic index order.
///
/// Returns a single empty combination for `k == 0` and nothing when `k`
/// exceeds the item count.
#[must_use]
pub fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    if k > items.len() {
        return Vec::new();
    }
    if k == 0 {
        return vec![Vec::new()];
    }

    let mut out = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        out.push(indices.iter().map(|&i| items[i]).collect());

        // advance the rightmost index that still has room to move
        let mut cursor = k;
        while cursor > 0 {
            cursor -= 1;
            if indices[cursor] != cursor + items.len() - k {
                break;
            }
            if cursor == 0 {
                return out;
            }
        }
        indices[cursor] += 1;
        for follow in (cursor + 1)..k {
            indices[follow] = indices[follow - 1] + 1;
        }
    }
}

/// Populates every room's initial domain.
///
/// A room is never a member of its own candidate sets, and every candidate
/// has exactly `max_neighbours` members.
///
/// # Errors
/// Fails fast on an internally impossible constraint set: an unassigned or
/// zero neighbour count, or one exceeding `room_count - 1`.
pub fn seed_domains(graph: &mut TopologyGraph) -> Result<()> {
    let room_count = graph.len();
    for id in 0..room_count {
        let required = match graph.rooms()[id].max_neighbours() {
            Constraint::Unassigned => {
                return Err(GenerationError::UnassignedNeighbourCount { id });
            }
            Constraint::Assigned(0) => {
                return Err(GenerationError::ZeroNeighbourCount { id });
            }
            Constraint::Assigned(required) => required,
        };
        if required > room_count - 1 {
            return Err(GenerationError::ImpossibleNeighbourCount {
                id,
                required,
                available: room_count - 1,
            });
        }

        let others: Vec<usize> = (0..room_count).filter(|&other| other != id).collect();
        let mut seen = HashSet::new();
        let domain: Vec<NeighbourSet> = combinations(&others, required)
            .into_iter()
            .map(NeighbourSet::new)
            .filter(|candidate| seen.insert(candidate.clone()))
            .collect();
        graph.room_mut(id).domain = domain;
    }
    Ok(())
}
