//! Constraint predicates used by the propagator.
//!
//! Each predicate speculatively connects the pair under test, inspects the
//! resulting graph, and disconnects again before returning, so no call here
//! mutates the topology permanently. A pair that is already connected is
//! always valid: connecting it again changes nothing, and probing it must not
//! tear down a real corridor.

use crate::constraints::Constraint;
use crate::graph::TopologyGraph;
use crate::room::{NeighbourSet, RoomId};

/// Valid iff connecting `a`-`b` leaves the critical path length unchanged.
pub(crate) fn valid_cp_length(graph: &mut TopologyGraph, a: RoomId, b: RoomId) -> bool {
    if a == b || graph.rooms()[a].is_connected(b) {
        return true;
    }
    let before = graph.critical_path().len();
    graph.connect(a, b);
    let after = graph.critical_path().len();
    graph.disconnect(a, b);
    before == after
}

/// Valid iff `a` has spare degree capacity for one more corridor.
///
/// A room without an assigned neighbour count cannot grant capacity.
pub(crate) fn valid_neighbours_post_inc(graph: &TopologyGraph, a: RoomId) -> bool {
    match graph.rooms()[a].max_neighbours() {
        Constraint::Assigned(max) => graph.rooms()[a].degree() < max,
        Constraint::Unassigned => false,
    }
}

/// Valid iff connecting `a`-`b` leaves both rooms' assigned depths
/// achievable: the new shortest distance from the entrance must not undercut
/// an assigned depth.
pub(crate) fn valid_depth(graph: &mut TopologyGraph, a: RoomId, b: RoomId) -> bool {
    if a == b || graph.rooms()[a].is_connected(b) {
        return true;
    }
    graph.connect(a, b);
    let ok = depth_achievable(graph, a) && depth_achievable(graph, b);
    graph.disconnect(a, b);
    ok
}

fn depth_achievable(graph: &TopologyGraph, room: RoomId) -> bool {
    match graph.rooms()[room].depth() {
        Constraint::Unassigned => true,
        Constraint::Assigned(depth) => {
            let path = graph.path_to(graph.entrance_id(), room);
            // unreachable rooms constrain nothing yet
            path.is_empty() || path.len() - 1 >= depth
        }
    }
}

/// Valid iff connecting `a`-`b` leaves both rooms' assigned critical-path
/// distances achievable against the resulting critical path.
pub(crate) fn valid_cp_distance(graph: &mut TopologyGraph, a: RoomId, b: RoomId) -> bool {
    if a == b || graph.rooms()[a].is_connected(b) {
        return true;
    }
    graph.connect(a, b);
    let critical_path = graph.critical_path();
    let ok = cp_distance_achievable(graph, &critical_path, a)
        && cp_distance_achievable(graph, &critical_path, b);
    graph.disconnect(a, b);
    ok
}

fn cp_distance_achievable(graph: &TopologyGraph, critical_path: &[RoomId], room: RoomId) -> bool {
    match graph.rooms()[room].cp_distance() {
        Constraint::Unassigned => true,
        Constraint::Assigned(0) => critical_path.contains(&room),
        Constraint::Assigned(distance) => {
            let nearest = critical_path
                .iter()
                .filter_map(|&on_path| {
                    let path = graph.path_to(room, on_path);
                    (!path.is_empty()).then(|| path.len() - 1)
                })
                .min();
            nearest.is_none_or(|found| found >= distance)
        }
    }
}

/// Valid iff adding the edge keeps the graph within the conservative Euler
/// planarity bound.
pub(crate) fn valid_planar(graph: &mut TopologyGraph, a: RoomId, b: RoomId) -> bool {
    if a == b || graph.rooms()[a].is_connected(b) {
        return true;
    }
    graph.connect(a, b);
    let ok = graph.is_planar();
    graph.disconnect(a, b);
    ok
}

/// Applies every predicate to the not-yet-connected pair `a`-`b`.
pub(crate) fn valid_connection(graph: &mut TopologyGraph, a: RoomId, b: RoomId) -> bool {
    valid_neighbours_post_inc(graph, a)
        && valid_neighbours_post_inc(graph, b)
        && valid_cp_length(graph, a, b)
        && valid_depth(graph, a, b)
        && valid_cp_distance(graph, a, b)
        && valid_planar(graph, a, b)
}

/// Validates a whole candidate neighbour set for `room`.
///
/// Each not-yet-realized member edge must pass every pairwise predicate, and
/// the edges must also hold up *together*: two corridors that each preserve
/// the critical path on their own can still shortcut it as a pair. The joint
/// probe connects every missing edge at once, re-checks critical-path length,
/// planarity, and each endpoint's depth and critical-path distance on the
/// combined graph, then reverts.
pub(crate) fn valid_candidate(
    graph: &mut TopologyGraph,
    room: RoomId,
    candidate: &NeighbourSet,
) -> bool {
    let missing: Vec<RoomId> = candidate
        .members()
        .iter()
        .copied()
        .filter(|&member| member != room && !graph.rooms()[room].is_connected(member))
        .collect();
    if missing
        .iter()
        .any(|&member| !valid_connection(graph, room, member))
    {
        return false;
    }
    if missing.len() < 2 {
        // a single missing edge is fully covered by the pairwise predicates
        return true;
    }

    let spare = match graph.rooms()[room].max_neighbours() {
        Constraint::Assigned(max) => max.saturating_sub(graph.rooms()[room].degree()),
        Constraint::Unassigned => 0,
    };
    if missing.len() > spare {
        return false;
    }

    let cp_before = graph.critical_path().len();
    for &member in &missing {
        graph.connect(room, member);
    }
    let critical_path = graph.critical_path();
    let ok = critical_path.len() == cp_before
        && graph.is_planar()
        && depth_achievable(graph, room)
        && cp_distance_achievable(graph, &critical_path, room)
        && missing.iter().all(|&member| {
            depth_achievable(graph, member) && cp_distance_achievable(graph, &critical_path, member)
        });
    for &member in &missing {
        graph.disconnect(room, member);
    }
    ok
}
