//! Arc-consistency propagation over room domains, with an undo log.
//!
//! A reduction of one room's domain is propagated to every room referenced by
//! the surviving candidates: their domains are narrowed to candidates that
//! still contain the changed room and whose not-yet-connected members pass
//! every constraint predicate, pairwise and as a joint probe of the whole
//! candidate. An emptied domain raises [`DomainExhausted`],
//! the recoverable signal the search driver turns into a backtrack. The
//! tightening pass runs over an explicit worklist rather than call-stack
//! recursion, so propagation depth is bounded by domain shrinkage alone.

use std::collections::VecDeque;

use thiserror::Error;
use tracing::trace;

use crate::graph::TopologyGraph;
use crate::room::{NeighbourSet, RoomId};
use crate::validators;

/// Recoverable contradiction: a reduction emptied a room's domain.
///
/// Never silently ignored; the search driver catches it to trigger a
/// backtrack, and only a spent retry budget surfaces it to the caller.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("room {room} has no remaining candidate neighbour sets")]
pub(crate) struct DomainExhausted {
    pub(crate) room: RoomId,
}

/// Stack of undo frames: one frame per speculative assignment.
#[derive(Debug, Default)]
pub(crate) struct UndoLog {
    frames: Vec<Frame>,
}

#[derive(Debug, Default)]
struct Frame {
    snapshots: Vec<(RoomId, Vec<NeighbourSet>)>,
}

impl UndoLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Opens a frame for the next speculative assignment.
    pub(crate) fn push_frame(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Number of open frames.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Records a room's pre-reduction domain on the active frame. The first
    /// checkpoint per room per frame wins, so a restore lands on the state
    /// the frame opened with. Reductions applied while no frame is open are
    /// permanent; the initial domain prune and root-level candidate discards
    /// rely on this.
    pub(crate) fn checkpoint(&mut self, room: RoomId, domain: &[NeighbourSet]) {
        if let Some(frame) = self.frames.last_mut() {
            if frame.snapshots.iter().all(|&(id, _)| id != room) {
                frame.snapshots.push((room, domain.to_vec()));
            }
        }
    }

    /// Pops the most recent frame and restores every room checkpointed in it
    /// to its pre-reduction domain, by value.
    pub(crate) fn pop_and_restore(&mut self, graph: &mut TopologyGraph) {
        if let Some(frame) = self.frames.pop() {
            for (room, domain) in frame.snapshots.into_iter().rev() {
                trace!(room, candidates = domain.len(), "restoring domain");
                graph.room_mut(room).domain = domain;
            }
        }
    }
}

/// Replaces `room`'s domain with `new_domain` and tightens every dependent
/// room's domain until a fixpoint.
///
/// Rejects an empty `new_domain` with [`DomainExhausted`]; a domain that is
/// unchanged by the reduction triggers no propagation.
pub(crate) fn reduce(
    graph: &mut TopologyGraph,
    log: &mut UndoLog,
    room: RoomId,
    new_domain: Vec<NeighbourSet>,
) -> Result<(), DomainExhausted> {
    let mut pending = VecDeque::new();
    apply(graph, log, room, new_domain, &mut pending)?;
    drain(graph, log, &mut pending)
}

/// Runs the tightening pass for one committed candidate of `changed`,
/// whether or not the commitment shrank the domain. The search driver calls
/// this before realizing the candidate's edges.
pub(crate) fn propagate(
    graph: &mut TopologyGraph,
    log: &mut UndoLog,
    candidate: &NeighbourSet,
    changed: RoomId,
) -> Result<(), DomainExhausted> {
    let mut pending = VecDeque::from([(changed, candidate.clone())]);
    drain(graph, log, &mut pending)
}

fn apply(
    graph: &mut TopologyGraph,
    log: &mut UndoLog,
    room: RoomId,
    new_domain: Vec<NeighbourSet>,
    pending: &mut VecDeque<(RoomId, NeighbourSet)>,
) -> Result<(), DomainExhausted> {
    if new_domain.is_empty() {
        return Err(DomainExhausted { room });
    }
    let current = graph.rooms()[room].domain();
    if current == new_domain.as_slice() {
        return Ok(());
    }
    trace!(
        room,
        before = current.len(),
        after = new_domain.len(),
        "narrowed domain"
    );
    log.checkpoint(room, current);
    for candidate in &new_domain {
        pending.push_back((room, candidate.clone()));
    }
    graph.room_mut(room).domain = new_domain;
    Ok(())
}

fn drain(
    graph: &mut TopologyGraph,
    log: &mut UndoLog,
    pending: &mut VecDeque<(RoomId, NeighbourSet)>,
) -> Result<(), DomainExhausted> {
    while let Some((changed, candidate)) = pending.pop_front() {
        // a later reduction may already have dropped this candidate
        if !graph.rooms()[changed].domain().contains(&candidate) {
            continue;
        }
        for &child in candidate.members() {
            let current = graph.rooms()[child].domain().to_vec();
            let mut allowed = Vec::with_capacity(current.len());
            for child_candidate in current {
                if child_candidate.contains(changed)
                    && validators::valid_candidate(graph, child, &child_candidate)
                {
                    allowed.push(child_candidate);
                }
            }
            apply(graph, log, child, allowed, pending)?;
        }
    }
    Ok(())
}
