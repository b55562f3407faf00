//! Backtracking search driver and the public generation entry point.
//!
//! The driver alternates between two states: *searching* while any room is
//! unresolved, *solved* once every domain is a singleton realized as edges.
//! Each step commits one room to its first remaining candidate and
//! propagates the commitment. Every commit is itself undoable: the decision
//! stack records which edges it realized, and when a room's domain empties
//! the driver unwinds committed decisions one by one, disconnecting their
//! edges, restoring their undo frames, and discarding their candidates, so
//! the search is chronologically complete. A run fails only when a room is
//! exhausted with nothing left to unwind or when the global retry budget is
//! spent. The whole search is single-threaded and depth-first; the undo log
//! and domain mutations carry no locking discipline, so a wall-clock guard,
//! if wanted, must wrap the entire run.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{debug, instrument};

use crate::candidates;
use crate::constraints::RoomParams;
use crate::error::{GenerationError, Result};
use crate::graph::TopologyGraph;
use crate::propagation::{self, DomainExhausted, UndoLog};
use crate::room::{NeighbourSet, Room, RoomId};
use crate::validators;

const DEFAULT_RETRY_BUDGET: usize = 100;

/// Configures and constructs [`TopologyGenerator`] instances.
///
/// # Examples
/// ```
/// use dungen_core::TopologyGeneratorBuilder;
///
/// let generator = TopologyGeneratorBuilder::new()
///     .with_seed(42)
///     .with_retry_budget(20)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(generator.seed(), 42);
/// assert_eq!(generator.retry_budget(), 20);
/// ```
#[derive(Debug, Clone)]
pub struct TopologyGeneratorBuilder {
    seed: u64,
    retry_budget: usize,
}

impl Default for TopologyGeneratorBuilder {
    fn default() -> Self {
        Self {
            seed: 0,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }
}

impl TopologyGeneratorBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the seed driving all variable and value selection.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the backtrack budget for one generation run.
    #[must_use]
    pub fn with_retry_budget(mut self, budget: usize) -> Self {
        self.retry_budget = budget;
        self
    }

    /// Validates the configuration and constructs a generator.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidRetryBudget`] when the budget is
    /// zero.
    pub fn build(self) -> Result<TopologyGenerator> {
        if self.retry_budget == 0 {
            return Err(GenerationError::InvalidRetryBudget);
        }
        Ok(TopologyGenerator {
            seed: self.seed,
            retry_budget: self.retry_budget,
        })
    }
}

/// Generates dungeon topologies from sampled per-room constraints.
///
/// # Examples
/// ```
/// use dungen_core::{RoomParams, TopologyGeneratorBuilder};
///
/// // the documented 4-room scenario: room 1 must become a star centre
/// let params = [
///     RoomParams::new(1, 0, 0),
///     RoomParams::new(3, 1, 0),
///     RoomParams::new(1, 2, 1),
///     RoomParams::new(1, 2, 0),
/// ];
/// let generator = TopologyGeneratorBuilder::new().build()?;
/// let topology = generator.generate(&params)?;
/// assert_eq!(
///     topology.to_adjacency_list(),
///     vec![vec![1], vec![2, 3], vec![], vec![]]
/// );
/// # Ok::<(), dungen_core::GenerationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TopologyGenerator {
    seed: u64,
    retry_budget: usize,
}

impl TopologyGenerator {
    /// Seed fixed for the life of one generation run.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Maximum number of backtracks before a run is abandoned.
    #[must_use]
    pub fn retry_budget(&self) -> usize {
        self.retry_budget
    }

    /// Runs the constraint search and returns the finished topology.
    ///
    /// `params` carries one tuple per room id; `params.len()` is the room
    /// count. The same parameters and seed always produce the same edge set.
    ///
    /// # Errors
    /// Fails fast with a structural [`GenerationError`] on internally
    /// impossible constraints. During search,
    /// [`GenerationError::UnsatisfiableRoom`] reports a room exhausted with
    /// no committed decision left to unwind (the inputs admit no solution),
    /// and [`GenerationError::RetryBudgetExceeded`] reports a spent
    /// backtrack budget; for the latter the caller may resample parameters
    /// and retry.
    #[instrument(skip_all, fields(rooms = params.len(), seed = self.seed))]
    pub fn generate(&self, params: &[RoomParams]) -> Result<TopologyGraph> {
        validate_params(params)?;

        let mut graph = TopologyGraph::new(params.len());
        graph.assign_params(params);
        lay_critical_path(&mut graph, params);
        candidates::seed_domains(&mut graph)?;
        prune_to_realized_edges(&mut graph)?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut log = UndoLog::new();
        let mut decisions: Vec<Decision> = Vec::new();
        let mut backtracks = 0usize;

        loop {
            let open: Vec<RoomId> = graph
                .rooms()
                .iter()
                .filter(|room| !is_resolved(room))
                .map(Room::id)
                .collect();
            if open.is_empty() {
                break;
            }

            let target = open[rng.gen_range(0..open.len())];
            let candidate = graph.rooms()[target].domain()[0].clone();
            debug!(room = target, candidate = ?candidate, frame = log.depth(), "trying candidate");

            log.push_frame();
            let outcome = if validators::valid_candidate(&mut graph, target, &candidate) {
                propagation::reduce(&mut graph, &mut log, target, vec![candidate.clone()])
                    .and_then(|()| propagation::propagate(&mut graph, &mut log, &candidate, target))
            } else {
                Err(DomainExhausted { room: target })
            };

            match outcome {
                Ok(()) => {
                    let mut realized = Vec::new();
                    for &member in candidate.members() {
                        if !graph.rooms()[target].is_connected(member) {
                            graph.connect(target, member);
                            realized.push(member);
                        }
                    }
                    decisions.push(Decision {
                        room: target,
                        candidate,
                        realized,
                    });
                }
                Err(contradiction) => {
                    debug!(
                        room = target,
                        emptied = contradiction.room,
                        backtracks,
                        "domain exhausted, backtracking"
                    );
                    log.pop_and_restore(&mut graph);
                    discard_candidate(&mut graph, &mut log, target, &candidate);
                    backtracks += 1;
                    if backtracks > self.retry_budget {
                        return Err(GenerationError::RetryBudgetExceeded {
                            room_count: params.len(),
                            budget: self.retry_budget,
                        });
                    }

                    // an emptied domain reopens committed decisions, newest
                    // first, until the exhausted room has candidates again
                    let mut exhausted = target;
                    while graph.rooms()[exhausted].domain().is_empty() {
                        let Some(decision) = decisions.pop() else {
                            return Err(GenerationError::UnsatisfiableRoom { id: exhausted });
                        };
                        debug!(
                            room = decision.room,
                            reopened = exhausted,
                            "unwinding committed assignment"
                        );
                        log.pop_and_restore(&mut graph);
                        for &member in &decision.realized {
                            graph.disconnect(decision.room, member);
                        }
                        discard_candidate(&mut graph, &mut log, decision.room, &decision.candidate);
                        backtracks += 1;
                        if backtracks > self.retry_budget {
                            return Err(GenerationError::RetryBudgetExceeded {
                                room_count: params.len(),
                                budget: self.retry_budget,
                            });
                        }
                        exhausted = decision.room;
                    }
                }
            }
        }

        graph.instantiate()?;
        debug!(
            edges = graph.edge_count(),
            backtracks, "topology generation complete"
        );
        Ok(graph)
    }
}

/// One-shot convenience wrapper: builds a default generator with the given
/// seed and runs it.
///
/// # Errors
/// See [`TopologyGenerator::generate`].
pub fn generate(params: &[RoomParams], seed: u64) -> Result<TopologyGraph> {
    TopologyGeneratorBuilder::new()
        .with_seed(seed)
        .build()?
        .generate(params)
}

/// One committed assignment: the room, the candidate it was committed to,
/// and the edges the commit actually added (members already wired by the
/// critical path or earlier commits are not recorded, so unwinding never
/// removes an edge the decision did not create).
struct Decision {
    room: RoomId,
    candidate: NeighbourSet,
    realized: Vec<RoomId>,
}

/// A room is resolved once its domain is a singleton whose members are all
/// realized edges. A singleton left behind by candidate elimination has not
/// been propagated or committed yet, so it still counts as open; selecting
/// it runs the tightening pass before its edges become real.
fn is_resolved(room: &Room) -> bool {
    match room.domain() {
        [only] => only.members().iter().all(|&member| room.is_connected(member)),
        _ => false,
    }
}

/// Removes a failed candidate from a room's domain, checkpointing the domain
/// on the enclosing undo frame first. Inside an open frame the discard is
/// itself undone when that frame unwinds, so a candidate that failed under
/// one decision is retried under the next; at the root there is no frame and
/// the discard is permanent.
fn discard_candidate(
    graph: &mut TopologyGraph,
    log: &mut UndoLog,
    room: RoomId,
    candidate: &NeighbourSet,
) {
    let current = graph.rooms()[room].domain().to_vec();
    log.checkpoint(room, &current);
    graph
        .room_mut(room)
        .domain
        .retain(|other| other != candidate);
}

fn validate_params(params: &[RoomParams]) -> Result<()> {
    if params.len() < 2 {
        return Err(GenerationError::TooFewRooms { got: params.len() });
    }
    let entrance = params[0];
    if entrance.depth != 0 || entrance.cp_distance != 0 {
        return Err(GenerationError::InvalidEntrance {
            depth: entrance.depth,
            cp_distance: entrance.cp_distance,
        });
    }
    let goal_id = params.len() - 1;
    if !params[goal_id].on_critical_path() {
        return Err(GenerationError::GoalOffCriticalPath {
            id: goal_id,
            cp_distance: params[goal_id].cp_distance,
        });
    }
    Ok(())
}

/// Wires the `cp_distance == 0` rooms into a depth-ordered chain before the
/// search starts, fixing the critical path's length for the whole run.
fn lay_critical_path(graph: &mut TopologyGraph, params: &[RoomParams]) {
    let mut on_path: Vec<RoomId> = (0..params.len())
        .filter(|&id| params[id].on_critical_path())
        .collect();
    on_path.sort_by_key(|&id| (params[id].depth, id));
    for pair in on_path.windows(2) {
        graph.connect(pair[0], pair[1]);
    }
    debug!(length = on_path.len(), "laid critical path");
}

/// Drops every candidate that is not a superset of a room's already-realized
/// edges, so the critical path laid down up front survives instantiation.
fn prune_to_realized_edges(graph: &mut TopologyGraph) -> Result<()> {
    for id in 0..graph.len() {
        let edges = graph.rooms()[id].neighbours().to_vec();
        if edges.is_empty() {
            continue;
        }
        let kept: Vec<NeighbourSet> = graph.rooms()[id]
            .domain()
            .iter()
            .filter(|candidate| candidate.is_superset_of(&edges))
            .cloned()
            .collect();
        if kept.is_empty() {
            return Err(GenerationError::UnsatisfiableRoom { id });
        }
        graph.room_mut(id).domain = kept;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
