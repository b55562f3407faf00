//! Error types for the dungen core library.
//!
//! Defines the structural errors raised by the topology graph, the failure
//! type of the generator's public API, and a convenient result alias.

use thiserror::Error;

use crate::room::RoomId;

/// Structural precondition violation raised by [`crate::TopologyGraph`].
///
/// These are programmer errors: the graph was asked to do something its
/// current state cannot support, and the request fails fast instead of being
/// silently clamped.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TopologyError {
    /// `instantiate` was called while a room's domain was not a singleton.
    #[error("room {id} still has {candidates} candidate neighbour sets; instantiation requires exactly one")]
    DomainNotSingleton {
        /// Room whose domain had not collapsed to a single candidate.
        id: RoomId,
        /// Number of candidates remaining in that domain.
        candidates: usize,
    },
}

/// Failure type produced by [`crate::TopologyGenerator::generate`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GenerationError {
    /// A dungeon needs an entrance and a goal at minimum.
    #[error("a dungeon needs at least 2 rooms (got {got})")]
    TooFewRooms {
        /// Number of rooms requested.
        got: usize,
    },
    /// The entrance must start the critical path.
    #[error("entrance must have depth 0 and cp_distance 0 (got depth {depth}, cp_distance {cp_distance})")]
    InvalidEntrance {
        /// Depth supplied for room 0.
        depth: usize,
        /// Critical-path distance supplied for room 0.
        cp_distance: usize,
    },
    /// The goal room terminates the critical path, so its `cp_distance`
    /// must be zero.
    #[error("goal room {id} must lie on the critical path (got cp_distance {cp_distance})")]
    GoalOffCriticalPath {
        /// Id of the goal room.
        id: RoomId,
        /// Critical-path distance supplied for the goal.
        cp_distance: usize,
    },
    /// A room's neighbour count was never assigned by the sampler.
    #[error("room {id} has no assigned neighbour count")]
    UnassignedNeighbourCount {
        /// Room missing its `max_neighbours` constraint.
        id: RoomId,
    },
    /// Every room must end up with at least one corridor.
    #[error("room {id} must require at least one neighbour")]
    ZeroNeighbourCount {
        /// Room whose required degree was zero.
        id: RoomId,
    },
    /// A room demands more neighbours than there are other rooms.
    #[error("room {id} requires {required} neighbours but only {available} other rooms exist")]
    ImpossibleNeighbourCount {
        /// Room whose required degree cannot be met.
        id: RoomId,
        /// Required degree.
        required: usize,
        /// Number of other rooms available as neighbours.
        available: usize,
    },
    /// A room ran out of candidate neighbour sets entirely: its constraints
    /// contradict the critical path or the corridors committed so far.
    #[error("room {id} has no candidate neighbour set consistent with the rest of the dungeon")]
    UnsatisfiableRoom {
        /// Room whose domain collapsed to nothing.
        id: RoomId,
    },
    /// The builder was given a retry budget of zero.
    #[error("retry budget must be at least 1")]
    InvalidRetryBudget,
    /// The search could not find a consistent assignment within its
    /// backtrack budget. The caller may resample structural parameters and
    /// retry the whole generation.
    #[error("exhausted the backtrack budget of {budget} while generating {room_count} rooms")]
    RetryBudgetExceeded {
        /// Number of rooms the failed attempt was generating.
        room_count: usize,
        /// Budget that was exceeded.
        budget: usize,
    },
    /// A structural precondition of the underlying graph was violated.
    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, GenerationError>;
