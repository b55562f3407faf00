//! Dungen core library: procedural dungeon *topology* generation.
//!
//! Turns per-room numeric constraints sampled by an external model — a
//! required neighbour count, a depth, and a distance from the critical path —
//! into a concrete, fully-connected graph of rooms and corridors, via
//! constraint propagation with failure-driven backtracking.
//!
//! The planarity invariant is enforced through the conservative Euler bound
//! `edges <= 3 * rooms - 6`, a necessary but not sufficient condition for
//! true planarity. This is a documented relaxation, inherited deliberately
//! rather than fixed silently.
//!
//! Parameter sampling, room-shape layout, rendering, and all I/O live in the
//! surrounding system; this crate's surface is
//! [`TopologyGenerator::generate`] and the read API of [`TopologyGraph`].

mod candidates;
mod constraints;
mod error;
mod graph;
mod propagation;
mod room;
mod search;
mod validators;

pub use crate::{
    constraints::{Constraint, RoomParams},
    error::{GenerationError, Result, TopologyError},
    graph::TopologyGraph,
    room::{NeighbourSet, Room, RoomId},
    search::{TopologyGenerator, TopologyGeneratorBuilder, generate},
};
