//! Unit tests for the search driver's validation and failure paths.

use rstest::rstest;

use crate::candidates;
use crate::constraints::RoomParams;
use crate::error::GenerationError;
use crate::graph::TopologyGraph;
use crate::propagation::UndoLog;

use super::{TopologyGeneratorBuilder, discard_candidate, generate};

#[test]
fn builder_defaults_are_valid() {
    let generator = TopologyGeneratorBuilder::new()
        .build()
        .expect("defaults must build");
    assert_eq!(generator.seed(), 0);
    assert!(generator.retry_budget() > 0);
}

#[test]
fn builder_rejects_a_zero_retry_budget() {
    let result = TopologyGeneratorBuilder::new().with_retry_budget(0).build();
    assert_eq!(result.err(), Some(GenerationError::InvalidRetryBudget));
}

#[rstest]
#[case::no_rooms(vec![], GenerationError::TooFewRooms { got: 0 })]
#[case::one_room(
    vec![RoomParams::new(1, 0, 0)],
    GenerationError::TooFewRooms { got: 1 }
)]
#[case::entrance_off_path(
    vec![RoomParams::new(1, 1, 0), RoomParams::new(1, 1, 0)],
    GenerationError::InvalidEntrance { depth: 1, cp_distance: 0 }
)]
#[case::goal_off_path(
    vec![RoomParams::new(1, 0, 0), RoomParams::new(1, 1, 2)],
    GenerationError::GoalOffCriticalPath { id: 1, cp_distance: 2 }
)]
fn bad_parameters_fail_fast(
    #[case] params: Vec<RoomParams>,
    #[case] expected: GenerationError,
) {
    assert_eq!(generate(&params, 0).err(), Some(expected));
}

#[test]
fn over_constrained_room_is_unsatisfiable() {
    // room 1 is saturated by the critical path, leaving room 2 no perch
    let params = [
        RoomParams::new(1, 0, 0),
        RoomParams::new(2, 1, 0),
        RoomParams::new(1, 1, 1),
        RoomParams::new(1, 2, 0),
    ];
    assert_eq!(
        generate(&params, 0).err(),
        Some(GenerationError::UnsatisfiableRoom { id: 2 })
    );
}

#[test]
fn tight_retry_budget_surfaces_as_generation_failure() {
    let params = [
        RoomParams::new(1, 0, 0),
        RoomParams::new(2, 1, 0),
        RoomParams::new(1, 1, 1),
        RoomParams::new(1, 2, 0),
    ];
    let generator = TopologyGeneratorBuilder::new()
        .with_retry_budget(1)
        .build()
        .expect("budget of 1 is valid");
    assert_eq!(
        generator.generate(&params).err(),
        Some(GenerationError::RetryBudgetExceeded {
            room_count: 4,
            budget: 1
        })
    );
}

#[test]
fn critical_path_is_laid_depth_ordered_before_search() {
    // rooms 0, 1 and 3 carry cp_distance 0; their chain must follow depth
    let params = [
        RoomParams::new(1, 0, 0),
        RoomParams::new(3, 1, 0),
        RoomParams::new(1, 2, 1),
        RoomParams::new(1, 2, 0),
    ];
    let topology = generate(&params, 7).expect("the star scenario is satisfiable");
    assert_eq!(topology.critical_path(), vec![0, 1, 3]);
}

#[test]
fn discards_inside_a_frame_unwind_with_it() {
    let mut graph = TopologyGraph::new(3);
    graph.assign_params(&[
        RoomParams::new(1, 0, 0),
        RoomParams::new(2, 1, 0),
        RoomParams::new(1, 2, 0),
    ]);
    candidates::seed_domains(&mut graph).expect("constraints are satisfiable");
    assert_eq!(graph.rooms()[0].domain().len(), 2);

    let mut log = UndoLog::new();

    // no frame open: the discard is permanent
    let doomed = graph.rooms()[0].domain()[0].clone();
    discard_candidate(&mut graph, &mut log, 0, &doomed);
    log.pop_and_restore(&mut graph);
    assert_eq!(graph.rooms()[0].domain().len(), 1);

    // inside a frame: unwinding the frame brings the candidate back
    let survivor = graph.rooms()[0].domain()[0].clone();
    log.push_frame();
    discard_candidate(&mut graph, &mut log, 0, &survivor);
    assert!(graph.rooms()[0].domain().is_empty());
    log.pop_and_restore(&mut graph);
    assert_eq!(graph.rooms()[0].domain().to_vec(), vec![survivor]);
}

#[test]
fn failed_candidates_are_not_retried() {
    // room 2's lexicographically first candidate ({0}) always contradicts
    // the entrance's singleton domain, so every seed must land on room 1.
    let params = [
        RoomParams::new(1, 0, 0),
        RoomParams::new(3, 1, 0),
        RoomParams::new(1, 2, 1),
        RoomParams::new(1, 2, 0),
    ];
    for seed in [0, 1, 99] {
        let topology = generate(&params, seed).expect("satisfiable after one backtrack");
        assert!(topology.rooms()[2].is_connected(1));
        assert!(!topology.rooms()[2].is_connected(0));
    }
}
