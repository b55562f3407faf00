//! Unit tests for the topology graph.

use rstest::{fixture, rstest};

use crate::error::TopologyError;
use crate::room::NeighbourSet;

use super::TopologyGraph;

/// Five rooms wired as the chain 0-1-2-3-4.
#[fixture]
fn chain() -> TopologyGraph {
    let mut graph = TopologyGraph::new(5);
    for id in 0..4 {
        graph.connect(id, id + 1);
    }
    graph
}

#[rstest]
fn critical_path_follows_the_chain(chain: TopologyGraph) {
    assert_eq!(chain.critical_path(), vec![0, 1, 2, 3, 4]);
}

#[rstest]
fn shortcut_rewrites_the_critical_path(mut chain: TopologyGraph) {
    chain.connect(0, 4);
    assert_eq!(chain.critical_path(), vec![0, 4]);
}

#[rstest]
fn connect_is_symmetric_without_double_counting(mut chain: TopologyGraph) {
    let before = (chain.rooms[1].degree(), chain.rooms[3].degree());
    chain.connect(1, 3);
    chain.connect(3, 1);

    assert!(chain.rooms[1].is_connected(3));
    assert!(chain.rooms[3].is_connected(1));
    assert_eq!(chain.rooms[1].degree(), before.0 + 1);
    assert_eq!(chain.rooms[3].degree(), before.1 + 1);
}

#[rstest]
fn self_loop_connect_is_a_no_op(mut chain: TopologyGraph) {
    let before = chain.edge_count();
    chain.connect(2, 2);
    assert_eq!(chain.edge_count(), before);
    assert!(!chain.rooms[2].is_connected(2));
}

#[rstest]
fn disconnect_removes_both_directions(mut chain: TopologyGraph) {
    chain.disconnect(1, 2);
    assert!(!chain.rooms[1].is_connected(2));
    assert!(!chain.rooms[2].is_connected(1));
    assert!(chain.path_to(0, 4).is_empty());
}

#[test]
fn path_to_is_empty_when_unreachable() {
    let mut graph = TopologyGraph::new(4);
    graph.connect(0, 1);
    assert!(graph.path_to(0, 3).is_empty());
    assert!(graph.critical_path().is_empty());
    assert!(!graph.is_complete());
}

#[test]
fn path_to_self_is_the_single_room() {
    let graph = TopologyGraph::new(2);
    assert_eq!(graph.path_to(1, 1), vec![1]);
}

#[rstest]
fn completeness_requires_every_room_connected(chain: TopologyGraph) {
    assert!(chain.is_complete());

    let mut graph = TopologyGraph::new(3);
    graph.connect(0, 2);
    // room 1 is isolated even though entrance and goal touch
    assert!(!graph.is_complete());
}

#[rstest]
#[case(2, &[(0, 1)], true)]
#[case(5, &[(0, 1), (1, 2), (2, 3), (3, 4)], true)]
fn planarity_bound_accepts_sparse_graphs(
    #[case] rooms: usize,
    #[case] edges: &[(usize, usize)],
    #[case] expected: bool,
) {
    let mut graph = TopologyGraph::new(rooms);
    for &(a, b) in edges {
        graph.connect(a, b);
    }
    assert_eq!(graph.is_planar(), expected);
}

#[test]
fn planarity_bound_rejects_the_complete_five_graph() {
    // K5 has 10 edges, one over the 3n - 6 = 9 bound.
    let mut graph = TopologyGraph::new(5);
    for a in 0..5 {
        for b in (a + 1)..5 {
            graph.connect(a, b);
        }
    }
    assert!(!graph.is_planar());
}

#[test]
fn instantiate_rejects_open_domains() {
    let mut graph = TopologyGraph::new(3);
    graph.room_mut(0).domain = vec![NeighbourSet::new(vec![1])];
    graph.room_mut(1).domain = vec![NeighbourSet::new(vec![0]), NeighbourSet::new(vec![2])];
    graph.room_mut(2).domain = vec![NeighbourSet::new(vec![1])];

    assert!(!graph.are_rooms_instantiated());
    assert_eq!(
        graph.instantiate(),
        Err(TopologyError::DomainNotSingleton { id: 1, candidates: 2 })
    );
}

#[test]
fn instantiate_realizes_singleton_domains() {
    let mut graph = TopologyGraph::new(3);
    graph.room_mut(0).domain = vec![NeighbourSet::new(vec![1])];
    graph.room_mut(1).domain = vec![NeighbourSet::new(vec![0, 2])];
    graph.room_mut(2).domain = vec![NeighbourSet::new(vec![1])];

    assert!(graph.are_rooms_instantiated());
    graph.instantiate().expect("all domains are singleton");

    assert_eq!(graph.to_adjacency_list(), vec![vec![1], vec![2], vec![]]);
    assert_eq!(graph.rooms[1].degree(), 2);
    assert!(graph.is_complete());
}

#[rstest]
fn adjacency_list_is_upper_triangular_and_sorted(mut chain: TopologyGraph) {
    chain.connect(4, 1);
    assert_eq!(
        chain.to_adjacency_list(),
        vec![vec![1], vec![2, 4], vec![3], vec![4], vec![]]
    );
}

#[rstest]
fn display_dump_marks_diagonal_and_missing_edges(chain: TopologyGraph) {
    let dump = chain.to_string();
    assert!(dump.contains(" &,"));
    assert!(dump.contains(" .,"));
    assert!(dump.contains(" 1,"));
    assert!(dump.contains("[0]: 1"));
}
