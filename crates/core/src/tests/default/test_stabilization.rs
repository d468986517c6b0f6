use std::sync::Arc;

use super::*;
use crate::error::Error;
use crate::protocol::check_predecessor;
use crate::protocol::leave;
use crate::protocol::stabilize;

#[tokio::test]
async fn test_stabilize_lonely_node() {
    let node = prepare_node(memory_transport(), 2, 3).await;
    stabilize(&node).await.unwrap();
    assert_eq!(successor_ids(&node), vec![2]);
    assert_eq!(predecessor_id(&node), None);
}

#[tokio::test]
async fn test_stabilize_is_idempotent() {
    let recorder = Arc::new(RecordingTransport::default());
    let transport: SharedTransport = recorder.clone();
    let nodes = build_ring(transport, &[0, 4], 3).await;

    let notifies = recorder.notifies();
    let successors: Vec<_> = nodes.iter().map(successor_ids).collect();
    stabilize_all(&nodes, 3).await;

    // both successors already record their predecessor, nobody is notified again
    assert_eq!(recorder.notifies(), notifies);
    assert_eq!(nodes.iter().map(successor_ids).collect::<Vec<_>>(), successors);
}

#[tokio::test]
async fn test_stabilize_adopts_closer_successor() {
    let transport = memory_transport();
    let nodes = build_ring(transport.clone(), &[0, 4], 3).await;

    // node 2 only knows node 4 and notifies it
    let node2 = prepare_node(transport, 2, 3).await;
    put(&node2, 4);
    stabilize(&node2).await.unwrap();
    assert_eq!(predecessor_id(&nodes[1]), Some(2));

    // node 0 learns from node 4 that node 2 sits in between
    stabilize(&nodes[0]).await.unwrap();
    assert_eq!(successor_id(&nodes[0]), Some(2));
    assert_eq!(predecessor_id(&node2), Some(0));
    assert_eq!(successor_ids(&nodes[0]), vec![2, 4, 0]);
}

#[tokio::test]
async fn test_stabilize_recovers_from_failed_successor() {
    let nodes = build_ring(memory_transport(), &[0, 2, 5], 3).await;
    let (a, b, c) = (&nodes[0], &nodes[1], &nodes[2]);
    assert_eq!(successor_ids(a), vec![2, 5, 0]);
    assert_eq!(predecessor_id(c), Some(2));

    leave(b).await.unwrap();
    assert!(check_predecessor(c).await.unwrap());

    // the first round drops the failed successor
    assert!(matches!(stabilize(a).await, Err(Error::StabilizeFailed(_))));
    assert_eq!(successor_id(a), Some(5));

    stabilize(a).await.unwrap();
    assert_eq!(successor_ids(a), vec![5, 0]);
    assert_eq!(predecessor_id(c), Some(0));
}

#[tokio::test]
async fn test_stabilize_without_successor() {
    let node = prepare_node(memory_transport(), 2, 3).await;
    node.lock_state().unwrap().move_to_next_successor().unwrap();
    assert!(node.is_dead().unwrap());
    assert!(matches!(stabilize(&node).await, Err(Error::NodeDead)));
}
