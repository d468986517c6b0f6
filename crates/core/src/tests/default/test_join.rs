use super::*;
use crate::error::Error;
use crate::protocol::join;
use crate::protocol::start_join;

#[tokio::test]
async fn test_join_without_bootstrap() {
    let node = prepare_node(memory_transport(), 3, 3).await;
    join(&node).await.unwrap();
    assert_eq!(finger_ids(&node), vec![3, 3, 3]);
    assert_eq!(successor_ids(&node), vec![3]);
}

#[tokio::test]
async fn test_join_through_itself() {
    let node = prepare_node(memory_transport(), 3, 3).await;
    let node = node.with_bootstrap(addr(3));
    assert!(matches!(join(&node).await, Err(Error::BootstrapIsSelf)));
}

#[tokio::test]
async fn test_join_unreachable_bootstrap() {
    let node = prepare_node(memory_transport(), 3, 3).await;
    let node = node.with_bootstrap(addr(5));
    assert!(matches!(join(&node).await, Err(Error::JoinFailed(_))));
    assert_eq!(finger_ids(&node), vec![3, 3, 3]);
}

#[tokio::test]
async fn test_join_other_ring() {
    let transport = memory_transport();
    let _other = prepare_node(transport.clone(), 5, 4).await;
    let node = prepare_node(transport, 3, 3).await.with_bootstrap(addr(5));
    assert!(matches!(join(&node).await, Err(Error::JoinFailed(_))));
}

#[tokio::test]
async fn test_join_two_nodes() {
    let transport = memory_transport();
    let node0 = prepare_node(transport.clone(), 0, 3).await;
    let node4 = prepare_node(transport, 4, 3).await.with_bootstrap(addr(0));

    start_join(&node4).await.unwrap();

    // the joining node routes every finger to the bootstrap
    assert_eq!(finger_ids(&node4), vec![0, 0, 0]);
    assert_eq!(successor_ids(&node4), vec![0, 4]);
    // update others told the bootstrap about the new node
    assert_eq!(finger_ids(&node0), vec![4, 4, 4]);
    assert_eq!(successor_ids(&node0), vec![4, 0]);
    // predecessors wait for stabilize
    assert_eq!(predecessor_id(&node0), None);
    assert_eq!(predecessor_id(&node4), None);

    stabilize_all(&[node0.clone(), node4.clone()], 1).await;
    assert_eq!(predecessor_id(&node0), Some(4));
    assert_eq!(predecessor_id(&node4), Some(0));
}

#[tokio::test]
async fn test_ring_converges() {
    let ring = [3, 17, 30, 44, 58];
    let bits = 6;
    let nodes = build_ring(memory_transport(), &ring, bits).await;
    stabilize_all(&nodes, 3).await;
    fix_all(&nodes, 2).await;

    let size = 1u64 << bits;
    for (i, node) in nodes.iter().enumerate() {
        let v = node.self_id.value();
        let n = ring.len();
        let expected_successors: Vec<u64> = (1..=3).map(|k| ring[(i + k) % n]).collect();
        assert_eq!(successor_ids(node), expected_successors, "successors of {v}");
        assert_eq!(predecessor_id(node), Some(ring[(i + n - 1) % n]), "predecessor of {v}");

        let expected_fingers: Vec<u64> = (0..bits)
            .map(|k| true_successor(&ring, (v + (1 << k)) % size, bits))
            .collect();
        assert_eq!(finger_ids(node), expected_fingers, "fingers of {v}");
    }
}
