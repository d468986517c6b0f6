use super::*;
use crate::dht::Pointer;
use crate::error::Error;
use crate::protocol::check_predecessor;
use crate::protocol::leave;
use crate::protocol::route_to_successor;

const BITS: u8 = 6;
const RING: [u64; 5] = [3, 17, 30, 44, 58];

async fn converged_ring() -> Vec<ChordContext> {
    let nodes = build_ring(memory_transport(), &RING, BITS).await;
    stabilize_all(&nodes, 3).await;
    fix_all(&nodes, 2).await;
    nodes
}

#[tokio::test]
async fn test_route_forgets_unreachable_hop() {
    let nodes = converged_ring().await;
    assert!(finger_ids(&nodes[0]).contains(&30));
    leave(&nodes[2]).await.unwrap();

    let res = route_to_successor(&nodes[0], Pointer::Internal(nodes[0].base()), id(40, BITS)).await;
    assert!(matches!(res, Err(Error::RouteFailed(_))));

    assert_eq!(finger_ids(&nodes[0]), vec![17, 17, 17, 17, 44, 44]);
    assert!(!successor_ids(&nodes[0]).contains(&30));
}

#[tokio::test]
async fn test_departed_node_leaves_no_finger() {
    let nodes = converged_ring().await;
    leave(&nodes[2]).await.unwrap();
    let live: Vec<ChordContext> = nodes
        .into_iter()
        .filter(|n| n.self_id != id(30, BITS))
        .collect();

    // maintenance fails while the departure is discovered
    for _ in 0..4 {
        for node in &live {
            check_predecessor(node).await.ok();
            stabilize(node).await.ok();
            fix_finger_table(node).await.ok();
        }
    }

    let ring = [3, 17, 44, 58];
    let size = 1u64 << BITS;
    for node in &live {
        let v = node.self_id.value();
        assert!(!finger_ids(node).contains(&30), "fingers of {v}");
        assert!(!successor_ids(node).contains(&30), "successors of {v}");
        let expected_fingers: Vec<u64> = (0..BITS)
            .map(|k| true_successor(&ring, (v + (1 << k)) % size, BITS))
            .collect();
        assert_eq!(finger_ids(node), expected_fingers, "fingers of {v}");
    }

    let outcome = route_to_successor(&live[0], Pointer::Internal(live[0].base()), id(40, BITS))
        .await
        .unwrap();
    assert_eq!(outcome.pointer.id(), id(44, BITS));

    let report = fix_finger_table(&live[0]).await.unwrap();
    assert_eq!(report.failed, 0);
}
