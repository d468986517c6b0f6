use std::time::Duration;

use super::*;
use crate::protocol::leave;
use crate::protocol::start_check_predecessor;
use crate::protocol::start_fix_finger_table;
use crate::protocol::start_join;
use crate::protocol::start_stabilize;

fn converged(nodes: &[ChordContext], ring: &[u64]) -> bool {
    let n = ring.len();
    nodes.iter().enumerate().all(|(i, node)| {
        successor_id(node) == Some(ring[(i + 1) % n])
            && predecessor_id(node) == Some(ring[(i + n - 1) % n])
    })
}

#[tokio::test]
async fn test_maintenance_loops_converge_and_stop() {
    let ring = [1, 5, 9, 13];
    let bits = 4;
    let transport = memory_transport();

    let mut nodes = vec![];
    for v in ring {
        let mut node = prepare_node(transport.clone(), v, bits).await;
        if v != ring[0] {
            node = node.with_bootstrap(addr(ring[0]));
        }
        start_join(&node).await.unwrap();
        nodes.push(node);
    }

    let mut handles = vec![];
    for node in &nodes {
        handles.push(tokio::spawn(start_stabilize(node.clone())));
        handles.push(tokio::spawn(start_fix_finger_table(node.clone())));
        handles.push(tokio::spawn(start_check_predecessor(node.clone())));
    }

    let mut done = false;
    for _ in 0..100 {
        if converged(&nodes, &ring) {
            done = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(done, "ring did not converge");

    for node in &nodes {
        leave(node).await.unwrap();
    }
    for handle in handles {
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("maintenance loop did not stop")
            .unwrap();
    }
}

#[tokio::test]
async fn test_maintenance_loop_stops_on_dead_node() {
    let node = prepare_node(memory_transport(), 2, 3).await;
    node.lock_state().unwrap().move_to_next_successor().unwrap();
    tokio::time::timeout(Duration::from_secs(1), start_stabilize(node))
        .await
        .expect("dead node kept stabilizing");
}
