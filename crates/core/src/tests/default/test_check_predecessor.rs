use super::*;
use crate::protocol::check_predecessor;
use crate::protocol::leave;

#[tokio::test]
async fn test_check_live_predecessor() {
    let nodes = build_ring(memory_transport(), &[0, 4], 3).await;
    assert_eq!(predecessor_id(&nodes[0]), Some(4));
    assert!(!check_predecessor(&nodes[0]).await.unwrap());
    assert_eq!(predecessor_id(&nodes[0]), Some(4));
}

#[tokio::test]
async fn test_check_dead_predecessor() {
    let nodes = build_ring(memory_transport(), &[0, 4], 3).await;
    leave(&nodes[1]).await.unwrap();

    assert!(check_predecessor(&nodes[0]).await.unwrap());
    assert_eq!(predecessor_id(&nodes[0]), None);
    // nothing left to check
    assert!(!check_predecessor(&nodes[0]).await.unwrap());
}

#[tokio::test]
async fn test_check_predecessor_with_new_id() {
    let transport = memory_transport();
    let nodes = build_ring(transport.clone(), &[0, 4], 3).await;
    leave(&nodes[1]).await.unwrap();
    // another node takes over the address of node 4
    let imposter = ChordContext::new(id(6, 3), addr(4), transport, config(3)).unwrap();
    crate::protocol::start_responder(&imposter).await.unwrap();

    assert!(check_predecessor(&nodes[0]).await.unwrap());
    assert_eq!(predecessor_id(&nodes[0]), None);
}
