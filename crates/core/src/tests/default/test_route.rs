use std::collections::BTreeSet;

use async_trait::async_trait;
use bytes::Bytes;
use ringchord_transport::core::callback::CallbackError;
use ringchord_transport::core::callback::TransportCallback;

use super::*;
use crate::dht::Pointer;
use crate::error::Error;
use crate::error::Result;
use crate::message::encode;
use crate::message::GetClosestPrecedingFingerResponse;
use crate::message::Response;
use crate::protocol::route_to_predecessor;
use crate::protocol::route_to_successor;

const BITS: u8 = 3;

/// Nodes 0..7 on a 3-bit ring. Node 7 knows only node 0, nodes 0 and 4 know all their fingers.
async fn prepare_ring() -> Vec<ChordContext> {
    let transport = memory_transport();
    let mut nodes = vec![];
    for v in 0..8 {
        nodes.push(prepare_node(transport.clone(), v, BITS).await);
    }
    put(&nodes[7], 0);
    for v in [1, 2, 4] {
        put(&nodes[0], v);
    }
    for v in [5, 6, 0] {
        put(&nodes[4], v);
    }
    nodes
}

#[tokio::test]
async fn test_route_to_predecessor_two_hops() -> Result<()> {
    let nodes = prepare_ring().await;
    assert_eq!(finger_ids(&nodes[7]), vec![0, 7, 7]);
    assert_eq!(finger_ids(&nodes[0]), vec![1, 2, 4]);
    assert_eq!(finger_ids(&nodes[4]), vec![5, 6, 0]);

    let searcher = &nodes[4];
    let start = Pointer::External(ext(7, BITS));
    let outcome = route_to_predecessor(searcher, start, id(5, BITS)).await?;

    assert!(matches!(outcome.pointer, Pointer::Internal(p) if p.id == id(4, BITS)));
    assert_eq!(outcome.contacted, BTreeSet::from([addr(7), addr(0)]));
    Ok(())
}

#[tokio::test]
async fn test_route_to_successor_adds_one_hop() -> Result<()> {
    let nodes = prepare_ring().await;

    // predecessor of 5 is the searcher itself, its own successor answers
    let outcome =
        route_to_successor(&nodes[4], Pointer::External(ext(7, BITS)), id(5, BITS)).await?;
    assert_eq!(outcome.pointer.id(), id(5, BITS));
    assert_eq!(outcome.contacted, BTreeSet::from([addr(7), addr(0)]));

    // predecessor of 1 is node 0, asked with FindSuccessor
    let outcome =
        route_to_successor(&nodes[4], Pointer::External(ext(7, BITS)), id(1, BITS)).await?;
    assert_eq!(outcome.pointer.id(), id(1, BITS));
    assert_eq!(outcome.pointer.address(), Some(&addr(1)));
    assert_eq!(outcome.contacted, BTreeSet::from([addr(7), addr(0)]));
    Ok(())
}

#[tokio::test]
async fn test_route_starting_locally() -> Result<()> {
    let nodes = prepare_ring().await;
    let start = Pointer::Internal(nodes[0].base());

    // 1 is owned by the successor of node 0
    let outcome = route_to_predecessor(&nodes[0], start.clone(), id(1, BITS)).await?;
    assert!(matches!(outcome.pointer, Pointer::Internal(_)));
    assert!(outcome.contacted.is_empty());

    // 6 is past finger 4, which knows node 5
    let outcome = route_to_predecessor(&nodes[0], start, id(6, BITS)).await?;
    assert_eq!(outcome.pointer.id(), id(5, BITS));
    assert_eq!(outcome.contacted, BTreeSet::from([addr(4), addr(5)]));
    Ok(())
}

#[tokio::test]
async fn test_route_to_successor_on_lonely_node() {
    let node = prepare_node(memory_transport(), 3, BITS).await;
    let res = route_to_successor(&node, Pointer::Internal(node.base()), id(5, BITS)).await;
    assert!(matches!(res, Err(Error::RouteFailedSelf)));
}

#[tokio::test]
async fn test_route_failed_on_unreachable_node() {
    let transport = memory_transport();
    let node = prepare_node(transport.clone(), 4, BITS).await;
    // nothing listens on node-1
    let res = route_to_predecessor(&node, Pointer::External(ext(1, BITS)), id(3, BITS)).await;
    assert!(matches!(res, Err(Error::RouteFailed(_))));
}

/// Answers every closest preceding finger query with node 5.
struct Liar;

#[async_trait]
impl TransportCallback for Liar {
    async fn on_request(
        &self,
        _from: &str,
        _payload: &Bytes,
    ) -> std::result::Result<Bytes, CallbackError> {
        let resp = Response::GetClosestPrecedingFinger(GetClosestPrecedingFingerResponse {
            id: id(5, BITS),
            address: Some(addr(5)),
        });
        Ok(encode(&resp)?)
    }
}

#[tokio::test]
async fn test_route_failed_backward() -> Result<()> {
    let transport = memory_transport();
    let node = prepare_node(transport.clone(), 4, BITS).await;
    transport.listen("node-6", Box::new(Liar)).await?;

    // 5 is not between 6 and the target 5
    let res = route_to_predecessor(&node, Pointer::External(ext(6, BITS)), id(5, BITS)).await;
    assert!(matches!(res, Err(Error::RouteFailedBackward(_))));
    Ok(())
}
