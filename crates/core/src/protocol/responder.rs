//! Passive side of a node: answers chord requests from local state.

use async_trait::async_trait;
use bytes::Bytes;
use ringchord_transport::core::callback::CallbackError;
use ringchord_transport::core::callback::TransportCallback;

use crate::dht::Address;
use crate::dht::ExternalPointer;
use crate::dht::FingerRoute;
use crate::dht::Pointer;
use crate::error::Error;
use crate::error::Result;
use crate::message::decode;
use crate::message::encode;
use crate::message::*;
use crate::protocol::ChordContext;

/// Transport callback answering the seven chord requests.
pub struct ChordResponder {
    ctx: ChordContext,
}

impl ChordResponder {
    /// Answer on behalf of the node of `ctx`.
    pub fn new(ctx: ChordContext) -> Self {
        Self { ctx }
    }

    /// Handle one request from the node at `from`.
    pub fn handle(&self, from: &Address, request: Request) -> Result<Response> {
        let self_id = self.ctx.self_id;
        let mut state = self.ctx.lock_state()?;

        let response = match request {
            Request::GetId(_) => Response::GetId(GetIdResponse { id: self_id }),

            Request::GetPredecessor(_) => {
                let pred = state.predecessor();
                Response::GetPredecessor(GetPredecessorResponse {
                    id: pred.map(|p| p.id),
                    address: pred.map(|p| p.address.clone()),
                })
            }

            Request::GetSuccessor(_) => Response::GetSuccessor(GetSuccessorResponse {
                entries: state
                    .successor_table()
                    .dump()
                    .iter()
                    .map(Pointer::to_entry)
                    .collect(),
            }),

            Request::GetClosestPrecedingFinger(GetClosestPrecedingFinger { id }) => {
                self_id.ensure_same_ring(&id)?;
                let (id, address) = match state.finger_table().route(id) {
                    FingerRoute::Found(_) => (self_id, None),
                    FingerRoute::SelfNode => match state.predecessor() {
                        Some(pred) => (pred.id, Some(pred.address.clone())),
                        None => state.finger_table().find_closest_preceding(id).to_entry(),
                    },
                    FingerRoute::ClosestPredecessor(p) => p.to_entry(),
                };
                Response::GetClosestPrecedingFinger(GetClosestPrecedingFingerResponse {
                    id,
                    address,
                })
            }

            Request::FindSuccessor(FindSuccessor { id }) => {
                self_id.ensure_same_ring(&id)?;
                let (id, address) = match state.finger_table().route(id) {
                    FingerRoute::Found(p) => p.to_entry(),
                    FingerRoute::SelfNode => (self_id, None),
                    FingerRoute::ClosestPredecessor(p) => p.to_entry(),
                };
                Response::FindSuccessor(FindSuccessorResponse { id, address })
            }

            Request::Notify(Notify { id }) => {
                self_id.ensure_same_ring(&id)?;
                let pred = state.notify(ExternalPointer::new(id, from.clone()));
                Response::Notify(NotifyResponse {
                    id: pred.map(|p| p.id),
                    address: pred.map(|p| p.address.clone()),
                })
            }

            // The index is only validated, the router lands wherever its id fits.
            Request::UpdateFingerTable(UpdateFingerTable { router_id, index }) => {
                self_id.ensure_same_ring(&router_id)?;
                if index >= self_id.bits() {
                    return Err(Error::FingerIndexOutOfRange(
                        index as usize,
                        self_id.bits() as usize,
                    ));
                }
                if router_id != self_id {
                    state.put_finger(ExternalPointer::new(router_id, from.clone()), false)?;
                }
                Response::UpdateFingerTable(UpdateFingerTableResponse)
            }
        };
        Ok(response)
    }
}

#[async_trait]
impl TransportCallback for ChordResponder {
    async fn on_request(&self, from: &str, payload: &Bytes) -> std::result::Result<Bytes, CallbackError> {
        let request: Request = decode(payload)?;
        let response = self.handle(&Address::from(from), request).map_err(|e| {
            tracing::warn!("{} failed to answer {}: {}", self.ctx.self_id, from, e);
            e
        })?;
        Ok(encode(&response)?)
    }
}
