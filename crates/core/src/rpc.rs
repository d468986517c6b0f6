//! Typed requests to remote chord nodes.

use std::time::Duration;

use ringchord_transport::core::transport::SharedTransport;

use crate::dht::Address;
use crate::dht::Id;
use crate::error::Error;
use crate::error::Result;
use crate::message::decode;
use crate::message::encode;
use crate::message::*;

/// Client side of the chord messages. Every call carries the configured deadline and
/// yields exactly one result: the typed answer or an error.
#[derive(Clone)]
pub struct ChordRpc {
    transport: SharedTransport,
    address: Address,
    timeout: Duration,
}

impl ChordRpc {
    /// Requests are sent from `address`.
    pub fn new(transport: SharedTransport, address: Address, timeout: Duration) -> Self {
        Self {
            transport,
            address,
            timeout,
        }
    }

    /// The local address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The underlying transport.
    pub fn transport(&self) -> &SharedTransport {
        &self.transport
    }

    /// Send `request` to `to` and wait for its response.
    pub async fn call(&self, to: &Address, request: Request) -> Result<Response> {
        tracing::debug!("{} -> {}: {}", self.address, to, request);
        let data = self
            .transport
            .request(self.address.as_str(), to.as_str(), encode(&request)?, self.timeout)
            .await?;
        decode(&data)
    }

    /// Query the id of `to`.
    pub async fn get_id(&self, to: &Address) -> Result<Id> {
        match self.call(to, Request::GetId(GetId)).await? {
            Response::GetId(resp) => Ok(resp.id),
            other => Err(unexpected(other)),
        }
    }

    /// Query the predecessor of `to`.
    pub async fn get_predecessor(&self, to: &Address) -> Result<Option<(Id, Option<Address>)>> {
        match self.call(to, Request::GetPredecessor(GetPredecessor)).await? {
            Response::GetPredecessor(resp) => Ok(resp.id.map(|id| (id, resp.address))),
            other => Err(unexpected(other)),
        }
    }

    /// Query the successor list of `to`.
    pub async fn get_successor(&self, to: &Address) -> Result<Vec<(Id, Option<Address>)>> {
        match self.call(to, Request::GetSuccessor(GetSuccessor)).await? {
            Response::GetSuccessor(resp) => Ok(resp.entries),
            other => Err(unexpected(other)),
        }
    }

    /// Ask `to` for the closest node it knows preceding `id`.
    pub async fn get_closest_preceding_finger(
        &self,
        to: &Address,
        id: Id,
    ) -> Result<(Id, Option<Address>)> {
        let request = Request::GetClosestPrecedingFinger(GetClosestPrecedingFinger { id });
        match self.call(to, request).await? {
            Response::GetClosestPrecedingFinger(resp) => Ok((resp.id, resp.address)),
            other => Err(unexpected(other)),
        }
    }

    /// Ask `to` for the successor of `id`.
    pub async fn find_successor(&self, to: &Address, id: Id) -> Result<(Id, Option<Address>)> {
        match self.call(to, Request::FindSuccessor(FindSuccessor { id })).await? {
            Response::FindSuccessor(resp) => Ok((resp.id, resp.address)),
            other => Err(unexpected(other)),
        }
    }

    /// Propose the local node, with id `id`, as predecessor of `to`.
    /// Returns the predecessor `to` ends up with.
    pub async fn notify(&self, to: &Address, id: Id) -> Result<Option<(Id, Option<Address>)>> {
        match self.call(to, Request::Notify(Notify { id })).await? {
            Response::Notify(resp) => Ok(resp.id.map(|id| (id, resp.address))),
            other => Err(unexpected(other)),
        }
    }

    /// Ask `to` to consider the local node, with id `router_id`, for its finger `index`.
    pub async fn update_finger_table(&self, to: &Address, router_id: Id, index: u8) -> Result<()> {
        let request = Request::UpdateFingerTable(UpdateFingerTable { router_id, index });
        match self.call(to, request).await? {
            Response::UpdateFingerTable(_) => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(resp: Response) -> Error {
    Error::UnexpectedResponse(resp.to_string())
}
