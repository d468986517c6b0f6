use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use rand::distributions::Distribution;

use crate::callback::InnerTransportCallback;
use crate::core::callback::BoxedTransportCallback;
use crate::core::transport::TransportInterface;
use crate::core::transport::TransportMessage;
use crate::error::Error;
use crate::error::Result;

/// An endpoint living in the same process.
struct MemoryEndpoint {
    callback: InnerTransportCallback,
    responsive: AtomicBool,
}

/// [MemoryTransport] keeps all endpoints in process and
/// implements the [TransportInterface] trait with no real network.
///
/// Requests are encoded into a [TransportMessage] envelope and decoded by the
/// receiving endpoint, so both sides only ever see owned bytes.
#[derive(Default)]
pub struct MemoryTransport {
    endpoints: DashMap<String, Arc<MemoryEndpoint>>,
    /// Random delivery delay range in ms.
    delay: Option<(u64, u64)>,
}

impl MemoryTransport {
    /// Create a new [MemoryTransport] delivering requests immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every delivery by a random duration in `[min_ms, max_ms)`.
    pub fn with_random_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.delay = Some((min_ms, max_ms));
        self
    }

    /// An unresponsive endpoint stays registered but never answers, so requests to it time out.
    pub fn set_responsive(&self, address: &str, responsive: bool) -> Result<()> {
        let endpoint = self.endpoint(address)?;
        endpoint.responsive.store(responsive, Ordering::SeqCst);
        tracing::debug!("endpoint {} responsive: {}", address, responsive);
        Ok(())
    }

    fn endpoint(&self, address: &str) -> Result<Arc<MemoryEndpoint>> {
        // Clone the Arc out so that no map guard is held across an await.
        self.endpoints
            .get(address)
            .map(|e| e.value().clone())
            .ok_or_else(|| Error::EndpointNotFound(address.to_string()))
    }

    async fn deliver(&self, endpoint: &MemoryEndpoint, data: Bytes) -> Result<Bytes> {
        if let Some((min, max)) = self.delay {
            random_delay(min, max).await;
        }
        if !endpoint.responsive.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        endpoint.callback.on_message(&data).await
    }
}

#[async_trait]
impl TransportInterface for MemoryTransport {
    async fn listen(&self, address: &str, callback: BoxedTransportCallback) -> Result<()> {
        if self.endpoints.contains_key(address) {
            return Err(Error::EndpointAlreadyExists(address.to_string()));
        }
        self.endpoints.insert(
            address.to_string(),
            Arc::new(MemoryEndpoint {
                callback: InnerTransportCallback::new(address, callback),
                responsive: AtomicBool::new(true),
            }),
        );
        tracing::debug!("endpoint {} listening", address);
        Ok(())
    }

    async fn close(&self, address: &str) -> Result<()> {
        self.endpoints
            .remove(address)
            .map(|_| tracing::debug!("endpoint {} closed", address))
            .ok_or_else(|| Error::EndpointNotFound(address.to_string()))
    }

    async fn request(
        &self,
        from: &str,
        to: &str,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Bytes> {
        let endpoint = self.endpoint(to)?;
        let data = bincode::serialize(&TransportMessage::Request {
            from: from.to_string(),
            payload,
        })
        .map(Bytes::from)?;

        let response = tokio::time::timeout(timeout, self.deliver(&endpoint, data))
            .await
            .map_err(|_| Error::Timeout(to.to_string()))??;

        match bincode::deserialize(&response)? {
            TransportMessage::Response(body) => Ok(body),
            TransportMessage::Request { .. } => Err(Error::UnexpectedMessage(from.to_string())),
        }
    }

    fn addresses(&self) -> Vec<String> {
        self.endpoints.iter().map(|e| e.key().clone()).collect()
    }
}

async fn random_delay(min: u64, max: u64) {
    tokio::time::sleep(Duration::from_millis(random(min, max))).await;
}

fn random(low: u64, high: u64) -> u64 {
    if low >= high {
        return low;
    }
    let range = rand::distributions::Uniform::new(low, high);
    let mut rng = rand::thread_rng();
    range.sample(&mut rng)
}
