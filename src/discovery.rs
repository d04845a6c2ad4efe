//! Agent discovery through the headless service's DNS records.

use std::net::SocketAddr;

use async_trait::async_trait;
use tracing::debug;

use crate::error::DiscoveryError;

/// Enumerates the agents currently backing a service.
#[async_trait]
pub trait PeerResolver: Send + Sync {
    /// Resolves `service` to one address per agent, in resolver order.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails or yields no addresses.
    async fn resolve_peers(&self, service: &str) -> Result<Vec<SocketAddr>, DiscoveryError>;
}

/// Resolves through the system resolver, pairing every answer with the
/// agent port.
#[derive(Debug, Clone, Copy)]
pub struct DnsResolver {
    port: u16,
}

impl DnsResolver {
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self { port }
    }
}

#[async_trait]
impl PeerResolver for DnsResolver {
    async fn resolve_peers(&self, service: &str) -> Result<Vec<SocketAddr>, DiscoveryError> {
        let peers: Vec<SocketAddr> = tokio::net::lookup_host((service, self.port))
            .await
            .map_err(|source| DiscoveryError::Resolve {
                service: service.to_owned(),
                source,
            })?
            .collect();
        debug!("Service '{}' resolved to {:?}", service, peers);
        if peers.is_empty() {
            return Err(DiscoveryError::NoPeers {
                service: service.to_owned(),
            });
        }
        Ok(peers)
    }
}

/// Orders peers by address so repeated runs merge in the same order.
pub fn sort_peers(peers: &mut [SocketAddr]) {
    peers.sort_unstable();
}
