use async_trait::async_trait;
use bytes::Bytes;
use iterdns_application::ports::{ProbeReply, ServerProbe};
use iterdns_domain::DomainError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// One-shot DNS over UDP probe.
///
/// Every probe binds its own ephemeral socket and drops it when the exchange
/// ends, whether it ended in a reply, a timeout or an I/O error.
#[derive(Debug, Clone, Copy)]
pub struct UdpProbe {
    port: u16,
}

impl UdpProbe {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn bind_addr(server: &SocketAddr) -> SocketAddr {
        if server.is_ipv4() {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
        } else {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
        }
    }

    async fn exchange(
        socket: &UdpSocket,
        server_addr: SocketAddr,
        message_bytes: &[u8],
    ) -> Result<Vec<u8>, DomainError> {
        let bytes_sent = socket.send_to(message_bytes, server_addr).await.map_err(|e| {
            DomainError::IoError(format!(
                "Failed to send UDP query to {}: {}",
                server_addr, e
            ))
        })?;

        debug!(server = %server_addr, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (bytes_received, from_addr) = socket.recv_from(&mut recv_buf).await.map_err(|e| {
            DomainError::IoError(format!(
                "Failed to receive UDP response from {}: {}",
                server_addr, e
            ))
        })?;

        if from_addr.ip() != server_addr.ip() {
            warn!(
                expected = %server_addr,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);

        debug!(
            server = %server_addr,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(recv_buf)
    }
}

impl Default for UdpProbe {
    fn default() -> Self {
        Self::new(53)
    }
}

#[async_trait]
impl ServerProbe for UdpProbe {
    async fn probe(
        &self,
        server: IpAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<ProbeReply, DomainError> {
        let server_addr = SocketAddr::new(server, self.port);

        let socket = UdpSocket::bind(Self::bind_addr(&server_addr))
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        let started = Instant::now();
        let bytes = tokio::time::timeout(timeout, Self::exchange(&socket, server_addr, query))
            .await
            .map_err(|_| DomainError::ProbeTimeout { server })??;

        Ok(ProbeReply {
            bytes: Bytes::from(bytes),
            rtt: started.elapsed(),
        })
    }
}
