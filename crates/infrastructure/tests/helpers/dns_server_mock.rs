#![allow(dead_code)]
use super::fixtures::{MessageFixtures, Reply};
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

type Responder = Arc<dyn Fn(&str) -> Reply + Send + Sync>;

/// In-process UDP DNS server answering from a responder closure.
///
/// The closure receives the query name and picks the reply; `Reply::Timeout`
/// makes the server swallow the query.
pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    /// Starts a server on an ephemeral port of 127.0.0.1.
    pub async fn start<F>(responder: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        Self::start_on(SocketAddr::from(([127, 0, 0, 1], 0)), responder).await
    }

    pub async fn start_on<F>(addr: SocketAddr, responder: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let socket = UdpSocket::bind(addr).await?;
        let local_addr = socket.local_addr()?;
        let responder: Responder = Arc::new(responder);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            if let Some(response) = Self::respond(&buf[..len], &responder) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr: local_addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn respond(query: &[u8], responder: &Responder) -> Option<Vec<u8>> {
        let request = Message::from_vec(query).ok()?;
        let qname = request.queries().first()?.name().to_utf8();
        MessageFixtures::encode(&responder(&qname), request.id(), &qname)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
