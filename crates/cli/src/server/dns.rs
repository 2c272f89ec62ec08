use iterdns_application::use_cases::ResolveDomainUseCase;
use iterdns_infrastructure::dns::forwarding::{MessageBuilder, QueryParser};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

/// Largest client query accepted over UDP.
const MAX_QUERY_SIZE: usize = 512;

/// Answers UDP queries by iterative resolution until the socket fails.
///
/// Every query is handled on its own task. Failed resolutions get no reply.
pub async fn start_dns_server(
    bind_addr: String,
    use_case: Arc<ResolveDomainUseCase>,
) -> anyhow::Result<()> {
    let socket_addr = SocketAddr::from_str(&bind_addr)?;

    info!(bind_address = %socket_addr, "Starting DNS server");

    let socket = Arc::new(UdpSocket::bind(socket_addr).await?);
    info!(protocol = "UDP", "DNS server listening");

    let mut buf = vec![0u8; MAX_QUERY_SIZE];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(error = %e, "Failed to receive query");
                continue;
            }
        };

        let query = buf[..len].to_vec();
        let socket = socket.clone();
        let use_case = use_case.clone();

        tokio::spawn(async move {
            if let Some(reply) = handle_query(&query, peer, &use_case).await {
                if let Err(e) = socket.send_to(&reply, peer).await {
                    warn!(client = %peer, error = %e, "Failed to send reply");
                }
            }
        });
    }
}

/// Resolves one raw client query and returns the reply to send back, if any.
pub async fn handle_query(
    query: &[u8],
    peer: SocketAddr,
    use_case: &ResolveDomainUseCase,
) -> Option<Vec<u8>> {
    let incoming = match QueryParser::parse(query) {
        Ok(incoming) => incoming,
        Err(e) => {
            warn!(client = %peer, error = %e, "Dropping unparseable query");
            return None;
        }
    };

    info!(client = %peer, query = %incoming.query, "Query received");

    let outcome = match use_case.execute(&incoming.query, None).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(client = %peer, query = %incoming.query, error = %e, "Resolution error");
            return None;
        }
    };

    match outcome.result.answer_message {
        Some(answer) if outcome.result.is_answer() => {
            debug!(client = %peer, bytes = answer.len(), "Relaying answer");
            Some(MessageBuilder::with_id(&answer, incoming.id))
        }
        _ => {
            info!(client = %peer, query = %incoming.query, "Resolution failed, no reply sent");
            None
        }
    }
}
