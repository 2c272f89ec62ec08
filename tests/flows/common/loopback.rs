use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::{A, NS};
use hickory_proto::rr::{Name, RData, Record};
use iterdns_infrastructure::dns::forwarding::MessageBuilder;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// What a loopback server does with every query it receives.
#[derive(Debug, Clone)]
pub enum Zone {
    /// Refer `zone` to `nameserver`, with glue when given.
    Delegate {
        zone: &'static str,
        nameserver: &'static str,
        glue: Option<Ipv4Addr>,
    },
    /// Answer with one A record.
    Answer(Ipv4Addr),
    /// Read the query and never reply.
    Silent,
}

/// DNS servers on distinct loopback addresses sharing one port, so a real
/// `UdpProbe` configured with that port can walk between them.
pub struct LoopbackTopology {
    port: u16,
    shutdowns: Vec<oneshot::Sender<()>>,
}

impl LoopbackTopology {
    /// Binds every `(address, zone)` pair on a common ephemeral port.
    pub async fn start(servers: &[(Ipv4Addr, Zone)]) -> Result<Self, std::io::Error> {
        let mut port = 0;
        let mut shutdowns = Vec::new();

        for (ip, zone) in servers {
            let socket = UdpSocket::bind(SocketAddr::new(IpAddr::V4(*ip), port)).await?;
            port = socket.local_addr()?.port();

            let (tx, rx) = oneshot::channel();
            tokio::spawn(serve(socket, zone.clone(), rx));
            shutdowns.push(tx);
        }

        Ok(Self { port, shutdowns })
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Drop for LoopbackTopology {
    fn drop(&mut self) {
        for tx in self.shutdowns.drain(..) {
            let _ = tx.send(());
        }
    }
}

async fn serve(socket: UdpSocket, zone: Zone, mut shutdown_rx: oneshot::Receiver<()>) {
    let mut buf = vec![0u8; 512];

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            result = socket.recv_from(&mut buf) => {
                if let Ok((len, peer)) = result {
                    if let Some(reply) = respond(&buf[..len], &zone) {
                        let _ = socket.send_to(&reply, peer).await;
                    }
                }
            }
        }
    }
}

fn fqdn(name: &str) -> Name {
    Name::from_str(&format!("{}.", name.trim_end_matches('.'))).unwrap()
}

fn respond(query: &[u8], zone: &Zone) -> Option<Vec<u8>> {
    let request = Message::from_vec(query).ok()?;
    let question = request.queries().first()?.clone();

    let mut response = Message::new(request.id(), MessageType::Response, OpCode::Query);
    response.add_query(question.clone());

    match zone {
        Zone::Silent => return None,
        Zone::Answer(ip) => {
            response.add_answer(Record::from_rdata(
                question.name().clone(),
                300,
                RData::A(A(*ip)),
            ));
        }
        Zone::Delegate {
            zone,
            nameserver,
            glue,
        } => {
            response.add_name_server(Record::from_rdata(
                fqdn(zone),
                172800,
                RData::NS(NS(fqdn(nameserver))),
            ));
            if let Some(ip) = glue {
                response.add_additional(Record::from_rdata(
                    fqdn(nameserver),
                    172800,
                    RData::A(A(*ip)),
                ));
            }
        }
    }

    MessageBuilder::serialize_message(&response).ok()
}
