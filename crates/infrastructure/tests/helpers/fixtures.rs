#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, NS};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use iterdns_infrastructure::dns::forwarding::MessageBuilder;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Canned reply of a fixture server.
#[derive(Debug, Clone)]
pub enum Reply {
    /// A records for the queried name.
    Answer(Vec<Ipv4Addr>),
    /// NS records for `zone`, each with optional IPv4 glue.
    Referral {
        zone: String,
        nameservers: Vec<(String, Option<Ipv4Addr>)>,
    },
    /// Response with every section empty.
    Empty,
    /// Never answers.
    Timeout,
    /// Answers with bytes that don't parse as DNS.
    Malformed,
}

impl Reply {
    pub fn answer(ip: [u8; 4]) -> Self {
        Reply::Answer(vec![Ipv4Addr::from(ip)])
    }

    pub fn referral_with_glue(zone: &str, nameserver: &str, glue: [u8; 4]) -> Self {
        Reply::Referral {
            zone: zone.to_string(),
            nameservers: vec![(nameserver.to_string(), Some(Ipv4Addr::from(glue)))],
        }
    }

    pub fn referral_without_glue(zone: &str, nameservers: &[&str]) -> Self {
        Reply::Referral {
            zone: zone.to_string(),
            nameservers: nameservers.iter().map(|ns| (ns.to_string(), None)).collect(),
        }
    }
}

pub struct MessageFixtures;

impl MessageFixtures {
    pub fn name(name: &str) -> Name {
        let fqdn = if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{}.", name)
        };
        Name::from_str(&fqdn).unwrap()
    }

    fn response_to(id: u16, qname: &str) -> Message {
        let mut query = Query::new();
        query.set_name(Self::name(qname));
        query.set_query_type(RecordType::A);

        let mut message = Message::new(id, MessageType::Response, OpCode::Query);
        message.add_query(query);
        message
    }

    /// Wire bytes of `reply` answering question `qname` with transaction `id`.
    /// `None` for replies that never reach the wire.
    pub fn encode(reply: &Reply, id: u16, qname: &str) -> Option<Vec<u8>> {
        let message = match reply {
            Reply::Answer(addresses) => Self::answer(id, qname, addresses),
            Reply::Referral { zone, nameservers } => {
                Self::referral(id, qname, zone, nameservers)
            }
            Reply::Empty => Self::response_to(id, qname),
            Reply::Timeout => return None,
            Reply::Malformed => return Some(vec![0xde, 0xad, 0xbe]),
        };
        Some(MessageBuilder::serialize_message(&message).unwrap())
    }

    pub fn answer(id: u16, qname: &str, addresses: &[Ipv4Addr]) -> Message {
        let mut message = Self::response_to(id, qname);
        for ip in addresses {
            message.add_answer(Record::from_rdata(Self::name(qname), 300, RData::A(A(*ip))));
        }
        message
    }

    pub fn referral(
        id: u16,
        qname: &str,
        zone: &str,
        nameservers: &[(String, Option<Ipv4Addr>)],
    ) -> Message {
        let mut message = Self::response_to(id, qname);
        for (ns, glue) in nameservers {
            message.add_name_server(Record::from_rdata(
                Self::name(zone),
                172800,
                RData::NS(NS(Self::name(ns))),
            ));
            if let Some(ip) = glue {
                message.add_additional(Record::from_rdata(Self::name(ns), 172800, RData::A(A(*ip))));
            }
        }
        message
    }
}
