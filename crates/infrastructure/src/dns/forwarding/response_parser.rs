use bytes::Bytes;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{Name, RData, Record};
use iterdns_domain::DomainError;
use smallvec::SmallVec;
use std::net::IpAddr;
use tracing::debug;

/// A parsed upstream response together with its raw bytes.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub message: Message,

    /// Raw wire bytes of the upstream DNS response.
    pub raw_bytes: Bytes,
}

impl DnsResponse {
    pub fn rcode(&self) -> ResponseCode {
        self.message.response_code()
    }

    pub fn answers(&self) -> &[Record] {
        self.message.answers()
    }

    pub fn authority(&self) -> &[Record] {
        self.message.name_servers()
    }

    pub fn additionals(&self) -> &[Record] {
        self.message.additionals()
    }

    pub fn has_answers(&self) -> bool {
        !self.answers().is_empty()
    }

    /// A and AAAA addresses of the answer section, in message order.
    pub fn answer_addresses(&self) -> Vec<IpAddr> {
        self.answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::A(a) => Some(IpAddr::V4(a.0)),
                RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
                _ => None,
            })
            .collect()
    }

    /// IPv4 glue carried in the additional section.
    pub fn glue_addresses(&self) -> SmallVec<[IpAddr; 8]> {
        let mut glue = SmallVec::new();
        for record in self.additionals() {
            if let RData::A(a) = record.data() {
                let ip = IpAddr::V4(a.0);
                if !glue.contains(&ip) {
                    glue.push(ip);
                }
            }
        }
        glue
    }

    /// Nameserver hostnames named by NS records in the authority section.
    pub fn referral_nameservers(&self) -> Vec<Name> {
        self.authority()
            .iter()
            .filter_map(|record| match record.data() {
                RData::NS(ns) => Some(ns.0.clone()),
                _ => None,
            })
            .collect()
    }
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parses DNS response from owned bytes (zero-copy for raw_bytes).
    pub fn parse_bytes(response_bytes: Bytes) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(&response_bytes).map_err(|e| {
            DomainError::MalformedResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        debug!(
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            authority = message.name_servers().len(),
            additional = message.additionals().len(),
            "DNS response parsed"
        );

        Ok(DnsResponse {
            message,
            raw_bytes: response_bytes,
        })
    }

    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        Self::parse_bytes(Bytes::copy_from_slice(response_bytes))
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
