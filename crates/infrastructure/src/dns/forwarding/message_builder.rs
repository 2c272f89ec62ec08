//! DNS Message Builder
//!
//! Constructs the wire-format queries sent to each delegation level using
//! `hickory-proto`. Queries are iterative: the RD flag is left clear, every
//! server is expected to answer or refer, never to recurse on our behalf.

use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use iterdns_domain::{DomainError, RecordType};
use std::str::FromStr;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build an iterative query and serialize it.
    ///
    /// # Arguments
    /// * `domain` - Domain name to query (e.g., "example.com")
    /// * `record_type` - DNS record type (A, AAAA, NS, ...)
    pub fn build_query(domain: &str, record_type: &RecordType) -> Result<Vec<u8>, DomainError> {
        Self::build_query_with_id(domain, record_type).map(|(_, bytes)| bytes)
    }

    /// Build a query message and return both its ID and bytes
    pub fn build_query_with_id(
        domain: &str,
        record_type: &RecordType,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Name::from_str(domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(false);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    /// Copy of `message` carrying transaction `id`.
    ///
    /// Used to hand an upstream answer back to the original requester, whose
    /// query ID differs from the one we sent upstream.
    pub fn with_id(message: &[u8], id: u16) -> Vec<u8> {
        let mut out = message.to_vec();
        if out.len() >= 2 {
            out[..2].copy_from_slice(&id.to_be_bytes());
        }
        out
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::MalformedResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
