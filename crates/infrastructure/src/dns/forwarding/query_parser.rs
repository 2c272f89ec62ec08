use super::record_type_map::RecordTypeMapper;
use hickory_proto::op::{Message, MessageType};
use iterdns_domain::{DnsQuery, DomainError};

/// Question of a query received from a client, plus the ID to answer with.
#[derive(Debug, Clone)]
pub struct IncomingQuery {
    pub id: u16,
    pub query: DnsQuery,
}

pub struct QueryParser;

impl QueryParser {
    /// Extracts name and type from a raw client query. Only the first
    /// question is considered.
    pub fn parse(bytes: &[u8]) -> Result<IncomingQuery, DomainError> {
        let message = Message::from_vec(bytes).map_err(|e| {
            DomainError::MalformedResponse(format!("Failed to parse DNS query: {}", e))
        })?;

        if message.message_type() != MessageType::Query {
            return Err(DomainError::MalformedResponse(
                "Expected a query, got a response".to_string(),
            ));
        }

        let question = message
            .queries()
            .first()
            .ok_or_else(|| DomainError::MalformedResponse("Query has no question".to_string()))?;

        let record_type = RecordTypeMapper::from_hickory(question.query_type()).ok_or_else(|| {
            DomainError::MalformedResponse(format!(
                "Unsupported query type {}",
                question.query_type()
            ))
        })?;

        Ok(IncomingQuery {
            id: message.id(),
            query: DnsQuery::new(question.name().to_utf8(), record_type),
        })
    }
}
