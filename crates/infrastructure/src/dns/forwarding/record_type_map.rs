use hickory_proto::rr::RecordType as HickoryRecordType;
use iterdns_domain::RecordType;

/// Converts between the domain record types and hickory's through their
/// wire numbers.
pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: &RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    /// `None` for types the resolver doesn't handle.
    pub fn from_hickory(hickory_type: HickoryRecordType) -> Option<RecordType> {
        RecordType::from_u16(u16::from(hickory_type))
    }
}
