use crate::dns::forwarding::DnsResponse;
use hickory_proto::rr::Record;
use iterdns_domain::Stage;

/// Summary line used when a response carries neither answers nor authority records.
pub const EMPTY_SUMMARY: &str = "Referral or empty";

/// Stage of a responding step.
///
/// `level` is the 1-based delegation level within the current walk. The
/// first level is always Root; after that a response with authority records
/// and no answers is a TLD referral, anything else is Authoritative.
pub fn classify_stage(level: usize, response: &DnsResponse) -> Stage {
    if level <= 1 {
        Stage::Root
    } else if !response.authority().is_empty() && response.answers().is_empty() {
        Stage::Tld
    } else {
        Stage::Authoritative
    }
}

/// One line per answer record, or per authority record when there are no
/// answers.
pub fn summarize(response: &DnsResponse) -> Vec<String> {
    let records = if response.has_answers() {
        response.answers()
    } else {
        response.authority()
    };

    if records.is_empty() {
        return vec![EMPTY_SUMMARY.to_string()];
    }

    records.iter().map(describe_record).collect()
}

fn describe_record(record: &Record) -> String {
    format!(
        "{} -> {} -> {}",
        record.name(),
        record.record_type(),
        record.data()
    )
}
