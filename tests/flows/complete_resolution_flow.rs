/// Complete Resolution Flow Test
///
/// Real UDP probes against loopback servers:
/// Query → Cache miss → Root → TLD → Authoritative → Cache → Trace log

mod common;
use common::{LoopbackTopology, Zone};

use iterdns_application::services::AnswerCache;
use iterdns_application::ports::CacheStatus;
use iterdns_application::use_cases::ResolveDomainUseCase;
use iterdns_domain::{DnsQuery, RecordType, Stage, StepServer};
use iterdns_infrastructure::dns::forwarding::{MessageBuilder, ResponseParser};
use iterdns_infrastructure::dns::{FileTraceSink, IterativeResolver, UdpProbe};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

const ROOT: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 1);
const TLD: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 2);
const AUTH: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 3);

async fn example_com() -> LoopbackTopology {
    LoopbackTopology::start(&[
        (
            ROOT,
            Zone::Delegate {
                zone: "com",
                nameserver: "a.gtld-servers.net",
                glue: Some(TLD),
            },
        ),
        (
            TLD,
            Zone::Delegate {
                zone: "example.com",
                nameserver: "a.iana-servers.net",
                glue: Some(AUTH),
            },
        ),
        (AUTH, Zone::Answer(Ipv4Addr::new(93, 184, 216, 34))),
    ])
    .await
    .expect("Failed to start loopback topology")
}

fn resolver(port: u16, roots: Vec<IpAddr>) -> Arc<IterativeResolver> {
    Arc::new(
        IterativeResolver::new(Arc::new(UdpProbe::new(port)), roots)
            .with_probe_timeout(Duration::from_millis(300)),
    )
}

// ============================================================================
// Full Resolution Flow Tests
// ============================================================================

#[tokio::test]
async fn test_complete_resolution_flow() {
    let topology = example_com().await;
    let resolver = resolver(topology.port(), vec![IpAddr::V4(ROOT)]);

    let result = resolver
        .resolve(&DnsQuery::new("example.com", RecordType::A))
        .await
        .unwrap();

    assert_eq!(result.addresses(), &[IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))]);
    assert_eq!(
        result.trace.stages(),
        vec![Stage::Root, Stage::Tld, Stage::Authoritative]
    );
    assert_eq!(
        result.trace.servers_visited(),
        vec![
            StepServer::Address(IpAddr::V4(ROOT)),
            StepServer::Address(IpAddr::V4(TLD)),
            StepServer::Address(IpAddr::V4(AUTH)),
        ]
    );
    assert!(result.trace.iter().all(|step| step.rtt.is_some()));
}

#[tokio::test]
async fn test_answer_is_relayed_verbatim() {
    let topology = example_com().await;
    let resolver = resolver(topology.port(), vec![IpAddr::V4(ROOT)]);

    let result = resolver
        .resolve(&DnsQuery::new("example.com", RecordType::A))
        .await
        .unwrap();

    let relayed = MessageBuilder::with_id(result.answer_message.as_ref().unwrap(), 0x4242);
    let response = ResponseParser::parse(&relayed).unwrap();

    assert_eq!(response.message.id(), 0x4242);
    assert_eq!(response.answer_addresses(), result.addresses());
}

#[tokio::test]
async fn test_cache_miss_then_hit_with_trace_log() {
    let topology = example_com().await;
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("resolver_log.txt");

    let use_case = ResolveDomainUseCase::new(resolver(topology.port(), vec![IpAddr::V4(ROOT)]))
        .with_sink(Arc::new(FileTraceSink::new(&log_path)));
    let cache = AnswerCache::new();
    let query = DnsQuery::new("example.com", RecordType::A);

    let first = use_case.execute(&query, Some(&cache)).await.unwrap();
    let second = use_case.execute(&query, Some(&cache)).await.unwrap();

    assert_eq!(first.cache_status, CacheStatus::Stored);
    assert_eq!(second.cache_status, CacheStatus::Hit);
    assert_eq!(first.result.addresses(), second.result.addresses());
    assert!(second.result.from_cache);

    let log = std::fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = log.lines().collect();

    assert_eq!(lines.len(), 3 + 1 + 1);
    assert!(lines[0].contains(" | example.com | Iterative | 127.0.0.1 | Step: Root | Response: com. -> NS -> a.gtld-servers.net. | RTT: "));
    assert!(lines[0].ends_with(" ms | Cache MISS"));
    assert!(lines[1].contains("| 127.0.0.2 | Step: TLD |"));
    assert!(lines[2].contains("| 127.0.0.3 | Step: Authoritative | Response: example.com. -> A -> 93.184.216.34 |"));
    assert!(lines[3].contains(" | example.com | TOTAL | TotalTime: "));
    assert!(lines[3].ends_with(" ms | Cache Stored"));
    assert!(lines[4].ends_with(
        " | example.com | Iterative | CACHE | Step: Cache | Response: 93.184.216.34 | RTT: 0 ms | Total: 0 ms | Cache HIT"
    ));
}
