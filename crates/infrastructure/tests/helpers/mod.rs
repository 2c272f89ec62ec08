#![allow(dead_code)]

pub mod dns_server_mock;
pub mod fixtures;

pub use dns_server_mock::MockDnsServer;
pub use fixtures::{MessageFixtures, Reply};
pub use topology::{FixtureProbe, FIXTURE_RTT};
