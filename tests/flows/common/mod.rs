#![allow(dead_code)]

pub mod loopback;

pub use loopback::{LoopbackTopology, Zone};
