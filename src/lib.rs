//! Host reachability probing with three interchangeable strategies:
//! the system ping utility, a timed TCP connect, or a raw ICMP echo
//! request. Every strategy normalizes to a single result contract:
//! round-trip latency in milliseconds, or unreachable.

pub mod cli;
pub mod dns;
pub mod icmp;
pub mod platform;
pub mod probe;
pub mod target;
pub mod utils;

pub use platform::OsFamily;
pub use probe::{Method, ProbeResult, Prober};
pub use target::Target;
