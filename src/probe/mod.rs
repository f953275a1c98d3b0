pub mod command;
pub mod raw;
pub mod tcp;

use crate::dns;
use crate::platform::OsFamily;
use crate::target::Target;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Outcome of one probe: a round-trip latency in whole milliseconds, or
/// the single unreachable value. Host-down is a normal outcome, so no
/// probe strategy ever surfaces an error for refusal, timeout, missing
/// privilege, or an unresolvable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeResult {
    Latency(u32),
    Unreachable,
}

impl ProbeResult {
    pub(crate) fn from_elapsed(elapsed: Duration) -> Self {
        ProbeResult::Latency(crate::utils::round_ms(elapsed))
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeResult::Latency(_))
    }

    pub fn latency_ms(&self) -> Option<u32> {
        match self {
            ProbeResult::Latency(ms) => Some(*ms),
            ProbeResult::Unreachable => None,
        }
    }
}

/// Probe strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Invoke the system ping utility and parse its output.
    #[default]
    Command,
    /// Time a TCP connect to the configured port.
    Tcp,
    /// Send a raw ICMP echo request (requires elevated privileges).
    Icmp,
}

impl FromStr for Method {
    type Err = anyhow::Error;

    // An unrecognized name is a configuration error, surfaced here at the
    // parse boundary instead of being silently reported as unreachable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command" | "external" | "ping" => Ok(Method::Command),
            "tcp" | "tcp-connect" => Ok(Method::Tcp),
            "icmp" | "raw" | "raw-socket" => Ok(Method::Icmp),
            other => Err(anyhow::anyhow!(
                "unknown probe method '{}' (expected command, tcp or icmp)",
                other
            )),
        }
    }
}

/// Facade over the three probe strategies. Holds the target configuration
/// and the OS family detected at startup; one probe in flight at a time.
#[derive(Debug)]
pub struct Prober {
    target: Target,
    os: OsFamily,
    last_output: Vec<String>,
}

impl Prober {
    pub fn new(target: Target, os: OsFamily) -> Self {
        Self {
            target,
            os,
            last_output: Vec::new(),
        }
    }

    /// Convenience constructor detecting the OS family of this process.
    pub fn with_host(host: &str) -> anyhow::Result<Self> {
        Ok(Self::new(Target::new(host)?, OsFamily::detect()))
    }

    pub fn probe(&mut self, method: Method) -> ProbeResult {
        match method {
            Method::Command => command::probe(&self.target, self.os, &mut self.last_output),
            Method::Tcp => tcp::probe(&self.target),
            Method::Icmp => raw::probe(&self.target),
        }
    }

    pub fn host(&self) -> &str {
        self.target.host()
    }

    pub fn set_host(&mut self, host: &str) -> anyhow::Result<()> {
        self.target.set_host(host)
    }

    pub fn ttl(&self) -> u8 {
        self.target.ttl()
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.target.set_ttl(ttl);
    }

    pub fn port(&self) -> u16 {
        self.target.port()
    }

    pub fn set_port(&mut self, port: u16) {
        self.target.set_port(port);
    }

    pub fn timeout(&self) -> Duration {
        self.target.timeout()
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.target.set_timeout(timeout);
    }

    pub fn ping_count(&self) -> u32 {
        self.target.ping_count()
    }

    pub fn set_ping_count(&mut self, count: u32) {
        self.target.set_ping_count(count);
    }

    /// Raw stdout lines captured by the most recent external-command probe.
    pub fn last_output(&self) -> &[String] {
        &self.last_output
    }

    /// Resolved IP address of the current host, IPv4 preferred.
    pub fn resolve(&self) -> anyhow::Result<IpAddr> {
        dns::resolve(self.target.host())
    }
}
