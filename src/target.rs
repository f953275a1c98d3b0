use std::time::Duration;

pub const DEFAULT_TTL: u8 = 255;
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const MIN_PING_COUNT: u32 = 1;
pub const MAX_PING_COUNT: u32 = 5;

/// Configuration for one probe session. May be reused across probe calls;
/// not safe for concurrent mutation.
#[derive(Debug, Clone)]
pub struct Target {
    host: String,
    ttl: u8,
    port: u16,
    timeout: Duration,
    ping_count: u32,
}

impl Target {
    /// An empty host, or one carrying whitespace or shell metacharacters,
    /// is a configuration error and is rejected here, before any network
    /// activity. The probers only ever pass the host through an argv-style
    /// process interface, but a host that would need shell escaping is
    /// never a valid hostname or IP literal anyway.
    pub fn new(host: &str) -> anyhow::Result<Self> {
        validate_host(host)?;
        Ok(Self {
            host: host.to_string(),
            ttl: DEFAULT_TTL,
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            ping_count: MIN_PING_COUNT,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: &str) -> anyhow::Result<()> {
        validate_host(host)?;
        self.host = host.to_string();
        Ok(())
    }

    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    pub fn set_ttl(&mut self, ttl: u8) {
        self.ttl = ttl;
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn ping_count(&self) -> u32 {
        self.ping_count
    }

    /// Clamped to [1, 5].
    pub fn set_ping_count(&mut self, count: u32) {
        self.ping_count = count.clamp(MIN_PING_COUNT, MAX_PING_COUNT);
    }
}

fn validate_host(host: &str) -> anyhow::Result<()> {
    if host.is_empty() {
        return Err(anyhow::anyhow!("host must not be empty"));
    }
    if host.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(anyhow::anyhow!("host contains whitespace or control characters"));
    }
    if host.contains(['$', '`', ';', '&', '|', '<', '>', '(', ')', '"', '\'', '\\']) {
        return Err(anyhow::anyhow!("host contains shell metacharacters"));
    }
    Ok(())
}
