use crate::target::Target;

/// Operating-system family of the machine running the probe, detected once
/// at startup and passed into the prober. Each family uses different flags
/// for its ping utility and a different unit suffix in reported latencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Darwin,
    OtherUnix,
}

impl OsFamily {
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    pub fn from_os_name(os: &str) -> Self {
        match os {
            "windows" => OsFamily::Windows,
            "macos" => OsFamily::Darwin,
            _ => OsFamily::OtherUnix,
        }
    }

    /// Argument vector for the system ping utility, host last. These are
    /// handed to the process spawner as discrete arguments; nothing here
    /// ever passes through a shell.
    pub fn ping_args(&self, target: &Target) -> Vec<String> {
        let count = target.ping_count().to_string();
        let ttl = target.ttl().to_string();
        let mut args = match self {
            OsFamily::Windows => {
                // Windows takes the timeout in milliseconds
                let timeout_ms = target.timeout().as_millis().to_string();
                vec!["-n".into(), count, "-i".into(), ttl, "-w".into(), timeout_ms]
            }
            OsFamily::Darwin => {
                let timeout_s = target.timeout().as_secs().max(1).to_string();
                vec!["-c".into(), count, "-m".into(), ttl, "-t".into(), timeout_s]
            }
            OsFamily::OtherUnix => {
                let timeout_s = target.timeout().as_secs().max(1).to_string();
                vec!["-c".into(), count, "-t".into(), ttl, "-w".into(), timeout_s]
            }
        };

        args.push(target.host().to_string());
        args
    }

    /// Windows ping prints `time=12ms`; Unix-style ping prints `time=12.3`
    /// with the unit elsewhere on the line.
    pub fn latency_has_ms_suffix(&self) -> bool {
        matches!(self, OsFamily::Windows)
    }
}
