use crate::dns;
use crate::probe::ProbeResult;
use crate::target::Target;
use std::net::{SocketAddr, TcpStream};
use std::time::Instant;

/// TCP-connect probe: time the three-way handshake against
/// `host:port`. A successful connect only proves that something accepts
/// on that port, not that the intended service is running there.
pub fn probe(target: &Target) -> ProbeResult {
    let ip = match dns::resolve(target.host()) {
        Ok(ip) => ip,
        Err(e) => {
            log::debug!("failed to resolve {}: {}", target.host(), e);
            return ProbeResult::Unreachable;
        }
    };

    let addr = SocketAddr::new(ip, target.port());
    let start = Instant::now();
    match TcpStream::connect_timeout(&addr, target.timeout()) {
        Ok(stream) => {
            let elapsed = start.elapsed();
            // No data is exchanged; drop closes the connection
            drop(stream);
            ProbeResult::from_elapsed(elapsed)
        }
        Err(e) => {
            log::debug!("connect to {} failed: {}", addr, e);
            ProbeResult::Unreachable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Duration;

    #[test]
    fn test_probe_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut target = Target::new("127.0.0.1").unwrap();
        target.set_port(port);
        target.set_timeout(Duration::from_secs(1));

        let result = probe(&target);
        assert!(result.is_reachable());
    }

    #[test]
    fn test_probe_refused_port() {
        // Bind then drop to find a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut target = Target::new("127.0.0.1").unwrap();
        target.set_port(port);
        target.set_timeout(Duration::from_secs(1));

        assert_eq!(probe(&target), ProbeResult::Unreachable);
    }

    #[test]
    fn test_probe_unroutable_address_bounded_by_timeout() {
        let mut target = Target::new("254.254.254.254").unwrap();
        target.set_timeout(Duration::from_secs(1));

        let start = Instant::now();
        let result = probe(&target);
        assert_eq!(result, ProbeResult::Unreachable);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_probe_unresolvable_host() {
        let target = Target::new("host.invalid").unwrap();
        assert_eq!(probe(&target), ProbeResult::Unreachable);
    }
}
