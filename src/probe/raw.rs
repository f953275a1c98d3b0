use crate::dns;
use crate::icmp::IcmpPacket;
use crate::probe::ProbeResult;
use crate::target::Target;
use crate::utils;
use socket2::{Domain, Protocol, Socket, Type};
use std::mem::MaybeUninit;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

const RECV_BUFFER_SIZE: usize = 255;

/// Raw-socket ICMP probe. Opening the socket requires elevated privileges;
/// a creation failure is an expected environment condition and reports
/// unreachable rather than an error.
pub fn probe(target: &Target) -> ProbeResult {
    let ip = match dns::resolve(target.host()) {
        Ok(ip) => ip,
        Err(e) => {
            log::debug!("failed to resolve {}: {}", target.host(), e);
            return ProbeResult::Unreachable;
        }
    };

    if !ip.is_ipv4() {
        log::debug!("raw probe supports IPv4 only, got {}", ip);
        return ProbeResult::Unreachable;
    }

    let socket = match Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4)) {
        Ok(socket) => socket,
        Err(e) => {
            log::debug!("raw socket unavailable (privileges?): {}", e);
            return ProbeResult::Unreachable;
        }
    };

    if let Err(e) = socket.set_ttl(target.ttl() as u32) {
        log::debug!("failed to set TTL: {}", e);
        return ProbeResult::Unreachable;
    }

    let identifier = utils::generate_identifier();
    let sequence = 0;
    let packet = IcmpPacket::new_echo_request(identifier, sequence);
    let addr: SocketAddr = SocketAddr::new(ip, 0);

    let start = Instant::now();
    log::debug!("sending echo request to {} ({} bytes)", ip, packet.to_bytes().len());
    if let Err(e) = socket.send_to(&packet.to_bytes(), &addr.into()) {
        log::debug!("send failed: {}", e);
        return ProbeResult::Unreachable;
    }

    // The socket is dropped (closed) on every path out of this function.
    match await_reply(&socket, identifier, sequence, start, target.timeout()) {
        Some(elapsed) => ProbeResult::from_elapsed(elapsed),
        None => ProbeResult::Unreachable,
    }
}

/// Read datagrams until one is the echo reply to the request just sent or
/// the deadline passes. Every read is bounded by the remaining time budget
/// so a silent peer cannot block past the configured timeout.
fn await_reply(
    socket: &Socket,
    identifier: u16,
    sequence: u16,
    start: Instant,
    timeout: Duration,
) -> Option<Duration> {
    let deadline = start + timeout;

    loop {
        let remaining = deadline.checked_duration_since(Instant::now())?;
        if remaining.is_zero() {
            return None;
        }
        socket.set_read_timeout(Some(remaining)).ok()?;

        let mut buffer: [MaybeUninit<u8>; RECV_BUFFER_SIZE] =
            [MaybeUninit::uninit(); RECV_BUFFER_SIZE];
        let received = match socket.recv_from(&mut buffer) {
            Ok((n, _)) => n,
            Err(e) => {
                log::debug!("read failed: {}", e);
                return None;
            }
        };
        let elapsed = start.elapsed();

        let data: Vec<u8> = buffer[..received]
            .iter()
            .map(|b| unsafe { b.assume_init() })
            .collect();

        let Some(icmp_data) = strip_ip_header(&data) else {
            log::debug!("datagram too short: {} bytes", received);
            continue;
        };

        match IcmpPacket::from_bytes(icmp_data) {
            Ok(reply) if reply.matches(identifier, sequence) => return Some(elapsed),
            Ok(reply) => {
                log::debug!(
                    "ignoring datagram type={} code={} id={} seq={}",
                    reply.icmp_type,
                    reply.code,
                    reply.identifier,
                    reply.sequence
                );
            }
            Err(e) => log::debug!("unparseable datagram: {}", e),
        }
    }
}

/// A raw IPv4 socket may deliver the IP header ahead of the ICMP message.
/// Skip it when the version nibble says it is there.
fn strip_ip_header(data: &[u8]) -> Option<&[u8]> {
    if data.is_empty() {
        return None;
    }
    if data[0] >> 4 == 4 {
        let header_len = ((data[0] & 0x0F) as usize) * 4;
        if header_len < 20 || data.len() < header_len + 8 {
            return None;
        }
        Some(&data[header_len..])
    } else if data.len() >= 8 {
        Some(data)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icmp::ICMP_ECHO_REPLY;

    #[test]
    fn test_strip_ip_header_with_header() {
        let mut datagram = vec![0u8; 28];
        datagram[0] = 0x45; // IPv4, 20-byte header
        datagram[20] = ICMP_ECHO_REPLY;
        let icmp = strip_ip_header(&datagram).unwrap();
        assert_eq!(icmp.len(), 8);
        assert_eq!(icmp[0], ICMP_ECHO_REPLY);
    }

    #[test]
    fn test_strip_ip_header_with_options() {
        let mut datagram = vec![0u8; 32];
        datagram[0] = 0x46; // IPv4, 24-byte header
        datagram[24] = ICMP_ECHO_REPLY;
        let icmp = strip_ip_header(&datagram).unwrap();
        assert_eq!(icmp[0], ICMP_ECHO_REPLY);
    }

    #[test]
    fn test_strip_ip_header_bare_icmp() {
        let packet = IcmpPacket::new_echo_request(1, 0).to_bytes();
        let icmp = strip_ip_header(&packet).unwrap();
        assert_eq!(icmp, packet.as_slice());
    }

    #[test]
    fn test_strip_ip_header_rejects_short_datagrams() {
        assert!(strip_ip_header(&[]).is_none());
        assert!(strip_ip_header(&[0x45, 0, 0]).is_none());
        assert!(strip_ip_header(&[0x00, 1, 2, 3]).is_none());
    }

    #[test]
    fn test_probe_loopback_does_not_panic() {
        // Needs raw-socket privileges; either outcome is acceptable here
        let mut target = Target::new("127.0.0.1").unwrap();
        target.set_timeout(Duration::from_secs(1));
        match probe(&target) {
            ProbeResult::Latency(ms) => println!("loopback echo in {}ms", ms),
            ProbeResult::Unreachable => println!("raw probe unavailable (no privileges?)"),
        }
    }
}
