use crate::platform::OsFamily;
use crate::probe::ProbeResult;
use crate::target::Target;
use std::process::Command;

/// Tokens that introduce a reported round-trip time. `time<` appears in
/// Windows output for sub-millisecond replies.
const TIME_MARKERS: [&str; 2] = ["time=", "time<"];

/// External-command probe: run the system ping utility with the flag
/// syntax of the detected OS family and average the reported times.
///
/// The invocation goes through an argument vector, never a shell, so the
/// host cannot be re-interpreted as shell syntax. Captured stdout lines
/// are stored in `last_output` for the facade's accessor.
pub(crate) fn probe(target: &Target, os: OsFamily, last_output: &mut Vec<String>) -> ProbeResult {
    last_output.clear();

    let args = os.ping_args(target);
    log::debug!("running: ping {}", args.join(" "));

    let output = match Command::new("ping").args(&args).output() {
        Ok(output) => output,
        Err(e) => {
            log::debug!("failed to run ping: {}", e);
            return ProbeResult::Unreachable;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    *last_output = stdout.lines().map(str::to_string).collect();

    if !output.status.success() {
        log::debug!("ping exited with {}", output.status);
        return ProbeResult::Unreachable;
    }

    match average_latency(last_output.iter().map(String::as_str)) {
        Some(ms) => ProbeResult::Latency(ms),
        None => ProbeResult::Unreachable,
    }
}

/// Average the reported times across every line carrying a time marker,
/// rounded to the nearest millisecond. None when no line qualifies.
pub fn average_latency<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<u32> {
    let mut sum = 0.0;
    let mut samples = 0u32;

    for line in lines {
        if let Some(ms) = extract_time(line) {
            sum += ms;
            samples += 1;
        }
    }

    if samples == 0 {
        None
    } else {
        Some((sum / samples as f64).round() as u32)
    }
}

/// Pull the reported time out of one output line: the token after the
/// marker, up to whitespace, with the Windows `ms` suffix stripped.
fn extract_time(line: &str) -> Option<f64> {
    for marker in TIME_MARKERS {
        if let Some(pos) = line.find(marker) {
            let rest = &line[pos + marker.len()..];
            let token = rest.split_whitespace().next()?;
            return token.trim_end_matches("ms").parse::<f64>().ok();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_extract_unix_style_time() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=23.4 ms";
        assert_eq!(extract_time(line), Some(23.4));
    }

    #[test]
    fn test_extract_windows_style_time() {
        let line = "Reply from 1.1.1.1: bytes=32 time=16ms TTL=57";
        assert_eq!(extract_time(line), Some(16.0));
    }

    #[test]
    fn test_extract_submillisecond_time() {
        let line = "Reply from 127.0.0.1: bytes=32 time<1ms TTL=128";
        assert_eq!(extract_time(line), Some(1.0));
    }

    #[test]
    fn test_extract_ignores_unrelated_lines() {
        assert_eq!(extract_time("PING 1.1.1.1 (1.1.1.1) 56(84) bytes of data."), None);
        assert_eq!(extract_time("1 packets transmitted, 1 received"), None);
        assert_eq!(extract_time(""), None);
    }

    #[test]
    fn test_single_line_rounds() {
        let lines = ["64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=23.4 ms"];
        assert_eq!(average_latency(lines), Some(23));
    }

    #[test]
    fn test_multi_ping_average() {
        let lines = [
            "64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=10 ms",
            "1 packets transmitted",
            "64 bytes from 1.1.1.1: icmp_seq=2 ttl=57 time=20 ms",
        ];
        assert_eq!(average_latency(lines), Some(15));
    }

    #[test]
    fn test_no_qualifying_lines_is_none() {
        assert_eq!(average_latency(["request timed out"]), None);
        assert_eq!(average_latency([]), None);
    }

    #[test]
    fn test_probe_loopback_does_not_panic() {
        // Depends on a system ping binary being present
        let mut target = Target::new("127.0.0.1").unwrap();
        target.set_timeout(Duration::from_secs(2));
        let mut output = Vec::new();
        match probe(&target, OsFamily::detect(), &mut output) {
            ProbeResult::Latency(ms) => {
                println!("loopback ping in {}ms", ms);
                assert!(!output.is_empty());
            }
            ProbeResult::Unreachable => println!("system ping unavailable"),
        }
    }
}
