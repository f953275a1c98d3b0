use crate::probe::Method;
use clap::{Arg, Command};

#[derive(Debug, Clone)]
pub struct ProbeArgs {
    pub target: String,
    pub method: Method,
    pub count: Option<u32>,
    pub ttl: Option<u8>,
    pub timeout_secs: Option<u64>,
    pub port: Option<u16>,
}

pub fn build_cli() -> Command {
    Command::new("rprobe")
        .version("0.1.0")
        .about("Check host reachability and measure round-trip latency")
        .arg(
            Arg::new("target")
                .help("Target hostname or IP address")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("method")
                .short('m')
                .long("method")
                .help("Probe strategy: command, tcp or icmp")
                .value_name("method")
                .default_value("command"),
        )
        .arg(
            Arg::new("count")
                .short('n')
                .help("Number of echo requests (1-5, command strategy)")
                .value_name("count")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("ttl")
                .short('i')
                .help("Time To Live")
                .value_name("TTL")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new("timeout")
                .short('w')
                .help("Timeout in seconds to wait for a reply")
                .value_name("seconds")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .help("Port to connect to (tcp strategy)")
                .value_name("port")
                .value_parser(clap::value_parser!(u16)),
        )
}

pub fn parse_args() -> anyhow::Result<ProbeArgs> {
    from_matches(build_cli().get_matches())
}

fn from_matches(matches: clap::ArgMatches) -> anyhow::Result<ProbeArgs> {
    let target = matches
        .get_one::<String>("target")
        .ok_or_else(|| anyhow::anyhow!("target is required"))?
        .clone();

    let method = matches
        .get_one::<String>("method")
        .map(|s| s.parse::<Method>())
        .transpose()?
        .unwrap_or_default();

    Ok(ProbeArgs {
        target,
        method,
        count: matches.get_one::<u32>("count").copied(),
        ttl: matches.get_one::<u8>("ttl").copied(),
        timeout_secs: matches.get_one::<u64>("timeout").copied(),
        port: matches.get_one::<u16>("port").copied(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<ProbeArgs> {
        from_matches(build_cli().try_get_matches_from(argv.iter().copied()).unwrap())
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["rprobe", "example.com"]).unwrap();
        assert_eq!(args.target, "example.com");
        assert_eq!(args.method, Method::Command);
        assert!(args.count.is_none());
        assert!(args.ttl.is_none());
        assert!(args.timeout_secs.is_none());
        assert!(args.port.is_none());
    }

    #[test]
    fn test_full_invocation() {
        let args = parse(&[
            "rprobe", "-m", "tcp", "-n", "3", "-i", "64", "-w", "2", "-p", "443", "example.com",
        ])
        .unwrap();
        assert_eq!(args.method, Method::Tcp);
        assert_eq!(args.count, Some(3));
        assert_eq!(args.ttl, Some(64));
        assert_eq!(args.timeout_secs, Some(2));
        assert_eq!(args.port, Some(443));
    }

    #[test]
    fn test_unknown_method_errors() {
        assert!(parse(&["rprobe", "-m", "carrier-pigeon", "example.com"]).is_err());
    }

    #[test]
    fn test_missing_target_rejected() {
        assert!(build_cli().try_get_matches_from(["rprobe"]).is_err());
    }
}
