use rprobe::{cli, utils, OsFamily, ProbeResult, Prober, Target};
use std::time::Duration;

fn main() {
    // Enable debug logging if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    }

    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => utils::exit_with_error(&format!("invalid arguments: {}", e), 2),
    };

    let mut target = match Target::new(&args.target) {
        Ok(target) => target,
        Err(e) => utils::exit_with_error(&format!("invalid target: {}", e), 2),
    };

    if let Some(ttl) = args.ttl {
        target.set_ttl(ttl);
    }
    if let Some(secs) = args.timeout_secs {
        target.set_timeout(Duration::from_secs(secs));
    }
    if let Some(port) = args.port {
        target.set_port(port);
    }
    if let Some(count) = args.count {
        target.set_ping_count(count);
    }

    let mut prober = Prober::new(target, OsFamily::detect());

    match prober.probe(args.method) {
        ProbeResult::Latency(ms) => println!("reply from {}: time={}ms", prober.host(), ms),
        ProbeResult::Unreachable => {
            println!("{} is unreachable", prober.host());
            std::process::exit(1);
        }
    }
}
