use std::process;
use std::time::Duration;

/// Generate a random identifier for ICMP echo requests
pub fn generate_identifier() -> u16 {
    use rand::Rng;
    rand::thread_rng().gen_range(1..=65535)
}

/// Elapsed wall time in milliseconds, rounded to the nearest integer.
pub fn round_ms(elapsed: Duration) -> u32 {
    (elapsed.as_secs_f64() * 1000.0).round() as u32
}

/// Print error message and exit with error code
pub fn exit_with_error(message: &str, code: i32) -> ! {
    eprintln!("rprobe: {}", message);
    process::exit(code);
}
