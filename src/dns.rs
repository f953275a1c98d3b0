use dns_lookup::lookup_host;
use std::net::IpAddr;

/// Resolve a hostname or IP literal to a single address, preferring IPv4.
pub fn resolve(host: &str) -> anyhow::Result<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addresses = lookup_host(host)?;
    if addresses.is_empty() {
        return Err(anyhow::anyhow!("no addresses found for host: {}", host));
    }

    let preferred = addresses
        .iter()
        .find(|addr| addr.is_ipv4())
        .copied()
        .or_else(|| addresses.first().copied());

    preferred.ok_or_else(|| anyhow::anyhow!("no suitable address found for host: {}", host))
}
