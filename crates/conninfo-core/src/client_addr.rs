use serde::{Deserialize, Serialize};

/// Which request input supplied a resolved client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressSource {
    /// Left-most entry of the `X-Forwarded-For` header
    ForwardedFor,
    /// `X-Real-IP` header (commonly set by nginx)
    RealIp,
    /// Host portion of the transport-layer peer address
    Transport,
}

impl std::fmt::Display for AddressSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressSource::ForwardedFor => write!(f, "x-forwarded-for"),
            AddressSource::RealIp => write!(f, "x-real-ip"),
            AddressSource::Transport => write!(f, "transport"),
        }
    }
}

/// Best-guess originating client address, with resolution provenance.
///
/// Computed fresh per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// The chosen IP/host string
    pub value: String,
    /// Which input the value came from
    pub source: AddressSource,
}

impl ResolvedAddress {
    /// Resolve the client address from proxy headers and the transport
    /// peer address, first match wins.
    ///
    /// `X-Forwarded-For` wins when its left-most entry is non-empty after
    /// trimming. Proxies forward these values unverified, so the result is
    /// display metadata, never an authorization input. `X-Real-IP` is
    /// consulted next, and the host portion of `transport` is the final
    /// fallback. Never fails: a transport address that does not look like
    /// `host:port` is echoed back unchanged.
    pub fn resolve(forwarded_for: Option<&str>, real_ip: Option<&str>, transport: &str) -> Self {
        // X-Forwarded-For can list multiple hops: "client, proxy1, proxy2".
        // The left-most entry is the originally-claimed client.
        if let Some(first) = forwarded_for.and_then(|xff| xff.split(',').next()) {
            let client = first.trim();
            if !client.is_empty() {
                return Self {
                    value: client.to_string(),
                    source: AddressSource::ForwardedFor,
                };
            }
        }

        if let Some(real_ip) = real_ip {
            let real_ip = real_ip.trim();
            if !real_ip.is_empty() {
                return Self {
                    value: real_ip.to_string(),
                    source: AddressSource::RealIp,
                };
            }
        }

        Self {
            value: transport_host(transport).to_string(),
            source: AddressSource::Transport,
        }
    }
}

/// Extract the host portion of a `host:port` peer address.
///
/// Handles bracketed IPv6 literals (`[::1]:8080` becomes `::1`). Inputs
/// with no port separator, or with multiple colons outside brackets (a
/// bare IPv6 address), are returned unchanged.
fn transport_host(addr: &str) -> &str {
    let Some((host, _port)) = addr.rsplit_once(':') else {
        return addr;
    };
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return inner;
    }
    if host.contains(':') {
        // Bare IPv6 literal such as "::1" - there is no port to strip.
        return addr;
    }
    host
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_host_strips_port() {
        assert_eq!(transport_host("192.168.1.1:8080"), "192.168.1.1");
        assert_eq!(transport_host("10.0.0.1:80"), "10.0.0.1");
        assert_eq!(transport_host(":8080"), "");
    }

    #[test]
    fn test_transport_host_bracketed_ipv6() {
        assert_eq!(transport_host("[::1]:8080"), "::1");
        assert_eq!(transport_host("[2001:db8::1]:443"), "2001:db8::1");
    }

    #[test]
    fn test_transport_host_echoes_portless_input() {
        assert_eq!(transport_host("192.168.1.1"), "192.168.1.1");
        assert_eq!(transport_host("::1"), "::1");
        assert_eq!(transport_host(""), "");
    }
}
