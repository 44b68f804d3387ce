use std::net::{IpAddr, Ipv6Addr, SocketAddr};

/// Parse host:port into a SocketAddr, with fallback to 0.0.0.0.
pub fn parse_bind_address(host: &str, port: u16) -> SocketAddr {
    host.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, port))
        .or_else(|_| host.parse::<SocketAddr>())
        .or_else(|_| host.parse::<Ipv6Addr>().map(|ip| SocketAddr::new(IpAddr::V6(ip), port)))
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], port)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_hosts_keep_their_address() {
        assert_eq!(
            parse_bind_address("127.0.0.1", 3000),
            SocketAddr::from(([127, 0, 0, 1], 3000))
        );
        assert_eq!(parse_bind_address("::1", 3000).to_string(), "[::1]:3000");
    }

    #[test]
    fn hostnames_fall_back_to_any_address() {
        assert_eq!(
            parse_bind_address("relay.internal", 8080),
            SocketAddr::from(([0, 0, 0, 0], 8080))
        );
    }
}
