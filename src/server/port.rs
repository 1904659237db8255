//! Port allocation for the listener.
//!
//! An explicit base port is tried first; when it is taken, the next port is
//! tried, using an offset shared by every allocation in the process so two
//! listeners never race for the same candidate. A base port of `0` asks the
//! OS for a free port instead.

use std::io;
use std::net::{IpAddr, SocketAddr, TcpListener};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::server::ServerError;

/// Most candidate ports tried by a single allocation.
pub const MAX_PORT_ATTEMPTS: u32 = 100;

static PORT_INCREMENT: AtomicU32 = AtomicU32::new(0);

/// Bind a listener on `host`, starting from `base_port`.
pub fn bind(host: IpAddr, base_port: u16) -> Result<TcpListener, ServerError> {
    if base_port == 0 {
        let addr = SocketAddr::new(host, 0);
        return TcpListener::bind(addr).map_err(|source| ServerError::Bind { addr, source });
    }

    for _ in 0..MAX_PORT_ATTEMPTS {
        let offset = PORT_INCREMENT.fetch_add(1, Ordering::SeqCst);
        let candidate = u32::from(base_port) + offset;
        let port = match u16::try_from(candidate) {
            Ok(port) => port,
            Err(_) => break,
        };

        let addr = SocketAddr::new(host, port);
        match TcpListener::bind(addr) {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                tracing::debug!("port {} is in use, trying the next one", port);
            }
            Err(source) => return Err(ServerError::Bind { addr, source }),
        }
    }

    Err(ServerError::PortsExhausted {
        base: base_port,
        attempts: MAX_PORT_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_ephemeral_port() {
        let listener = bind(LOCALHOST, 0).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[test]
    fn test_skips_port_in_use() {
        let taken = TcpListener::bind((LOCALHOST, 0)).unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        let listener = bind(LOCALHOST, taken_port).unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(port > taken_port);
    }

    #[test]
    fn test_offset_is_shared() {
        let first = bind(LOCALHOST, 20000).map(|l| l.local_addr().unwrap().port());
        let second = bind(LOCALHOST, 20000).map(|l| l.local_addr().unwrap().port());

        if let (Ok(first), Ok(second)) = (first, second) {
            assert!(second > first);
        }
    }

    #[test]
    fn test_top_of_range_is_exhausted() {
        // Every candidate past u16::MAX is out of range.
        PORT_INCREMENT.fetch_add(2, Ordering::SeqCst);
        let err = bind(LOCALHOST, u16::MAX).unwrap_err();
        assert!(matches!(err, ServerError::PortsExhausted { base: u16::MAX, .. }));
    }
}
