//! Listener configuration

use crate::{Error, Result};
use std::net::{IpAddr, SocketAddr};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub hostname: String,
    /// Runtime worker threads
    pub workers: usize,
    /// Listen backlog
    pub backlog: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            hostname: "0.0.0.0".to_string(),
            workers: num_cpus::get(),
            backlog: 1024,
        }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Listen address; `hostname` must be an IP literal
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .hostname
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("{}:{}", self.hostname, self.port)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.hostname, "0.0.0.0");
        assert!(config.workers >= 1);
        assert_eq!(
            config.socket_addr().unwrap(),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::new().hostname("127.0.0.1").port(0).workers(0);
        assert_eq!(config.workers, 1);
        assert_eq!(config.socket_addr().unwrap().port(), 0);
    }

    #[test]
    fn test_ipv6() {
        let addr = ServerConfig::new().hostname("::1").port(8080).socket_addr().unwrap();
        assert_eq!(addr, "[::1]:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_invalid_address() {
        let err = ServerConfig::new().hostname("not a host").socket_addr().unwrap_err();
        assert!(matches!(err, Error::InvalidAddress(ref s) if s == "not a host:3000"));
    }
}
