//! Native HTTP listener
//!
//! - Multi-threaded tokio runtime (owned by the caller)
//! - One task per accepted connection, served by hyper's HTTP/1.1 builder
//! - TCP_NODELAY for low latency

use crate::{Error, RequestHandler, Result, ServerConfig};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use socket2::{Domain, Protocol, Socket, Type};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Create a bound, listening TCP socket
///
/// SO_REUSEPORT is left off: a second listener on the same port must fail
/// with `AddrInUse` instead of sharing the port. SO_REUSEADDR is only set on
/// unix; on Windows it would let another socket bind a port already in use.
pub fn create_listener_socket(addr: &SocketAddr, backlog: i32) -> std::io::Result<Socket> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    // SO_REUSEADDR - allow binding to address in TIME_WAIT
    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    // TCP_NODELAY - disable Nagle's algorithm for lower latency
    socket.set_nodelay(true)?;

    socket.bind(&(*addr).into())?;
    socket.listen(backlog)?;
    socket.set_nonblocking(true)?;

    Ok(socket)
}

/// Counts connections currently being served
#[derive(Debug, Default)]
pub struct ConnectionTracker {
    active: AtomicU64,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; it stays counted until the guard is dropped
    pub fn track(self: &Arc<Self>) -> ConnectionGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            tracker: self.clone(),
        }
    }

    /// Current active connection count
    #[inline]
    pub fn count(&self) -> u64 {
        self.active.load(Ordering::SeqCst)
    }
}

/// Decrements the owning tracker on drop
#[derive(Debug)]
pub struct ConnectionGuard {
    tracker: Arc<ConnectionTracker>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.tracker.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A bound listener plus the handler it dispatches to
pub struct Server {
    listener: TcpListener,
    handler: RequestHandler,
    tracker: Arc<ConnectionTracker>,
}

impl Server {
    /// Bind the configured address. Must be called from within a tokio runtime.
    pub fn bind(config: &ServerConfig, handler: RequestHandler) -> Result<Self> {
        let addr = config.socket_addr()?;
        let socket = create_listener_socket(&addr, config.backlog)
            .map_err(|source| Error::Bind { addr, source })?;
        let listener = TcpListener::from_std(socket.into())?;

        tracing::info!(addr = %addr, "listening");

        Ok(Self {
            listener,
            handler,
            tracker: Arc::new(ConnectionTracker::new()),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn tracker(&self) -> Arc<ConnectionTracker> {
        self.tracker.clone()
    }

    /// Serve until the process is terminated
    pub async fn serve(self) {
        self.serve_until(std::future::pending::<()>()).await
    }

    /// Accept connections until `shutdown` resolves
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let Server {
            listener,
            handler,
            tracker,
        } = self;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(active = tracker.count(), "listener stopped");
                    break;
                }
                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            tracing::warn!(error = %e, "accept failed");
                            continue;
                        }
                    };

                    let guard = tracker.track();
                    tracing::debug!(peer = %peer, active = tracker.count(), "connection accepted");
                    spawn_connection(stream, handler.clone(), guard);
                }
            }
        }
    }
}

fn spawn_connection(
    stream: tokio::net::TcpStream,
    handler: RequestHandler,
    guard: ConnectionGuard,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let service = service_fn(move |req: hyper::Request<Incoming>| {
            let res = handler.handle(req);
            async move { Ok::<_, Infallible>(res) }
        });

        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
            // Clients hanging up mid-request are routine
            if e.is_incomplete_message() {
                tracing::debug!(error = %e, "connection closed early");
            } else {
                tracing::warn!(error = %e, "connection error");
            }
        }

        drop(guard);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_tracker() {
        let tracker = Arc::new(ConnectionTracker::new());
        assert_eq!(tracker.count(), 0);

        let first = tracker.track();
        let second = tracker.track();
        assert_eq!(tracker.count(), 2);

        drop(first);
        assert_eq!(tracker.count(), 1);
        drop(second);
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn test_listener_socket_rejects_second_bind() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let first = create_listener_socket(&addr, 16).unwrap();
        let bound = first.local_addr().unwrap().as_socket().unwrap();

        let err = create_listener_socket(&bound, 16).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
    }

    #[test]
    fn test_wildcard_bind_conflicts_with_loopback_listener() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let wildcard = SocketAddr::from(([0, 0, 0, 0], port));
        let err = create_listener_socket(&wildcard, 16).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
    }

    #[tokio::test]
    async fn test_bind_port_zero() {
        let config = ServerConfig::new().hostname("127.0.0.1").port(0);
        let server = Server::bind(&config, RequestHandler::default()).unwrap();
        assert_ne!(server.local_addr().unwrap().port(), 0);
        assert_eq!(server.tracker().count(), 0);
    }
}
