//! The local metadata layer.
//!
//! [`LayerServer`] binds a loopback port, accepts requests on a background
//! thread and answers them from a worker pool. It stays up until
//! [`LayerServer::close`] is called or the value is dropped.

pub mod port;
pub mod router;

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;
use tiny_http::{Header, Request, Response, Server};

use crate::sources::GithubReleases;
use crate::util::Config;

pub use router::{Reply, Router};

/// Address the layer listens on. The base URL names it literally so clients
/// never try another loopback family first.
pub const LISTEN_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Checks made while waiting for a closed listener to let go of its port.
const RELEASE_POLLS: u32 = 200;
const RELEASE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Errors raised while bringing the listener up.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("no free port found after {attempts} attempts starting at {base}")]
    PortsExhausted { base: u16, attempts: u32 },

    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start HTTP listener: {0}")]
    Listener(String),
}

struct Running {
    server: Arc<Server>,
    stopping: Arc<AtomicBool>,
    acceptor: JoinHandle<()>,
}

/// A running metadata layer.
pub struct LayerServer {
    addr: SocketAddr,
    url: String,
    running: Mutex<Option<Running>>,
}

impl LayerServer {
    /// Start a layer backed by the configured GitHub host.
    pub fn start(config: &Config) -> Result<Self> {
        let layout = config.github_layout()?;
        let source = GithubReleases::new(layout.clone())?;
        let router = Router::new(layout, Arc::new(source))?;

        Self::start_with(config.base_port()?, config.threads(), router)
    }

    /// Start a layer on `base_port` answering with `router`.
    pub fn start_with(base_port: u16, threads: usize, router: Router) -> Result<Self> {
        let listener = port::bind(LISTEN_HOST, base_port)?;
        let addr = listener
            .local_addr()
            .with_context(|| "failed to read listener address")?;

        let server = Server::from_listener(listener, None)
            .map_err(|e| ServerError::Listener(e.to_string()))?;
        let server = Arc::new(server);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("fpkg-layer-worker-{}", i))
            .build()
            .with_context(|| "failed to create request worker pool")?;

        let stopping = Arc::new(AtomicBool::new(false));
        let acceptor = {
            let server = Arc::clone(&server);
            let stopping = Arc::clone(&stopping);
            let router = Arc::new(router);
            thread::Builder::new()
                .name("fpkg-layer-accept".to_string())
                .spawn(move || accept_loop(&server, &stopping, &pool, router))
                .with_context(|| "failed to spawn accept thread")?
        };

        let url = format!("http://{}", addr);
        tracing::info!("metadata layer listening on {}", url);

        Ok(LayerServer {
            addr,
            url,
            running: Mutex::new(Some(Running {
                server,
                stopping,
                acceptor,
            })),
        })
    }

    /// Base URL, `http://127.0.0.1:<port>`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The bound socket address.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Whether the layer still accepts requests.
    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }

    /// Stop accepting and release the port. Later calls do nothing.
    ///
    /// Returns once the port can be bound again.
    pub fn close(&self) {
        let Some(running) = self.lock().take() else {
            return;
        };

        running.stopping.store(true, Ordering::SeqCst);
        running.server.unblock();
        if running.acceptor.join().is_err() {
            tracing::warn!("accept thread panicked");
        }
        drop(running.server);

        if !wait_for_release(self.addr) {
            tracing::warn!("port {} still accepting after close", self.addr.port());
        }

        tracing::info!("metadata layer on {} closed", self.url);
    }

    fn lock(&self) -> MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for LayerServer {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for LayerServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerServer")
            .field("url", &self.url)
            .field("running", &self.is_running())
            .finish()
    }
}

static SHARED: Mutex<Option<Arc<LayerServer>>> = Mutex::new(None);

/// The process-wide layer, started on first use.
///
/// Later calls return the same instance while it is running; a closed
/// instance is replaced.
pub fn shared(config: &Config) -> Result<Arc<LayerServer>> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(server) = slot.as_ref().filter(|s| s.is_running()) {
        return Ok(Arc::clone(server));
    }

    let server = Arc::new(LayerServer::start(config)?);
    *slot = Some(Arc::clone(&server));
    Ok(server)
}

/// Close the process-wide layer, if one was started.
pub fn shutdown_shared() {
    let server = SHARED.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(server) = server {
        server.close();
    }
}

/// tiny_http closes its socket on its own listener thread after the server
/// is dropped; wait until connections are refused.
fn wait_for_release(addr: SocketAddr) -> bool {
    for _ in 0..RELEASE_POLLS {
        match TcpStream::connect_timeout(&addr, RELEASE_POLL_INTERVAL) {
            Err(e) if e.kind() == io::ErrorKind::ConnectionRefused => return true,
            Ok(stream) => drop(stream),
            Err(_) => {}
        }
        thread::sleep(RELEASE_POLL_INTERVAL);
    }
    false
}

fn accept_loop(
    server: &Server,
    stopping: &AtomicBool,
    pool: &rayon::ThreadPool,
    router: Arc<Router>,
) {
    loop {
        match server.recv() {
            Ok(request) => {
                let router = Arc::clone(&router);
                pool.spawn(move || respond(&router, request));
            }
            Err(_) if stopping.load(Ordering::SeqCst) => break,
            Err(e) => tracing::warn!("failed to accept request: {}", e),
        }
    }
}

fn respond(router: &Router, request: Request) {
    let method = request.method().to_string();
    let reply = router.handle(&method, request.url());

    let mut response =
        Response::from_data(reply.body.into_bytes()).with_status_code(reply.status);
    if let Some(header) = reply.location.and_then(|l| header("Location", &l)) {
        response = response.with_header(header);
    }
    if let Some(header) = reply.content_type.and_then(|c| header("Content-Type", c)) {
        response = response.with_header(header);
    }

    if let Err(e) = request.respond(response) {
        tracing::debug!("failed to send response: {}", e);
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}
