use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::trace;

use super::Prober;

/// Full TCP handshake probe against a fixed host.
///
/// Relies on the platform's connect timeout. The stream is dropped right after the
/// handshake without reading or writing anything.
#[derive(Debug, Clone)]
pub struct TcpConnectProber {
    host: String,
}

impl TcpConnectProber {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, port: u16) -> bool {
        match TcpStream::connect((self.host.as_str(), port)).await {
            Ok(stream) => {
                drop(stream);
                true
            }
            Err(e) => {
                trace!("{}:{port} closed: {e}", self.host);
                false
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
