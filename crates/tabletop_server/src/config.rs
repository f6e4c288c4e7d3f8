//! Server configuration types and defaults.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tabletop_rules::Variant;

/// Idle time after which an unoccupied board is discarded.
pub const DEFAULT_SESSION_EXPIRY: Duration = Duration::from_secs(120);

/// How often the registry looks for expired boards.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Number of moves that can be taken back on a board.
pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// Configuration structure for one tabletop server instance.
///
/// Each instance hosts boards of exactly one [`Variant`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The socket address to bind the server to
    pub bind_address: SocketAddr,

    /// The game every board on this server plays
    pub variant: Variant,

    /// Idle window before an empty board is swept
    pub session_expiry: Duration,

    /// Period of the background sweep
    pub sweep_interval: Duration,

    /// Maximum undo depth per board
    pub history_depth: usize,
}

impl ServerConfig {
    /// Default settings for `variant`, listening on its usual port.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            bind_address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, variant.default_port())),
            variant,
            session_expiry: DEFAULT_SESSION_EXPIRY,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Line)
    }
}
