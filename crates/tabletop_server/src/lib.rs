//! # Tabletop Server - Shared Board Sessions
//!
//! Hosts many concurrent boards of one game variant behind a stateless
//! request/response API. Clients poll and mutate a board identified by an
//! 8-character id; the rules themselves live in [`tabletop_rules`].
//!
//! ## Architecture Overview
//!
//! * **Session Registry** - Maps board ids to sessions, creates them on first
//!   reference and evicts idle ones in the background
//! * **Session** - One board: activity counters plus a per-board lock around
//!   the game state
//! * **Turn Controller** - Enforces identity, turn order and undo history
//!   around a rule engine
//! * **HTTP Boundary** - axum router translating requests into controller calls
//!
//! ### Request Flow
//!
//! 1. The handler validates the board id and reads the player token
//! 2. The registry resolves the session under its map lock
//! 3. The session lock is taken for the whole operation
//! 4. The turn controller checks identity and turn, then delegates to the engine
//! 5. The updated state is serialized back to the client
//!
//! ## Error Handling
//!
//! * [`GameError`] - Request-scoped rejections, reported as 4xx JSON
//! * [`ServerError`] - Network and internal failures of the server itself

pub use board_id::BoardId;
pub use config::ServerConfig;
pub use error::{GameError, ServerError};
pub use identity::{PlayerToken, PLAYER_TOKEN_HEADER};
pub use server::TabletopServer;
pub use session::{GameStatus, Session, SessionRegistry, SessionSweeper};
pub use view::GameView;

pub mod board_id;
pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod server;
pub mod session;
pub mod view;
