/// Deploy Mock Server Library
///
/// In-memory stand-in for the token distribution deployment server, usable as
/// a standalone binary or spawned from tests.

pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

// Re-export commonly used types
pub use server::{create_router, run_server, spawn};
pub use state::{InjectedFailure, MockOptions, MockState};
pub use types::*;
