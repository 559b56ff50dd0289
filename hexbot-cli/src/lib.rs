//! hexbot command-line layer
//!
//! Wire protocol, the game session loop and the commands behind the
//! `hexbot` binary. Every game decision is delegated to `hexbot-core`.

pub mod analyze;
pub mod play;
pub mod protocol;
pub mod session;
