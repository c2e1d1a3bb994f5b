//! Round engines for the arcade games.
//!
//! Every engine is a plain state machine: it validates a request, touches the
//! caller's [`Wallet`] and [`JackpotPool`], and publishes one event per resolved
//! round to a [`Sink`]. Randomness always comes from a caller-provided
//! [`GameRng`], so any round can be replayed from its seed.

pub mod autoplay;
pub mod casino;
pub mod events;
pub mod state;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use autoplay::{AutoPlay, AutoPlayReport, CancelHandle, Step, StopReason};
pub use casino::{parse_bet, GameError, GameRng};
pub use events::Sink;
pub use state::{JackpotPool, Memory, SharedJackpot, Wallet};
