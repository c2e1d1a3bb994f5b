//! Cancelable repeating rounds.
//!
//! Auto-play drives a sequence of otherwise independent rounds (automatic free
//! spins, repeated paid spins) without tying them to wall-clock delays. The caller
//! owns pacing: every round ends at a resolved-event boundary, and the next round
//! only starts when [`AutoPlay::run`] loops back around.
//!
//! ## Stopping
//!
//! The sequence ends when:
//! 1. the [`CancelHandle`] was triggered (checked before each round, never mid-round),
//! 2. the optional round limit is reached,
//! 3. the round closure reports [`Step::Exhausted`], or
//! 4. the round closure returns an error. Errors are never retried; an
//!    `InsufficientFunds` or `InvalidBet` rejection simply ends the run.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let autoplay = AutoPlay::new().with_limit(50);
//! let cancel = autoplay.handle();
//! // hand `cancel` to whatever can close the game
//! let report = autoplay.run(|_| {
//!     machine.spin(100, &mut rng, &mut wallet, &mut jackpot, &mut sink)?;
//!     Ok(Step::Played)
//! });
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tracing::{debug, warn};

use crate::casino::GameError;

/// Shared flag that stops an auto-play sequence before its next round.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a single scheduled round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A round was played; schedule the next one.
    Played,
    /// Nothing left to play; no round was played.
    Exhausted,
}

/// Why an auto-play sequence ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    Exhausted,
    Cancelled,
    LimitReached,
    Rejected(GameError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoPlayReport {
    /// Rounds actually played.
    pub rounds: u32,
    pub stop: StopReason,
}

/// A cancelable sequence of rounds.
#[derive(Clone, Debug, Default)]
pub struct AutoPlay {
    handle: CancelHandle,
    limit: Option<u32>,
}

impl AutoPlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing cancel handle (e.g. one flag for every game a player has open).
    pub fn with_handle(handle: CancelHandle) -> Self {
        Self {
            handle,
            limit: None,
        }
    }

    /// Stop after `limit` rounds.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }

    /// Run rounds until a stop condition is met.
    ///
    /// `round` receives the zero-based index of the round about to be played.
    pub fn run<F>(&self, mut round: F) -> AutoPlayReport
    where
        F: FnMut(u32) -> Result<Step, GameError>,
    {
        let mut rounds = 0u32;
        let stop = loop {
            if self.handle.is_cancelled() {
                break StopReason::Cancelled;
            }
            if self.limit.is_some_and(|limit| rounds >= limit) {
                break StopReason::LimitReached;
            }
            match round(rounds) {
                Ok(Step::Played) => rounds += 1,
                Ok(Step::Exhausted) => break StopReason::Exhausted,
                Err(err) => {
                    warn!(?err, rounds, "auto-play stopped by rejected round");
                    break StopReason::Rejected(err);
                }
            }
        };
        debug!(rounds, ?stop, "auto-play finished");
        AutoPlayReport { rounds, stop }
    }
}
