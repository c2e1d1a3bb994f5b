//! Casino game execution module.
//!
//! This module contains the payout engines and round state machines:
//! - Slot machine (weighted sampling, grid evaluation, free spins, jackpot/malus)
//! - Chicken (risk multiplier curve, reveal/cash-out board)
//! - Scratch cards (tiered generation, priority-ordered evaluation)
//! - Roulette (European and American wheels)

pub mod chicken;
#[cfg(test)]
mod integration_tests;
pub mod paylines;
pub mod roulette;
pub mod sampler;
pub mod scratch;
pub mod slots;

use arcade_types::casino::{
    ConfigError, ERROR_EMPTY_SAMPLE_POOL, ERROR_INSUFFICIENT_FUNDS, ERROR_INVALID_BET,
    ERROR_INVALID_CONFIGURATION, ERROR_INVALID_MOVE, ERROR_NO_ACTIVE_ROUND,
    ERROR_ROUND_ALREADY_ACTIVE,
};
use arcade_types::Seed;
use commonware_codec::Encode;
use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

use crate::state::Wallet;

/// Random number generator backed by a SHA-256 hash chain.
///
/// The chain is fully determined by its seed, session ID and move number, so a
/// round can be replayed from those three values. Seeding from the operating
/// system ([`GameRng::from_entropy`]) gives independent, high-entropy rounds.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a seed, session ID, and move number.
    pub fn new(seed: &Seed, session_id: u64, move_number: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.encode().as_ref());
        hasher.update(&session_id.to_be_bytes());
        hasher.update(&move_number.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    /// Create a new RNG from operating system entropy.
    pub fn from_entropy(session_id: u64) -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self::new(&Seed::new(bytes), session_id, 0)
    }

    /// Get the next random byte.
    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random u8 value.
    pub fn next_u8(&mut self) -> u8 {
        self.next_byte()
    }

    /// Get a random u32 value.
    pub fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        for byte in bytes.iter_mut() {
            *byte = self.next_byte();
        }
        u32::from_be_bytes(bytes)
    }

    /// Get a random u64 value.
    pub fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        for byte in bytes.iter_mut() {
            *byte = self.next_byte();
        }
        u64::from_be_bytes(bytes)
    }

    /// Get a random f64 value in range [0.0, 1.0) with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Simple rejection sampling for unbiased distribution
        let limit = u32::MAX - (u32::MAX % max);
        loop {
            let value = self.next_u32();
            if value < limit {
                return value % max;
            }
        }
    }

    /// Get a random index into a collection of `len` elements.
    pub fn next_index(&mut self, len: usize) -> usize {
        self.next_bounded(len as u32) as usize
    }

    /// Shuffle a slice in place using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_index(i + 1);
            slice.swap(i, j);
        }
    }

    /// Pick `count` distinct values from `0..len`, uniformly without replacement.
    pub fn choose_distinct(&mut self, len: usize, count: usize) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..len).collect();
        self.shuffle(&mut pool);
        pool.truncate(count);
        pool
    }

    /// Spin a roulette wheel with `pockets` pockets.
    pub fn spin_roulette(&mut self, pockets: u8) -> u8 {
        self.next_bounded(pockets as u32) as u8
    }
}

/// Reasons a game operation is rejected.
///
/// Every variant is raised before any balance is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Bet is not numeric, not positive, or not an offered denomination.
    #[error("invalid bet")]
    InvalidBet,
    /// Bet or ticket price exceeds the current balance.
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u64, need: u64 },
    /// Game parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A round is already in flight.
    #[error("round already active")]
    RoundAlreadyActive,
    /// The operation needs a round in flight.
    #[error("no active round")]
    NoActiveRound,
    /// A weighted pool had nothing to draw from.
    #[error("sample pool is empty")]
    EmptySamplePool,
    /// Move is not valid for the current round.
    #[error("invalid move")]
    InvalidMove,
}

impl GameError {
    /// Stable reason code for callers that surface rejections.
    pub fn code(&self) -> u8 {
        match self {
            GameError::InvalidBet => ERROR_INVALID_BET,
            GameError::InsufficientFunds { .. } => ERROR_INSUFFICIENT_FUNDS,
            GameError::InvalidConfiguration(_) => ERROR_INVALID_CONFIGURATION,
            GameError::RoundAlreadyActive => ERROR_ROUND_ALREADY_ACTIVE,
            GameError::NoActiveRound => ERROR_NO_ACTIVE_ROUND,
            GameError::EmptySamplePool => ERROR_EMPTY_SAMPLE_POOL,
            GameError::InvalidMove => ERROR_INVALID_MOVE,
        }
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::InvalidConfiguration(err.to_string())
    }
}

/// Parse a bet typed by a player.
pub fn parse_bet(input: &str) -> Result<u64, GameError> {
    let bet = input
        .trim()
        .parse::<u64>()
        .map_err(|_| GameError::InvalidBet)?;
    if bet == 0 {
        return Err(GameError::InvalidBet);
    }
    Ok(bet)
}

/// Check that the wallet can cover `amount` without touching it.
pub(crate) fn ensure_funds(wallet: &impl Wallet, amount: u64) -> Result<(), GameError> {
    let have = wallet.balance();
    if have < amount {
        return Err(GameError::InsufficientFunds { have, need: amount });
    }
    Ok(())
}

/// Scale `amount` by a multiplier expressed in `scale` units, rounding down.
pub(crate) fn scale_amount(amount: u64, multiplier: u64, scale: u64) -> u64 {
    let scaled = (amount as u128).saturating_mul(multiplier as u128) / scale as u128;
    scaled.min(u64::MAX as u128) as u64
}
