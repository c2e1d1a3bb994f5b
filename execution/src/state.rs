use std::sync::{Arc, Mutex};

use crate::casino::GameError;

/// Player balance owned outside the engine.
///
/// Engines only read and mutate balances through this trait; persistence is the
/// implementor's concern.
pub trait Wallet {
    fn balance(&self) -> u64;
    fn credit(&mut self, amount: u64);
    fn debit(&mut self, amount: u64) -> Result<(), GameError>;
}

/// Progressive jackpot owned outside the engine.
///
/// Implementations shared between players must serialize access themselves.
pub trait JackpotPool {
    fn jackpot(&self) -> u64;
    fn reset_jackpot(&mut self, floor: u64);

    /// Read the current value and reset it to `floor`.
    fn take_jackpot(&mut self, floor: u64) -> u64 {
        let value = self.jackpot();
        self.reset_jackpot(floor);
        value
    }
}

/// In-memory wallet and jackpot for a single player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    balance: u64,
    jackpot: u64,
}

impl Memory {
    pub fn new(balance: u64, jackpot: u64) -> Self {
        Self { balance, jackpot }
    }
}

impl Wallet for Memory {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    fn debit(&mut self, amount: u64) -> Result<(), GameError> {
        if amount > self.balance {
            return Err(GameError::InsufficientFunds {
                have: self.balance,
                need: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

impl JackpotPool for Memory {
    fn jackpot(&self) -> u64 {
        self.jackpot
    }

    fn reset_jackpot(&mut self, floor: u64) {
        self.jackpot = floor;
    }
}

/// Jackpot shared by many players, e.g. simulated players on worker threads.
#[derive(Clone, Debug, Default)]
pub struct SharedJackpot {
    value: Arc<Mutex<u64>>,
}

impl SharedJackpot {
    pub fn new(value: u64) -> Self {
        Self {
            value: Arc::new(Mutex::new(value)),
        }
    }

    /// Add to the pool.
    pub fn contribute(&self, amount: u64) {
        let mut value = self.value.lock().unwrap_or_else(|e| e.into_inner());
        *value = value.saturating_add(amount);
    }
}

impl JackpotPool for SharedJackpot {
    fn jackpot(&self) -> u64 {
        *self.value.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reset_jackpot(&mut self, floor: u64) {
        *self.value.lock().unwrap_or_else(|e| e.into_inner()) = floor;
    }

    fn take_jackpot(&mut self, floor: u64) -> u64 {
        let mut value = self.value.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *value, floor)
    }
}
