//! Per-game configuration.
//!
//! Every struct deserializes with `serde` (missing fields fall back to the
//! defaults below) and must pass `validate()` before an engine is built from it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    CHICKEN_BET_DENOMINATIONS, CHICKEN_CELLS, CHICKEN_MAX_MINES, CHICKEN_MIN_MINES,
    JACKPOT_FLOOR, ROULETTE_MAX_BETS, SCRATCH_TICKET_PRICES, SLOT_BET_DENOMINATIONS, SLOT_CELLS,
    SPECIAL_SYMBOL_THRESHOLD,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be > 0")]
    Zero { field: &'static str },
    #[error("{field} is out of range (got {value})")]
    OutOfRange { field: &'static str, value: u64 },
}

fn validate_amounts(field: &'static str, amounts: &[u64]) -> Result<(), ConfigError> {
    if amounts.is_empty() {
        return Err(ConfigError::Empty { field });
    }
    if amounts.contains(&0) {
        return Err(ConfigError::Zero { field });
    }
    Ok(())
}

/// Slot machine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Bets a player may stake on a paid spin.
    pub bet_denominations: Vec<u64>,
    /// Progressive jackpot value after a win.
    pub jackpot_floor: u64,
    /// Jackpot or malus symbols needed in a bonus-mode grid.
    pub special_threshold: usize,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            bet_denominations: SLOT_BET_DENOMINATIONS.to_vec(),
            jackpot_floor: JACKPOT_FLOOR,
            special_threshold: SPECIAL_SYMBOL_THRESHOLD,
        }
    }
}

impl SlotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_amounts("bet_denominations", &self.bet_denominations)?;
        if self.special_threshold == 0 || self.special_threshold > SLOT_CELLS {
            return Err(ConfigError::OutOfRange {
                field: "special_threshold",
                value: self.special_threshold as u64,
            });
        }
        Ok(())
    }

    pub fn accepts_bet(&self, bet: u64) -> bool {
        bet > 0 && self.bet_denominations.contains(&bet)
    }
}

/// Chicken board configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChickenConfig {
    pub cell_count: usize,
    pub min_mines: u8,
    pub max_mines: u8,
    pub bet_denominations: Vec<u64>,
}

impl Default for ChickenConfig {
    fn default() -> Self {
        Self {
            cell_count: CHICKEN_CELLS,
            min_mines: CHICKEN_MIN_MINES,
            max_mines: CHICKEN_MAX_MINES,
            bet_denominations: CHICKEN_BET_DENOMINATIONS.to_vec(),
        }
    }
}

impl ChickenConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Boards are tracked as 32-bit masks.
        if self.cell_count < 2 || self.cell_count > 32 {
            return Err(ConfigError::OutOfRange {
                field: "cell_count",
                value: self.cell_count as u64,
            });
        }
        if self.min_mines == 0 {
            return Err(ConfigError::Zero { field: "min_mines" });
        }
        if self.max_mines < self.min_mines || self.max_mines as usize >= self.cell_count {
            return Err(ConfigError::OutOfRange {
                field: "max_mines",
                value: self.max_mines as u64,
            });
        }
        validate_amounts("bet_denominations", &self.bet_denominations)
    }

    pub fn accepts_bet(&self, bet: u64) -> bool {
        bet > 0 && self.bet_denominations.contains(&bet)
    }

    pub fn accepts_mines(&self, mines: u8) -> bool {
        mines >= self.min_mines && mines <= self.max_mines && (mines as usize) < self.cell_count
    }
}

/// Scratch card configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScratchConfig {
    pub ticket_prices: Vec<u64>,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            ticket_prices: SCRATCH_TICKET_PRICES.to_vec(),
        }
    }
}

impl ScratchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_amounts("ticket_prices", &self.ticket_prices)
    }

    pub fn accepts_price(&self, price: u64) -> bool {
        price > 0 && self.ticket_prices.contains(&price)
    }
}

/// Roulette wheel layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouletteVariant {
    /// Single zero, 37 pockets.
    #[default]
    European,
    /// Zero and double zero (pocket 37), 38 pockets.
    American,
}

impl RouletteVariant {
    pub fn pockets(self) -> u8 {
        match self {
            RouletteVariant::European => 37,
            RouletteVariant::American => 38,
        }
    }
}

/// Roulette table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouletteConfig {
    pub variant: RouletteVariant,
    pub max_bets: usize,
    pub min_bet: u64,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            variant: RouletteVariant::European,
            max_bets: ROULETTE_MAX_BETS,
            min_bet: 1,
        }
    }
}

impl RouletteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bets == 0 || self.max_bets > ROULETTE_MAX_BETS {
            return Err(ConfigError::OutOfRange {
                field: "max_bets",
                value: self.max_bets as u64,
            });
        }
        if self.min_bet == 0 {
            return Err(ConfigError::Zero { field: "min_bet" });
        }
        Ok(())
    }
}
