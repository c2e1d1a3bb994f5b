//! Roulette with European and American wheels.
//!
//! Pockets are numbered 0..=36, plus 37 for double zero on American wheels.
//! Every bet on a spin is validated and the total stake debited before the
//! wheel turns; winnings are credited as total return (stake plus profit).
//!
//! Bet types:
//! - Straight: `number` is the pocket (35:1)
//! - Red, Black, Even, Odd, Low (1-18), High (19-36): `number` ignored (1:1)
//! - Dozen: `number` 0/1/2 for 1-12, 13-24, 25-36 (2:1)
//! - Column: `number` 0/1/2 for the column starting at 1, 2, 3 (2:1)
//!
//! Zero (and double zero) lose every bet except a straight bet on that pocket.

use arcade_types::casino::{Event, RouletteBetType, RouletteConfig, RouletteSpin, RouletteVariant};
use tracing::{debug, info};

use super::{ensure_funds, GameError, GameRng};
use crate::events::Sink;
use crate::state::Wallet;

/// Double zero pocket on American wheels.
pub const DOUBLE_ZERO: u8 = 37;

/// Red numbers on a roulette wheel.
const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

/// Check if a number is red.
pub fn is_red(number: u8) -> bool {
    RED_NUMBERS.contains(&number)
}

/// Check if a pocket is green.
pub fn is_zero(variant: RouletteVariant, pocket: u8) -> bool {
    pocket == 0 || (variant == RouletteVariant::American && pocket == DOUBLE_ZERO)
}

/// Check if a bet wins for a given result.
pub fn bet_wins(
    variant: RouletteVariant,
    bet_type: RouletteBetType,
    number: u8,
    result: u8,
) -> bool {
    if is_zero(variant, result) {
        return bet_type == RouletteBetType::Straight && number == result;
    }

    match bet_type {
        RouletteBetType::Straight => number == result,
        RouletteBetType::Red => is_red(result),
        RouletteBetType::Black => !is_red(result),
        RouletteBetType::Even => result % 2 == 0,
        RouletteBetType::Odd => result % 2 == 1,
        RouletteBetType::Low => (1..=18).contains(&result),
        RouletteBetType::High => (19..=36).contains(&result),
        RouletteBetType::Dozen => (result - 1) / 12 == number,
        RouletteBetType::Column => (result - 1) % 3 == number,
    }
}

/// Get the payout multiplier for a bet type (excludes original bet).
pub fn payout_multiplier(bet_type: RouletteBetType) -> u64 {
    match bet_type {
        RouletteBetType::Straight => 35,
        RouletteBetType::Red
        | RouletteBetType::Black
        | RouletteBetType::Even
        | RouletteBetType::Odd
        | RouletteBetType::Low
        | RouletteBetType::High => 1,
        RouletteBetType::Dozen | RouletteBetType::Column => 2,
    }
}

/// Label of a pocket as printed on the wheel.
pub fn pocket_label(variant: RouletteVariant, pocket: u8) -> String {
    if variant == RouletteVariant::American && pocket == DOUBLE_ZERO {
        "00".to_string()
    } else {
        pocket.to_string()
    }
}

/// Individual bet in roulette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouletteBet {
    pub bet_type: RouletteBetType,
    pub number: u8,
    pub amount: u64,
}

impl RouletteBet {
    pub fn new(bet_type: RouletteBetType, number: u8, amount: u64) -> Self {
        Self {
            bet_type,
            number,
            amount,
        }
    }

    /// Total return if this bet wins on `result`.
    pub fn payout(&self, variant: RouletteVariant, result: u8) -> u64 {
        if !bet_wins(variant, self.bet_type, self.number, result) {
            return 0;
        }
        self.amount.saturating_mul(payout_multiplier(self.bet_type) + 1)
    }
}

/// A roulette table.
#[derive(Clone, Debug)]
pub struct RouletteTable {
    config: RouletteConfig,
}

impl RouletteTable {
    pub fn new(config: RouletteConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn variant(&self) -> RouletteVariant {
        self.config.variant
    }

    fn validate_bet(&self, bet: &RouletteBet) -> Result<(), GameError> {
        if bet.amount < self.config.min_bet {
            return Err(GameError::InvalidBet);
        }
        let valid_number = match bet.bet_type {
            RouletteBetType::Straight => bet.number < self.config.variant.pockets(),
            RouletteBetType::Dozen | RouletteBetType::Column => bet.number <= 2,
            _ => true,
        };
        if !valid_number {
            return Err(GameError::InvalidBet);
        }
        Ok(())
    }

    /// Validate every bet, debit the total stake, spin once and pay winners.
    pub fn spin(
        &self,
        bets: &[RouletteBet],
        rng: &mut GameRng,
        wallet: &mut impl Wallet,
        sink: &mut impl Sink,
    ) -> Result<RouletteSpin, GameError> {
        if bets.is_empty() || bets.len() > self.config.max_bets {
            return Err(GameError::InvalidBet);
        }
        let mut wagered = 0u64;
        for bet in bets {
            self.validate_bet(bet)?;
            wagered = wagered.checked_add(bet.amount).ok_or(GameError::InvalidBet)?;
        }
        ensure_funds(wallet, wagered)?;
        wallet.debit(wagered)?;

        let variant = self.config.variant;
        let result = rng.spin_roulette(variant.pockets());
        let payout = bets
            .iter()
            .fold(0u64, |total, bet| total.saturating_add(bet.payout(variant, result)));
        wallet.credit(payout);
        debug!(pocket = %pocket_label(variant, result), "wheel stopped");

        let spin = RouletteSpin {
            result,
            bets: bets.len() as u8,
            wagered,
            payout,
        };
        info!(?variant, result, wagered, payout, "roulette spin resolved");
        sink.publish(Event::RouletteSpinResolved(spin.clone()));
        Ok(spin)
    }
}
