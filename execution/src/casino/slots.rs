//! Slot machine round state machine.
//!
//! A spin is split in two steps so a round in flight is observable:
//! [`SlotMachine::begin_spin`] validates and pays for the spin (or consumes a free
//! spin), [`SlotMachine::resolve`] draws the grid, applies the special rules and
//! publishes a [`Event::SlotSpinResolved`]. [`SlotMachine::spin`] does both.
//!
//! Free spins reuse the last paid bet and sample from the bonus table, where
//! jackpot and malus symbols can appear. With enough of them in one grid:
//! - Malus halves the balance (rounding down) and forfeits the spin's payout.
//!   It takes precedence over the jackpot.
//! - Jackpot adds the progressive pool to the payout and resets the pool to
//!   its floor.

use arcade_types::casino::{Event, SlotConfig, SlotSpin, SlotSymbol, SpecialEvent, SLOT_CELLS};
use tracing::{debug, info};

use super::paylines::{count_symbol, evaluate, SlotGrid};
use super::sampler::{slot_weights, Sampler};
use super::{GameError, GameRng};
use crate::autoplay::{AutoPlay, AutoPlayReport, Step};
use crate::events::Sink;
use crate::state::{JackpotPool, Wallet};

/// Where the machine is between requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// A spin was paid for and awaits resolution.
    Spinning,
    /// Free spins are pending; the next spin needs no input.
    AutoFreeSpin,
}

/// State carried between spins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RoundState {
    pub free_spins_remaining: u32,
    pub last_bet: u64,
}

impl RoundState {
    pub fn is_bonus_mode(&self) -> bool {
        self.free_spins_remaining > 0
    }
}

/// A spin that has been paid for but not yet drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSpin {
    bet: u64,
    free_spin: bool,
}

impl PendingSpin {
    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn is_free_spin(&self) -> bool {
        self.free_spin
    }
}

/// One player's slot machine.
#[derive(Clone, Debug)]
pub struct SlotMachine {
    config: SlotConfig,
    normal: Sampler<SlotSymbol>,
    bonus: Sampler<SlotSymbol>,
    state: RoundState,
    phase: Phase,
    pending: Option<PendingSpin>,
}

impl SlotMachine {
    pub fn new(config: SlotConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            normal: Sampler::new(&slot_weights(false), SlotSymbol::Cherry),
            bonus: Sampler::new(&slot_weights(true), SlotSymbol::Cherry),
            state: RoundState::default(),
            phase: Phase::Idle,
            pending: None,
        })
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start a spin.
    ///
    /// With free spins pending one is consumed and `bet` is ignored in favor of
    /// the last paid bet. Otherwise `bet` must be an offered denomination and is
    /// debited. Nothing changes if the request is rejected.
    pub fn begin_spin(
        &mut self,
        bet: u64,
        wallet: &mut impl Wallet,
    ) -> Result<PendingSpin, GameError> {
        if self.pending.is_some() {
            return Err(GameError::RoundAlreadyActive);
        }

        let pending = if self.state.free_spins_remaining > 0 {
            self.state.free_spins_remaining -= 1;
            PendingSpin {
                bet: self.state.last_bet,
                free_spin: true,
            }
        } else {
            if !self.config.accepts_bet(bet) {
                return Err(GameError::InvalidBet);
            }
            wallet.debit(bet)?;
            self.state.last_bet = bet;
            PendingSpin {
                bet,
                free_spin: false,
            }
        };

        debug!(
            bet = pending.bet,
            free_spin = pending.free_spin,
            free_spins_remaining = self.state.free_spins_remaining,
            "slot spin started"
        );
        self.pending = Some(pending);
        self.phase = Phase::Spinning;
        Ok(pending)
    }

    /// Draw 15 independent symbols.
    pub fn generate_grid(&self, rng: &mut GameRng, bonus_mode: bool) -> SlotGrid {
        let sampler = if bonus_mode { &self.bonus } else { &self.normal };
        let mut grid = [SlotSymbol::default(); SLOT_CELLS];
        for cell in grid.iter_mut() {
            *cell = sampler.sample(rng);
        }
        grid
    }

    /// Score `grid` for the spin in flight and apply it to the wallet and jackpot.
    ///
    /// Ends the round: a second call without a new [`SlotMachine::begin_spin`]
    /// fails with `NoActiveRound`.
    pub(crate) fn settle(
        &mut self,
        grid: SlotGrid,
        wallet: &mut impl Wallet,
        jackpot: &mut impl JackpotPool,
    ) -> Result<SlotSpin, GameError> {
        let pending = self.pending.take().ok_or(GameError::NoActiveRound)?;
        let evaluation = evaluate(&grid, pending.bet);
        let mut payout = evaluation.payout;
        let mut special = SpecialEvent::None;

        if pending.free_spin {
            let threshold = self.config.special_threshold;
            if count_symbol(&grid, SlotSymbol::Malus) >= threshold {
                special = SpecialEvent::Malus;
            } else if count_symbol(&grid, SlotSymbol::Jackpot) >= threshold {
                special = SpecialEvent::Jackpot;
            }
        }

        match special {
            SpecialEvent::Malus => {
                let balance = wallet.balance();
                let penalty = balance - balance / 2;
                wallet.debit(penalty)?;
                info!(
                    before = balance,
                    after = wallet.balance(),
                    forfeited = payout,
                    "malus hit"
                );
            }
            SpecialEvent::Jackpot => {
                let won = jackpot.take_jackpot(self.config.jackpot_floor);
                payout = payout.saturating_add(won);
                info!(jackpot = won, "jackpot won");
                wallet.credit(payout);
            }
            SpecialEvent::None => wallet.credit(payout),
        }

        self.state.free_spins_remaining = self
            .state
            .free_spins_remaining
            .saturating_add(evaluation.free_spins);
        self.phase = if self.state.is_bonus_mode() {
            Phase::AutoFreeSpin
        } else {
            Phase::Idle
        };

        Ok(SlotSpin {
            grid,
            bet: pending.bet,
            free_spin: pending.free_spin,
            payout,
            free_spins_awarded: evaluation.free_spins,
            free_spins_remaining: self.state.free_spins_remaining,
            win_indices: evaluation.win_indices,
            special,
            balance: wallet.balance(),
        })
    }

    /// Resolve the spin started by [`SlotMachine::begin_spin`].
    pub fn resolve(
        &mut self,
        rng: &mut GameRng,
        wallet: &mut impl Wallet,
        jackpot: &mut impl JackpotPool,
        sink: &mut impl Sink,
    ) -> Result<SlotSpin, GameError> {
        let pending = self.pending.ok_or(GameError::NoActiveRound)?;
        let grid = self.generate_grid(rng, pending.free_spin);
        let spin = self.settle(grid, wallet, jackpot)?;
        info!(
            bet = spin.bet,
            free_spin = spin.free_spin,
            payout = spin.payout,
            free_spins_remaining = spin.free_spins_remaining,
            special = ?spin.special,
            "slot spin resolved"
        );
        sink.publish(Event::SlotSpinResolved(spin.clone()));
        Ok(spin)
    }

    /// Owe `count` free spins at `bet`, as if a scatter had awarded them.
    #[cfg(test)]
    pub(crate) fn grant_free_spins(&mut self, count: u32, bet: u64) {
        self.state.free_spins_remaining += count;
        self.state.last_bet = bet;
        if self.pending.is_none() {
            self.phase = Phase::AutoFreeSpin;
        }
    }

    /// Start and resolve one spin.
    pub fn spin(
        &mut self,
        bet: u64,
        rng: &mut GameRng,
        wallet: &mut impl Wallet,
        jackpot: &mut impl JackpotPool,
        sink: &mut impl Sink,
    ) -> Result<SlotSpin, GameError> {
        self.begin_spin(bet, wallet)?;
        self.resolve(rng, wallet, jackpot, sink)
    }

    /// Play pending free spins until none remain or `autoplay` is cancelled.
    pub fn run_free_spins(
        &mut self,
        autoplay: &AutoPlay,
        rng: &mut GameRng,
        wallet: &mut impl Wallet,
        jackpot: &mut impl JackpotPool,
        sink: &mut impl Sink,
    ) -> AutoPlayReport {
        autoplay.run(|_| {
            if !self.state.is_bonus_mode() {
                return Ok(Step::Exhausted);
            }
            let bet = self.state.last_bet;
            self.spin(bet, rng, wallet, jackpot, sink)?;
            Ok(Step::Played)
        })
    }

    /// Repeat spins at `bet`, including any free spins they award, until
    /// cancelled, the limit is reached, or a spin is rejected.
    pub fn autoplay_paid(
        &mut self,
        autoplay: &AutoPlay,
        bet: u64,
        rng: &mut GameRng,
        wallet: &mut impl Wallet,
        jackpot: &mut impl JackpotPool,
        sink: &mut impl Sink,
    ) -> AutoPlayReport {
        autoplay.run(|_| {
            self.spin(bet, rng, wallet, jackpot, sink)?;
            Ok(Step::Played)
        })
    }
}
