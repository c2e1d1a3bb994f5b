//! Chicken: a push-your-luck board.
//!
//! The player picks a mine count and a bet, then uncovers cells one at a time.
//! Every chicken raises the cash-out multiplier; a mine busts the round and the
//! bet is lost. Cash-out is available once at least one chicken was found.
//!
//! # Multiplier curve
//!
//! For `m` mines and `k` chickens found, with growth `g = 1.05 + 0.02 m`:
//! - `k = 0`: 1.00
//! - `k = 1`: `1 + 0.04 m²`
//! - `k ≥ 2`: `(1 + 0.05 m²) · g^(k-1)`
//!
//! The result is floored at 1.00 and rounded to two decimals. It is carried in
//! hundredths (`MULTIPLIER_SCALE`).

use arcade_types::casino::{
    ChickenConfig, ChickenOutcome, ChickenReveal, ChickenResult, Event, MULTIPLIER_SCALE,
};
use tracing::{debug, info, warn};

use super::{scale_amount, GameError, GameRng};
use crate::events::Sink;
use crate::state::Wallet;

/// Cash-out multiplier for `found` chickens on a board with `mines` mines, in hundredths.
pub fn multiplier(mines: u8, found: u8) -> u32 {
    if found == 0 {
        return MULTIPLIER_SCALE as u32;
    }
    let m = mines as f64;
    let value = if found == 1 {
        1.0 + m * m * 0.04
    } else {
        let growth = 1.05 + m * 0.02;
        (1.0 + m * m * 0.05) * growth.powi(found as i32 - 1)
    };
    let hundredths = (value.max(1.0) * MULTIPLIER_SCALE as f64).round();
    hundredths.min(u32::MAX as f64) as u32
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChickenPhase {
    #[default]
    Configuring,
    Active,
    Busted,
    CashedOut,
}

/// A board in play or just finished.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChickenBoard {
    bet: u64,
    cell_count: usize,
    mines: u8,
    mine_mask: u32,
    picked_mask: u32,
    chickens_found: u8,
    multiplier: u32,
    uncovered: bool,
}

impl ChickenBoard {
    fn new(bet: u64, cell_count: usize, mines: u8, rng: &mut GameRng) -> Self {
        let mine_mask = rng
            .choose_distinct(cell_count, mines as usize)
            .into_iter()
            .fold(0u32, |mask, cell| mask | (1 << cell));
        Self {
            bet,
            cell_count,
            mines,
            mine_mask,
            picked_mask: 0,
            chickens_found: 0,
            multiplier: MULTIPLIER_SCALE as u32,
            uncovered: false,
        }
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn mines(&self) -> u8 {
        self.mines
    }

    pub fn chickens_found(&self) -> u8 {
        self.chickens_found
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn has_mine(&self, cell: usize) -> bool {
        cell < self.cell_count && self.mine_mask & (1 << cell) != 0
    }

    /// Whether the cell is visible: picked by the player, or the round is over.
    pub fn is_revealed(&self, cell: usize) -> bool {
        cell < self.cell_count && (self.uncovered || self.picked_mask & (1 << cell) != 0)
    }

    /// Current bet times the current multiplier.
    pub fn potential_win(&self) -> u64 {
        scale_amount(self.bet, self.multiplier as u64, MULTIPLIER_SCALE)
    }

    fn result(&self, outcome: ChickenOutcome, payout: u64) -> ChickenResult {
        ChickenResult {
            bet: self.bet,
            mines: self.mines,
            mine_mask: self.mine_mask,
            revealed_mask: self.picked_mask,
            chickens_found: self.chickens_found,
            multiplier: self.multiplier,
            outcome,
            payout,
        }
    }
}

/// One player's chicken table.
#[derive(Clone, Debug)]
pub struct ChickenGame {
    config: ChickenConfig,
    phase: ChickenPhase,
    board: Option<ChickenBoard>,
}

impl ChickenGame {
    pub fn new(config: ChickenConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: ChickenPhase::Configuring,
            board: None,
        })
    }

    pub fn phase(&self) -> ChickenPhase {
        self.phase
    }

    pub fn board(&self) -> Option<&ChickenBoard> {
        self.board.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.phase == ChickenPhase::Active
    }

    /// Whether [`ChickenGame::cash_out`] would pay.
    pub fn can_cash_out(&self) -> bool {
        self.is_active() && self.board.as_ref().is_some_and(|b| b.chickens_found > 0)
    }

    /// Potential win of the board in play, zero otherwise.
    pub fn potential_win(&self) -> u64 {
        match &self.board {
            Some(board) if self.is_active() => board.potential_win(),
            _ => 0,
        }
    }

    /// Validate, debit the bet and place mines uniformly at random.
    pub fn start(
        &mut self,
        bet: u64,
        mines: u8,
        rng: &mut GameRng,
        wallet: &mut impl Wallet,
        sink: &mut impl Sink,
    ) -> Result<(), GameError> {
        if self.is_active() {
            return Err(GameError::RoundAlreadyActive);
        }
        if !self.config.accepts_mines(mines) {
            warn!(mines, "rejected mine count");
            return Err(GameError::InvalidConfiguration(format!(
                "mines must be in {}..={} and below {} cells (got {})",
                self.config.min_mines, self.config.max_mines, self.config.cell_count, mines
            )));
        }
        if !self.config.accepts_bet(bet) {
            return Err(GameError::InvalidBet);
        }
        wallet.debit(bet)?;

        self.board = Some(ChickenBoard::new(bet, self.config.cell_count, mines, rng));
        self.phase = ChickenPhase::Active;
        info!(bet, mines, "chicken round started");
        sink.publish(Event::ChickenStarted { bet, mines });
        Ok(())
    }

    /// Uncover `cell`.
    ///
    /// Returns `Ok(None)` when no round is active or the cell was already picked.
    pub fn reveal(
        &mut self,
        cell: usize,
        sink: &mut impl Sink,
    ) -> Result<Option<ChickenReveal>, GameError> {
        if !self.is_active() {
            return Ok(None);
        }
        let Some(board) = self.board.as_mut() else {
            return Ok(None);
        };
        if cell >= board.cell_count {
            return Err(GameError::InvalidMove);
        }
        if board.picked_mask & (1 << cell) != 0 {
            return Ok(None);
        }
        board.picked_mask |= 1 << cell;

        if board.has_mine(cell) {
            board.uncovered = true;
            self.phase = ChickenPhase::Busted;
            let reveal = ChickenReveal {
                cell: cell as u8,
                mine: true,
                chickens_found: board.chickens_found,
                multiplier: board.multiplier,
                potential_win: 0,
            };
            let result = board.result(ChickenOutcome::Busted, 0);
            info!(
                bet = board.bet,
                mines = board.mines,
                chickens_found = board.chickens_found,
                "chicken busted"
            );
            sink.publish(Event::ChickenRevealed(reveal.clone()));
            sink.publish(Event::ChickenResolved(result));
            return Ok(Some(reveal));
        }

        board.chickens_found += 1;
        board.multiplier = multiplier(board.mines, board.chickens_found);
        let reveal = ChickenReveal {
            cell: cell as u8,
            mine: false,
            chickens_found: board.chickens_found,
            multiplier: board.multiplier,
            potential_win: board.potential_win(),
        };
        debug!(
            cell,
            chickens_found = reveal.chickens_found,
            multiplier = reveal.multiplier,
            "chicken found"
        );
        sink.publish(Event::ChickenRevealed(reveal.clone()));
        Ok(Some(reveal))
    }

    /// Credit `bet × multiplier` and end the round.
    ///
    /// Returns `None` when no round is active or nothing was found yet.
    pub fn cash_out(
        &mut self,
        wallet: &mut impl Wallet,
        sink: &mut impl Sink,
    ) -> Option<ChickenResult> {
        if !self.can_cash_out() {
            return None;
        }
        let board = self.board.as_mut()?;
        let payout = board.potential_win();
        wallet.credit(payout);
        board.uncovered = true;
        self.phase = ChickenPhase::CashedOut;

        let result = board.result(ChickenOutcome::CashedOut, payout);
        info!(
            bet = board.bet,
            mines = board.mines,
            chickens_found = board.chickens_found,
            multiplier = board.multiplier,
            payout,
            "chicken cashed out"
        );
        sink.publish(Event::ChickenResolved(result.clone()));
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{create_rng, create_wallet};
    use arcade_types::casino::{CHICKEN_CELLS, CHICKEN_MAX_MINES, CHICKEN_MIN_MINES};

    fn game() -> ChickenGame {
        ChickenGame::new(ChickenConfig::default()).unwrap()
    }

    fn safe_cells(board: &ChickenBoard) -> Vec<usize> {
        (0..board.cell_count()).filter(|&c| !board.has_mine(c)).collect()
    }

    fn mine_cell(board: &ChickenBoard) -> usize {
        (0..board.cell_count()).find(|&c| board.has_mine(c)).unwrap()
    }

    #[test]
    fn test_multiplier_starts_at_one() {
        for mines in CHICKEN_MIN_MINES..=CHICKEN_MAX_MINES {
            assert_eq!(multiplier(mines, 0), 100);
        }
    }

    #[test]
    fn test_multiplier_values() {
        // 1 + 25 * 0.04
        assert_eq!(multiplier(5, 1), 200);
        // (1 + 25 * 0.05) * 1.15^2 = 2.975625
        assert_eq!(multiplier(5, 3), 298);
        // 1 + 0.04
        assert_eq!(multiplier(1, 1), 104);
        // (1 + 0.05) * 1.07
        assert_eq!(multiplier(1, 2), 112);
    }

    #[test]
    fn test_multiplier_monotonic_in_found() {
        for mines in CHICKEN_MIN_MINES..=CHICKEN_MAX_MINES {
            let safe = CHICKEN_CELLS as u8 - mines;
            for found in 1..=safe {
                assert!(multiplier(mines, found) >= multiplier(mines, found - 1));
            }
        }
    }

    #[test]
    fn test_multiplier_monotonic_in_mines() {
        for found in 1..=10u8 {
            for mines in CHICKEN_MIN_MINES..CHICKEN_MAX_MINES {
                assert!(multiplier(mines + 1, found) >= multiplier(mines, found));
            }
        }
    }

    #[test]
    fn test_start_places_mines() {
        let mut game = game();
        let mut rng = create_rng(1, 1);
        let mut wallet = create_wallet(1_000);
        let mut events: Vec<Event> = Vec::new();

        game.start(100, 5, &mut rng, &mut wallet, &mut events).unwrap();
        let board = game.board().unwrap();
        assert_eq!((0..CHICKEN_CELLS).filter(|&c| board.has_mine(c)).count(), 5);
        assert_eq!(wallet.balance(), 900);
        assert_eq!(game.potential_win(), 100);
        assert!(!game.can_cash_out());
        assert_eq!(events, vec![Event::ChickenStarted { bet: 100, mines: 5 }]);
    }

    #[test]
    fn test_start_rejections() {
        let mut game = game();
        let mut rng = create_rng(2, 1);
        let mut wallet = create_wallet(50);
        let mut events: Vec<Event> = Vec::new();

        assert!(matches!(
            game.start(10, 0, &mut rng, &mut wallet, &mut events),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            game.start(10, 25, &mut rng, &mut wallet, &mut events),
            Err(GameError::InvalidConfiguration(_))
        ));
        assert_eq!(
            game.start(7, 3, &mut rng, &mut wallet, &mut events),
            Err(GameError::InvalidBet)
        );
        assert_eq!(
            game.start(100, 3, &mut rng, &mut wallet, &mut events),
            Err(GameError::InsufficientFunds { have: 50, need: 100 })
        );
        assert_eq!(wallet.balance(), 50);
        assert_eq!(game.phase(), ChickenPhase::Configuring);
        assert!(events.is_empty());

        game.start(50, 3, &mut rng, &mut wallet, &mut events).unwrap();
        assert_eq!(
            game.start(10, 3, &mut rng, &mut wallet, &mut events),
            Err(GameError::RoundAlreadyActive)
        );
    }

    #[test]
    fn test_cash_out_pays_multiplier() {
        let mut game = game();
        let mut rng = create_rng(3, 1);
        let mut wallet = create_wallet(1_000);
        let mut events: Vec<Event> = Vec::new();

        game.start(100, 5, &mut rng, &mut wallet, &mut events).unwrap();
        let safe = safe_cells(game.board().unwrap());
        for &cell in &safe[..3] {
            let reveal = game.reveal(cell, &mut events).unwrap().unwrap();
            assert!(!reveal.mine);
        }
        assert_eq!(game.potential_win(), 298);

        let result = game.cash_out(&mut wallet, &mut events).unwrap();
        assert_eq!(result.outcome, ChickenOutcome::CashedOut);
        assert_eq!(result.multiplier, 298);
        assert_eq!(result.payout, 298);
        assert_eq!(result.revealed_mask.count_ones(), 3);
        assert_eq!(wallet.balance(), 900 + 298);
        assert_eq!(game.phase(), ChickenPhase::CashedOut);

        // Whole board is visible afterwards
        let board = game.board().unwrap();
        assert!((0..CHICKEN_CELLS).all(|c| board.is_revealed(c)));
        assert_eq!(events.last(), Some(&Event::ChickenResolved(result)));
    }

    #[test]
    fn test_bust_pays_nothing() {
        for found in 0..4 {
            let mut game = game();
            let mut rng = create_rng(4, found as u64);
            let mut wallet = create_wallet(1_000);
            let mut events: Vec<Event> = Vec::new();

            game.start(100, 3, &mut rng, &mut wallet, &mut events).unwrap();
            let board = game.board().unwrap().clone();
            let mine = mine_cell(&board);
            let mut picked = 1u32 << mine;
            for &cell in &safe_cells(&board)[..found] {
                game.reveal(cell, &mut events).unwrap();
                picked |= 1 << cell;
            }
            let reveal = game.reveal(mine, &mut events).unwrap().unwrap();
            assert!(reveal.mine);
            assert_eq!(reveal.potential_win, 0);
            assert_eq!(game.phase(), ChickenPhase::Busted);
            assert_eq!(wallet.balance(), 900);
            assert_eq!(
                events.last(),
                Some(&Event::ChickenResolved(ChickenResult {
                    bet: 100,
                    mines: 3,
                    mine_mask: board.mine_mask,
                    revealed_mask: picked,
                    chickens_found: found as u8,
                    multiplier: multiplier(3, found as u8),
                    outcome: ChickenOutcome::Busted,
                    payout: 0,
                }))
            );
            assert!(game.cash_out(&mut wallet, &mut events).is_none());

            // Whole board is visible and further picks are ignored
            let busted = game.board().unwrap();
            assert!((0..CHICKEN_CELLS).all(|c| busted.is_revealed(c)));
            let published = events.len();
            let untouched = safe_cells(&board)[found];
            assert_eq!(game.reveal(untouched, &mut events), Ok(None));
            assert_eq!(game.reveal(mine, &mut events), Ok(None));
            assert_eq!(events.len(), published);
            assert_eq!(game.board().unwrap().chickens_found(), found as u8);
            assert_eq!(game.phase(), ChickenPhase::Busted);
        }
    }

    #[test]
    fn test_inactive_requests_are_ignored() {
        let mut game = game();
        let mut wallet = create_wallet(1_000);
        let mut events: Vec<Event> = Vec::new();
        assert_eq!(game.reveal(0, &mut events), Ok(None));
        assert!(game.cash_out(&mut wallet, &mut events).is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn test_cash_out_needs_a_chicken() {
        let mut game = game();
        let mut rng = create_rng(5, 1);
        let mut wallet = create_wallet(1_000);
        let mut events: Vec<Event> = Vec::new();
        game.start(100, 1, &mut rng, &mut wallet, &mut events).unwrap();
        assert!(game.cash_out(&mut wallet, &mut events).is_none());
        assert!(game.is_active());
    }

    #[test]
    fn test_repeat_and_out_of_range_reveals() {
        let mut game = game();
        let mut rng = create_rng(6, 1);
        let mut wallet = create_wallet(1_000);
        let mut events: Vec<Event> = Vec::new();
        game.start(100, 2, &mut rng, &mut wallet, &mut events).unwrap();
        let cell = safe_cells(game.board().unwrap())[0];

        assert!(game.reveal(cell, &mut events).unwrap().is_some());
        assert_eq!(game.reveal(cell, &mut events), Ok(None));
        assert_eq!(game.board().unwrap().chickens_found(), 1);
        assert_eq!(
            game.reveal(CHICKEN_CELLS, &mut events),
            Err(GameError::InvalidMove)
        );
    }
}
