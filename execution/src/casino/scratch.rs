//! Scratch cards.
//!
//! Buying a card rolls a rarity tier, builds a 3x3 grid biased toward it and then
//! scores the grid on its own merits. Scoring never looks at the rolled tier, so
//! a card may score differently than it was generated (the final shuffle can
//! break a line apart).
//!
//! Win conditions, first match wins:
//! 1. three jackpots on a line: 2000x
//! 2. a bomb in a corner and another symbol twice elsewhere: 7x
//! 3. five or more bonus letters: 5x
//! 4. any symbol four or more times: 3x
//! 5. three identical on a line: crown 10x, diamond 7x, otherwise 2x
//! 6. exactly one surprise: 1x to 10x, drawn uniformly
//! 7. exactly one replay: ticket refunded

use arcade_types::casino::{
    Event, ScratchCard, ScratchConfig, ScratchSymbol, ScratchTier, SCRATCH_CELLS,
};
use tracing::{debug, info};

use super::{GameError, GameRng};
use crate::events::Sink;
use crate::state::Wallet;

/// A scratch card grid, row-major.
pub type ScratchGrid = [ScratchSymbol; SCRATCH_CELLS];

/// Rows, columns and both diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

pub const SUPER_JACKPOT_MULTIPLIER: u32 = 2_000;
pub const BOMB_COMBO_MULTIPLIER: u32 = 7;
pub const BONUS_WORD_MULTIPLIER: u32 = 5;
pub const FOUR_MATCH_MULTIPLIER: u32 = 3;
pub const MAX_SURPRISE_MULTIPLIER: u32 = 10;

/// Bonus letters needed anywhere on the card.
const BONUS_LETTERS_NEEDED: usize = 5;

/// Multiplier for three identical symbols on a line.
pub fn line_multiplier(symbol: ScratchSymbol) -> u32 {
    match symbol {
        ScratchSymbol::Crown => 10,
        ScratchSymbol::Diamond => 7,
        _ => 2,
    }
}

/// Roll a tier with sequential independent checks; the first success wins.
pub fn roll_tier(rng: &mut GameRng) -> ScratchTier {
    for tier in ScratchTier::ROLL_ORDER {
        if rng.next_f64() < tier.probability() {
            return tier;
        }
    }
    ScratchTier::Losing
}

/// Build a grid for `tier`.
///
/// Required symbols are placed first, remaining cells get distinct regular
/// symbols not already on the card, then the whole grid is shuffled.
pub fn generate(tier: ScratchTier, rng: &mut GameRng) -> Result<ScratchGrid, GameError> {
    let mut cells: [Option<ScratchSymbol>; SCRATCH_CELLS] = [None; SCRATCH_CELLS];

    match tier {
        ScratchTier::SuperJackpot => {
            let line = LINES[rng.next_index(LINES.len())];
            for cell in line {
                cells[cell] = Some(ScratchSymbol::Jackpot);
            }
        }
        ScratchTier::BombCombo => {
            let corner = CORNERS[rng.next_index(CORNERS.len())];
            cells[corner] = Some(ScratchSymbol::Bomb);
            let pair = pick_regular(rng);
            place_randomly(&mut cells, pair, 2, rng);
        }
        ScratchTier::BonusWord => {
            for letter in ScratchSymbol::BONUS_WORD {
                place_randomly(&mut cells, letter, 1, rng);
            }
        }
        ScratchTier::FourMatch => {
            let symbol = pick_regular(rng);
            place_randomly(&mut cells, symbol, 4, rng);
        }
        ScratchTier::ThreeAligned => {
            let line = LINES[rng.next_index(LINES.len())];
            let symbol = pick_regular(rng);
            for cell in line {
                cells[cell] = Some(symbol);
            }
        }
        ScratchTier::Surprise => place_randomly(&mut cells, ScratchSymbol::Surprise, 1, rng),
        ScratchTier::Replay => place_randomly(&mut cells, ScratchSymbol::Replay, 1, rng),
        ScratchTier::Losing => {}
    }

    fill_distinct(&mut cells, rng)?;

    let mut grid = [ScratchSymbol::default(); SCRATCH_CELLS];
    for (slot, cell) in grid.iter_mut().zip(cells) {
        *slot = cell.ok_or(GameError::EmptySamplePool)?;
    }
    rng.shuffle(&mut grid);
    Ok(grid)
}

fn pick_regular(rng: &mut GameRng) -> ScratchSymbol {
    ScratchSymbol::REGULAR[rng.next_index(ScratchSymbol::REGULAR.len())]
}

fn place_randomly(
    cells: &mut [Option<ScratchSymbol>; SCRATCH_CELLS],
    symbol: ScratchSymbol,
    count: usize,
    rng: &mut GameRng,
) {
    let empty: Vec<usize> = (0..SCRATCH_CELLS).filter(|&i| cells[i].is_none()).collect();
    for pick in rng.choose_distinct(empty.len(), count) {
        cells[empty[pick]] = Some(symbol);
    }
}

/// Fill empty cells with regular symbols absent from the card, each used once,
/// so filling never creates a pair, line or bonus pattern.
fn fill_distinct(
    cells: &mut [Option<ScratchSymbol>; SCRATCH_CELLS],
    rng: &mut GameRng,
) -> Result<(), GameError> {
    let empty: Vec<usize> = (0..SCRATCH_CELLS).filter(|&i| cells[i].is_none()).collect();
    let available: Vec<ScratchSymbol> = ScratchSymbol::REGULAR
        .into_iter()
        .filter(|symbol| !cells.contains(&Some(*symbol)))
        .collect();
    if available.len() < empty.len() {
        return Err(GameError::EmptySamplePool);
    }
    for (cell, pick) in empty
        .into_iter()
        .zip(rng.choose_distinct(available.len(), available.len()))
    {
        cells[cell] = Some(available[pick]);
    }
    Ok(())
}

/// How a grid scored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScratchWin {
    pub tier: ScratchTier,
    /// Ticket multiplier; 1 for a replay, 0 for no win.
    pub multiplier: u32,
    pub matched: Option<ScratchSymbol>,
    pub win_indices: Vec<u8>,
}

impl ScratchWin {
    fn none() -> Self {
        Self {
            tier: ScratchTier::Losing,
            multiplier: 0,
            matched: None,
            win_indices: Vec::new(),
        }
    }

    fn new(
        tier: ScratchTier,
        multiplier: u32,
        matched: Option<ScratchSymbol>,
        cells: &[usize],
    ) -> Self {
        let mut win_indices: Vec<u8> = cells.iter().map(|&c| c as u8).collect();
        win_indices.sort_unstable();
        win_indices.dedup();
        Self {
            tier,
            multiplier,
            matched,
            win_indices,
        }
    }

    /// Amount returned for a ticket bought at `price`.
    pub fn payout(&self, price: u64) -> u64 {
        match self.tier {
            ScratchTier::Replay => price,
            _ => price.saturating_mul(self.multiplier as u64),
        }
    }
}

fn cells_with(grid: &ScratchGrid, symbol: ScratchSymbol) -> Vec<usize> {
    (0..SCRATCH_CELLS).filter(|&i| grid[i] == symbol).collect()
}

fn aligned(grid: &ScratchGrid, line: &[usize; 3]) -> bool {
    grid[line[0]] == grid[line[1]] && grid[line[1]] == grid[line[2]]
}

/// Score any grid. Only the surprise tier draws from `rng`.
pub fn evaluate(grid: &ScratchGrid, rng: &mut GameRng) -> ScratchWin {
    // Super jackpot
    if let Some(line) = LINES
        .iter()
        .find(|line| aligned(grid, line) && grid[line[0]] == ScratchSymbol::Jackpot)
    {
        return ScratchWin::new(
            ScratchTier::SuperJackpot,
            SUPER_JACKPOT_MULTIPLIER,
            Some(ScratchSymbol::Jackpot),
            line,
        );
    }

    // Bomb combo
    let bombs = cells_with(grid, ScratchSymbol::Bomb);
    if let Some(&corner) = CORNERS.iter().find(|c| bombs.contains(c)) {
        let pair = ScratchSymbol::ALL
            .into_iter()
            .filter(|&symbol| symbol != ScratchSymbol::Bomb)
            .map(|symbol| (symbol, cells_with(grid, symbol)))
            .find(|(_, cells)| cells.len() >= 2);
        if let Some((symbol, mut cells)) = pair {
            cells.push(corner);
            return ScratchWin::new(
                ScratchTier::BombCombo,
                BOMB_COMBO_MULTIPLIER,
                Some(symbol),
                &cells,
            );
        }
    }

    // Bonus word
    let letters: Vec<usize> = (0..SCRATCH_CELLS)
        .filter(|&i| grid[i].is_bonus_letter())
        .collect();
    if letters.len() >= BONUS_LETTERS_NEEDED {
        return ScratchWin::new(ScratchTier::BonusWord, BONUS_WORD_MULTIPLIER, None, &letters);
    }

    // Four anywhere
    if let Some((symbol, cells)) = ScratchSymbol::ALL
        .into_iter()
        .map(|symbol| (symbol, cells_with(grid, symbol)))
        .find(|(_, cells)| cells.len() >= 4)
    {
        return ScratchWin::new(
            ScratchTier::FourMatch,
            FOUR_MATCH_MULTIPLIER,
            Some(symbol),
            &cells,
        );
    }

    // Three on a line
    if let Some(line) = LINES.iter().find(|line| aligned(grid, line)) {
        let symbol = grid[line[0]];
        return ScratchWin::new(
            ScratchTier::ThreeAligned,
            line_multiplier(symbol),
            Some(symbol),
            line,
        );
    }

    // Surprise
    let surprises = cells_with(grid, ScratchSymbol::Surprise);
    if surprises.len() == 1 {
        let multiplier = rng.next_bounded(MAX_SURPRISE_MULTIPLIER) + 1;
        return ScratchWin::new(
            ScratchTier::Surprise,
            multiplier,
            Some(ScratchSymbol::Surprise),
            &surprises,
        );
    }

    // Replay
    let replays = cells_with(grid, ScratchSymbol::Replay);
    if replays.len() == 1 {
        return ScratchWin::new(ScratchTier::Replay, 1, Some(ScratchSymbol::Replay), &replays);
    }

    ScratchWin::none()
}

/// Scratch card vendor for one player.
#[derive(Clone, Debug)]
pub struct ScratchGame {
    config: ScratchConfig,
}

impl ScratchGame {
    pub fn new(config: ScratchConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    /// Buy, generate and score one card.
    pub fn buy(
        &self,
        price: u64,
        rng: &mut GameRng,
        wallet: &mut impl Wallet,
        sink: &mut impl Sink,
    ) -> Result<ScratchCard, GameError> {
        if !self.config.accepts_price(price) {
            return Err(GameError::InvalidBet);
        }
        wallet.debit(price)?;

        let generated = roll_tier(rng);
        let grid = match generate(generated, rng) {
            Ok(grid) => grid,
            Err(err) => {
                wallet.credit(price);
                return Err(err);
            }
        };
        let win = evaluate(&grid, rng);
        let payout = win.payout(price);
        wallet.credit(payout);
        debug!(?generated, tier = ?win.tier, "scratch card scored");

        let card = ScratchCard {
            price,
            grid,
            generated,
            win: win.tier,
            multiplier: win.multiplier,
            matched: win.matched,
            win_indices: win.win_indices,
            payout,
        };
        info!(price, tier = ?card.win, payout, "scratch card resolved");
        sink.publish(Event::ScratchCardResolved(card.clone()));
        Ok(card)
    }
}
