//! Slot grid evaluation.
//!
//! The grid is 5 columns by 3 rows, row-major. Rules are additive and applied in
//! this order:
//! 1. Paylines: the three rows, scored on the longest identical run starting at
//!    column 0 (3, 4 or 5 long).
//! 2. Scatter: three or more scatter symbols anywhere award free spins.
//! 3. Four anywhere: every symbol present four or more times adds 0.25x.
//! 4. Full column: every column of three identical symbols adds 0.25x.
//! 5. Main diagonal: cells (0,0), (1,1), (2,2) identical adds 0.1x.
//!
//! Multipliers are summed in basis points and the payout is rounded down once.

use arcade_types::casino::{
    SlotSymbol, BASIS_POINTS, MIN_PAYLINE_RUN, SLOT_CELLS, SLOT_COLUMNS, SLOT_ROWS,
};

use super::scale_amount;

/// A slot grid, row-major.
pub type SlotGrid = [SlotSymbol; SLOT_CELLS];

/// Cell indices of each payline, left to right.
pub const PAYLINES: [[usize; SLOT_COLUMNS]; SLOT_ROWS] = [
    [0, 1, 2, 3, 4],
    [5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14],
];

/// Main diagonal: top-left, center of the second reel, third reel bottom.
pub const MAIN_DIAGONAL: [usize; 3] = [0, 6, 12];

/// Flat bonus for a symbol seen four or more times anywhere (0.25x).
pub const FOUR_ANYWHERE_BPS: u64 = 2_500;

/// Flat bonus per full column (0.25x).
pub const FULL_COLUMN_BPS: u64 = 2_500;

/// Flat bonus for a matching main diagonal (0.1x).
pub const DIAGONAL_BPS: u64 = 1_000;

/// What a payline run is worth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayoutRule {
    /// Bet multiplier in basis points.
    Multiplier(u64),
    FreeSpins(u32),
}

/// Look up the payline paytable for a run of `run` identical symbols.
pub fn payline_rule(symbol: SlotSymbol, run: usize) -> Option<PayoutRule> {
    let tier = match run {
        3 => 0,
        4 => 1,
        5 => 2,
        _ => return None,
    };
    let multipliers: [u64; 3] = match symbol {
        SlotSymbol::Cherry => [2, 5, 10],
        SlotSymbol::Lemon => [2, 4, 8],
        SlotSymbol::Orange => [3, 6, 12],
        SlotSymbol::Grape => [4, 8, 16],
        SlotSymbol::Bell => [5, 10, 25],
        SlotSymbol::Diamond => [10, 25, 50],
        SlotSymbol::Scatter => return Some(PayoutRule::FreeSpins(scatter_free_spins(run))),
        SlotSymbol::Jackpot | SlotSymbol::Malus => return None,
    };
    Some(PayoutRule::Multiplier(multipliers[tier] * BASIS_POINTS))
}

/// Free spins awarded for `count` scatter symbols.
pub fn scatter_free_spins(count: usize) -> u32 {
    match count {
        0..=2 => 0,
        3 => 5,
        4 => 10,
        _ => 15,
    }
}

/// Result of scoring a grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridEvaluation {
    pub payout: u64,
    pub free_spins: u32,
    /// Sorted union of every cell that took part in a scored rule.
    pub win_indices: Vec<u8>,
}

impl GridEvaluation {
    pub fn is_win(&self) -> bool {
        self.payout > 0 || self.free_spins > 0
    }
}

/// Count occurrences of `symbol` in the grid.
pub fn count_symbol(grid: &SlotGrid, symbol: SlotSymbol) -> usize {
    grid.iter().filter(|&&s| s == symbol).count()
}

/// Score a grid for `bet`.
pub fn evaluate(grid: &SlotGrid, bet: u64) -> GridEvaluation {
    let mut multiplier_bps = 0u64;
    let mut free_spins = 0u32;
    let mut winning = [false; SLOT_CELLS];

    // Paylines
    for line in &PAYLINES {
        let first = grid[line[0]];
        let run = line.iter().take_while(|&&cell| grid[cell] == first).count();
        if run < MIN_PAYLINE_RUN {
            continue;
        }
        let Some(rule) = payline_rule(first, run) else {
            continue;
        };
        match rule {
            PayoutRule::Multiplier(bps) => multiplier_bps += bps,
            PayoutRule::FreeSpins(spins) => free_spins += spins,
        }
        for &cell in &line[..run] {
            winning[cell] = true;
        }
    }

    // Scatter
    let scatters = count_symbol(grid, SlotSymbol::Scatter);
    let scatter_spins = scatter_free_spins(scatters);
    if scatter_spins > 0 {
        free_spins += scatter_spins;
        mark_symbol(grid, SlotSymbol::Scatter, &mut winning);
    }

    // Four anywhere
    for symbol in SlotSymbol::ALL {
        if count_symbol(grid, symbol) >= 4 {
            multiplier_bps += FOUR_ANYWHERE_BPS;
            mark_symbol(grid, symbol, &mut winning);
        }
    }

    // Full columns
    for column in 0..SLOT_COLUMNS {
        let cells = [column, column + SLOT_COLUMNS, column + 2 * SLOT_COLUMNS];
        if cells.iter().all(|&cell| grid[cell] == grid[column]) {
            multiplier_bps += FULL_COLUMN_BPS;
            for cell in cells {
                winning[cell] = true;
            }
        }
    }

    // Main diagonal
    if MAIN_DIAGONAL
        .iter()
        .all(|&cell| grid[cell] == grid[MAIN_DIAGONAL[0]])
    {
        multiplier_bps += DIAGONAL_BPS;
        for cell in MAIN_DIAGONAL {
            winning[cell] = true;
        }
    }

    GridEvaluation {
        payout: scale_amount(bet, multiplier_bps, BASIS_POINTS),
        free_spins,
        win_indices: winning
            .iter()
            .enumerate()
            .filter_map(|(cell, &hit)| hit.then_some(cell as u8))
            .collect(),
    }
}

fn mark_symbol(grid: &SlotGrid, symbol: SlotSymbol, winning: &mut [bool; SLOT_CELLS]) {
    for (cell, &s) in grid.iter().enumerate() {
        if s == symbol {
            winning[cell] = true;
        }
    }
}

/// Build a grid from 15 glyphs, row-major.
pub fn grid_from_glyphs(glyphs: &[&str]) -> Option<SlotGrid> {
    if glyphs.len() != SLOT_CELLS {
        return None;
    }
    let mut grid = [SlotSymbol::default(); SLOT_CELLS];
    for (cell, glyph) in glyphs.iter().enumerate() {
        grid[cell] = SlotSymbol::from_glyph(glyph)?;
    }
    Some(grid)
}
