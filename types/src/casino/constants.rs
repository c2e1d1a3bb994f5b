/// Slot machine grid width (reels).
pub const SLOT_COLUMNS: usize = 5;

/// Slot machine grid height (rows).
pub const SLOT_ROWS: usize = 3;

/// Number of cells in a slot grid (row-major).
pub const SLOT_CELLS: usize = SLOT_COLUMNS * SLOT_ROWS;

/// Shortest payline run that can pay.
pub const MIN_PAYLINE_RUN: usize = 3;

/// Resolution used when expanding a weight table into a sampling pool.
pub const WEIGHT_RESOLUTION: f64 = 100.0;

/// Value the progressive jackpot is reset to after being won.
pub const JACKPOT_FLOOR: u64 = 10_000;

/// Jackpot or malus symbols needed anywhere in a bonus-mode grid to trigger.
pub const SPECIAL_SYMBOL_THRESHOLD: usize = 5;

/// Default slot bet denominations.
pub const SLOT_BET_DENOMINATIONS: [u64; 5] = [10, 50, 100, 500, 1_000];

/// Cells on a chicken board.
pub const CHICKEN_CELLS: usize = 25;

/// Smallest configurable mine count.
pub const CHICKEN_MIN_MINES: u8 = 1;

/// Largest configurable mine count.
pub const CHICKEN_MAX_MINES: u8 = 24;

/// Default chicken bet denominations.
pub const CHICKEN_BET_DENOMINATIONS: [u64; 5] = [10, 50, 100, 500, 1_000];

/// Multipliers are carried in hundredths (1.00x = 100).
pub const MULTIPLIER_SCALE: u64 = 100;

/// Scratch card grid side.
pub const SCRATCH_SIDE: usize = 3;

/// Cells on a scratch card.
pub const SCRATCH_CELLS: usize = SCRATCH_SIDE * SCRATCH_SIDE;

/// Default scratch card ticket prices.
pub const SCRATCH_TICKET_PRICES: [u64; 4] = [100, 500, 1_000, 5_000];

/// Maximum number of bets on one roulette spin.
pub const ROULETTE_MAX_BETS: usize = 20;

/// Payout multipliers are computed in basis points (1.0x = 10_000).
pub const BASIS_POINTS: u64 = 10_000;

/// Reason codes attached to rejected operations.
pub const ERROR_INVALID_BET: u8 = 1;
pub const ERROR_INSUFFICIENT_FUNDS: u8 = 2;
pub const ERROR_INVALID_CONFIGURATION: u8 = 3;
pub const ERROR_ROUND_ALREADY_ACTIVE: u8 = 4;
pub const ERROR_NO_ACTIVE_ROUND: u8 = 5;
pub const ERROR_EMPTY_SAMPLE_POOL: u8 = 6;
pub const ERROR_INVALID_MOVE: u8 = 7;
