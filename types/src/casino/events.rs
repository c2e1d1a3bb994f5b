//! Round events handed to presentation layers.
//!
//! One event is published per round boundary; a caller may schedule its next
//! action (animation, next auto spin) as soon as it has observed the event.

use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};

use super::{
    indices_encode_size, read_array, read_indices, write_indices, ChickenOutcome, ScratchSymbol,
    ScratchTier, SlotSymbol, SpecialEvent, SCRATCH_CELLS, SLOT_CELLS,
};

/// Maximum chicken board size representable in an event.
const MAX_BOARD_CELLS: usize = 32;

/// A resolved slot spin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotSpin {
    pub grid: [SlotSymbol; SLOT_CELLS],
    pub bet: u64,
    pub free_spin: bool,
    /// Payout computed from the grid (credited unless a malus hit).
    pub payout: u64,
    pub free_spins_awarded: u32,
    pub free_spins_remaining: u32,
    pub win_indices: Vec<u8>,
    pub special: SpecialEvent,
    pub balance: u64,
}

impl Write for SlotSpin {
    fn write(&self, writer: &mut impl BufMut) {
        for symbol in &self.grid {
            symbol.write(writer);
        }
        self.bet.write(writer);
        self.free_spin.write(writer);
        self.payout.write(writer);
        self.free_spins_awarded.write(writer);
        self.free_spins_remaining.write(writer);
        write_indices(&self.win_indices, writer);
        self.special.write(writer);
        self.balance.write(writer);
    }
}

impl Read for SlotSpin {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            grid: read_array(reader)?,
            bet: u64::read(reader)?,
            free_spin: bool::read(reader)?,
            payout: u64::read(reader)?,
            free_spins_awarded: u32::read(reader)?,
            free_spins_remaining: u32::read(reader)?,
            win_indices: read_indices(reader, SLOT_CELLS)?,
            special: SpecialEvent::read(reader)?,
            balance: u64::read(reader)?,
        })
    }
}

impl EncodeSize for SlotSpin {
    fn encode_size(&self) -> usize {
        SLOT_CELLS * SlotSymbol::SIZE
            + self.bet.encode_size()
            + self.free_spin.encode_size()
            + self.payout.encode_size()
            + self.free_spins_awarded.encode_size()
            + self.free_spins_remaining.encode_size()
            + indices_encode_size(&self.win_indices)
            + self.special.encode_size()
            + self.balance.encode_size()
    }
}

/// A single chicken cell reveal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChickenReveal {
    pub cell: u8,
    pub mine: bool,
    pub chickens_found: u8,
    /// Current multiplier in hundredths.
    pub multiplier: u32,
    pub potential_win: u64,
}

impl Write for ChickenReveal {
    fn write(&self, writer: &mut impl BufMut) {
        self.cell.write(writer);
        self.mine.write(writer);
        self.chickens_found.write(writer);
        self.multiplier.write(writer);
        self.potential_win.write(writer);
    }
}

impl Read for ChickenReveal {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            cell: u8::read(reader)?,
            mine: bool::read(reader)?,
            chickens_found: u8::read(reader)?,
            multiplier: u32::read(reader)?,
            potential_win: u64::read(reader)?,
        })
    }
}

impl EncodeSize for ChickenReveal {
    fn encode_size(&self) -> usize {
        self.cell.encode_size()
            + self.mine.encode_size()
            + self.chickens_found.encode_size()
            + self.multiplier.encode_size()
            + self.potential_win.encode_size()
    }
}

/// A finished chicken round with the full board uncovered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChickenResult {
    pub bet: u64,
    pub mines: u8,
    /// Bit `i` set when cell `i` holds a mine.
    pub mine_mask: u32,
    /// Bit `i` set when the player revealed cell `i` before the round ended.
    pub revealed_mask: u32,
    pub chickens_found: u8,
    pub multiplier: u32,
    pub outcome: ChickenOutcome,
    pub payout: u64,
}

impl Write for ChickenResult {
    fn write(&self, writer: &mut impl BufMut) {
        self.bet.write(writer);
        self.mines.write(writer);
        self.mine_mask.write(writer);
        self.revealed_mask.write(writer);
        self.chickens_found.write(writer);
        self.multiplier.write(writer);
        self.outcome.write(writer);
        self.payout.write(writer);
    }
}

impl Read for ChickenResult {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let result = Self {
            bet: u64::read(reader)?,
            mines: u8::read(reader)?,
            mine_mask: u32::read(reader)?,
            revealed_mask: u32::read(reader)?,
            chickens_found: u8::read(reader)?,
            multiplier: u32::read(reader)?,
            outcome: ChickenOutcome::read(reader)?,
            payout: u64::read(reader)?,
        };
        if result.mines as usize >= MAX_BOARD_CELLS
            || result.mine_mask.count_ones() != result.mines as u32
        {
            return Err(Error::Invalid("ChickenResult", "mine count mismatch"));
        }
        Ok(result)
    }
}

impl EncodeSize for ChickenResult {
    fn encode_size(&self) -> usize {
        self.bet.encode_size()
            + self.mines.encode_size()
            + self.mine_mask.encode_size()
            + self.revealed_mask.encode_size()
            + self.chickens_found.encode_size()
            + self.multiplier.encode_size()
            + self.outcome.encode_size()
            + self.payout.encode_size()
    }
}

/// A bought and scored scratch card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScratchCard {
    pub price: u64,
    pub grid: [ScratchSymbol; SCRATCH_CELLS],
    /// Tier the card was generated for (may differ from `win` after the final shuffle).
    pub generated: ScratchTier,
    pub win: ScratchTier,
    pub multiplier: u32,
    pub matched: Option<ScratchSymbol>,
    pub win_indices: Vec<u8>,
    pub payout: u64,
}

impl Write for ScratchCard {
    fn write(&self, writer: &mut impl BufMut) {
        self.price.write(writer);
        for symbol in &self.grid {
            symbol.write(writer);
        }
        self.generated.write(writer);
        self.win.write(writer);
        self.multiplier.write(writer);
        self.matched.write(writer);
        write_indices(&self.win_indices, writer);
        self.payout.write(writer);
    }
}

impl Read for ScratchCard {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            price: u64::read(reader)?,
            grid: read_array(reader)?,
            generated: ScratchTier::read(reader)?,
            win: ScratchTier::read(reader)?,
            multiplier: u32::read(reader)?,
            matched: Option::<ScratchSymbol>::read(reader)?,
            win_indices: read_indices(reader, SCRATCH_CELLS)?,
            payout: u64::read(reader)?,
        })
    }
}

impl EncodeSize for ScratchCard {
    fn encode_size(&self) -> usize {
        self.price.encode_size()
            + SCRATCH_CELLS * ScratchSymbol::SIZE
            + self.generated.encode_size()
            + self.win.encode_size()
            + self.multiplier.encode_size()
            + self.matched.encode_size()
            + indices_encode_size(&self.win_indices)
            + self.payout.encode_size()
    }
}

/// A resolved roulette spin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouletteSpin {
    /// Winning pocket (37 is double zero on American wheels).
    pub result: u8,
    pub bets: u8,
    pub wagered: u64,
    pub payout: u64,
}

impl Write for RouletteSpin {
    fn write(&self, writer: &mut impl BufMut) {
        self.result.write(writer);
        self.bets.write(writer);
        self.wagered.write(writer);
        self.payout.write(writer);
    }
}

impl Read for RouletteSpin {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            result: u8::read(reader)?,
            bets: u8::read(reader)?,
            wagered: u64::read(reader)?,
            payout: u64::read(reader)?,
        })
    }
}

impl EncodeSize for RouletteSpin {
    fn encode_size(&self) -> usize {
        self.result.encode_size()
            + self.bets.encode_size()
            + self.wagered.encode_size()
            + self.payout.encode_size()
    }
}

/// Events emitted at round boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum Event {
    SlotSpinResolved(SlotSpin),
    ChickenStarted { bet: u64, mines: u8 },
    ChickenRevealed(ChickenReveal),
    ChickenResolved(ChickenResult),
    ScratchCardResolved(ScratchCard),
    RouletteSpinResolved(RouletteSpin),
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Event::SlotSpinResolved(spin) => {
                0u8.write(writer);
                spin.write(writer);
            }
            Event::ChickenStarted { bet, mines } => {
                1u8.write(writer);
                bet.write(writer);
                mines.write(writer);
            }
            Event::ChickenRevealed(reveal) => {
                2u8.write(writer);
                reveal.write(writer);
            }
            Event::ChickenResolved(result) => {
                3u8.write(writer);
                result.write(writer);
            }
            Event::ScratchCardResolved(card) => {
                4u8.write(writer);
                card.write(writer);
            }
            Event::RouletteSpinResolved(spin) => {
                5u8.write(writer);
                spin.write(writer);
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Event::SlotSpinResolved(SlotSpin::read(reader)?)),
            1 => Ok(Event::ChickenStarted {
                bet: u64::read(reader)?,
                mines: u8::read(reader)?,
            }),
            2 => Ok(Event::ChickenRevealed(ChickenReveal::read(reader)?)),
            3 => Ok(Event::ChickenResolved(ChickenResult::read(reader)?)),
            4 => Ok(Event::ScratchCardResolved(ScratchCard::read(reader)?)),
            5 => Ok(Event::RouletteSpinResolved(RouletteSpin::read(reader)?)),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        1 + match self {
            Event::SlotSpinResolved(spin) => spin.encode_size(),
            Event::ChickenStarted { bet, mines } => bet.encode_size() + mines.encode_size(),
            Event::ChickenRevealed(reveal) => reveal.encode_size(),
            Event::ChickenResolved(result) => result.encode_size(),
            Event::ScratchCardResolved(card) => card.encode_size(),
            Event::RouletteSpinResolved(spin) => spin.encode_size(),
        }
    }
}
