use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, Write};

use super::codec::impl_u8_codec;

/// Special outcome attached to a resolved slot spin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum SpecialEvent {
    #[default]
    None = 0,
    Jackpot = 1,
    Malus = 2,
}

impl TryFrom<u8> for SpecialEvent {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Jackpot),
            2 => Ok(Self::Malus),
            i => Err(i),
        }
    }
}

/// Scratch card rarity tiers, in the order they are rolled and evaluated.
///
/// `Losing` doubles as "no win" when a card is scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScratchTier {
    SuperJackpot = 0,
    BombCombo = 1,
    BonusWord = 2,
    FourMatch = 3,
    ThreeAligned = 4,
    Surprise = 5,
    Replay = 6,
    #[default]
    Losing = 7,
}

impl ScratchTier {
    /// Tiers rolled by the generator, highest priority first. `Losing` is the fallthrough.
    pub const ROLL_ORDER: [ScratchTier; 7] = [
        ScratchTier::SuperJackpot,
        ScratchTier::BombCombo,
        ScratchTier::BonusWord,
        ScratchTier::FourMatch,
        ScratchTier::ThreeAligned,
        ScratchTier::Surprise,
        ScratchTier::Replay,
    ];

    /// Chance of the tier's independent check succeeding.
    pub fn probability(self) -> f64 {
        match self {
            ScratchTier::SuperJackpot => 1.0 / 20_000.0,
            ScratchTier::BombCombo => 1.0 / 2_000.0,
            ScratchTier::BonusWord => 1.0 / 500.0,
            ScratchTier::FourMatch => 1.0 / 50.0,
            ScratchTier::ThreeAligned => 0.15,
            ScratchTier::Surprise => 0.12,
            ScratchTier::Replay => 0.10,
            ScratchTier::Losing => 0.0,
        }
    }

    pub fn is_win(self) -> bool {
        self != ScratchTier::Losing
    }
}

impl TryFrom<u8> for ScratchTier {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::SuperJackpot),
            1 => Ok(Self::BombCombo),
            2 => Ok(Self::BonusWord),
            3 => Ok(Self::FourMatch),
            4 => Ok(Self::ThreeAligned),
            5 => Ok(Self::Surprise),
            6 => Ok(Self::Replay),
            7 => Ok(Self::Losing),
            i => Err(i),
        }
    }
}

/// How a chicken round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ChickenOutcome {
    Busted = 0,
    CashedOut = 1,
}

impl TryFrom<u8> for ChickenOutcome {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Busted),
            1 => Ok(Self::CashedOut),
            i => Err(i),
        }
    }
}

/// Roulette bet types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RouletteBetType {
    Straight = 0, // Single pocket (35:1)
    Red = 1,      // Red (1:1)
    Black = 2,    // Black (1:1)
    Even = 3,     // Even (1:1)
    Odd = 4,      // Odd (1:1)
    Low = 5,      // 1-18 (1:1)
    High = 6,     // 19-36 (1:1)
    Dozen = 7,    // 1-12, 13-24, 25-36 (2:1)
    Column = 8,   // First, second, third column (2:1)
}

impl TryFrom<u8> for RouletteBetType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Straight),
            1 => Ok(Self::Red),
            2 => Ok(Self::Black),
            3 => Ok(Self::Even),
            4 => Ok(Self::Odd),
            5 => Ok(Self::Low),
            6 => Ok(Self::High),
            7 => Ok(Self::Dozen),
            8 => Ok(Self::Column),
            i => Err(i),
        }
    }
}

impl_u8_codec!(SpecialEvent, ScratchTier, ChickenOutcome, RouletteBetType);

/// 32 bytes of entropy a round's randomness is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Seed(pub [u8; 32]);

impl Seed {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Write for Seed {
    fn write(&self, writer: &mut impl BufMut) {
        writer.put_slice(&self.0);
    }
}

impl Read for Seed {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        if reader.remaining() < Self::SIZE {
            return Err(Error::EndOfBuffer);
        }
        let mut bytes = [0u8; 32];
        reader.copy_to_slice(&mut bytes);
        Ok(Self(bytes))
    }
}

impl FixedSize for Seed {
    const SIZE: usize = 32;
}
