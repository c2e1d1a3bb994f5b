use super::codec::impl_u8_codec;

/// Slot machine symbols.
///
/// `Jackpot` and `Malus` only appear while free spins are running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SlotSymbol {
    #[default]
    Cherry = 0,
    Lemon = 1,
    Orange = 2,
    Grape = 3,
    Bell = 4,
    Diamond = 5,
    Scatter = 6,
    Jackpot = 7,
    Malus = 8,
}

impl SlotSymbol {
    pub const ALL: [SlotSymbol; 9] = [
        SlotSymbol::Cherry,
        SlotSymbol::Lemon,
        SlotSymbol::Orange,
        SlotSymbol::Grape,
        SlotSymbol::Bell,
        SlotSymbol::Diamond,
        SlotSymbol::Scatter,
        SlotSymbol::Jackpot,
        SlotSymbol::Malus,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            SlotSymbol::Cherry => "🍒",
            SlotSymbol::Lemon => "🍋",
            SlotSymbol::Orange => "🍊",
            SlotSymbol::Grape => "🍇",
            SlotSymbol::Bell => "🔔",
            SlotSymbol::Diamond => "💎",
            SlotSymbol::Scatter => "⭐",
            SlotSymbol::Jackpot => "💰",
            SlotSymbol::Malus => "💀",
        }
    }

    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.glyph() == glyph)
    }

    /// Jackpot and malus symbols are gated behind bonus mode.
    pub fn is_special(self) -> bool {
        matches!(self, SlotSymbol::Jackpot | SlotSymbol::Malus)
    }
}

impl TryFrom<u8> for SlotSymbol {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(value as usize).copied().ok_or(value)
    }
}

/// Scratch card symbols.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ScratchSymbol {
    #[default]
    Crown = 0,
    Diamond = 1,
    Clover = 2,
    Bell = 3,
    Cherry = 4,
    Lemon = 5,
    Star = 6,
    Heart = 7,
    Seven = 8,
    Jackpot = 9,
    Bomb = 10,
    BonusB = 11,
    BonusO = 12,
    BonusN = 13,
    BonusU = 14,
    BonusS = 15,
    Surprise = 16,
    Replay = 17,
}

impl ScratchSymbol {
    pub const ALL: [ScratchSymbol; 18] = [
        ScratchSymbol::Crown,
        ScratchSymbol::Diamond,
        ScratchSymbol::Clover,
        ScratchSymbol::Bell,
        ScratchSymbol::Cherry,
        ScratchSymbol::Lemon,
        ScratchSymbol::Star,
        ScratchSymbol::Heart,
        ScratchSymbol::Seven,
        ScratchSymbol::Jackpot,
        ScratchSymbol::Bomb,
        ScratchSymbol::BonusB,
        ScratchSymbol::BonusO,
        ScratchSymbol::BonusN,
        ScratchSymbol::BonusU,
        ScratchSymbol::BonusS,
        ScratchSymbol::Surprise,
        ScratchSymbol::Replay,
    ];

    /// Symbols with no special meaning; these fill the cells a tier leaves empty.
    pub const REGULAR: [ScratchSymbol; 9] = [
        ScratchSymbol::Crown,
        ScratchSymbol::Diamond,
        ScratchSymbol::Clover,
        ScratchSymbol::Bell,
        ScratchSymbol::Cherry,
        ScratchSymbol::Lemon,
        ScratchSymbol::Star,
        ScratchSymbol::Heart,
        ScratchSymbol::Seven,
    ];

    /// The five letters of the bonus word.
    pub const BONUS_WORD: [ScratchSymbol; 5] = [
        ScratchSymbol::BonusB,
        ScratchSymbol::BonusO,
        ScratchSymbol::BonusN,
        ScratchSymbol::BonusU,
        ScratchSymbol::BonusS,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            ScratchSymbol::Crown => "👑",
            ScratchSymbol::Diamond => "💎",
            ScratchSymbol::Clover => "🍀",
            ScratchSymbol::Bell => "🔔",
            ScratchSymbol::Cherry => "🍒",
            ScratchSymbol::Lemon => "🍋",
            ScratchSymbol::Star => "⭐",
            ScratchSymbol::Heart => "❤️",
            ScratchSymbol::Seven => "7️⃣",
            ScratchSymbol::Jackpot => "💰",
            ScratchSymbol::Bomb => "💣",
            ScratchSymbol::BonusB => "B",
            ScratchSymbol::BonusO => "O",
            ScratchSymbol::BonusN => "N",
            ScratchSymbol::BonusU => "U",
            ScratchSymbol::BonusS => "S",
            ScratchSymbol::Surprise => "🎁",
            ScratchSymbol::Replay => "🔁",
        }
    }

    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.glyph() == glyph)
    }

    pub fn is_bonus_letter(self) -> bool {
        Self::BONUS_WORD.contains(&self)
    }

    pub fn is_regular(self) -> bool {
        Self::REGULAR.contains(&self)
    }
}

impl TryFrom<u8> for ScratchSymbol {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL.get(value as usize).copied().ok_or(value)
    }
}

impl_u8_codec!(SlotSymbol, ScratchSymbol);
