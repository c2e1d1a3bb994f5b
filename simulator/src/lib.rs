//! Headless return-to-player simulation for the arcade engines.
//!
//! A run plays every selected game for a number of simulated players, each with
//! its own wallet and a fixed strategy, and reports what was wagered and
//! returned. Runs are reproducible from their seed.

use arcade_types::casino::{
    ChickenConfig, ConfigError as GameConfigError, RouletteConfig, ScratchConfig, SlotConfig,
};
use arcade_types::Seed;
use clap::ValueEnum;
use commonware_utils::from_hex_formatted;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

mod simulation;

pub use simulation::{simulate, GameReport, Report};

/// Games the simulator can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Slots,
    Chicken,
    Scratch,
    Roulette,
}

impl Game {
    pub const ALL: [Game; 4] = [Game::Slots, Game::Chicken, Game::Scratch, Game::Roulette];

    pub fn name(self) -> &'static str {
        match self {
            Game::Slots => "slots",
            Game::Chicken => "chicken",
            Game::Scratch => "scratch",
            Game::Roulette => "roulette",
        }
    }
}

/// Basis points in one whole.
pub const BASIS_POINTS: u64 = 10_000;

/// Slot strategy: repeat paid spins at a fixed bet.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SlotPlan {
    pub bet: u64,
    /// Share of every paid stake fed into the shared jackpot, in basis points.
    pub jackpot_share_bps: u64,
    pub machine: SlotConfig,
}

impl Default for SlotPlan {
    fn default() -> Self {
        Self {
            bet: 100,
            jackpot_share_bps: 100,
            machine: SlotConfig::default(),
        }
    }
}

/// Chicken strategy: uncover `reveals` random cells, then cash out.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChickenPlan {
    pub bet: u64,
    pub mines: u8,
    pub reveals: u8,
    pub board: ChickenConfig,
}

impl Default for ChickenPlan {
    fn default() -> Self {
        Self {
            bet: 100,
            mines: 3,
            reveals: 3,
            board: ChickenConfig::default(),
        }
    }
}

/// Scratch strategy: buy one ticket price over and over.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScratchPlan {
    pub price: u64,
    pub cards: ScratchConfig,
}

impl Default for ScratchPlan {
    fn default() -> Self {
        Self {
            price: 500,
            cards: ScratchConfig::default(),
        }
    }
}

/// Roulette strategy: a single even-money bet on red every spin.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RoulettePlan {
    pub amount: u64,
    pub table: RouletteConfig,
}

impl Default for RoulettePlan {
    fn default() -> Self {
        Self {
            amount: 100,
            table: RouletteConfig::default(),
        }
    }
}

/// Simulation configuration, as read from YAML.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Hex seed; a random one is drawn (and reported) when absent.
    pub seed: Option<String>,
    pub players: u32,
    pub rounds: u32,
    pub starting_balance: u64,
    pub log_level: String,
    pub games: Vec<Game>,

    pub slots: SlotPlan,
    pub chicken: ChickenPlan,
    pub scratch: ScratchPlan,
    pub roulette: RoulettePlan,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            players: 100,
            rounds: 1_000,
            starting_balance: 100_000,
            log_level: "info".to_string(),
            games: Game::ALL.to_vec(),
            slots: SlotPlan::default(),
            chicken: ChickenPlan::default(),
            scratch: ScratchPlan::default(),
            roulette: RoulettePlan::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be hex: {value}")]
    InvalidHex { field: &'static str, value: String },
    #[error("seed must be 32 bytes (got {len})")]
    InvalidSeedLength { len: usize },
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
    #[error("{field} is not allowed by the game configuration (got {value})")]
    InvalidPlan { field: &'static str, value: u64 },
    #[error("invalid {game} configuration")]
    Game {
        game: &'static str,
        #[source]
        source: GameConfigError,
    },
}

/// A configuration that passed validation.
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub seed: Option<Seed>,
    pub players: u32,
    pub rounds: u32,
    pub starting_balance: u64,
    pub log_level: Level,
    pub games: Vec<Game>,

    pub slots: SlotPlan,
    pub chicken: ChickenPlan,
    pub scratch: ScratchPlan,
    pub roulette: RoulettePlan,
}

fn parse_seed(value: &str) -> Result<Seed, ConfigError> {
    let bytes = from_hex_formatted(value).ok_or(ConfigError::InvalidHex {
        field: "seed",
        value: value.to_string(),
    })?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| ConfigError::InvalidSeedLength { len: bytes.len() })?;
    Ok(Seed::new(bytes))
}

fn non_zero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(())
}

fn game_config(game: Game, result: Result<(), GameConfigError>) -> Result<(), ConfigError> {
    result.map_err(|source| ConfigError::Game {
        game: game.name(),
        source,
    })
}

impl Config {
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        non_zero("players", self.players as u64)?;
        non_zero("rounds", self.rounds as u64)?;
        non_zero("starting_balance", self.starting_balance)?;
        if self.games.is_empty() {
            return Err(ConfigError::InvalidNonZero {
                field: "games",
                value: 0,
            });
        }

        let seed = self.seed.as_deref().map(parse_seed).transpose()?;
        let log_level =
            Level::from_str(&self.log_level).map_err(|_| ConfigError::InvalidLogLevel {
                value: self.log_level.clone(),
            })?;

        game_config(Game::Slots, self.slots.machine.validate())?;
        if !self.slots.machine.accepts_bet(self.slots.bet) {
            return Err(ConfigError::InvalidPlan {
                field: "slots.bet",
                value: self.slots.bet,
            });
        }
        if self.slots.jackpot_share_bps > BASIS_POINTS {
            return Err(ConfigError::InvalidPlan {
                field: "slots.jackpot_share_bps",
                value: self.slots.jackpot_share_bps,
            });
        }

        game_config(Game::Chicken, self.chicken.board.validate())?;
        if !self.chicken.board.accepts_bet(self.chicken.bet) {
            return Err(ConfigError::InvalidPlan {
                field: "chicken.bet",
                value: self.chicken.bet,
            });
        }
        if !self.chicken.board.accepts_mines(self.chicken.mines) {
            return Err(ConfigError::InvalidPlan {
                field: "chicken.mines",
                value: self.chicken.mines as u64,
            });
        }
        let safe_cells = self.chicken.board.cell_count - self.chicken.mines as usize;
        if self.chicken.reveals == 0 || self.chicken.reveals as usize > safe_cells {
            return Err(ConfigError::InvalidPlan {
                field: "chicken.reveals",
                value: self.chicken.reveals as u64,
            });
        }

        game_config(Game::Scratch, self.scratch.cards.validate())?;
        if !self.scratch.cards.accepts_price(self.scratch.price) {
            return Err(ConfigError::InvalidPlan {
                field: "scratch.price",
                value: self.scratch.price,
            });
        }

        game_config(Game::Roulette, self.roulette.table.validate())?;
        if self.roulette.amount < self.roulette.table.min_bet {
            return Err(ConfigError::InvalidPlan {
                field: "roulette.amount",
                value: self.roulette.amount,
            });
        }

        let mut games = Vec::with_capacity(self.games.len());
        for game in self.games {
            if !games.contains(&game) {
                games.push(game);
            }
        }

        Ok(ValidatedConfig {
            seed,
            players: self.players,
            rounds: self.rounds,
            starting_balance: self.starting_balance,
            log_level,
            games,
            slots: self.slots,
            chicken: self.chicken,
            scratch: self.scratch,
            roulette: self.roulette,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default().validate().unwrap();
        assert!(config.seed.is_none());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.games, Game::ALL.to_vec());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
seed: "0x0101010101010101010101010101010101010101010101010101010101010101"
players: 4
rounds: 25
log_level: debug
games: [slots, chicken]
chicken:
  mines: 5
  reveals: 2
roulette:
  table:
    variant: american
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.starting_balance, 100_000);
        assert_eq!(config.chicken.bet, 100);

        let config = config.validate().unwrap();
        assert_eq!(config.seed, Some(Seed::new([1u8; 32])));
        assert_eq!(config.players, 4);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.games, vec![Game::Slots, Game::Chicken]);
        assert_eq!(config.chicken.mines, 5);
        assert_eq!(
            config.roulette.table.variant,
            arcade_types::casino::RouletteVariant::American
        );
    }

    #[test]
    fn test_rejects_bad_seed() {
        let config = Config {
            seed: Some("zz".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHex { field: "seed", .. })
        ));

        let config = Config {
            seed: Some("0x0102".to_string()),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSeedLength { len: 2 })
        ));
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = Config {
            players: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNonZero {
                field: "players",
                ..
            })
        ));

        let config = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLogLevel { .. })
        ));

        let mut config = Config::default();
        config.slots.bet = 75;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlan {
                field: "slots.bet",
                value: 75
            })
        ));

        let mut config = Config::default();
        config.slots.jackpot_share_bps = 10_001;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlan {
                field: "slots.jackpot_share_bps",
                ..
            })
        ));

        let mut config = Config::default();
        config.chicken.mines = 24;
        config.chicken.reveals = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPlan {
                field: "chicken.reveals",
                ..
            })
        ));

        let mut config = Config::default();
        config.scratch.cards.ticket_prices.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Game {
                game: "scratch",
                ..
            })
        ));
    }
}
