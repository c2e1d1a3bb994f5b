use arcade_execution::casino::chicken::ChickenGame;
use arcade_execution::casino::roulette::{RouletteBet, RouletteTable};
use arcade_execution::casino::scratch::ScratchGame;
use arcade_execution::casino::slots::SlotMachine;
use arcade_execution::{
    AutoPlay, AutoPlayReport, CancelHandle, GameError, GameRng, Memory, SharedJackpot, Sink, Step,
    StopReason, Wallet,
};
use arcade_types::casino::{Event, RouletteBetType, SpecialEvent};
use arcade_types::Seed;
use rand::{rngs::OsRng, RngCore};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::{Game, ValidatedConfig, BASIS_POINTS};

/// Counts what a player staked, read from the round events.
#[derive(Clone, Debug, Default)]
struct Tally {
    rounds: u64,
    wagered: u64,
    free_spins: u64,
    jackpots: u64,
    maluses: u64,
    /// Pool fed a share (in basis points) of every paid slot stake.
    feed: Option<(SharedJackpot, u64)>,
}

impl Tally {
    fn feeding(pool: SharedJackpot, share_bps: u64) -> Self {
        Self {
            feed: Some((pool, share_bps)),
            ..Self::default()
        }
    }
}

impl Sink for Tally {
    fn publish(&mut self, event: Event) {
        match event {
            Event::SlotSpinResolved(spin) => {
                self.rounds += 1;
                if spin.free_spin {
                    self.free_spins += 1;
                } else {
                    self.wagered = self.wagered.saturating_add(spin.bet);
                    if let Some((pool, share_bps)) = &self.feed {
                        pool.contribute(spin.bet.saturating_mul(*share_bps) / BASIS_POINTS);
                    }
                }
                match spin.special {
                    SpecialEvent::Jackpot => self.jackpots += 1,
                    SpecialEvent::Malus => self.maluses += 1,
                    SpecialEvent::None => {}
                }
            }
            Event::ChickenStarted { bet, .. } => {
                self.wagered = self.wagered.saturating_add(bet);
            }
            Event::ChickenRevealed(_) => {}
            Event::ChickenResolved(_) => self.rounds += 1,
            Event::ScratchCardResolved(card) => {
                self.rounds += 1;
                self.wagered = self.wagered.saturating_add(card.price);
            }
            Event::RouletteSpinResolved(spin) => {
                self.rounds += 1;
                self.wagered = self.wagered.saturating_add(spin.wagered);
            }
        }
    }
}

/// One simulated player's session at one game.
#[derive(Clone, Debug)]
struct Session {
    tally: Tally,
    balance: u64,
    busted: bool,
}

impl Session {
    fn finish(tally: Tally, wallet: &Memory, report: &AutoPlayReport) -> Self {
        Self {
            tally,
            balance: wallet.balance(),
            busted: matches!(
                report.stop,
                StopReason::Rejected(GameError::InsufficientFunds { .. })
            ),
        }
    }
}

/// Totals for one game across every player.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameReport {
    pub game: Game,
    pub players: u32,
    pub rounds: u64,
    pub wagered: u64,
    /// Sum of final balances minus starting balances.
    pub net: i64,
    /// Returned to players per unit wagered.
    pub rtp: f64,
    pub busted_players: u32,
    pub free_spins: u64,
    pub jackpots: u64,
    pub maluses: u64,
}

impl GameReport {
    fn collect(game: Game, starting_balance: u64, sessions: &[Session]) -> Self {
        let mut report = Self {
            game,
            players: sessions.len() as u32,
            rounds: 0,
            wagered: 0,
            net: 0,
            rtp: 0.0,
            busted_players: 0,
            free_spins: 0,
            jackpots: 0,
            maluses: 0,
        };
        let mut net = 0i128;
        for session in sessions {
            report.rounds += session.tally.rounds;
            report.wagered = report.wagered.saturating_add(session.tally.wagered);
            report.free_spins += session.tally.free_spins;
            report.jackpots += session.tally.jackpots;
            report.maluses += session.tally.maluses;
            report.busted_players += session.busted as u32;
            net += session.balance as i128 - starting_balance as i128;
        }
        report.net = net.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
        if report.wagered > 0 {
            report.rtp = (report.wagered as f64 + report.net as f64) / report.wagered as f64;
        }
        report
    }
}

/// Result of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    /// Hex seed that reproduces the run.
    pub seed: String,
    pub players: u32,
    pub rounds_per_player: u32,
    pub starting_balance: u64,
    /// Whether the run was cut short.
    pub cancelled: bool,
    pub games: Vec<GameReport>,
}

fn random_seed() -> Seed {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Seed::new(bytes)
}

struct Runner<'a> {
    config: &'a ValidatedConfig,
    seed: Seed,
    cancel: &'a CancelHandle,
    jackpot: SharedJackpot,
}

impl Runner<'_> {
    fn rng(&self, game: Game, player: u32) -> GameRng {
        let index = Game::ALL.iter().position(|g| *g == game).unwrap_or(0);
        GameRng::new(&self.seed, player as u64, index as u32)
    }

    fn autoplay(&self) -> AutoPlay {
        AutoPlay::with_handle(self.cancel.clone()).with_limit(self.config.rounds)
    }

    fn play(&self, game: Game, player: u32) -> Result<Session, GameError> {
        let mut rng = self.rng(game, player);
        let mut wallet = Memory::new(self.config.starting_balance, 0);
        let mut tally = match game {
            Game::Slots => {
                Tally::feeding(self.jackpot.clone(), self.config.slots.jackpot_share_bps)
            }
            _ => Tally::default(),
        };

        let report = match game {
            Game::Slots => {
                let plan = &self.config.slots;
                let mut machine = SlotMachine::new(plan.machine.clone())?;
                let mut jackpot = self.jackpot.clone();
                let report = machine.autoplay_paid(
                    &self.autoplay(),
                    plan.bet,
                    &mut rng,
                    &mut wallet,
                    &mut jackpot,
                    &mut tally,
                );
                // Free spins already won are always played out.
                machine.run_free_spins(
                    &AutoPlay::with_handle(self.cancel.clone()),
                    &mut rng,
                    &mut wallet,
                    &mut jackpot,
                    &mut tally,
                );
                report
            }
            Game::Chicken => {
                let plan = &self.config.chicken;
                let mut chicken = ChickenGame::new(plan.board.clone())?;
                let cells = plan.board.cell_count;
                self.autoplay().run(|_| {
                    chicken.start(plan.bet, plan.mines, &mut rng, &mut wallet, &mut tally)?;
                    for cell in rng.choose_distinct(cells, plan.reveals as usize) {
                        let reveal = chicken.reveal(cell, &mut tally)?;
                        if reveal.is_some_and(|reveal| reveal.mine) {
                            break;
                        }
                    }
                    chicken.cash_out(&mut wallet, &mut tally);
                    Ok(Step::Played)
                })
            }
            Game::Scratch => {
                let plan = &self.config.scratch;
                let scratch = ScratchGame::new(plan.cards.clone())?;
                self.autoplay().run(|_| {
                    scratch.buy(plan.price, &mut rng, &mut wallet, &mut tally)?;
                    Ok(Step::Played)
                })
            }
            Game::Roulette => {
                let plan = &self.config.roulette;
                let table = RouletteTable::new(plan.table.clone())?;
                let bets = [RouletteBet::new(RouletteBetType::Red, 0, plan.amount)];
                self.autoplay().run(|_| {
                    table.spin(&bets, &mut rng, &mut wallet, &mut tally)?;
                    Ok(Step::Played)
                })
            }
        };

        if let StopReason::Rejected(err) = &report.stop {
            if !matches!(err, GameError::InsufficientFunds { .. }) {
                return Err(err.clone());
            }
        }
        let session = Session::finish(tally, &wallet, &report);
        debug!(
            game = game.name(),
            player,
            rounds = report.rounds,
            balance = session.balance,
            busted = session.busted,
            "session finished"
        );
        Ok(session)
    }

    #[cfg(feature = "parallel")]
    fn play_all(&self, game: Game) -> Result<Vec<Session>, GameError> {
        (0..self.config.players)
            .into_par_iter()
            .map(|player| self.play(game, player))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn play_all(&self, game: Game) -> Result<Vec<Session>, GameError> {
        (0..self.config.players)
            .map(|player| self.play(game, player))
            .collect()
    }
}

/// Play every configured game for every player.
///
/// Players of a game are independent except for the slot jackpot, which all slot
/// players share and feed from their paid stakes. Without an explicit seed a random one is drawn and reported.
/// Triggering `cancel` stops every session before its next round.
pub fn simulate(config: &ValidatedConfig, cancel: &CancelHandle) -> Result<Report, GameError> {
    let seed = config.seed.unwrap_or_else(random_seed);
    let runner = Runner {
        config,
        seed,
        cancel,
        jackpot: SharedJackpot::new(config.slots.machine.jackpot_floor),
    };

    let mut games = Vec::with_capacity(config.games.len());
    for &game in &config.games {
        let sessions = runner.play_all(game)?;
        let report = GameReport::collect(game, config.starting_balance, &sessions);
        info!(
            game = game.name(),
            rounds = report.rounds,
            wagered = report.wagered,
            net = report.net,
            rtp = report.rtp,
            busted = report.busted_players,
            "game simulated"
        );
        games.push(report);
    }

    Ok(Report {
        seed: commonware_utils::hex(seed.as_bytes()),
        players: config.players,
        rounds_per_player: config.rounds,
        starting_balance: config.starting_balance,
        cancelled: cancel.is_cancelled(),
        games,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use arcade_execution::mocks::create_seed;
    use arcade_execution::JackpotPool;

    fn config(games: Vec<Game>) -> ValidatedConfig {
        let mut config = Config {
            players: 4,
            rounds: 30,
            starting_balance: 10_000,
            games,
            ..Config::default()
        }
        .validate()
        .unwrap();
        config.seed = Some(create_seed(7));
        config
    }

    #[test]
    fn test_same_seed_same_report() {
        // Slots are left out: concurrent slot players race for the shared jackpot
        let config = config(vec![Game::Chicken, Game::Scratch, Game::Roulette]);
        let first = simulate(&config, &CancelHandle::new()).unwrap();
        let second = simulate(&config, &CancelHandle::new()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.seed, commonware_utils::hex(create_seed(7).as_bytes()));
        assert!(!first.cancelled);
    }

    #[test]
    fn test_report_totals() {
        let config = config(Game::ALL.to_vec());
        let report = simulate(&config, &CancelHandle::new()).unwrap();
        assert_eq!(report.games.len(), 4);

        for game in &report.games {
            assert_eq!(game.players, 4);
            assert!(game.wagered > 0);
            let paid_rounds = game.rounds - game.free_spins;
            assert!(paid_rounds <= 4 * 30);
            // Nobody can lose more than they brought
            assert!(game.net >= -(4 * 10_000));
        }

        let roulette = &report.games[3];
        assert_eq!(roulette.game, Game::Roulette);
        assert_eq!(roulette.free_spins, 0);
        assert_eq!(roulette.wagered, roulette.rounds * 100);
    }

    #[test]
    fn test_busted_players_are_counted() {
        let mut config = config(vec![Game::Roulette]);
        config.starting_balance = 100;
        config.rounds = 1_000;
        let report = simulate(&config, &CancelHandle::new()).unwrap();
        let roulette = &report.games[0];

        // Doubling or nothing on every spin, a player either busts or ends on a
        // multiple of the stake
        assert!(roulette.busted_players > 0);
        assert_eq!(roulette.net % 100, 0);
    }

    #[test]
    fn test_cancel_before_start() {
        let config = config(Game::ALL.to_vec());
        let cancel = CancelHandle::new();
        cancel.cancel();

        let report = simulate(&config, &cancel).unwrap();
        assert!(report.cancelled);
        for game in &report.games {
            assert_eq!(game.rounds, 0);
            assert_eq!(game.wagered, 0);
            assert_eq!(game.net, 0);
            assert_eq!(game.busted_players, 0);
        }
    }

    #[test]
    fn test_random_seed_is_reported() {
        let mut config = config(vec![Game::Scratch]);
        config.seed = None;
        let report = simulate(&config, &CancelHandle::new()).unwrap();
        assert_eq!(report.seed.len(), 64);
    }

    #[test]
    fn test_paid_slot_stakes_feed_the_jackpot() {
        let pool = SharedJackpot::new(10_000);
        let mut tally = Tally::feeding(pool.clone(), 250);
        let spin = |free_spin| {
            Event::SlotSpinResolved(arcade_types::casino::SlotSpin {
                grid: [arcade_types::casino::SlotSymbol::Lemon; 15],
                bet: 1_000,
                free_spin,
                payout: 0,
                free_spins_awarded: 0,
                free_spins_remaining: 0,
                win_indices: Vec::new(),
                special: SpecialEvent::None,
                balance: 0,
            })
        };

        tally.publish(spin(false));
        tally.publish(spin(false));
        tally.publish(spin(true));
        assert_eq!(pool.jackpot(), 10_000 + 2 * 25);
        assert_eq!(tally.wagered, 2_000);
        assert_eq!(tally.free_spins, 1);
    }

    #[test]
    fn test_slot_run_grows_the_pool() {
        let config = config(vec![Game::Slots]);
        let cancel = CancelHandle::new();
        let runner = Runner {
            config: &config,
            seed: create_seed(7),
            cancel: &cancel,
            jackpot: SharedJackpot::new(config.slots.machine.jackpot_floor),
        };
        let session = runner.play(Game::Slots, 0).unwrap();

        // 1% of every paid stake lands in the pool unless a jackpot reset it
        let paid = session.tally.wagered;
        assert!(paid > 0);
        if session.tally.jackpots == 0 {
            assert_eq!(
                runner.jackpot.jackpot(),
                config.slots.machine.jackpot_floor + paid / 100
            );
        }
    }

    #[test]
    fn test_tally_counts_stakes() {
        let mut tally = Tally::default();
        tally.publish(Event::ChickenStarted { bet: 100, mines: 3 });
        tally.publish(Event::RouletteSpinResolved(arcade_types::casino::RouletteSpin {
            result: 3,
            bets: 2,
            wagered: 250,
            payout: 0,
        }));
        assert_eq!(tally.rounds, 1);
        assert_eq!(tally.wagered, 350);
    }
}
