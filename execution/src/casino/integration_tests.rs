//! Integration tests for casino game execution.
//!
//! These tests drive several engines through whole sessions: paid spins into
//! free spins, auto-play stop conditions, and the event stream a presentation
//! layer would consume.

use arcade_types::casino::{
    ChickenConfig, Event, RouletteBetType, RouletteConfig, RouletteVariant, ScratchConfig,
    SlotConfig, SlotSymbol, SpecialEvent, JACKPOT_FLOOR,
};
use commonware_codec::{Encode, ReadExt};

use super::chicken::ChickenGame;
use super::roulette::{RouletteBet, RouletteTable};
use super::scratch::ScratchGame;
use super::slots::{Phase, SlotMachine};
use super::{GameError, GameRng};
use crate::autoplay::{AutoPlay, StopReason};
use crate::mocks::{create_rng, create_seed, create_wallet};
use crate::state::{JackpotPool, Memory, SharedJackpot, Wallet};

/// Spin at `bet` until a spin awards free spins.
fn spin_until_bonus(
    machine: &mut SlotMachine,
    rng: &mut GameRng,
    wallet: &mut Memory,
    jackpot: &mut Memory,
    events: &mut Vec<Event>,
) {
    for _ in 0..5_000 {
        machine.spin(10, rng, wallet, jackpot, events).unwrap();
        if machine.state().is_bonus_mode() {
            return;
        }
    }
    panic!("no free spins awarded");
}

#[test]
fn test_free_spins_run_to_completion() {
    let mut machine = SlotMachine::new(SlotConfig::default()).unwrap();
    let mut rng = create_rng(1, 1);
    let mut wallet = create_wallet(1_000_000);
    let mut jackpot = Memory::new(0, JACKPOT_FLOOR);
    let mut events: Vec<Event> = Vec::new();

    spin_until_bonus(&mut machine, &mut rng, &mut wallet, &mut jackpot, &mut events);
    assert_eq!(machine.phase(), Phase::AutoFreeSpin);
    let paid = events.len();

    let report = machine.run_free_spins(
        &AutoPlay::new(),
        &mut rng,
        &mut wallet,
        &mut jackpot,
        &mut events,
    );
    assert_eq!(report.stop, StopReason::Exhausted);
    assert_eq!(report.rounds as usize, events.len() - paid);
    assert!(report.rounds >= 5);
    assert_eq!(machine.phase(), Phase::Idle);
    assert_eq!(machine.state().free_spins_remaining, 0);

    for event in &events[paid..] {
        let Event::SlotSpinResolved(spin) = event else {
            panic!("unexpected event: {:?}", event);
        };
        assert!(spin.free_spin);
        assert_eq!(spin.bet, 10);
    }
    let Some(Event::SlotSpinResolved(last)) = events.last() else {
        panic!("missing final spin");
    };
    assert_eq!(last.free_spins_remaining, 0);
    assert_eq!(last.balance, wallet.balance());
}

#[test]
fn test_cancelled_free_spins_stay_pending() {
    let mut machine = SlotMachine::new(SlotConfig::default()).unwrap();
    let mut rng = create_rng(2, 1);
    let mut wallet = create_wallet(1_000_000);
    let mut jackpot = Memory::new(0, JACKPOT_FLOOR);
    let mut events: Vec<Event> = Vec::new();

    spin_until_bonus(&mut machine, &mut rng, &mut wallet, &mut jackpot, &mut events);
    let pending = machine.state().free_spins_remaining;
    let paid = events.len();

    let autoplay = AutoPlay::new();
    autoplay.handle().cancel();
    let report = machine.run_free_spins(&autoplay, &mut rng, &mut wallet, &mut jackpot, &mut events);
    assert_eq!(report.rounds, 0);
    assert_eq!(report.stop, StopReason::Cancelled);
    assert_eq!(events.len(), paid);
    assert_eq!(machine.state().free_spins_remaining, pending);
    assert_eq!(machine.phase(), Phase::AutoFreeSpin);

    // A limited run plays exactly that many
    let report = machine.run_free_spins(
        &AutoPlay::new().with_limit(2),
        &mut rng,
        &mut wallet,
        &mut jackpot,
        &mut events,
    );
    assert_eq!(report.rounds, 2);
    assert_eq!(events.len(), paid + 2);
}

#[test]
fn test_paid_autoplay_stops_on_insufficient_funds() {
    let mut machine = SlotMachine::new(SlotConfig::default()).unwrap();
    let mut rng = create_rng(3, 1);
    let mut wallet = create_wallet(100);
    let mut jackpot = Memory::new(0, JACKPOT_FLOOR);
    let mut events: Vec<Event> = Vec::new();

    let report = machine.autoplay_paid(
        &AutoPlay::new().with_limit(100_000),
        50,
        &mut rng,
        &mut wallet,
        &mut jackpot,
        &mut events,
    );
    assert!(matches!(
        report.stop,
        StopReason::Rejected(GameError::InsufficientFunds { need: 50, .. })
    ));
    assert!(wallet.balance() < 50);
    assert_eq!(report.rounds as usize, events.len());
    assert_eq!(machine.phase(), Phase::Idle);
}

#[test]
fn test_paid_autoplay_rejects_invalid_bet() {
    let mut machine = SlotMachine::new(SlotConfig::default()).unwrap();
    let mut rng = create_rng(4, 1);
    let mut wallet = create_wallet(1_000);
    let mut jackpot = Memory::new(0, JACKPOT_FLOOR);
    let mut events: Vec<Event> = Vec::new();

    let report = machine.autoplay_paid(
        &AutoPlay::new(),
        75,
        &mut rng,
        &mut wallet,
        &mut jackpot,
        &mut events,
    );
    assert_eq!(report.rounds, 0);
    assert_eq!(report.stop, StopReason::Rejected(GameError::InvalidBet));
    assert_eq!(wallet.balance(), 1_000);
    assert!(events.is_empty());
}

#[test]
fn test_same_seed_replays_session() {
    let play = || {
        let mut machine = SlotMachine::new(SlotConfig::default()).unwrap();
        let mut rng = GameRng::new(&create_seed(9), 42, 0);
        let mut wallet = create_wallet(10_000);
        let mut jackpot = Memory::new(0, JACKPOT_FLOOR);
        let mut events: Vec<Event> = Vec::new();
        machine.autoplay_paid(
            &AutoPlay::new().with_limit(50),
            100,
            &mut rng,
            &mut wallet,
            &mut jackpot,
            &mut events,
        );
        (events, wallet.balance())
    };
    assert_eq!(play(), play());
}

#[test]
fn test_shared_jackpot_between_players() {
    let pool = SharedJackpot::new(JACKPOT_FLOOR);
    pool.contribute(25_000);
    let mut first_pool = pool.clone();
    let mut second_pool = pool.clone();

    let mut first = SlotMachine::new(SlotConfig::default()).unwrap();
    let mut wallet = create_wallet(0);
    let mut grid = [SlotSymbol::Lemon; 15];
    grid[..5].copy_from_slice(&[SlotSymbol::Jackpot; 5]);
    grid[5..10].copy_from_slice(&[
        SlotSymbol::Cherry,
        SlotSymbol::Orange,
        SlotSymbol::Grape,
        SlotSymbol::Bell,
        SlotSymbol::Diamond,
    ]);
    grid[10..].copy_from_slice(&[
        SlotSymbol::Orange,
        SlotSymbol::Grape,
        SlotSymbol::Bell,
        SlotSymbol::Diamond,
        SlotSymbol::Cherry,
    ]);

    // A free spin at bet 0 pays nothing but the pool
    first.grant_free_spins(1, 0);
    first.begin_spin(0, &mut wallet).unwrap();
    let spin = first.settle(grid, &mut wallet, &mut first_pool).unwrap();
    assert!(spin.free_spin);
    assert_eq!(spin.special, SpecialEvent::Jackpot);
    assert_eq!(spin.payout, 35_000);
    assert_eq!(wallet.balance(), 35_000);

    // The other player's view was reset as well
    assert_eq!(second_pool.jackpot(), JACKPOT_FLOOR);
    assert_eq!(second_pool.take_jackpot(JACKPOT_FLOOR), JACKPOT_FLOOR);
}

#[test]
fn test_event_stream_across_games() {
    let mut rng = create_rng(11, 1);
    let mut wallet = create_wallet(100_000);
    let mut jackpot = Memory::new(0, JACKPOT_FLOOR);
    let mut events: Vec<Event> = Vec::new();

    let mut slots = SlotMachine::new(SlotConfig::default()).unwrap();
    slots
        .spin(100, &mut rng, &mut wallet, &mut jackpot, &mut events)
        .unwrap();

    let mut chicken = ChickenGame::new(ChickenConfig::default()).unwrap();
    chicken
        .start(100, 3, &mut rng, &mut wallet, &mut events)
        .unwrap();
    let board = chicken.board().unwrap().clone();
    let safe = (0..board.cell_count()).find(|&c| !board.has_mine(c)).unwrap();
    chicken.reveal(safe, &mut events).unwrap();
    let result = chicken.cash_out(&mut wallet, &mut events).unwrap();
    assert_eq!(result.payout, 100 * 136 / 100);

    let scratch = ScratchGame::new(ScratchConfig::default()).unwrap();
    scratch
        .buy(500, &mut rng, &mut wallet, &mut events)
        .unwrap();

    let roulette = RouletteTable::new(RouletteConfig {
        variant: RouletteVariant::American,
        ..RouletteConfig::default()
    })
    .unwrap();
    roulette
        .spin(
            &[RouletteBet::new(RouletteBetType::Odd, 0, 100)],
            &mut rng,
            &mut wallet,
            &mut events,
        )
        .unwrap();

    let kinds: Vec<&str> = events
        .iter()
        .map(|event| match event {
            Event::SlotSpinResolved(_) => "slot",
            Event::ChickenStarted { .. } => "chicken-start",
            Event::ChickenRevealed(_) => "chicken-reveal",
            Event::ChickenResolved(_) => "chicken-end",
            Event::ScratchCardResolved(_) => "scratch",
            Event::RouletteSpinResolved(_) => "roulette",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "slot",
            "chicken-start",
            "chicken-reveal",
            "chicken-end",
            "scratch",
            "roulette"
        ]
    );

    // Every event survives the wire encoding
    for event in &events {
        let encoded = event.encode();
        let decoded = Event::read(&mut encoded.as_ref()).unwrap();
        assert_eq!(&decoded, event);
    }
}
