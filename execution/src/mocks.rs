//! Deterministic fixtures for tests.

use crate::casino::GameRng;
use crate::state::Memory;
use arcade_types::Seed;
use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;

/// Creates a reproducible seed from an index.
pub fn create_seed(index: u64) -> Seed {
    let mut hasher = Sha256::new();
    hasher.update(b"arcade-test-seed");
    hasher.update(&index.to_be_bytes());
    Seed::new(hasher.finalize().0)
}

/// Creates a reproducible RNG for a session.
pub fn create_rng(index: u64, session_id: u64) -> GameRng {
    GameRng::new(&create_seed(index), session_id, 0)
}

/// Creates a wallet holding `balance` with the jackpot at its floor.
pub fn create_wallet(balance: u64) -> Memory {
    Memory::new(balance, arcade_types::casino::JACKPOT_FLOOR)
}
