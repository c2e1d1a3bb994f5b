//! Common types used throughout arcade.
//!
//! Everything here is plain data: symbols, grids, per-game configuration and the
//! round events handed to presentation layers. The engines that produce them live
//! in `arcade-execution`.

pub mod casino;

pub use casino::Seed;
