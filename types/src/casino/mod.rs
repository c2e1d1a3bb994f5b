mod codec;
mod config;
mod constants;
mod events;
mod game;
mod symbols;

pub use codec::{indices_encode_size, read_array, read_indices, write_indices};
pub use config::*;
pub use constants::*;
pub use events::*;
pub use game::*;
pub use symbols::*;
