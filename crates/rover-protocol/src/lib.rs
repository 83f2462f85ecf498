pub mod commands;
pub mod framer;
pub mod matcher;

pub use commands::{ClientCommandKind, ServerMessage};
pub use framer::Framer;
pub use matcher::{
    is_full_power, is_recharging, match_confirmation, match_key_id, match_ok, match_secret,
    match_username,
};
